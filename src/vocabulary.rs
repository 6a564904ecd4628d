use std::collections::HashMap;
use crate::error::{GloveError, Result};


/// Ordered list of unique words, position is the index used by the packed
/// theta and the dense co-occurrence matrix.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    words: Vec<String>,
    t2i: HashMap<String, usize>,
}

impl Vocabulary {

    pub fn new(words: Vec<String>) -> Result<Vocabulary> {

        let mut t2i: HashMap<String, usize> = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if t2i.insert(word.to_owned(), i).is_some() {
                return Err(GloveError::DuplicateWord(word.to_owned()));
            }
        }

        Ok(Self { words, t2i })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(|w| w.as_str())
    }

}


/// Resolves a word key (by text or by position) to its vocabulary position.
pub trait WordIndex<K: ?Sized> {
    fn index_of(&self, key: &K) -> Result<usize>;
}

impl WordIndex<str> for Vocabulary {
    fn index_of(&self, key: &str) -> Result<usize> {
        match self.t2i.get(key) {
            Some(i) => Ok(*i),
            None => Err(GloveError::UnknownWord(key.to_owned()))
        }
    }
}

impl WordIndex<usize> for Vocabulary {
    fn index_of(&self, key: &usize) -> Result<usize> {
        if *key < self.words.len() {
            Ok(*key)
        } else {
            Err(GloveError::IndexOutOfBounds { index: *key, max: self.words.len() })
        }
    }
}


#[cfg(test)]
mod tests {

    use super::{Vocabulary, WordIndex};
    use crate::error::GloveError;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn index_by_word_and_position() {
        let vocabulary = Vocabulary::new(words(&["a", "b", "c"])).unwrap();
        assert_eq!(vocabulary.index_of("c").unwrap(), 2);
        assert_eq!(vocabulary.index_of(&1usize).unwrap(), 1);
        assert_eq!(vocabulary.word(0), Some("a"));
        assert!(matches!(vocabulary.index_of("z"), Err(GloveError::UnknownWord(w)) if w == "z"));
        assert!(matches!(vocabulary.index_of(&3usize), Err(GloveError::IndexOutOfBounds { index: 3, max: 3 })));
    }

    #[test]
    fn duplicates_rejected() {
        let res = Vocabulary::new(words(&["a", "b", "a"]));
        assert!(matches!(res, Err(GloveError::DuplicateWord(w)) if w == "a"));
    }

}
