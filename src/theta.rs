use std::collections::HashMap;
use std::ops::Range;
use ndarray::prelude::*;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::error::{GloveError, Result};
use crate::vocabulary::{Vocabulary, WordIndex};


/// The two roles a word plays in a co-occurrence pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Central,
    Context,
}

/// Anything able to hand out the embedding of a word in a given role.
pub trait EmbeddingStore<K: ?Sized> {
    fn dimension(&self) -> usize;
    fn vector_for(&self, key: &K, role: Role) -> Result<ArrayView1<'_, f64>>;
}


/// Flat theta: all central vectors first, then all context vectors, each
/// word owning a contiguous block of `dimension` values in vocabulary order.
#[derive(Clone, Debug)]
pub struct PackedTheta<'a> {
    vocabulary: &'a Vocabulary,
    theta: ArrayView1<'a, f64>,
    dimension: usize,
}

impl<'a> PackedTheta<'a> {

    pub fn new(vocabulary: &'a Vocabulary, theta: ArrayView1<'a, f64>) -> Result<PackedTheta<'a>> {
        let dimension = packed_dimension(vocabulary, theta.len())?;
        Ok(Self { vocabulary, theta, dimension })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    /// Position of a word's vector inside the flat array.
    pub fn block(&self, index: usize, role: Role) -> Range<usize> {
        let offset = match role {
            Role::Central => 0,
            Role::Context => self.vocabulary.len() * self.dimension,
        };
        let start = offset + index * self.dimension;
        start..start + self.dimension
    }

    pub fn vector_at(&self, index: usize, role: Role) -> ArrayView1<'_, f64> {
        self.theta.slice(s![self.block(index, role)])
    }

}

impl<K: ?Sized> EmbeddingStore<K> for PackedTheta<'_>
where
    Vocabulary: WordIndex<K>
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn vector_for(&self, key: &K, role: Role) -> Result<ArrayView1<'_, f64>> {
        let index = self.vocabulary.index_of(key)?;
        Ok(self.vector_at(index, role))
    }
}

/// `len / 2 / |V|`, which must be a positive whole number.
pub fn packed_dimension(vocabulary: &Vocabulary, len: usize) -> Result<usize> {
    if vocabulary.is_empty() {
        return Err(GloveError::EmptyVocabulary);
    }
    let dimension = len / 2 / vocabulary.len();
    if dimension == 0 || 2 * vocabulary.len() * dimension != len {
        return Err(GloveError::DimensionMismatch { len, vocab_size: vocabulary.len() });
    }
    Ok(dimension)
}


/// Nested theta: word -> vector, once per role.
#[derive(Clone, Debug, Default)]
pub struct DictTheta {
    pub central: HashMap<String, Array1<f64>>,
    pub context: HashMap<String, Array1<f64>>,
}

impl DictTheta {

    pub fn from_packed(vocabulary: &Vocabulary, theta: &Array1<f64>) -> Result<DictTheta> {

        let packed = PackedTheta::new(vocabulary, theta.view())?;
        let mut dict = DictTheta::default();
        for (i, word) in vocabulary.words().iter().enumerate() {
            dict.central.insert(word.to_owned(), packed.vector_at(i, Role::Central).to_owned());
            dict.context.insert(word.to_owned(), packed.vector_at(i, Role::Context).to_owned());
        }
        Ok(dict)
    }

    /// Packs the vectors in vocabulary order, every vector must share one dimension.
    pub fn to_packed(&self, vocabulary: &Vocabulary) -> Result<Array1<f64>> {

        if vocabulary.is_empty() {
            return Err(GloveError::EmptyVocabulary);
        }
        let dimension = EmbeddingStore::<str>::dimension(self);
        let n = vocabulary.len() * dimension;
        let mut theta: Array1<f64> = Array1::zeros(2 * n);

        for (i, word) in vocabulary.words().iter().enumerate() {
            for (offset, role) in [(0, Role::Central), (n, Role::Context)] {
                let vector = self.vector_for(word.as_str(), role)?;
                if vector.len() != dimension {
                    return Err(GloveError::DimensionMismatch { len: vector.len(), vocab_size: vocabulary.len() });
                }
                let start = offset + i * dimension;
                theta.slice_mut(s![start..start + dimension]).assign(&vector);
            }
        }
        Ok(theta)
    }

}

impl EmbeddingStore<str> for DictTheta {
    fn dimension(&self) -> usize {
        self.central.values().next().map(|v| v.len()).unwrap_or(0)
    }

    fn vector_for(&self, key: &str, role: Role) -> Result<ArrayView1<'_, f64>> {
        let vectors = match role {
            Role::Central => &self.central,
            Role::Context => &self.context,
        };
        match vectors.get(key) {
            Some(vector) => Ok(vector.view()),
            None => Err(GloveError::UnknownWord(key.to_owned()))
        }
    }
}


/// Random packed theta, entries drawn from [-0.5, 0.5) and scaled by the dimension.
pub fn gen_theta(vocabulary: &Vocabulary, dimension: usize, seed: Option<u64>) -> Result<Array1<f64>> {

    if vocabulary.is_empty() {
        return Err(GloveError::EmptyVocabulary);
    }
    if dimension == 0 {
        return Err(GloveError::Config("embedding dimension must be positive".to_string()));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let len = 2 * vocabulary.len() * dimension;
    Ok(Array1::random_using(len, Uniform::new(-0.5, 0.5), &mut rng) / dimension as f64)
}


#[cfg(test)]
mod tests {

    use ndarray::{array, Array1};
    use crate::error::GloveError;
    use crate::vocabulary::Vocabulary;
    use super::*;

    fn vocab(ws: &[&str]) -> Vocabulary {
        Vocabulary::new(ws.iter().map(|w| w.to_string()).collect()).unwrap()
    }

    #[test]
    fn packed_blocks_follow_vocabulary_order() {
        let vocabulary = vocab(&["a", "b"]);
        // central a, central b, context a, context b
        let theta: Array1<f64> = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let packed = PackedTheta::new(&vocabulary, theta.view()).unwrap();

        assert_eq!(EmbeddingStore::<str>::dimension(&packed), 2);
        assert_eq!(packed.vector_for("b", Role::Central).unwrap(), array![3.0, 4.0]);
        assert_eq!(packed.vector_for(&0usize, Role::Context).unwrap(), array![5.0, 6.0]);
        assert_eq!(packed.block(1, Role::Context), 6..8);
    }

    #[test]
    fn uneven_theta_rejected() {
        let vocabulary = vocab(&["a", "b"]);
        let theta: Array1<f64> = Array1::zeros(6);
        assert!(matches!(
            PackedTheta::new(&vocabulary, theta.view()),
            Err(GloveError::DimensionMismatch { len: 6, vocab_size: 2 })
        ));
        let empty: Array1<f64> = Array1::zeros(0);
        assert!(PackedTheta::new(&vocabulary, empty.view()).is_err());
    }

    #[test]
    fn dict_and_packed_convert_both_ways() {
        let vocabulary = vocab(&["a", "b", "c"]);
        let theta = gen_theta(&vocabulary, 4, Some(7)).unwrap();
        assert_eq!(theta.len(), 24);
        assert!(theta.iter().all(|x| x.abs() <= 0.5 / 4.0));

        let dict = DictTheta::from_packed(&vocabulary, &theta).unwrap();
        assert_eq!(dict.central["c"], theta.slice(s![8..12]));
        assert_eq!(dict.to_packed(&vocabulary).unwrap(), theta);
    }

    #[test]
    fn dict_missing_word() {
        let dict = DictTheta::default();
        assert!(matches!(dict.vector_for("x", Role::Context), Err(GloveError::UnknownWord(_))));
    }

}
