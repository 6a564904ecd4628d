use std::collections::HashMap;
use ndarray::Array2;
use crate::error::{GloveError, Result};
use crate::vocabulary::{Vocabulary, WordIndex};

/// Joins the central word (left) and the context word (right) in a sparse key.
pub const SEPARATOR: &str = "<>";


/// A source of observed (central, context, count) triples.
pub trait CooccurrenceSource {
    type Key: ?Sized;

    /// Calls `f` once per observed pair, stopping at the first error.
    fn visit<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(&Self::Key, &Self::Key, f64) -> Result<()>;

    fn n_observed(&self) -> usize;
}


/// Sparse counts keyed by `"central<>context"`, only observed pairs present.
#[derive(Clone, Debug, Default)]
pub struct CooccurrenceDict {
    counts: HashMap<String, f64>,
}

impl CooccurrenceDict {

    pub fn new(counts: HashMap<String, f64>) -> CooccurrenceDict {
        Self { counts }
    }

    pub fn key(central: &str, context: &str) -> String {
        [central, context].join(SEPARATOR)
    }

    pub fn split_key(key: &str) -> Result<(&str, &str)> {
        match key.split_once(SEPARATOR) {
            Some(pair) => Ok(pair),
            None => Err(GloveError::MalformedKey(key.to_owned()))
        }
    }

    pub fn insert(&mut self, central: &str, context: &str, count: f64) {
        self.counts.insert(CooccurrenceDict::key(central, context), count);
    }

    pub fn get(&self, central: &str, context: &str) -> Option<f64> {
        self.counts.get(&CooccurrenceDict::key(central, context)).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    // sorted so floating point sums do not depend on hash order
    fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.counts.keys().collect();
        keys.sort();
        keys
    }

    /// Checks that every stored count is strictly positive.
    pub fn validate_counts(&self) -> Result<()> {
        for key in self.sorted_keys() {
            let count = self.counts[key];
            if !(count > 0.0) {
                return Err(GloveError::NonPositiveCount { key: key.to_owned(), count });
            }
        }
        Ok(())
    }

    /// Dense equivalent, rows are context words and columns central words.
    pub fn to_matrix(&self, vocabulary: &Vocabulary) -> Result<Array2<f64>> {
        let mut x_mat: Array2<f64> = Array2::zeros((vocabulary.len(), vocabulary.len()));
        for key in self.sorted_keys() {
            let (central, context) = CooccurrenceDict::split_key(key)?;
            let i = vocabulary.index_of(central)?;
            let j = vocabulary.index_of(context)?;
            x_mat[[j, i]] = self.counts[key];
        }
        Ok(x_mat)
    }

}

impl CooccurrenceSource for CooccurrenceDict {
    type Key = str;

    fn visit<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Self::Key, &Self::Key, f64) -> Result<()>
    {
        for key in self.sorted_keys() {
            let (central, context) = CooccurrenceDict::split_key(key)?;
            f(central, context, self.counts[key])?;
        }
        Ok(())
    }

    fn n_observed(&self) -> usize {
        self.counts.len()
    }
}


/// Dense counts indexed `[context, central]`, zero meaning unobserved.
#[derive(Clone, Copy, Debug)]
pub struct CooccurrenceMatrix<'a> {
    x_mat: &'a Array2<f64>,
}

impl<'a> CooccurrenceMatrix<'a> {

    pub fn new(x_mat: &'a Array2<f64>, vocabulary: &Vocabulary) -> Result<CooccurrenceMatrix<'a>> {
        let (rows, cols) = x_mat.dim();
        if rows != vocabulary.len() || cols != vocabulary.len() {
            return Err(GloveError::MatrixShape { rows, cols, expected: vocabulary.len() });
        }
        Ok(Self { x_mat })
    }

}

impl CooccurrenceSource for CooccurrenceMatrix<'_> {
    type Key = usize;

    fn visit<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Self::Key, &Self::Key, f64) -> Result<()>
    {
        // only non-zero entries, same result as scanning every central/context pair
        for ((context, central), p_ij) in self.x_mat.indexed_iter() {
            if *p_ij != 0.0 {
                f(&central, &context, *p_ij)?;
            }
        }
        Ok(())
    }

    fn n_observed(&self) -> usize {
        self.x_mat.iter().filter(|x| **x != 0.0).count()
    }
}
