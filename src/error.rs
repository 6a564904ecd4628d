//! Error type shared by every stage of the comparison run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GloveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("npy error: {0}")]
    Npy(String),

    #[error("plot error: {0}")]
    Plot(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Top level key of an input artifact is absent or of the wrong shape.
    #[error("key '{key}' missing or malformed in {file}")]
    MissingKey { file: String, key: String },

    #[error("word '{0}' is not in the embeddings")]
    UnknownWord(String),

    #[error("word '{0}' appears twice in the vocabulary")]
    DuplicateWord(String),

    #[error("co-occurrence key '{0}' has no '<>' separator")]
    MalformedKey(String),

    #[error("co-occurrence '{key}' has non positive count {count}")]
    NonPositiveCount { key: String, count: f64 },

    #[error("index out of bounds: {index} >= {max}")]
    IndexOutOfBounds { index: usize, max: usize },

    #[error("theta of length {len} does not pack {vocab_size} words in two roles")]
    DimensionMismatch { len: usize, vocab_size: usize },

    #[error("vocabulary is empty")]
    EmptyVocabulary,

    #[error("co-occurrence matrix is {rows}x{cols}, expected {expected}x{expected}")]
    MatrixShape { rows: usize, cols: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, GloveError>;
