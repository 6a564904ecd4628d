
mod error;
mod vocabulary;
mod theta;
mod cooccurrence;
mod cost;
mod gradient;
mod train;
mod plot;
mod config;
mod pipeline;

pub use error::{GloveError, Result};
pub use vocabulary::{Vocabulary, WordIndex};
pub use theta::{gen_theta, packed_dimension, DictTheta, EmbeddingStore, PackedTheta, Role};
pub use cooccurrence::{CooccurrenceDict, CooccurrenceMatrix, CooccurrenceSource, SEPARATOR};
pub use cost::{cost_glove, cost_glove_dict, pair_weight, sigmoid, weighted_cost, DEFAULT_FACTOR};
pub use gradient::{gradient_descent, gradient_descent_dict, stochastic_gradient_descent, weighted_gradient};
pub use train::{History, Strategy, Train};
pub use plot::{chart_bounds, draw_comparison};
pub use config::{files_handling, Config, RunConfig, TrainParams};
pub use pipeline::{Comparison, Pipeline};
