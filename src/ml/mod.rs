//! Model training, evaluation and persistence.

pub mod metrics;
pub mod tree;

pub use tree::{DEFAULT_MAX_DEPTH, ModelError, OutcomeModel};
