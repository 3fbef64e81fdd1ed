//! Board-state dataset loading and train/test partitioning.

pub mod loader;
pub mod split;

pub use loader::{CLASS_NAMES, DatasetLoadError, OUTCOME_COLUMN, OutcomeTable, load_csv, read_table};
pub use split::{SplitError, TrainTestSplit, train_test_split};
