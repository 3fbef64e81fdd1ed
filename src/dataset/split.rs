//! Seeded train/test partitioning.

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use thiserror::Error;

use super::loader::OutcomeTable;

/// Fraction of rows held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
/// Seed for the row shuffle.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
    #[error("split of {rows} rows leaves the {side} set empty")]
    EmptySide { rows: usize, side: &'static str },
}

/// Row indices assigned to each side of the split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Train and test subsets of an [`OutcomeTable`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: OutcomeTable,
    pub test: OutcomeTable,
    pub indices: SplitIndices,
}

/// Number of test rows for `rows` at `test_fraction`.
pub fn test_size(rows: usize, test_fraction: f64) -> usize {
    ((rows as f64) * test_fraction).round() as usize
}

/// Shuffle `0..rows` with `seed`; the first `test_size` indices form the test set.
pub fn split_indices(rows: usize, test_fraction: f64, seed: u64) -> Result<SplitIndices, SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }
    let n_test = test_size(rows, test_fraction).min(rows);
    if n_test == 0 {
        return Err(SplitError::EmptySide { rows, side: "test" });
    }
    if n_test == rows {
        return Err(SplitError::EmptySide { rows, side: "train" });
    }

    let mut order: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let train = order.split_off(n_test);
    Ok(SplitIndices { train, test: order })
}

/// Partition a table into train and test subsets.
pub fn train_test_split(
    table: &OutcomeTable,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, SplitError> {
    let indices = split_indices(table.n_rows(), test_fraction, seed)?;
    let train = select_rows(table, &indices.train);
    let test = select_rows(table, &indices.test);
    tracing::info!(
        "Split {} rows into {} train / {} test (seed {seed})",
        table.n_rows(),
        train.n_rows(),
        test.n_rows()
    );
    Ok(TrainTestSplit {
        train,
        test,
        indices,
    })
}

fn select_rows(table: &OutcomeTable, rows: &[usize]) -> OutcomeTable {
    OutcomeTable {
        feature_names: table.feature_names.clone(),
        x: table.x.select(Axis(0), rows),
        y: table.y.select(Axis(0), rows),
    }
}
