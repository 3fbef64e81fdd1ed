//! Library exports for the training binaries, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Tic-tac-toe board cell encoding.
pub mod board;
/// Pipeline settings.
pub mod config;
/// Dataset loading and splitting.
pub mod dataset;
/// Tracing setup.
pub mod logging;
/// Decision-tree model and metrics.
pub mod ml;
/// End-to-end training run.
pub mod pipeline;
/// Confusion-matrix heatmap window.
pub mod plot;
