//! Confusion-matrix heatmap window.

mod heatmap;

pub use heatmap::{ConfusionHeatmap, HeatmapLayout, annotation_color, blues, intensity};

use eframe::egui;
use thiserror::Error;

use crate::ml::metrics::ConfusionMatrix;

/// Window title and heading of the heatmap.
pub const HEATMAP_TITLE: &str = "Confusion Matrix";

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to open plot window: {0}")]
    Window(String),
}

/// Open the heatmap window and block until the viewer closes it.
pub fn show_confusion_heatmap(matrix: &ConfusionMatrix, labels: &[&str]) -> Result<(), PlotError> {
    let app = ConfusionHeatmap::new(HEATMAP_TITLE, matrix.clone(), labels);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(HEATMAP_TITLE)
            .with_inner_size([560.0, 500.0])
            .with_min_inner_size([320.0, 300.0]),
        ..Default::default()
    };
    tracing::info!("Showing confusion matrix; close the window to continue");
    eframe::run_native(
        HEATMAP_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| PlotError::Window(err.to_string()))
}
