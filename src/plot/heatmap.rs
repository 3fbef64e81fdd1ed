//! Painter for the annotated confusion-matrix heatmap window.
//!
//! Rows are actual classes, columns predicted classes. Cells are shaded on a
//! light-to-dark blue ramp with a matching colour bar on the right.

use std::f32::consts::FRAC_PI_2;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke, StrokeKind, Vec2};
use eframe::egui::epaint::TextShape;

use crate::ml::metrics::ConfusionMatrix;

const TITLE_HEIGHT: f32 = 48.0;
const LEFT_MARGIN: f32 = 96.0;
const BOTTOM_MARGIN: f32 = 64.0;
const RIGHT_MARGIN: f32 = 88.0;
const COLORBAR_WIDTH: f32 = 18.0;

/// Anchor colors of a light-to-dark blue ramp, sampled at even intervals.
const BLUES: [[u8; 3]; 9] = [
    [247, 251, 255],
    [222, 235, 247],
    [198, 219, 239],
    [158, 202, 225],
    [107, 174, 214],
    [66, 146, 198],
    [33, 113, 181],
    [8, 81, 156],
    [8, 48, 107],
];

/// Map `t` in `[0, 1]` onto the blue ramp.
pub fn blues(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (BLUES.len() - 1) as f32;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(BLUES.len() - 1);
    let frac = scaled - lo as f32;
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).round() as u8;
    Color32::from_rgb(
        mix(BLUES[lo][0], BLUES[hi][0]),
        mix(BLUES[lo][1], BLUES[hi][1]),
        mix(BLUES[lo][2], BLUES[hi][2]),
    )
}

/// Galley origin that centres text rotated a quarter turn counter-clockwise on `center`.
///
/// The rotation pivots on the galley's top-left corner, so the text runs upward from
/// the origin and its line height extends to the right.
pub fn vertical_label_origin(center: Pos2, size: Vec2) -> Pos2 {
    Pos2::new(center.x - size.y / 2.0, center.y + size.x / 2.0)
}

/// Annotation color that stays readable on a cell of intensity `t`.
pub fn annotation_color(t: f32) -> Color32 {
    if t > 0.5 {
        Color32::WHITE
    } else {
        Color32::from_gray(20)
    }
}

/// Cell intensity relative to the largest count.
pub fn intensity(count: u32, max_count: u32) -> f32 {
    if max_count == 0 {
        0.0
    } else {
        count as f32 / max_count as f32
    }
}

/// Screen geometry of the heatmap inside a window area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapLayout {
    pub grid: Rect,
    pub cell: f32,
    pub colorbar: Rect,
}

impl HeatmapLayout {
    /// Fit a square `n x n` grid into `area`, leaving room for labels and a color bar.
    pub fn compute(area: Rect, n: usize) -> Self {
        let n = n.max(1) as f32;
        let avail_w = (area.width() - LEFT_MARGIN - RIGHT_MARGIN).max(n);
        let avail_h = (area.height() - TITLE_HEIGHT - BOTTOM_MARGIN).max(n);
        let side = avail_w.min(avail_h);
        let left = area.left() + LEFT_MARGIN + (avail_w - side) / 2.0;
        let top = area.top() + TITLE_HEIGHT + (avail_h - side) / 2.0;
        let grid = Rect::from_min_size(Pos2::new(left, top), Vec2::splat(side));
        let colorbar = Rect::from_min_size(
            Pos2::new(grid.right() + 16.0, grid.top()),
            Vec2::new(COLORBAR_WIDTH, side),
        );
        Self {
            grid,
            cell: side / n,
            colorbar,
        }
    }

    /// Rectangle of the cell at `(row, col)`; rows are actual labels, columns predicted.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                self.grid.left() + col as f32 * self.cell,
                self.grid.top() + row as f32 * self.cell,
            ),
            Vec2::splat(self.cell),
        )
    }
}

/// Window content: an annotated confusion-matrix heatmap.
pub struct ConfusionHeatmap {
    title: String,
    matrix: ConfusionMatrix,
    labels: Vec<String>,
}

impl ConfusionHeatmap {
    pub fn new(title: impl Into<String>, matrix: ConfusionMatrix, labels: &[&str]) -> Self {
        Self {
            title: title.into(),
            matrix,
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }

    fn label(&self, idx: usize) -> &str {
        self.labels.get(idx).map(String::as_str).unwrap_or("?")
    }

    fn paint(&self, painter: &egui::Painter, area: Rect) {
        let n = self.matrix.n_classes;
        let layout = HeatmapLayout::compute(area, n);
        let max_count = self.matrix.max_count();
        let ink = Color32::from_gray(30);

        painter.text(
            Pos2::new(layout.grid.center().x, area.top() + TITLE_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            &self.title,
            FontId::proportional(20.0),
            ink,
        );

        let count_font = FontId::proportional((layout.cell / 6.0).clamp(12.0, 32.0));
        for row in 0..n {
            for col in 0..n {
                let count = self.matrix.get(row, col);
                let t = intensity(count, max_count);
                let rect = layout.cell_rect(row, col);
                painter.rect_filled(rect, 0.0, blues(t));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    count.to_string(),
                    count_font.clone(),
                    annotation_color(t),
                );
            }
        }
        painter.rect_stroke(layout.grid, 0.0, Stroke::new(1.0, ink), StrokeKind::Outside);

        let tick_font = FontId::proportional(14.0);
        for idx in 0..n {
            let column = layout.cell_rect(0, idx);
            painter.text(
                Pos2::new(column.center().x, layout.grid.bottom() + 6.0),
                Align2::CENTER_TOP,
                self.label(idx),
                tick_font.clone(),
                ink,
            );
            let row = layout.cell_rect(idx, 0);
            painter.text(
                Pos2::new(layout.grid.left() - 8.0, row.center().y),
                Align2::RIGHT_CENTER,
                self.label(idx),
                tick_font.clone(),
                ink,
            );
        }

        let axis_font = FontId::proportional(16.0);
        painter.text(
            Pos2::new(layout.grid.center().x, layout.grid.bottom() + 32.0),
            Align2::CENTER_TOP,
            "Predicted",
            axis_font.clone(),
            ink,
        );
        let galley = painter.layout_no_wrap("Actual".to_string(), axis_font, ink);
        let origin = vertical_label_origin(
            Pos2::new(area.left() + 20.0, layout.grid.center().y),
            galley.size(),
        );
        painter.add(TextShape::new(origin, galley, ink).with_angle(-FRAC_PI_2));

        self.paint_colorbar(painter, layout.colorbar, max_count, ink);
    }

    fn paint_colorbar(&self, painter: &egui::Painter, bar: Rect, max_count: u32, ink: Color32) {
        const STEPS: usize = 64;
        let step_h = bar.height() / STEPS as f32;
        for step in 0..STEPS {
            let t = 1.0 - (step as f32 + 0.5) / STEPS as f32;
            let rect = Rect::from_min_size(
                Pos2::new(bar.left(), bar.top() + step as f32 * step_h),
                Vec2::new(bar.width(), step_h + 0.5),
            );
            painter.rect_filled(rect, 0.0, blues(t));
        }
        painter.rect_stroke(bar, 0.0, Stroke::new(1.0, ink), StrokeKind::Outside);
        let small = FontId::proportional(12.0);
        painter.text(
            Pos2::new(bar.right() + 4.0, bar.top()),
            Align2::LEFT_TOP,
            max_count.to_string(),
            small.clone(),
            ink,
        );
        painter.text(
            Pos2::new(bar.right() + 4.0, bar.bottom()),
            Align2::LEFT_BOTTOM,
            "0",
            small,
            ink,
        );
    }
}

impl eframe::App for ConfusionHeatmap {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(Color32::WHITE))
            .show(ctx, |ui| {
                let area = ui.max_rect();
                self.paint(ui.painter(), area);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_runs_light_to_dark() {
        assert_eq!(blues(0.0), Color32::from_rgb(247, 251, 255));
        assert_eq!(blues(1.0), Color32::from_rgb(8, 48, 107));
        assert_eq!(blues(-3.0), blues(0.0));
        assert_eq!(blues(f32::NAN), blues(0.0));
        let mid = blues(0.5);
        assert_eq!(mid, Color32::from_rgb(107, 174, 214));
    }

    #[test]
    fn annotations_flip_on_dark_cells() {
        assert_eq!(annotation_color(0.9), Color32::WHITE);
        assert_ne!(annotation_color(0.1), Color32::WHITE);
        assert_eq!(intensity(5, 0), 0.0);
        assert_eq!(intensity(5, 10), 0.5);
    }

    #[test]
    fn layout_is_square_and_tiles_the_grid() {
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(600.0, 500.0));
        let layout = HeatmapLayout::compute(area, 2);
        assert_eq!(layout.grid.width(), layout.grid.height());
        assert!(area.contains_rect(layout.grid));
        assert!(layout.colorbar.right() <= area.right());
        let last = layout.cell_rect(1, 1);
        assert!((last.right() - layout.grid.right()).abs() < 1e-3);
        assert!((last.bottom() - layout.grid.bottom()).abs() < 1e-3);
        assert_eq!(layout.cell_rect(0, 1).top(), layout.grid.top());
    }

    #[test]
    fn vertical_label_is_centred_and_clear_of_row_ticks() {
        let size = Vec2::new(52.0, 20.0);
        let center = Pos2::new(20.0, 200.0);
        let origin = vertical_label_origin(center, size);
        // Rotated extent: upward by the text width, rightward by the line height.
        let rotated = Rect::from_min_max(
            Pos2::new(origin.x, origin.y - size.x),
            Pos2::new(origin.x + size.y, origin.y),
        );
        assert_eq!(rotated.center(), center);
        assert!(rotated.right() < LEFT_MARGIN - 40.0);
    }
}
