//! Annotated correlation heatmap.

use kurbo::Rect;
use tracing::{info, warn};

use crate::artifact::{Artifact, ArtifactKind};
use crate::axes::format_tick;
use crate::canvas::{
    contrasting_text, coolwarm, fit_text, Canvas, TextAnchor, TextBaseline, TextStyle, INK,
};
use crate::config::ExploreConfig;
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::error::ExploreError;
use crate::table::Table;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 800.0;

/// Heatmap cells.
const GRID_AREA: Rect = Rect::new(180.0, 60.0, 840.0, 640.0);
/// Vertical color legend.
const COLORBAR: Rect = Rect::new(870.0, 60.0, 890.0, 640.0);
const COLORBAR_STEPS: usize = 100;
const LABEL_FONT: f64 = 11.0;

/// Renders the heatmap of [`correlation_matrix`], or returns `Ok(None)`
/// when the table has no numeric columns.
pub fn render_correlation(
    table: &Table,
    config: &ExploreConfig,
) -> Result<Option<Artifact>, ExploreError> {
    let matrix = correlation_matrix(table);
    if matrix.is_empty() {
        warn!("correlation heatmap skipped: no numeric columns");
        return Ok(None);
    }

    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    draw_cells(&mut canvas, &matrix);
    draw_labels(&mut canvas, matrix.names());
    draw_colorbar(&mut canvas);
    super::draw_title(&mut canvas, "Correlation Heatmap", 38.0);

    let kind = ArtifactKind::CorrelationHeatmap;
    let path = config.artifact_path(&kind.file_stem());
    canvas.save(&path)?;
    info!(columns = matrix.len(), path = %path.display(), "correlation heatmap written");
    Ok(Some(Artifact::new(kind, path)))
}

/// Colors `r` on a diverging scale fixed to `[-1, 1]`.
fn cell_color(r: f64) -> peniko::Color {
    coolwarm((r + 1.0) / 2.0)
}

/// Cell annotation: two decimals, blank when undefined.
fn annotation(r: f64) -> String {
    if r.is_nan() {
        String::new()
    } else {
        format!("{r:.2}")
    }
}

fn cell_rect(n: usize, i: usize, j: usize) -> Rect {
    let w = GRID_AREA.width() / n as f64;
    let h = GRID_AREA.height() / n as f64;
    let x0 = GRID_AREA.x0 + w * j as f64;
    let y0 = GRID_AREA.y0 + h * i as f64;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

fn draw_cells(canvas: &mut Canvas, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let sample_cell = cell_rect(n, 0, 0);
    let font = (sample_cell.width() / 4.0).min(sample_cell.height() / 2.5).clamp(6.0, 14.0);

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i, j);
            let rect = cell_rect(n, i, j);
            let text = annotation(r);
            if text.is_empty() {
                continue;
            }
            let fill = cell_color(r);
            canvas.fill_rect(rect, fill);
            canvas.text(
                rect.center(),
                &text,
                &TextStyle::new(font)
                    .centered()
                    .color(contrasting_text(fill)),
            );
        }
    }
}

fn draw_labels(canvas: &mut Canvas, names: &[String]) {
    let n = names.len();
    let left_room = GRID_AREA.x0 - 20.0;
    let bottom_room = (HEIGHT - GRID_AREA.y1 - 20.0) * std::f64::consts::SQRT_2;

    for (k, name) in names.iter().enumerate() {
        let row = cell_rect(n, k, 0);
        canvas.text(
            (GRID_AREA.x0 - 6.0, row.center().y),
            &fit_text(name, LABEL_FONT, left_room),
            &TextStyle::new(LABEL_FONT)
                .anchor(TextAnchor::End)
                .baseline(TextBaseline::Middle),
        );

        let col = cell_rect(n, n - 1, k);
        canvas.text(
            (col.center().x, GRID_AREA.y1 + 8.0),
            &fit_text(name, LABEL_FONT, bottom_room),
            &TextStyle::new(LABEL_FONT)
                .anchor(TextAnchor::End)
                .baseline(TextBaseline::Middle)
                .rotate(-45.0),
        );
    }
}

fn draw_colorbar(canvas: &mut Canvas) {
    let step_h = COLORBAR.height() / COLORBAR_STEPS as f64;
    for s in 0..COLORBAR_STEPS {
        // Top of the bar is +1.
        let t = 1.0 - (s as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y0 = COLORBAR.y0 + step_h * s as f64;
        canvas.fill_rect(
            Rect::new(COLORBAR.x0, y0, COLORBAR.x1, y0 + step_h),
            coolwarm(t),
        );
    }
    canvas.stroke_rect(COLORBAR, INK, 1.0);

    let style = TextStyle::new(LABEL_FONT).baseline(TextBaseline::Middle);
    for tick in [-1.0, -0.5, 0.0, 0.5, 1.0] {
        let y = COLORBAR.y1 - (tick + 1.0) / 2.0 * COLORBAR.height();
        canvas.line((COLORBAR.x1, y), (COLORBAR.x1 + 4.0, y), INK, 1.0);
        canvas.text((COLORBAR.x1 + 7.0, y), &format_tick(tick), &style);
    }
}
