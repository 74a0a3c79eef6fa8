//! Pairwise relationship grid.
//!
//! For `n` numeric columns the grid has `n × n` panels. Diagonal panels show
//! the column's histogram; panel `(i, j)` off the diagonal scatters column
//! `j` (x) against column `i` (y). Only rows where every numeric column is
//! present take part.

use kurbo::Rect;
use tracing::{debug, info, warn};

use crate::artifact::{Artifact, ArtifactKind};
use crate::axes::Axes;
use crate::canvas::{Canvas, BAR_FILL, MARKER_FILL};
use crate::config::ExploreConfig;
use crate::distribution::{histogram, histogram_range};
use crate::error::ExploreError;
use crate::table::Table;

/// Side length of one panel in pixels.
pub const PANEL_SIZE: f64 = 250.0;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;
const PANEL_INSET: f64 = 10.0;
const MARKER_RADIUS: f64 = 2.5;

/// Renders the pairwise grid, or returns `Ok(None)` with fewer than two
/// numeric columns.
pub fn render_relationships(
    table: &Table,
    config: &ExploreConfig,
) -> Result<Option<Artifact>, ExploreError> {
    let (names, columns) = complete_numeric_rows(table);
    let n = names.len();
    if n < 2 {
        warn!(numeric_columns = n, "pairwise plot skipped");
        return Ok(None);
    }
    debug!(
        columns = n,
        rows = columns.first().map_or(0, Vec::len),
        "pairwise rows retained"
    );

    let side = PANEL_SIZE * n as f64;
    let mut canvas = Canvas::new(
        MARGIN_LEFT + side + MARGIN_RIGHT,
        MARGIN_TOP + side + MARGIN_BOTTOM,
    );
    let ranges: Vec<(f64, f64)> = columns.iter().map(|c| histogram_range(c)).collect();

    for i in 0..n {
        for j in 0..n {
            let x0 = MARGIN_LEFT + PANEL_SIZE * j as f64;
            let y0 = MARGIN_TOP + PANEL_SIZE * i as f64;
            let area = Rect::new(
                x0 + PANEL_INSET,
                y0 + PANEL_INSET,
                x0 + PANEL_SIZE - PANEL_INSET,
                y0 + PANEL_SIZE - PANEL_INSET,
            );

            let axes = if i == j {
                let hist = histogram(&columns[i], config.histogram_bins);
                let axes = Axes::with_exact_x(
                    area,
                    hist.range(),
                    (0.0, (hist.max_count() as f64).max(1.0)),
                );
                super::draw_histogram(&mut canvas, &axes, &hist, BAR_FILL);
                axes
            } else {
                let axes = Axes::new(area, ranges[j], ranges[i]);
                for (&x, &y) in columns[j].iter().zip(&columns[i]) {
                    canvas.circle(axes.point(x, y), MARKER_RADIUS, MARKER_FILL);
                }
                axes
            };

            let bottom = i == n - 1;
            let left = j == 0;
            axes.draw_frame(&mut canvas, bottom, left && i != j);
            if bottom {
                axes.x_label(&mut canvas, &names[j], 24.0);
            }
            if left {
                axes.y_label(&mut canvas, &names[i], 50.0);
            }
        }
    }

    super::draw_title(&mut canvas, "Pairwise Relationships", 35.0);

    let kind = ArtifactKind::PairwiseRelationships;
    let path = config.artifact_path(&kind.file_stem());
    canvas.save(&path)?;
    info!(columns = n, path = %path.display(), "pairwise plot written");
    Ok(Some(Artifact::new(kind, path)))
}

/// Numeric columns restricted to the rows where all of them hold a finite value.
fn complete_numeric_rows(table: &Table) -> (Vec<String>, Vec<Vec<f64>>) {
    let numeric: Vec<_> = table.numeric_columns().collect();
    let keep: Vec<usize> = (0..table.row_count())
        .filter(|&row| {
            numeric.iter().all(|(_, col)| {
                col.is_valid(row) && col.as_numeric().is_some_and(|v| v[row].is_finite())
            })
        })
        .collect();

    let names = numeric.iter().map(|(name, _)| name.to_string()).collect();
    let columns = numeric
        .iter()
        .map(|(_, col)| {
            let values = col.as_numeric().unwrap_or_default();
            keep.iter().map(|&row| values[row]).collect()
        })
        .collect();
    (names, columns)
}
