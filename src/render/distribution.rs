//! Per-column histogram with a kernel density overlay.

use kurbo::{Point, Rect};
use tracing::{debug, info, warn};

use crate::artifact::{distribution_stem, distribution_stems, Artifact, ArtifactKind};
use crate::axes::Axes;
use crate::canvas::{Canvas, BAR_FILL, BAR_FILL_SOFT, CURVE_STROKE};
use crate::config::ExploreConfig;
use crate::distribution::{histogram, GaussianKde, KDE_GRID_POINTS};
use crate::error::ExploreError;
use crate::table::{Column, Table};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;

/// Renders one distribution chart per numeric column.
///
/// Columns are independent: a failed write for one column does not prevent
/// the others. No numeric columns yields an empty vec.
pub fn render_distributions(
    table: &Table,
    config: &ExploreConfig,
) -> Vec<Result<Artifact, ExploreError>> {
    let numeric: Vec<(&str, &Column)> = table.numeric_columns().collect();
    let stems = distribution_stems(numeric.iter().map(|(name, _)| *name));
    numeric
        .into_iter()
        .zip(stems)
        .map(|((name, column), stem)| {
            if stem != distribution_stem(name) {
                warn!(column = name, stem = %stem, "file name taken, using a suffixed one");
            }
            render_column(name, column, &stem, config)
        })
        .collect()
}

/// Renders the distribution chart of a single column.
///
/// Only the column's present values are plotted. Constant and empty columns
/// render a histogram without a density curve.
pub fn render_distribution_column(
    name: &str,
    column: &Column,
    config: &ExploreConfig,
) -> Result<Artifact, ExploreError> {
    render_column(name, column, &distribution_stem(name), config)
}

fn render_column(
    name: &str,
    column: &Column,
    stem: &str,
    config: &ExploreConfig,
) -> Result<Artifact, ExploreError> {
    let mut values = column.valid_numeric_values().unwrap_or_default();
    values.retain(|v| v.is_finite());
    let hist = histogram(&values, config.histogram_bins);
    let (lo, hi) = hist.range();

    let curve = GaussianKde::new(&values).map(|kde| {
        let scale = values.len() as f64 * hist.bin_width();
        kde.curve(lo, hi, KDE_GRID_POINTS, scale)
    });
    debug!(
        column = name,
        values = values.len(),
        kde = curve.is_some(),
        "distribution computed"
    );

    let y_max = curve
        .iter()
        .flatten()
        .map(|p| p.1)
        .fold(hist.max_count() as f64, f64::max)
        .max(1.0);

    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let area = Rect::new(80.0, 50.0, WIDTH - 30.0, HEIGHT - 60.0);
    let axes = Axes::with_exact_x(area, (lo, hi), (0.0, y_max));

    axes.draw_grid(&mut canvas);
    let bar_fill = if curve.is_some() { BAR_FILL_SOFT } else { BAR_FILL };
    super::draw_histogram(&mut canvas, &axes, &hist, bar_fill);
    if let Some(curve) = &curve {
        let points: Vec<Point> = curve.iter().map(|&(x, y)| axes.point(x, y)).collect();
        canvas.polyline(&points, CURVE_STROKE, 2.0);
    }
    axes.draw_frame(&mut canvas, true, true);
    axes.x_label(&mut canvas, name, 24.0);
    axes.y_label(&mut canvas, "Frequency", 55.0);
    super::draw_title(&mut canvas, &format!("Distribution of {name}"), 30.0);

    let kind = ArtifactKind::Distribution {
        column: name.to_string(),
    };
    let path = config.artifact_path(stem);
    canvas.save(&path)?;
    info!(column = name, path = %path.display(), "distribution plot written");
    Ok(Artifact::new(kind, path))
}
