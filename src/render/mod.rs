//! Chart renderers.
//!
//! Each renderer reads the numeric subset of a [`Table`](crate::table::Table),
//! draws onto a [`Canvas`] it owns, and writes one file per artifact into
//! [`ExploreConfig::output_dir`](crate::config::ExploreConfig).
//!
//! | Renderer | Artifacts | Skipped when |
//! |----------|-----------|--------------|
//! | [`render_distributions`] | one per numeric column | no numeric columns |
//! | [`render_relationships`] | `pairwise_relationships` | fewer than 2 numeric columns |
//! | [`render_correlation`] | `correlation_heatmap` | no numeric columns |

mod correlation;
mod distribution;
mod relationship;

pub use correlation::render_correlation;
pub use distribution::{render_distribution_column, render_distributions};
pub use relationship::render_relationships;

use kurbo::Rect;
use peniko::Color;

use crate::axes::Axes;
use crate::canvas::{fit_text, Canvas, TextAnchor, TextStyle};
use crate::distribution::Histogram;

const TITLE_FONT: f64 = 16.0;

/// Bold centered title with its baseline at `y`.
pub(crate) fn draw_title(canvas: &mut Canvas, title: &str, y: f64) {
    let width = canvas.width();
    let text = fit_text(title, TITLE_FONT, width - 20.0);
    canvas.text(
        (width / 2.0, y),
        &text,
        &TextStyle::new(TITLE_FONT)
            .anchor(TextAnchor::Middle)
            .bold(),
    );
}

/// Draws one bar per histogram bin, clipped to the axes' plot area.
pub(crate) fn draw_histogram(canvas: &mut Canvas, axes: &Axes, hist: &Histogram, fill: Color) {
    let base = axes.y.map(0.0);
    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = axes.x.map(hist.edges[i]);
        let x1 = axes.x.map(hist.edges[i + 1]);
        let top = axes.y.map(count as f64).max(axes.area.y0);
        canvas.fill_rect(Rect::new(x0, top, x1, base), fill);
    }
}
