//! Linear scales, tick generation and axis frames for the chart renderers.
//!
//! An [`Axes`] couples a plot rectangle on a [`Canvas`] with an x and a y
//! [`LinearScale`], and knows how to draw its own frame, ticks and labels.
//!
//! ```
//! use u_explore::axes::nice_ticks;
//!
//! assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
//! ```

use kurbo::{Point, Rect};

use crate::canvas::{fit_text, Canvas, TextAnchor, TextBaseline, TextStyle, GRID, INK};

/// Target number of ticks per axis.
pub const TICK_COUNT: usize = 5;

const TICK_LEN: f64 = 4.0;
const TICK_FONT: f64 = 10.0;
const LABEL_FONT: f64 = 12.0;

// ── Scales ──────────────────────────────────────────────────────────

/// Maps a data domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Widens `domain` outward to the enclosing nice tick values.
    pub fn nice(domain: (f64, f64), range: (f64, f64), tick_count: usize) -> Self {
        let ticks = nice_ticks(domain.0, domain.1, tick_count);
        match (ticks.first(), ticks.last()) {
            (Some(&lo), Some(&hi)) if ticks.len() >= 2 => Self::new((lo, hi), range),
            _ => Self::new(domain, range),
        }
    }

    /// Maps a domain value into range space. A zero-width domain maps
    /// everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Nice tick values that fall inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let eps = (hi - lo).abs() * 1e-9;
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|t| *t >= lo - eps && *t <= hi + eps)
            .collect()
    }
}

/// Evenly spaced "round" values covering `[min, max]`.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;
    let n = ((stop - start) / step).round().clamp(0.0, 10_000.0) as usize;
    // Snap float noise such as 0.6000000000000001 to the step's precision.
    let precision = 10_f64.powi((-step.log10().floor()).max(0.0) as i32);
    (0..=n)
        .map(|i| ((start + step * i as f64) * precision).round() / precision)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Short tick label: integers without a fraction, others trimmed.
pub fn format_tick(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if !(1e-4..1e6).contains(&a) {
        return format!("{v:.1e}");
    }
    if v.fract() == 0.0 {
        return format!("{v:.0}");
    }
    let s = format!("{v:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ── Axes ────────────────────────────────────────────────────────────

/// A plot area with its two scales.
#[derive(Debug, Clone, Copy)]
pub struct Axes {
    pub area: Rect,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl Axes {
    /// Builds nice scales for the given data domains. The y axis grows
    /// upward.
    pub fn new(area: Rect, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            area,
            x: LinearScale::nice(x_domain, (area.x0, area.x1), TICK_COUNT),
            y: LinearScale::nice(y_domain, (area.y1, area.y0), TICK_COUNT),
        }
    }

    /// Same as [`Axes::new`] but keeps the x domain exactly as given.
    pub fn with_exact_x(area: Rect, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            area,
            x: LinearScale::new(x_domain, (area.x0, area.x1)),
            y: LinearScale::nice(y_domain, (area.y1, area.y0), TICK_COUNT),
        }
    }

    /// Data point to pixel position.
    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(self.x.map(x), self.y.map(y))
    }

    /// Draws horizontal gridlines at the y ticks.
    pub fn draw_grid(&self, canvas: &mut Canvas) {
        for t in self.y.ticks(TICK_COUNT) {
            let y = self.y.map(t);
            canvas.line((self.area.x0, y), (self.area.x1, y), GRID, 0.8);
        }
    }

    /// Draws the frame plus tick marks. Tick labels are optional per axis so
    /// grid panels can share labels along their outer edge.
    pub fn draw_frame(&self, canvas: &mut Canvas, x_labels: bool, y_labels: bool) {
        canvas.stroke_rect(self.area, INK, 1.0);
        let tick_style = TextStyle::new(TICK_FONT);

        for t in self.x.ticks(TICK_COUNT) {
            let x = self.x.map(t);
            canvas.line((x, self.area.y1), (x, self.area.y1 + TICK_LEN), INK, 1.0);
            if x_labels {
                canvas.text(
                    (x, self.area.y1 + TICK_LEN + 2.0),
                    &format_tick(t),
                    &tick_style
                        .anchor(TextAnchor::Middle)
                        .baseline(TextBaseline::Hanging),
                );
            }
        }
        for t in self.y.ticks(TICK_COUNT) {
            let y = self.y.map(t);
            canvas.line((self.area.x0 - TICK_LEN, y), (self.area.x0, y), INK, 1.0);
            if y_labels {
                canvas.text(
                    (self.area.x0 - TICK_LEN - 2.0, y),
                    &format_tick(t),
                    &tick_style
                        .anchor(TextAnchor::End)
                        .baseline(TextBaseline::Middle),
                );
            }
        }
    }

    /// Axis title centered below the plot area.
    pub fn x_label(&self, canvas: &mut Canvas, label: &str, offset: f64) {
        let text = fit_text(label, LABEL_FONT, self.area.width());
        canvas.text(
            (self.area.center().x, self.area.y1 + offset),
            &text,
            &TextStyle::new(LABEL_FONT)
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Hanging),
        );
    }

    /// Axis title rotated along the left edge of the plot area.
    pub fn y_label(&self, canvas: &mut Canvas, label: &str, offset: f64) {
        let text = fit_text(label, LABEL_FONT, self.area.height());
        canvas.text(
            (self.area.x0 - offset, self.area.center().y),
            &text,
            &TextStyle::new(LABEL_FONT).centered().rotate(-90.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_endpoints() {
        let s = LinearScale::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(10.0), 200.0);
        assert_eq!(s.map(5.0), 150.0);
    }

    #[test]
    fn scale_flat_domain() {
        let s = LinearScale::new((3.0, 3.0), (10.0, 20.0));
        assert_eq!(s.map(3.0), 10.0);
    }

    #[test]
    fn nice_widens_domain() {
        let s = LinearScale::nice((0.3, 9.2), (0.0, 1.0), 5);
        assert_eq!(s.domain(), (0.0, 10.0));
    }

    #[test]
    fn ticks_are_round() {
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(nice_ticks(5.0, 5.0, 5), vec![5.0]);
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn ticks_swap_reversed_bounds() {
        assert_eq!(nice_ticks(10.0, 0.0, 2), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn scale_ticks_stay_in_domain() {
        let s = LinearScale::new((0.5, 3.5), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| (0.5..=3.5).contains(t)));
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(-1.5), "-1.5");
        assert_eq!(format_tick(2.5e7), "2.5e7");
    }

    #[test]
    fn axes_y_grows_upward() {
        let axes = Axes::new(Rect::new(50.0, 10.0, 250.0, 110.0), (0.0, 10.0), (0.0, 10.0));
        let low = axes.point(0.0, 0.0);
        let high = axes.point(10.0, 10.0);
        assert_eq!(low, Point::new(50.0, 110.0));
        assert_eq!(high, Point::new(250.0, 10.0));
    }

    #[test]
    fn frame_draws_ticks_and_labels() {
        let axes = Axes::new(Rect::new(50.0, 10.0, 250.0, 110.0), (0.0, 10.0), (0.0, 4.0));
        let mut canvas = Canvas::new(300.0, 150.0);
        axes.draw_frame(&mut canvas, true, false);
        axes.x_label(&mut canvas, "value", 20.0);
        let svg = canvas.to_svg_string();
        assert!(svg.contains(">10</text>"));
        assert!(svg.contains(">value</text>"));
        // y labels suppressed
        assert!(!svg.contains(r#"text-anchor="end""#));
    }
}
