//! Histogram and kernel-density math behind the distribution plots.
//!
//! # Features
//!
//! - **Fixed-bin histogram** over `[min, max]` with numpy-style edges (every
//!   bin half-open except the last, which is closed)
//! - **Degenerate ranges**: a constant sample spans `[v - 0.5, v + 0.5]`, an
//!   empty one spans `[0, 1]`
//! - **Gaussian KDE** with Scott's bandwidth, evaluated on a grid and
//!   optionally rescaled to histogram counts
//!
//! # Example
//!
//! ```
//! use u_explore::distribution::{histogram, GaussianKde};
//!
//! let data = [1.0, 2.0, 2.0, 3.0, 4.0];
//! let hist = histogram(&data, 3);
//! assert_eq!(hist.counts, vec![1, 2, 2]);
//! assert_eq!(hist.edges.len(), 4);
//!
//! let kde = GaussianKde::new(&data).unwrap();
//! assert!(kde.evaluate(2.0) > kde.evaluate(10.0));
//! ```

use u_analytics::distribution::{kde_bandwidth, kde_evaluate, BandwidthMethod};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 30;

/// Number of grid points a density curve is sampled at.
pub const KDE_GRID_POINTS: usize = 200;

// ── Histogram ───────────────────────────────────────────────────────

/// Fixed-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges (length = bins + 1).
    pub edges: Vec<f64>,
    /// Count of observations in each bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Width of every bin.
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    /// Leftmost and rightmost edges.
    pub fn range(&self) -> (f64, f64) {
        let lo = self.edges.first().copied().unwrap_or(0.0);
        let hi = self.edges.last().copied().unwrap_or(1.0);
        (lo, hi)
    }

    /// Largest bin count (0 for an empty sample).
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Total number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Value range a histogram of `data` spans.
///
/// Non-finite values are ignored.
pub fn histogram_range(data: &[f64]) -> (f64, f64) {
    let finite = data.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// Bins `data` into `bins` equal-width bins over [`histogram_range`].
///
/// `bins` of zero is treated as one. Non-finite values are skipped.
pub fn histogram(data: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (lo, hi) = histogram_range(data);
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0usize; bins];
    for &v in data.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / (hi - lo)) * bins as f64).floor();
        let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

// ── Kernel density ──────────────────────────────────────────────────

/// Gaussian kernel density estimate with Scott's bandwidth.
///
/// Bandwidth selection and point evaluation come from
/// `u_analytics::distribution`.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fits a KDE to the finite values of `data`.
    ///
    /// Returns `None` with fewer than 2 values or zero variance.
    pub fn new(data: &[f64]) -> Option<Self> {
        let data: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        let bandwidth = kde_bandwidth(&data, BandwidthMethod::Scott)?;
        Some(Self { data, bandwidth })
    }

    /// Kernel standard deviation.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of fitted observations.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; an estimate needs at least two values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Probability density at `x` (`0.0` for non-finite `x`).
    pub fn evaluate(&self, x: f64) -> f64 {
        kde_evaluate(&self.data, self.bandwidth, x).unwrap_or(0.0)
    }

    /// Samples the density at `points` evenly spaced positions over
    /// `[lo, hi]`, multiplying each value by `scale`.
    ///
    /// Passing `n * bin_width` as `scale` puts the curve on the same axis as
    /// a histogram of counts.
    pub fn curve(&self, lo: f64, hi: f64, points: usize, scale: f64) -> Vec<(f64, f64)> {
        let points = points.max(2);
        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, self.evaluate(x) * scale)
            })
            .collect()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let data: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = histogram(&data, DEFAULT_BINS);
        assert_eq!(h.bin_count(), 30);
        assert_eq!(h.edges.len(), 31);
        assert_eq!(h.total(), 100);
        assert_eq!(h.range(), (0.0, 99.0));
    }

    #[test]
    fn histogram_last_bin_is_closed() {
        let h = histogram(&[0.0, 1.0, 2.0], 2);
        assert_eq!(h.counts, vec![1, 2]);
    }

    #[test]
    fn histogram_constant() {
        let h = histogram(&[5.0, 5.0, 5.0], 30);
        assert_eq!(h.range(), (4.5, 5.5));
        assert_eq!(h.total(), 3);
        assert_eq!(h.max_count(), 3);
    }

    #[test]
    fn histogram_empty() {
        let h = histogram(&[], 10);
        assert_eq!(h.range(), (0.0, 1.0));
        assert_eq!(h.total(), 0);
        assert_eq!(h.max_count(), 0);
    }

    #[test]
    fn histogram_skips_non_finite() {
        let h = histogram(&[1.0, f64::NAN, 3.0, f64::INFINITY], 2);
        assert_eq!(h.total(), 2);
        assert_eq!(h.range(), (1.0, 3.0));
    }

    #[test]
    fn histogram_zero_bins() {
        let h = histogram(&[1.0, 2.0], 0);
        assert_eq!(h.bin_count(), 1);
        assert_eq!(h.counts, vec![2]);
    }

    #[test]
    fn kde_rejects_degenerate() {
        assert!(GaussianKde::new(&[]).is_none());
        assert!(GaussianKde::new(&[1.0]).is_none());
        assert!(GaussianKde::new(&[2.0, 2.0, 2.0]).is_none());
        assert!(GaussianKde::new(&[f64::INFINITY, 1.0]).is_none());
    }

    #[test]
    fn kde_non_finite_point_is_zero() {
        let kde = GaussianKde::new(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(kde.evaluate(f64::NAN), 0.0);
        assert!(kde.evaluate(2.0) > 0.0);
    }

    #[test]
    fn kde_scott_bandwidth() {
        // n = 2, sample std = sqrt(2): h = 1.06 * sqrt(2) * 2^(-1/5)
        let kde = GaussianKde::new(&[1.0, 3.0]).unwrap();
        let expected = 1.06 * 2f64.sqrt() * 2f64.powf(-0.2);
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
        assert_eq!(kde.len(), 2);
    }

    #[test]
    fn kde_integrates_to_one() {
        let kde = GaussianKde::new(&[1.0, 2.0, 2.5, 4.0]).unwrap();
        let pts = kde.curve(-20.0, 25.0, 4001, 1.0);
        let dx = pts[1].0 - pts[0].0;
        let area: f64 = pts.iter().map(|p| p.1 * dx).sum();
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn kde_curve_scales() {
        let kde = GaussianKde::new(&[1.0, 2.0, 3.0]).unwrap();
        let unit = kde.curve(0.0, 4.0, 5, 1.0);
        let scaled = kde.curve(0.0, 4.0, 5, 3.0);
        assert_eq!(unit.len(), 5);
        assert_eq!(unit[0].0, 0.0);
        assert_eq!(unit[4].0, 4.0);
        for (u, s) in unit.iter().zip(&scaled) {
            assert!((s.1 - 3.0 * u.1).abs() < 1e-12);
        }
    }
}
