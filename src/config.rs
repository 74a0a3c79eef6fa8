//! Run configuration.
//!
//! ```
//! use u_explore::config::ExploreConfig;
//!
//! let config = ExploreConfig::default().output_dir("plots").preview_rows(10);
//! assert_eq!(config.histogram_bins, 30);
//! assert_eq!(config.preview_rows, 10);
//! ```

use std::path::PathBuf;

use crate::distribution::DEFAULT_BINS;
use crate::profiling::DEFAULT_PREVIEW_ROWS;

/// Image encoding of rendered artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
}

impl ImageFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
        }
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreConfig {
    /// Directory artifacts are written to. Default: current directory.
    pub output_dir: PathBuf,
    /// Artifact encoding. Default: SVG.
    pub image_format: ImageFormat,
    /// Histogram bins for distribution and diagonal panels. Default: 30.
    pub histogram_bins: usize,
    /// Rows shown in the head/tail previews. Default: 5.
    pub preview_rows: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            image_format: ImageFormat::Svg,
            histogram_bins: DEFAULT_BINS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ExploreConfig {
    /// Sets the artifact directory (default: current directory).
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the artifact encoding (default: SVG).
    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Sets the histogram bin count (default: 30, at least 1).
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.max(1);
        self
    }

    /// Sets the head/tail preview length (default: 5).
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Full path of an artifact named `stem` in the output directory.
    pub fn artifact_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}", self.image_format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults() {
        let c = ExploreConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("."));
        assert_eq!(c.image_format, ImageFormat::Svg);
        assert_eq!(c.histogram_bins, 30);
        assert_eq!(c.preview_rows, 5);
    }

    #[test]
    fn artifact_paths_use_extension() {
        let c = ExploreConfig::default().output_dir("out");
        assert_eq!(
            c.artifact_path("correlation_heatmap"),
            Path::new("out").join("correlation_heatmap.svg")
        );
    }

    #[test]
    fn bins_never_zero() {
        assert_eq!(ExploreConfig::default().histogram_bins(0).histogram_bins, 1);
    }
}
