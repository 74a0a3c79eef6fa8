//! # u-explore
//!
//! Exploratory profiling of delimited tables.
//!
//! u-explore loads one flat CSV file and produces two things:
//!
//! - **A summary report**: schema, head/tail previews, descriptive
//!   statistics, missing-value counts and column names, as plain text
//! - **Charts** for the numeric subset: one distribution plot per column, a
//!   pairwise relationship grid and an annotated correlation heatmap, as SVG
//!
//! ## Modules
//!
//! - [`table`]: Column-major data model (Table, Column, DataType, ValidityBitmap)
//! - [`loader`]: CSV loading with missing-marker detection and type inference
//! - [`profiling`]: SummaryReport computation
//! - [`report`]: Text layout of a SummaryReport
//! - [`correlation`]: Pairwise-complete Pearson correlation matrix
//! - [`distribution`]: Fixed-bin histograms, Gaussian KDE
//! - [`canvas`]: Scoped SVG drawing surface and color maps
//! - [`axes`]: Linear scales, nice ticks, axis frames
//! - [`render`]: Distribution, relationship and correlation charts
//! - [`pipeline`]: Load, profile, report and render in one call
//! - [`config`]: Run configuration
//! - [`artifact`]: Written chart files
//! - [`error`]: Error types
//!
//! ## Quick Start
//!
//! ```
//! use u_explore::loader::CsvLoader;
//! use u_explore::profiling::profile;
//! use u_explore::table::DataType;
//!
//! let csv = "name,score\nAlice,1.5\nBob,\nCharlie,3.0\n";
//! let table = CsvLoader::new().parse_str(csv).unwrap();
//!
//! let schema = table.schema();
//! assert_eq!(schema[0].1, DataType::Text);
//! assert_eq!(schema[1].1, DataType::Numeric);
//!
//! let report = profile(&table);
//! assert_eq!(report.row_count, 3);
//! assert_eq!(report.missing[1].count, 1);
//! ```

pub mod artifact;
pub mod axes;
pub mod canvas;
pub mod config;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiling;
pub mod render;
pub mod report;
pub mod table;

pub use error::ExploreError;
