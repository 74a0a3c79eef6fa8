//! End-to-end exploration run: load, profile, report, render.
//!
//! Loading is the only fatal stage. Once the table is in memory, each
//! renderer runs regardless of how the previous ones went; write failures
//! are logged and collected in [`RunReport::failures`].

use std::io::Write;
use std::path::Path;

use tracing::{error, info};

use crate::artifact::Artifact;
use crate::config::ExploreConfig;
use crate::error::ExploreError;
use crate::loader;
use crate::profiling::profile_with_preview;
use crate::render::{render_correlation, render_distributions, render_relationships};

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Artifacts written, in render order.
    pub artifacts: Vec<Artifact>,
    /// Artifacts that could not be written.
    pub failures: Vec<ExploreError>,
}

impl RunReport {
    /// `true` when every attempted artifact was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, stage: &str, result: Result<Option<Artifact>, ExploreError>) {
        match result {
            Ok(Some(artifact)) => self.artifacts.push(artifact),
            Ok(None) => {}
            Err(e) => {
                error!(stage, error = %e, "artifact not written");
                self.failures.push(e);
            }
        }
    }
}

/// Runs the full pipeline against `source_path`, writing the text report to
/// `out` and artifacts to `config.output_dir`.
///
/// Returns `Err` only when the source cannot be loaded (nothing is written
/// in that case) or the report cannot be written to `out`.
pub fn run<W: Write>(
    source_path: impl AsRef<Path>,
    config: &ExploreConfig,
    out: &mut W,
) -> Result<RunReport, ExploreError> {
    let source_path = source_path.as_ref();
    let table = loader::load(source_path)?;

    let summary = profile_with_preview(&table, config.preview_rows);
    summary.write_to(out)?;
    info!(
        rows = summary.row_count,
        columns = summary.column_count,
        "summary report written"
    );

    let mut report = RunReport::default();
    for result in render_distributions(&table, config) {
        report.record("distribution", result.map(Some));
    }
    report.record("relationships", render_relationships(&table, config));
    report.record("correlation", render_correlation(&table, config));

    info!(
        source = %source_path.display(),
        artifacts = report.artifacts.len(),
        failures = report.failures.len(),
        "exploration finished"
    );
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────
