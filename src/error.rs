//! Error types for u-explore.

use std::path::PathBuf;

/// All errors produced by u-explore operations.
///
/// Everything except [`ArtifactWrite`](Self::ArtifactWrite) is raised while
/// loading and is fatal for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum ExploreError {
    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source bytes are not valid UTF-8.
    #[error("source is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Source contains no header row.
    #[error("no columns to parse from source")]
    EmptyInput,

    /// Tokenizer failure reported by the `csv` crate.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Structurally invalid record.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: u64, message: String },

    /// Column length does not match the table's row count.
    #[error("expected {expected} rows, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Column name already present in the table.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// An artifact could not be written.
    #[error("failed to write artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExploreError {
    /// Returns `true` for errors raised while writing an artifact.
    pub fn is_artifact_error(&self) -> bool {
        matches!(self, Self::ArtifactWrite { .. })
    }
}
