//! Written chart files and their naming rules.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// File stem of the pairwise relationship grid.
pub const PAIRWISE_STEM: &str = "pairwise_relationships";
/// File stem of the correlation heatmap.
pub const HEATMAP_STEM: &str = "correlation_heatmap";

/// What an artifact depicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Histogram and density of one numeric column.
    Distribution { column: String },
    PairwiseRelationships,
    CorrelationHeatmap,
}

impl ArtifactKind {
    /// File stem (name without extension) for this kind.
    pub fn file_stem(&self) -> String {
        match self {
            Self::Distribution { column } => distribution_stem(column),
            Self::PairwiseRelationships => PAIRWISE_STEM.to_string(),
            Self::CorrelationHeatmap => HEATMAP_STEM.to_string(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distribution { column } => write!(f, "distribution of '{column}'"),
            Self::PairwiseRelationships => f.write_str("pairwise relationships"),
            Self::CorrelationHeatmap => f.write_str("correlation heatmap"),
        }
    }
}

/// An image file written by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<column>_distribution` with path separators replaced by `_`.
pub fn distribution_stem(column: &str) -> String {
    format!("{}_distribution", sanitize_file_component(column))
}

/// Distribution file stems for `columns`, distinct from one another.
///
/// Names that sanitize to the same component get `.1`, `.2`, ... suffixes in
/// column order.
pub fn distribution_stems<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    columns
        .into_iter()
        .map(|column| {
            let base = sanitize_file_component(column);
            let mut component = base.clone();
            let mut suffix = 1;
            while !used.insert(component.clone()) {
                component = format!("{base}.{suffix}");
                suffix += 1;
            }
            format!("{component}_distribution")
        })
        .collect()
}

/// Makes a column name safe to use as a single path component.
///
/// `/` and `\` become `_`, NUL is dropped, and names that would resolve to
/// the current or parent directory are prefixed with `_`.
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|&c| c != '\0')
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => format!("_{cleaned}"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        let kind = ArtifactKind::Distribution {
            column: "price".into(),
        };
        assert_eq!(kind.file_stem(), "price_distribution");
        assert_eq!(
            ArtifactKind::PairwiseRelationships.file_stem(),
            "pairwise_relationships"
        );
        assert_eq!(
            ArtifactKind::CorrelationHeatmap.file_stem(),
            "correlation_heatmap"
        );
    }

    #[test]
    fn separators_are_replaced() {
        assert_eq!(distribution_stem("km/h"), "km_h_distribution");
        assert_eq!(distribution_stem(r"a\b"), "a_b_distribution");
        assert_eq!(sanitize_file_component(".."), "_..");
        assert_eq!(sanitize_file_component(""), "_");
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let stems = distribution_stems(["a/b", "a_b", "c", "a_b.1"]);
        assert_eq!(
            stems,
            vec![
                "a_b_distribution",
                "a_b.1_distribution",
                "c_distribution",
                "a_b.1.1_distribution",
            ]
        );
    }

    #[test]
    fn display() {
        let kind = ArtifactKind::Distribution { column: "x".into() };
        assert_eq!(kind.to_string(), "distribution of 'x'");
    }
}
