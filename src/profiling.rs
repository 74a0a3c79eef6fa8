//! Table profiling: schema, previews, descriptive statistics and
//! missingness.
//!
//! [`profile`] is a pure function of the [`Table`]. It tolerates dirty and
//! degenerate data: missing cells, zero rows and tables without numeric
//! columns all produce a well-formed [`SummaryReport`] whose undefined
//! statistics are `NaN`.
//!
//! # Example
//!
//! ```
//! use u_explore::loader::CsvLoader;
//! use u_explore::profiling::{profile, Statistics};
//!
//! let csv = "x,y\n1.0,A\n2.0,B\n,A\n4.0,A\n";
//! let table = CsvLoader::new().parse_str(csv).unwrap();
//! let report = profile(&table);
//!
//! assert_eq!(report.row_count, 4);
//! assert_eq!(report.missing[0].count, 1);
//! match &report.statistics[1].summary {
//!     Statistics::Text(text) => assert_eq!(text.top.as_deref(), Some("A")),
//!     Statistics::Numeric(_) => unreachable!(),
//! }
//! ```

use std::collections::HashMap;

use crate::table::{Column, DataType, Table};

/// Default number of rows shown in the head and tail previews.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

// ── Report types ──────────────────────────────────────────────────────

/// Schema entry for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type tag.
    pub data_type: DataType,
    /// Display dtype (`int64`, `float64`, `object`).
    pub dtype: &'static str,
    /// Number of present cells.
    pub non_null_count: usize,
}

/// A contiguous slice of rows rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPreview {
    /// Column names, in table order.
    pub columns: Vec<String>,
    /// Row positions in the source table.
    pub index: Vec<usize>,
    /// Formatted cells, one inner vec per row. Missing cells read `NaN`.
    pub rows: Vec<Vec<String>>,
}

/// Descriptive statistics for a numeric column, over present values only.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    /// Number of present values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (`NaN` below two values).
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Maximum.
    pub max: f64,
}

/// Frequency statistics for a text column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSummary {
    /// Number of present values.
    pub count: usize,
    /// Number of distinct present values.
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<String>,
    /// Occurrences of `top`.
    pub freq: Option<usize>,
}

/// Per-column statistics, dispatched on the column's type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Statistics {
    /// Numeric column statistics.
    Numeric(NumericSummary),
    /// Text column statistics.
    Text(TextSummary),
}

/// Statistics for one named column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    /// Column name.
    pub name: String,
    /// Type-specific summary.
    pub summary: Statistics,
}

/// Missing-cell count for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    /// Column name.
    pub name: String,
    /// Number of missing cells.
    pub count: usize,
}

/// Everything the textual report shows, computed in one pass.
///
/// The report is a plain value; the [`report`](crate::report) module turns
/// it into text.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Estimated memory footprint of the table in bytes.
    pub memory_bytes: usize,
    /// Schema, in column order.
    pub columns: Vec<ColumnInfo>,
    /// Requested preview size (the previews may hold fewer rows).
    pub preview_rows: usize,
    /// First rows.
    pub head: RowPreview,
    /// Last rows.
    pub tail: RowPreview,
    /// Statistics for every column.
    pub statistics: Vec<ColumnStatistics>,
    /// Missing cells per column.
    pub missing: Vec<MissingCount>,
    /// Column names in original order.
    pub column_names: Vec<String>,
}

// ── Profiling functions ───────────────────────────────────────────────

/// Profiles a table with the default preview size.
pub fn profile(table: &Table) -> SummaryReport {
    profile_with_preview(table, DEFAULT_PREVIEW_ROWS)
}

/// Profiles a table, showing `preview_rows` rows in head and tail.
///
/// Previews shrink to the table size; a preview size larger than the
/// table is never an error.
///
/// ```
/// use u_explore::loader::CsvLoader;
/// use u_explore::profiling::profile_with_preview;
///
/// let table = CsvLoader::new().parse_str("x\n1\n2\n3\n").unwrap();
/// let report = profile_with_preview(&table, 2);
/// assert_eq!(report.head.index, vec![0, 1]);
/// assert_eq!(report.tail.index, vec![1, 2]);
/// ```
pub fn profile_with_preview(table: &Table, preview_rows: usize) -> SummaryReport {
    let row_count = table.row_count();
    let shown = preview_rows.min(row_count);

    let columns = table
        .iter()
        .map(|(name, col)| ColumnInfo {
            name: name.to_string(),
            data_type: col.data_type(),
            dtype: col.dtype_label(),
            non_null_count: col.valid_count(),
        })
        .collect();

    SummaryReport {
        row_count,
        column_count: table.column_count(),
        memory_bytes: table.iter().map(|(_, col)| col.memory_bytes()).sum(),
        columns,
        preview_rows,
        head: preview(table, 0..shown),
        tail: preview(table, row_count - shown..row_count),
        statistics: table
            .iter()
            .map(|(name, col)| profile_column(name, col))
            .collect(),
        missing: table
            .iter()
            .map(|(name, col)| MissingCount {
                name: name.to_string(),
                count: col.null_count(),
            })
            .collect(),
        column_names: table.column_names().to_vec(),
    }
}

/// Computes statistics for a single column.
pub fn profile_column(name: &str, col: &Column) -> ColumnStatistics {
    let summary = match col {
        Column::Numeric { .. } => {
            let mut valid = col.valid_numeric_values().unwrap_or_default();
            valid.retain(|v| v.is_finite());
            Statistics::Numeric(summarize_numeric(&valid))
        }
        Column::Text { values, validity } => {
            let present = validity.valid_indices().map(|i| values[i].as_str());
            Statistics::Text(summarize_text(present))
        }
    };
    ColumnStatistics {
        name: name.to_string(),
        summary,
    }
}

// ── Internal helpers ──────────────────────────────────────────────────

fn preview(table: &Table, rows: std::ops::Range<usize>) -> RowPreview {
    let index: Vec<usize> = rows.collect();
    let rows = index
        .iter()
        .map(|&row| {
            table
                .iter()
                .map(|(_, col)| col.value(row).to_string())
                .collect()
        })
        .collect();
    RowPreview {
        columns: table.column_names().to_vec(),
        index,
        rows,
    }
}

fn summarize_numeric(valid: &[f64]) -> NumericSummary {
    let stat = |v: Option<f64>| v.unwrap_or(f64::NAN);
    let count = valid.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        };
    }

    NumericSummary {
        count,
        mean: stat(u_numflow::stats::mean(valid)),
        std: if count < 2 {
            f64::NAN
        } else {
            stat(u_numflow::stats::std_dev(valid))
        },
        min: stat(u_numflow::stats::min(valid)),
        q1: stat(u_numflow::stats::quantile(valid, 0.25)),
        median: stat(u_numflow::stats::quantile(valid, 0.5)),
        q3: stat(u_numflow::stats::quantile(valid, 0.75)),
        max: stat(u_numflow::stats::max(valid)),
    }
}

fn summarize_text<'a>(present: impl Iterator<Item = &'a str>) -> TextSummary {
    // value -> (count, first position)
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut count = 0usize;
    for (pos, value) in present.enumerate() {
        freq.entry(value).or_insert((0, pos)).0 += 1;
        count += 1;
    }

    let top = freq
        .iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(value, &(n, _))| (value.to_string(), n));

    TextSummary {
        count,
        unique: freq.len(),
        freq: top.as_ref().map(|(_, n)| *n),
        top: top.map(|(value, _)| value),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CsvLoader;

    fn table(csv: &str) -> Table {
        CsvLoader::new().parse_str(csv).unwrap()
    }

    fn numeric(report: &SummaryReport, idx: usize) -> &NumericSummary {
        match &report.statistics[idx].summary {
            Statistics::Numeric(n) => n,
            Statistics::Text(_) => panic!("column {idx} is not numeric"),
        }
    }

    fn text(report: &SummaryReport, idx: usize) -> &TextSummary {
        match &report.statistics[idx].summary {
            Statistics::Text(t) => t,
            Statistics::Numeric(_) => panic!("column {idx} is not text"),
        }
    }

    #[test]
    fn counts_match_table() {
        let t = table("a,b\n1,2\n3,4\n5,6");
        let report = profile(&t);
        assert_eq!(report.row_count, 3);
        assert_eq!(report.column_count, 2);
        assert!(report.missing.iter().all(|m| m.count == 0));
        assert_eq!(report.column_names, vec!["a", "b"]);
        assert_eq!(report.columns[0].dtype, "int64");
        assert_eq!(report.columns[0].non_null_count, 3);
    }

    #[test]
    fn numeric_statistics() {
        let t = table("x\n1\n2\n3\n4\n5\n");
        let report = profile(&t);
        let x = numeric(&report, 0);
        assert_eq!(x.count, 5);
        assert!((x.mean - 3.0).abs() < 1e-12);
        assert!((x.std - 2.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(x.min, 1.0);
        assert_eq!(x.max, 5.0);
        assert!((x.median - 3.0).abs() < 1e-12);
        assert!(x.min <= x.q1 && x.q1 <= x.median && x.median <= x.q3 && x.q3 <= x.max);
    }

    #[test]
    fn single_value_has_nan_std() {
        let t = table("x\n7\n");
        let x = numeric(&profile(&t), 0).clone();
        assert_eq!(x.count, 1);
        assert_eq!(x.mean, 7.0);
        assert!(x.std.is_nan());
    }

    #[test]
    fn missing_counts_per_column() {
        let t = table("x\n1\n\n3");
        let report = profile(&t);
        assert_eq!(report.missing[0].count, 1);
        assert_eq!(numeric(&report, 0).count, 2);
        assert_eq!(report.columns[0].dtype, "float64");
    }

    #[test]
    fn text_only_table() {
        let t = table("name\nalice\nbob\nalice\n");
        let report = profile(&t);
        let name = text(&report, 0);
        assert_eq!(name.count, 3);
        assert_eq!(name.unique, 2);
        assert_eq!(name.top.as_deref(), Some("alice"));
        assert_eq!(name.freq, Some(2));
    }

    #[test]
    fn text_ties_resolve_to_first_seen() {
        let t = table("name\nbob\nalice\n");
        let report = profile(&t);
        assert_eq!(text(&report, 0).top.as_deref(), Some("bob"));
        assert_eq!(text(&report, 0).freq, Some(1));
    }

    #[test]
    fn zero_rows_produce_empty_statistics() {
        let t = table("a,b\n");
        let report = profile(&t);
        assert_eq!(report.row_count, 0);
        assert_eq!(report.column_count, 2);
        assert!(report.head.rows.is_empty());
        assert!(report.tail.rows.is_empty());
        let a = text(&report, 0);
        assert_eq!(a.count, 0);
        assert_eq!(a.top, None);
        assert_eq!(a.freq, None);
    }

    #[test]
    fn all_missing_numeric_is_nan() {
        let t = table("x,y\n,1\n,2\n");
        let x = numeric(&profile(&t), 0).clone();
        assert_eq!(x.count, 0);
        assert!(x.mean.is_nan() && x.min.is_nan() && x.max.is_nan());
    }

    #[test]
    fn non_finite_values_are_left_out() {
        use crate::table::{NumericKind, ValidityBitmap};

        let col = Column::numeric(
            vec![1.0, f64::INFINITY, 3.0],
            ValidityBitmap::all_valid(3),
            NumericKind::Float,
        );
        let stats = profile_column("x", &col);
        let Statistics::Numeric(n) = stats.summary else {
            panic!("x is numeric");
        };
        assert_eq!(n.count, 2);
        assert_eq!(n.mean, 2.0);
        assert_eq!(n.max, 3.0);
    }

    #[test]
    fn previews_clip_to_table() {
        let csv: String = std::iter::once("n".to_string())
            .chain((0..8).map(|i| i.to_string()))
            .collect::<Vec<_>>()
            .join("\n");
        let report = profile(&table(&csv));
        assert_eq!(report.head.index, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.tail.index, vec![3, 4, 5, 6, 7]);
        assert_eq!(report.tail.rows[4], vec!["7".to_string()]);

        let small = profile(&table("n\n1\n2\n"));
        assert_eq!(small.head.index, vec![0, 1]);
        assert_eq!(small.tail.index, vec![0, 1]);
    }

    #[test]
    fn preview_formats_missing_as_nan() {
        let report = profile(&table("x,y\n1.5,\n,b\n"));
        assert_eq!(report.head.rows[0], vec!["1.5".to_string(), "NaN".to_string()]);
        assert_eq!(report.head.rows[1], vec!["NaN".to_string(), "b".to_string()]);
    }

    #[test]
    fn profile_is_deterministic() {
        let t = table("a,b,c\n1,x,2.5\n2,y,\n3,x,4.5\n");
        assert_eq!(profile(&t), profile(&t));
    }
}
