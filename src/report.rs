//! Text serialization of a [`SummaryReport`].
//!
//! The layout is a fixed contract for tools that parse the output. Sections
//! appear in this order, each introduced by a `----- Title -----` line:
//!
//! | Section | Content |
//! |---------|---------|
//! | Data Information | row range, per-column non-null count and dtype, memory usage |
//! | First N Rows | aligned preview table |
//! | Last N Rows | aligned preview table |
//! | Descriptive Statistics | stat-by-column grid |
//! | Missing Values | missing count per column |
//! | Column Names | bracketed list of names |
//!
//! Formatting is deterministic: the same report always renders to the same
//! bytes.
//!
//! ```
//! use u_explore::loader::CsvLoader;
//! use u_explore::profiling::profile;
//!
//! let table = CsvLoader::new().parse_str("a,b\n1,2\n3,4\n").unwrap();
//! let text = profile(&table).to_string();
//! assert!(text.starts_with("----- Data Information -----\n"));
//! assert!(text.contains("['a', 'b']"));
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::io;

use crate::profiling::{RowPreview, Statistics, SummaryReport};

/// Section titles in output order, with the preview size substituted.
pub fn section_titles(preview_rows: usize) -> [String; 6] {
    [
        "Data Information".to_string(),
        format!("First {preview_rows} Rows"),
        format!("Last {preview_rows} Rows"),
        "Descriptive Statistics".to_string(),
        "Missing Values".to_string(),
        "Column Names".to_string(),
    ]
}

impl SummaryReport {
    /// Writes the report to `out`.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles = section_titles(self.preview_rows);
        let bodies = [
            self.info_section(),
            preview_section(&self.head),
            preview_section(&self.tail),
            self.statistics_section(),
            self.missing_section(),
            self.names_section(),
        ];
        for (idx, (title, body)) in titles.iter().zip(bodies).enumerate() {
            if idx > 0 {
                f.write_char('\n')?;
            }
            writeln!(f, "----- {title} -----")?;
            f.write_str(&body)?;
        }
        f.write_char('\n')
    }
}

// ── Sections ──────────────────────────────────────────────────────────

impl SummaryReport {
    fn info_section(&self) -> String {
        let mut out = String::new();
        if self.row_count == 0 {
            let _ = writeln!(out, "RangeIndex: 0 entries");
        } else {
            let _ = writeln!(
                out,
                "RangeIndex: {} entries, 0 to {}",
                self.row_count,
                self.row_count - 1
            );
        }
        let _ = writeln!(out, "Data columns (total {} columns):", self.column_count);

        let counts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} non-null", c.non_null_count))
            .collect();
        let idx_w = self.column_count.saturating_sub(1).to_string().len().max(3);
        let name_w = width_of(self.columns.iter().map(|c| c.name.as_str()), "Column");
        let count_w = width_of(counts.iter().map(String::as_str), "Non-Null Count");

        let _ = writeln!(
            out,
            " {:<idx_w$} {:<name_w$}  {:<count_w$}  Dtype",
            "#", "Column", "Non-Null Count"
        );
        let _ = writeln!(
            out,
            "{}  {}  {}  -----",
            "-".repeat(idx_w),
            "-".repeat(name_w),
            "-".repeat(count_w)
        );
        for (i, (col, count)) in self.columns.iter().zip(&counts).enumerate() {
            let _ = writeln!(
                out,
                " {i:<idx_w$} {:<name_w$}  {count:<count_w$}  {}",
                col.name, col.dtype
            );
        }

        let mut dtypes: BTreeMap<&str, usize> = BTreeMap::new();
        for col in &self.columns {
            *dtypes.entry(col.dtype).or_insert(0) += 1;
        }
        let dtypes: Vec<String> = dtypes
            .iter()
            .map(|(name, n)| format!("{name}({n})"))
            .collect();
        let _ = writeln!(out, "dtypes: {}", dtypes.join(", "));
        let _ = writeln!(out, "memory usage: {}", human_bytes(self.memory_bytes));
        out
    }

    fn statistics_section(&self) -> String {
        if self.statistics.is_empty() {
            return "Empty DataFrame\n".to_string();
        }

        let has_text = self
            .statistics
            .iter()
            .any(|s| matches!(s.summary, Statistics::Text(_)));
        let has_numeric = self
            .statistics
            .iter()
            .any(|s| matches!(s.summary, Statistics::Numeric(_)));

        let mut labels: Vec<&str> = vec!["count"];
        if has_text {
            labels.extend(["unique", "top", "freq"]);
        }
        if has_numeric {
            labels.extend(["mean", "std", "min", "25%", "50%", "75%", "max"]);
        }

        let header: Vec<String> = self.statistics.iter().map(|s| s.name.clone()).collect();
        let columns: Vec<Vec<String>> = self
            .statistics
            .iter()
            .map(|s| labels.iter().map(|label| stat_cell(&s.summary, label)).collect())
            .collect();
        let rows: Vec<Vec<String>> = (0..labels.len())
            .map(|r| columns.iter().map(|col| col[r].clone()).collect())
            .collect();
        let index: Vec<String> = labels.iter().map(|l| (*l).to_string()).collect();
        aligned_grid(&index, &header, &rows, Align::Left)
    }

    fn missing_section(&self) -> String {
        let name_w = self
            .missing
            .iter()
            .map(|m| m.name.chars().count())
            .max()
            .unwrap_or(0);
        let count_w = self
            .missing
            .iter()
            .map(|m| m.count.to_string().len())
            .max()
            .unwrap_or(1);
        let mut out = String::new();
        for m in &self.missing {
            let _ = writeln!(
                out,
                "{}    {:>count_w$}",
                pad_right(&m.name, name_w),
                m.count
            );
        }
        out.push_str("dtype: int64\n");
        out
    }

    fn names_section(&self) -> String {
        let quoted: Vec<String> = self
            .column_names
            .iter()
            .map(|n| format!("'{}'", n.replace('\\', "\\\\").replace('\'', "\\'")))
            .collect();
        format!("[{}]\n", quoted.join(", "))
    }
}

fn preview_section(preview: &RowPreview) -> String {
    if preview.rows.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []\n",
            preview.columns.join(", ")
        );
    }
    let index: Vec<String> = preview.index.iter().map(usize::to_string).collect();
    aligned_grid(&index, &preview.columns, &preview.rows, Align::Right)
}

// ── Formatting helpers ────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Renders a grid of right-aligned cells with a leading index column.
fn aligned_grid(
    index: &[String],
    header: &[String],
    rows: &[Vec<String>],
    index_align: Align,
) -> String {
    let index_w = index.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(c, name)| {
            rows.iter()
                .map(|row| row[c].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_w));
    for (name, &w) in header.iter().zip(&widths) {
        out.push_str("  ");
        out.push_str(&pad_left(name, w));
    }
    out.push('\n');

    for (label, row) in index.iter().zip(rows) {
        match index_align {
            Align::Left => out.push_str(&pad_right(label, index_w)),
            Align::Right => out.push_str(&pad_left(label, index_w)),
        }
        for (cell, &w) in row.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad_left(cell, w));
        }
        out.push('\n');
    }
    out
}

fn stat_cell(summary: &Statistics, label: &str) -> String {
    match (summary, label) {
        (Statistics::Numeric(n), "count") => n.count.to_string(),
        (Statistics::Numeric(n), "mean") => format_stat(n.mean),
        (Statistics::Numeric(n), "std") => format_stat(n.std),
        (Statistics::Numeric(n), "min") => format_stat(n.min),
        (Statistics::Numeric(n), "25%") => format_stat(n.q1),
        (Statistics::Numeric(n), "50%") => format_stat(n.median),
        (Statistics::Numeric(n), "75%") => format_stat(n.q3),
        (Statistics::Numeric(n), "max") => format_stat(n.max),
        (Statistics::Text(t), "count") => t.count.to_string(),
        (Statistics::Text(t), "unique") => t.unique.to_string(),
        (Statistics::Text(t), "top") => t.top.clone().unwrap_or_else(|| "NaN".to_string()),
        (Statistics::Text(t), "freq") => t
            .freq
            .map_or_else(|| "NaN".to_string(), |n| n.to_string()),
        _ => "NaN".to_string(),
    }
}

/// Six decimals, `NaN` for undefined values.
fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn human_bytes(bytes: usize) -> String {
    let mut size = bytes as f64;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

fn width_of<'a>(items: impl Iterator<Item = &'a str>, title: &str) -> usize {
    items
        .map(|s| s.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0)
}

fn pad_left(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{}{s}", " ".repeat(width.saturating_sub(n)))
}

fn pad_right(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}

// ── Tests ─────────────────────────────────────────────────────────────
