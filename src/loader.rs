//! Delimited-table loader with per-column type inference.
//!
//! Reads a header row plus records into a [`Table`]. Each column is
//! classified once, here, and the tag travels with the column:
//!
//! - **Numeric** if every present value parses as a float. The kind is
//!   `Integer` when all cells are present and integral, `Float` otherwise.
//! - **Text** for everything else.
//!
//! Recognized missing-value markers are the empty field and the usual
//! `NA`/`NaN`/`NULL` spellings. Tokenizing is delegated to the `csv` crate.
//!
//! # Example
//!
//! ```
//! use u_explore::loader::CsvLoader;
//! use u_explore::table::DataType;
//!
//! let csv = "name,value\nAlice,1.5\nBob,\n";
//! let table = CsvLoader::new().parse_str(csv).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column(0).unwrap().data_type(), DataType::Text);
//! assert_eq!(table.column(1).unwrap().null_count(), 1);
//! ```

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::ExploreError;
use crate::table::{Column, NumericKind, Table, ValidityBitmap};

/// Missing-value markers recognized after trimming.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Loads a comma-separated file with the default settings.
///
/// Any read, encoding or parse failure is returned; no partial table is
/// ever produced.
pub fn load(source_path: impl AsRef<Path>) -> Result<Table, ExploreError> {
    CsvLoader::new().load(source_path)
}

/// Loader configuration and entry point.
///
/// ```
/// use u_explore::loader::CsvLoader;
///
/// let table = CsvLoader::new().delimiter(b';').parse_str("a;b\n1;2\n").unwrap();
/// assert_eq!(table.column_names(), &["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    null_markers: Vec<String>,
}

impl CsvLoader {
    /// Creates a loader with a comma delimiter and the standard markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Replaces the missing-value markers.
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Reads and parses the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table, ExploreError> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        std::fs::File::open(path)?.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes)?;
        let table = self.parse_str(&content)?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "data loaded"
        );
        Ok(table)
    }

    /// Parses delimited text into a [`Table`].
    pub fn parse_str(&self, input: &str) -> Result<Table, ExploreError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let header_len = self
            .reader(input.as_bytes())
            .records()
            .next()
            .transpose()?
            .map(|record| record.len())
            .ok_or(ExploreError::EmptyInput)?;

        // The tokenizer skips blank lines. With a single column a blank line
        // is a missing cell, so mark it explicitly first.
        let source: Cow<'_, str> = if header_len == 1 {
            Cow::Owned(mark_blank_lines(input))
        } else {
            Cow::Borrowed(input)
        };

        let mut reader = self.reader(source.as_bytes());
        let mut records = reader.records();
        let header = records.next().transpose()?.ok_or(ExploreError::EmptyInput)?;
        let headers = column_names(&header);
        let n_cols = headers.len();

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); n_cols];
        for result in records {
            let record = result?;
            if record.len() > n_cols {
                return Err(ExploreError::CsvParse {
                    line: record.position().map_or(0, |p| p.line()),
                    message: format!("expected {n_cols} fields, saw {}", record.len()),
                });
            }
            // Short records are padded with missing cells.
            for (idx, column) in raw_columns.iter_mut().enumerate() {
                column.push(record.get(idx).unwrap_or("").to_string());
            }
        }

        let mut table = Table::new();
        for (name, raw) in headers.into_iter().zip(raw_columns) {
            let column = self.build_column(&raw);
            debug!(column = %name, dtype = column.dtype_label(), "inferred column type");
            table.add_column(name, column)?;
        }
        Ok(table)
    }

    fn reader<R: Read>(&self, rdr: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr)
    }

    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    /// Infers the column type and builds a typed [`Column`].
    fn build_column(&self, raw_values: &[String]) -> Column {
        let n = raw_values.len();
        if n == 0 {
            return Column::text(Vec::new(), ValidityBitmap::all_valid(0));
        }

        let trimmed: Vec<&str> = raw_values.iter().map(|s| s.trim()).collect();
        let null_flags: Vec<bool> = trimmed.iter().map(|s| self.is_null(s)).collect();
        let mut present = trimmed
            .iter()
            .zip(&null_flags)
            .filter(|(_, &is_null)| !is_null)
            .map(|(&v, _)| v);

        if !present.clone().all(|s| s.parse::<f64>().is_ok()) {
            return build_text_column(raw_values, &null_flags);
        }

        // Infinite values count as missing so every stored number is finite.
        let numeric_nulls: Vec<bool> = trimmed
            .iter()
            .zip(&null_flags)
            .map(|(s, &is_null)| is_null || !s.parse::<f64>().is_ok_and(f64::is_finite))
            .collect();
        let has_nulls = numeric_nulls.iter().any(|&is_null| is_null);
        let kind = if !has_nulls && present.all(|s| s.parse::<i64>().is_ok()) {
            NumericKind::Integer
        } else {
            NumericKind::Float
        };
        build_numeric_column(&trimmed, &numeric_nulls, kind)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helper functions ──────────────────────────────────────────────────

fn build_numeric_column(values: &[&str], null_flags: &[bool], kind: NumericKind) -> Column {
    let nums = values
        .iter()
        .zip(null_flags)
        .map(|(val, &is_null)| match val.parse::<f64>() {
            Ok(v) if !is_null => v,
            _ => 0.0,
        })
        .collect();
    let validity = null_flags.iter().map(|&is_null| !is_null).collect();
    Column::numeric(nums, validity, kind)
}

fn build_text_column(values: &[String], null_flags: &[bool]) -> Column {
    let texts = values
        .iter()
        .zip(null_flags)
        .map(|(val, &is_null)| if is_null { String::new() } else { val.clone() })
        .collect();
    let validity = null_flags.iter().map(|&is_null| !is_null).collect();
    Column::text(texts, validity)
}

/// Header names with blanks filled and duplicates suffixed `.1`, `.2`, ...
fn column_names(header: &StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (idx, raw) in header.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// Rewrites interior blank lines as an explicit empty quoted field.
///
/// Leading and trailing blank lines are dropped; blank lines inside a
/// quoted field are kept verbatim.
fn mark_blank_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut in_quotes = false;
    let mut seen_content = false;
    let mut pending_blank = 0usize;

    for line in input.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if !in_quotes && body.is_empty() {
            if seen_content {
                pending_blank += 1;
            }
            continue;
        }
        for _ in 0..pending_blank {
            out.push_str("\"\"\n");
        }
        pending_blank = 0;
        seen_content = true;
        if body.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
        out.push_str(line);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DataType, Value};

    fn parse(csv: &str) -> Table {
        CsvLoader::new().parse_str(csv).unwrap()
    }

    #[test]
    fn parse_simple_csv() {
        let table = parse("a,b\n1,2\n3,4\n5,6");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), &["a", "b"]);
        let a = table.column_by_name("a").unwrap();
        assert_eq!(a.data_type(), DataType::Numeric);
        assert_eq!(a.dtype_label(), "int64");
        assert_eq!(a.as_numeric().unwrap(), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn float_and_integer_kinds() {
        let table = parse("i,f,m\n1,1.5,1\n2,2.0,\n");
        assert_eq!(table.column_by_name("i").unwrap().dtype_label(), "int64");
        assert_eq!(table.column_by_name("f").unwrap().dtype_label(), "float64");
        // Missing cells force the float kind.
        assert_eq!(table.column_by_name("m").unwrap().dtype_label(), "float64");
    }

    #[test]
    fn text_column_keeps_values() {
        let table = parse("name\nalice\nbob\n");
        let name = table.column_by_name("name").unwrap();
        assert_eq!(name.data_type(), DataType::Text);
        assert_eq!(name.value(1), Value::Text("bob"));
    }

    #[test]
    fn one_non_numeric_value_demotes_to_text() {
        let table = parse("x\n1\n2\nthree\n");
        assert_eq!(table.column(0).unwrap().data_type(), DataType::Text);
    }

    #[test]
    fn blank_line_in_single_column_is_missing() {
        let table = parse("x\n1\n\n3");
        let x = table.column_by_name("x").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(x.null_count(), 1);
        assert!(!x.is_valid(1));
        assert_eq!(x.valid_numeric_values().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let table = parse("x\n1\n2\n\n\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.total_null_count(), 0);
    }

    #[test]
    fn blank_lines_skipped_with_several_columns() {
        let table = parse("a,b\n1,2\n\n3,4\n");
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn null_markers_and_empty_fields() {
        let table = parse("x,y\n1.0,a\nNA,\n3.0,null\n");
        assert_eq!(table.column_by_name("x").unwrap().null_count(), 1);
        assert_eq!(table.column_by_name("y").unwrap().null_count(), 2);
    }

    #[test]
    fn infinite_values_are_missing() {
        let table = parse("x,y\n1,2\ninf,3\n-Infinity,4\n2,5\n");
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.data_type(), DataType::Numeric);
        assert_eq!(x.dtype_label(), "float64");
        assert_eq!(x.null_count(), 2);
        assert_eq!(x.valid_numeric_values().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let table = parse("x,y\n,1\n,2\n");
        let x = table.column_by_name("x").unwrap();
        assert_eq!(x.data_type(), DataType::Numeric);
        assert_eq!(x.null_count(), 2);
    }

    #[test]
    fn header_only_keeps_columns() {
        let table = parse("a,b,c\n");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.numeric_columns().count(), 0);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = CsvLoader::new().parse_str("").unwrap_err();
        assert!(matches!(err, ExploreError::EmptyInput));
        let err = CsvLoader::new().parse_str("\n\n").unwrap_err();
        assert!(matches!(err, ExploreError::EmptyInput));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = parse("a,b\n1,2\n3\n");
        let b = table.column_by_name("b").unwrap();
        assert_eq!(b.null_count(), 1);
        assert_eq!(b.dtype_label(), "float64");
    }

    #[test]
    fn long_rows_are_an_error() {
        let err = CsvLoader::new().parse_str("a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            ExploreError::CsvParse { line, message } => {
                assert!(line >= 2, "line {line}");
                assert!(message.contains("saw 3"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_and_blank_headers() {
        let table = parse("a,a,,a\n1,2,3,4\n");
        assert_eq!(table.column_names(), &["a", "a.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn quoted_fields_and_bom() {
        let table = parse("\u{feff}name,desc\nAlice,\"hello, world\"\nBob,\"line1\n\nline3\"\n");
        assert_eq!(table.column_names(), &["name", "desc"]);
        let desc = table.column_by_name("desc").unwrap();
        assert_eq!(desc.value(0), Value::Text("hello, world"));
        assert_eq!(desc.value(1), Value::Text("line1\n\nline3"));
    }

    #[test]
    fn quoted_blank_line_in_single_column() {
        let table = parse("note\n\"a\n\nb\"\n\nc\n");
        let note = table.column_by_name("note").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(note.value(0), Value::Text("a\n\nb"));
        assert_eq!(note.value(1), Value::Missing);
        assert_eq!(note.value(2), Value::Text("c"));
    }

    #[test]
    fn crlf_line_endings() {
        let table = parse("a,b\r\n1,2\r\n3,4\r\n");
        assert_eq!(table.column_by_name("b").unwrap().as_numeric().unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn custom_delimiter_and_markers() {
        let table = CsvLoader::new()
            .delimiter(b'\t')
            .null_markers(vec!["-999".to_string()])
            .parse_str("x\ty\n1\t-999\n2\t3\n")
            .unwrap();
        assert_eq!(table.column_by_name("y").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ExploreError::Io(_)));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"name\ncaf\xe9\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ExploreError::Encoding(_)));
    }
}
