//! Column-major, immutable table for loaded data.
//!
//! A [`Table`] stores named columns of equal length. Each column carries an
//! explicit type tag ([`DataType::Numeric`] or [`DataType::Text`]) and a
//! compact validity bitmap marking missing cells. Every consumer switches on
//! that tag, so the profiler and the renderers always agree on which
//! columns are numeric.
//!
//! # Example
//!
//! ```
//! use u_explore::table::{Column, NumericKind, Table, ValidityBitmap};
//!
//! let mut table = Table::new();
//! table.add_column(
//!     "temperature".to_string(),
//!     Column::numeric(vec![20.5, 21.3, 19.8], ValidityBitmap::all_valid(3), NumericKind::Float),
//! ).unwrap();
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.numeric_columns().count(), 1);
//! ```

use std::fmt;

use crate::error::ExploreError;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap using `Vec<u64>`.
///
/// A set bit means the cell holds a value; a cleared bit is the
/// missing-marker. Built by collecting one `bool` per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        std::iter::repeat_n(true, len).collect()
    }

    /// Returns `true` if the cell at `idx` holds a value.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Number of rows tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap tracks zero rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts missing positions.
    pub fn null_count(&self) -> usize {
        self.len - self.valid_count()
    }

    /// Counts positions holding a value.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Row indices holding a value, in order.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_valid(i))
    }

    /// Number of backing words, used for memory estimates.
    pub(crate) fn word_count(&self) -> usize {
        self.bits.len()
    }
}

impl FromIterator<bool> for ValidityBitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Vec::new();
        let mut len = 0;
        for valid in iter {
            if len % 64 == 0 {
                bits.push(0u64);
            }
            if valid {
                bits[len / 64] |= 1u64 << (len % 64);
            }
            len += 1;
        }
        Self { bits, len }
    }
}

// ── Type tags ─────────────────────────────────────────────────────────

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Floating-point or integer quantities.
    Numeric,
    /// Everything else, kept verbatim.
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Text => write!(f, "Text"),
        }
    }
}

/// Storage flavour of a numeric column as read from the source.
///
/// Values are always held as `f64`; the kind only affects how cells and
/// dtypes are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Every cell present and integral in the source.
    Integer,
    /// Anything else numeric.
    Float,
}

// ── Value ─────────────────────────────────────────────────────────────

/// A borrowed view of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// The missing-marker.
    Missing,
    /// Numeric cell with its column's kind.
    Number(f64, NumericKind),
    /// Text cell.
    Text(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Missing => f.write_str("NaN"),
            Self::Number(v, NumericKind::Integer) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", v as i64)
            }
            Self::Number(v, _) => write!(f, "{v:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with a validity bitmap.
///
/// Missing positions hold `0.0` or an empty string and must be ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `f64` values.
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
        kind: NumericKind,
    },
    /// Verbatim text values.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates a numeric column.
    pub fn numeric(values: Vec<f64>, validity: ValidityBitmap, kind: NumericKind) -> Self {
        Self::Numeric {
            values,
            validity,
            kind,
        }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Returns the declared type tag.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { .. } => DataType::Numeric,
            Self::Text { .. } => DataType::Text,
        }
    }

    /// Returns the pandas-style dtype label (`int64`, `float64`, `object`).
    pub fn dtype_label(&self) -> &'static str {
        match self {
            Self::Numeric {
                kind: NumericKind::Integer,
                ..
            } => "int64",
            Self::Numeric { .. } => "float64",
            Self::Text { .. } => "object",
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. } | Self::Text { validity, .. } => validity,
        }
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    /// Number of present cells.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    /// Returns `true` if the cell at `idx` holds a value.
    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Returns the raw numeric slice, or `None` for text columns.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric { values, .. } => Some(values),
            Self::Text { .. } => None,
        }
    }

    /// Returns present numeric values in row order, or `None` for text columns.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric {
                values, validity, ..
            } => Some(validity.valid_indices().map(|i| values[i]).collect()),
            Self::Text { .. } => None,
        }
    }

    /// Returns the cell at `idx`.
    pub fn value(&self, idx: usize) -> Value<'_> {
        if !self.is_valid(idx) {
            return Value::Missing;
        }
        match self {
            Self::Numeric { values, kind, .. } => Value::Number(values[idx], *kind),
            Self::Text { values, .. } => Value::Text(&values[idx]),
        }
    }

    /// Rough in-memory footprint in bytes.
    pub fn memory_bytes(&self) -> usize {
        let bitmap = self.validity().word_count() * 8;
        match self {
            Self::Numeric { values, .. } => values.len() * 8 + bitmap,
            Self::Text { values, .. } => {
                values.iter().map(|s| s.len() + 24).sum::<usize>() + bitmap
            }
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// Immutable column-major table.
///
/// All columns have the same number of rows and names are unique. A table
/// is built once by the loader and only read afterwards.
///
/// ```
/// use u_explore::table::{Column, DataType, NumericKind, Table, ValidityBitmap};
///
/// let mut table = Table::new();
/// table.add_column(
///     "x".to_string(),
///     Column::numeric(vec![1.0, 2.0], ValidityBitmap::all_valid(2), NumericKind::Integer),
/// ).unwrap();
/// table.add_column(
///     "label".to_string(),
///     Column::text(vec!["a".into(), "b".into()], ValidityBitmap::all_valid(2)),
/// ).unwrap();
/// assert_eq!(table.schema(), vec![("x", DataType::Numeric), ("label", DataType::Text)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates a table with no columns or rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named column.
    ///
    /// Fails if the name is taken or the length differs from the existing
    /// row count (the first column sets the row count).
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), ExploreError> {
        if self.names.contains(&name) {
            return Err(ExploreError::DuplicateColumn { name });
        }
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(ExploreError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in source order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Column at `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Column named `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Iterates over `(name, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Iterates over the numeric columns, in order.
    ///
    /// The classification is read from the column tags on every call.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.iter()
            .filter(|(_, col)| col.data_type() == DataType::Numeric)
    }

    /// `(name, type)` pairs in order.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.iter().map(|(name, col)| (name, col.data_type())).collect()
    }

    /// Total number of missing cells.
    pub fn total_null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[f64]) -> Column {
        Column::numeric(
            values.to_vec(),
            ValidityBitmap::all_valid(values.len()),
            NumericKind::Integer,
        )
    }

    #[test]
    fn bitmap_boundary_64() {
        let bm = ValidityBitmap::all_valid(64);
        assert_eq!(bm.word_count(), 1);
        assert_eq!(bm.null_count(), 0);

        let bm65 = ValidityBitmap::all_valid(65);
        assert_eq!(bm65.word_count(), 2);
        assert!(bm65.is_valid(64));
        assert_eq!(bm65.valid_count(), 65);
    }

    #[test]
    fn bitmap_collect_across_word_boundary() {
        let bm: ValidityBitmap = (0..130).map(|i| i % 3 != 0).collect();
        assert_eq!(bm.len(), 130);
        assert_eq!(bm.word_count(), 3);
        assert_eq!(bm.null_count(), (0..130).filter(|i| i % 3 == 0).count());
        assert!(!bm.is_valid(129));
        assert!(bm.is_valid(128));
    }

    #[test]
    fn bitmap_valid_indices() {
        let bm: ValidityBitmap = [true, false, true, false, true].into_iter().collect();
        assert_eq!(bm.valid_indices().collect::<Vec<_>>(), vec![0, 2, 4]);
        let none: ValidityBitmap = [false; 4].into_iter().collect();
        assert_eq!(none.valid_count(), 0);
        assert!(ValidityBitmap::all_valid(0).is_empty());
    }

    #[test]
    fn numeric_column_with_missing() {
        let validity: ValidityBitmap = [true, false, true].into_iter().collect();
        let col = Column::numeric(vec![1.0, 0.0, 3.0], validity, NumericKind::Float);
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.valid_numeric_values(), Some(vec![1.0, 3.0]));
        assert_eq!(col.value(1), Value::Missing);
        assert_eq!(col.dtype_label(), "float64");
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Number(3.0, NumericKind::Integer).to_string(), "3");
        assert_eq!(Value::Number(3.0, NumericKind::Float).to_string(), "3.0");
        assert_eq!(Value::Number(0.25, NumericKind::Float).to_string(), "0.25");
        assert_eq!(Value::Missing.to_string(), "NaN");
        assert_eq!(Value::Text("bob").to_string(), "bob");
    }

    #[test]
    fn text_column_values() {
        let validity: ValidityBitmap = [false, true].into_iter().collect();
        let col = Column::text(vec![String::new(), "world".into()], validity);
        assert_eq!(col.data_type(), DataType::Text);
        assert_eq!(col.dtype_label(), "object");
        assert_eq!(col.value(0), Value::Missing);
        assert_eq!(col.value(1), Value::Text("world"));
        assert!(col.as_numeric().is_none());
    }

    #[test]
    fn column_length_mismatch() {
        let mut table = Table::new();
        table.add_column("x".into(), ints(&[1.0, 2.0])).unwrap();
        let err = table.add_column("y".into(), ints(&[1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(
            err,
            ExploreError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut table = Table::new();
        table.add_column("x".into(), ints(&[1.0])).unwrap();
        let err = table.add_column("x".into(), ints(&[2.0])).unwrap_err();
        assert!(matches!(err, ExploreError::DuplicateColumn { .. }));
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn numeric_classification_follows_tags() {
        let mut table = Table::new();
        table.add_column("a".into(), ints(&[1.0, 2.0])).unwrap();
        table
            .add_column(
                "name".into(),
                Column::text(vec!["x".into(), "y".into()], ValidityBitmap::all_valid(2)),
            )
            .unwrap();
        table.add_column("b".into(), ints(&[3.0, 4.0])).unwrap();

        let numeric: Vec<&str> = table.numeric_columns().map(|(n, _)| n).collect();
        assert_eq!(numeric, vec!["a", "b"]);
        assert!(table.column_by_name("name").is_some());
        assert!(table.column_by_name("nope").is_none());
    }

    #[test]
    fn empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.numeric_columns().count(), 0);
        assert_eq!(table.total_null_count(), 0);
    }
}
