//! Pairwise-complete Pearson correlation over the numeric columns of a
//! [`Table`].
//!
//! Each coefficient uses only the rows where *both* columns of the pair are
//! present, independently of every other pair. The diagonal is exactly
//! `1.0`. Off-diagonal entries are `NaN` when a pair has fewer than two
//! complete rows or no variance over them.
//!
//! ```
//! use u_explore::correlation::correlation_matrix;
//! use u_explore::loader::CsvLoader;
//!
//! let table = CsvLoader::new().parse_str("a,b\n1,2\n3,4\n5,6").unwrap();
//! let corr = correlation_matrix(&table);
//! assert_eq!(corr.len(), 2);
//! assert!((corr.get(0, 1) - 1.0).abs() < 1e-12);
//! ```

use crate::table::{Column, Table};

/// Square, symmetric correlation matrix labelled by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    /// Row-major `n × n` values.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Number of columns (and rows).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` for a matrix over zero columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coefficient between columns `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }
}

/// Computes the pairwise-complete Pearson matrix for the numeric columns.
///
/// Non-numeric columns are ignored; a table with none yields an empty
/// matrix.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<(&str, &Column)> = table.numeric_columns().collect();
    let n = numeric.len();
    let mut values = vec![f64::NAN; n * n];

    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let r = pairwise_pearson(numeric[i].1, numeric[j].1);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix {
        names: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Pearson's r over rows where both columns hold a value.
///
/// Returns `NaN` for text columns, fewer than two complete rows, or zero
/// variance in either column.
pub fn pairwise_pearson(a: &Column, b: &Column) -> f64 {
    let (Some(xs), Some(ys)) = (a.as_numeric(), b.as_numeric()) else {
        return f64::NAN;
    };
    let (x, y): (Vec<f64>, Vec<f64>) = (0..xs.len().min(ys.len()))
        .filter(|&i| a.is_valid(i) && b.is_valid(i))
        .map(|i| (xs[i], ys[i]))
        .unzip();

    match x.len() {
        0 | 1 => f64::NAN,
        2 => two_point_r(&x, &y),
        _ => u_analytics::correlation::pearson(&x, &y).map_or(f64::NAN, |c| c.r),
    }
}

/// Two distinct points always lie on a line, so r is the sign of its slope.
/// `pearson` needs three observations for its p-value and rejects this case.
fn two_point_r(x: &[f64], y: &[f64]) -> f64 {
    let slope = (x[1] - x[0]) * (y[1] - y[0]);
    if slope == 0.0 || !slope.is_finite() {
        f64::NAN
    } else {
        slope.signum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
