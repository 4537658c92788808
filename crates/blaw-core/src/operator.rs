//! Dense row-major linear operator.

use crate::error::ConfigError;

/// A dense `rows x cols` matrix stored row-major, applied as `y = M·x`.
///
/// Used as the flux operator `A` of a linear system (`f(q) = A·q`) and as
/// the source operator `B` (`s(q) = B·q`). The engine owns its copy, so
/// later mutation of the caller's buffer has no effect.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseOperator {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DenseOperator {
    /// Build from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either dimension is zero or `data.len()` is not
    /// `rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyOperator);
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(ConfigError::OperatorShape {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from a slice of equal-length rows.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are no rows, a row is empty, or rows differ
    /// in length.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self, ConfigError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let data: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::from_row_major(rows.len(), cols, data)
    }

    /// The `n x n` identity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `n` is zero.
    pub fn identity(n: usize) -> Result<Self, ConfigError> {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self::from_row_major(n, n, data)
    }

    /// A diagonal matrix with the given entries.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `diag` is empty.
    pub fn diagonal(diag: &[f64]) -> Result<Self, ConfigError> {
        let n = diag.len();
        let mut data = vec![0.0; n * n];
        for (i, &d) in diag.iter().enumerate() {
            data[i * n + i] = d;
        }
        Self::from_row_major(n, n, data)
    }

    /// Number of rows (output components).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (input components).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Check the operator maps width-`p` states to width-`p` states.
    pub fn check_square(&self, width: usize) -> Result<(), ConfigError> {
        if self.rows != width || self.cols != width {
            return Err(ConfigError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                width,
            });
        }
        Ok(())
    }

    /// `out[i] = Σ_j M[i,j]·q[j]` for `i < rows`.
    ///
    /// `q` must hold at least `cols` values and `out` at least `rows`.
    #[inline]
    pub fn apply(&self, q: &[f64], out: &mut [f64]) {
        debug_assert!(q.len() >= self.cols);
        debug_assert!(out.len() >= self.rows);
        for (row, o) in self.data.chunks_exact(self.cols).zip(out.iter_mut()) {
            *o = row.iter().zip(q).map(|(a, x)| a * x).sum();
        }
    }
}
