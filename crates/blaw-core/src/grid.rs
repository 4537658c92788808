//! Cell widths of a one-dimensional finite-volume grid.

use crate::error::ConfigError;

/// Validated cell widths `dx[0..N]`, each finite and strictly positive.
#[derive(Clone, Debug, PartialEq)]
pub struct CellWidths {
    dx: Vec<f64>,
}

impl CellWidths {
    /// Validate and wrap the given widths.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `dx` is empty or any width is not finite and > 0.
    pub fn new(dx: Vec<f64>) -> Result<Self, ConfigError> {
        if dx.is_empty() {
            return Err(ConfigError::EmptyCellWidths);
        }
        if let Some((index, &value)) = dx
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(ConfigError::InvalidCellWidth { index, value });
        }
        Ok(Self { dx })
    }

    /// `cells` cells of equal width.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `cells` is zero or `width` is not finite and > 0.
    pub fn uniform(cells: usize, width: f64) -> Result<Self, ConfigError> {
        Self::new(vec![width; cells])
    }

    /// Widths of the cells between consecutive boundaries.
    ///
    /// `boundaries` holds `N + 1` increasing positions.
    ///
    /// # Errors
    ///
    /// Returns `Err` if fewer than two boundaries are given or they are
    /// not strictly increasing.
    pub fn from_boundaries(boundaries: &[f64]) -> Result<Self, ConfigError> {
        Self::new(boundaries.windows(2).map(|w| w[1] - w[0]).collect())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.dx.len()
    }

    /// Always false; an empty grid is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.dx.is_empty()
    }

    /// Width of the narrowest cell.
    pub fn min(&self) -> f64 {
        self.dx.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The widths as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.dx
    }

    /// Check the grid has exactly `cells` cells.
    pub fn check_cells(&self, cells: usize) -> Result<(), ConfigError> {
        if self.dx.len() != cells {
            return Err(ConfigError::CellCountMismatch {
                configured: self.dx.len(),
                cells,
            });
        }
        Ok(())
    }
}
