//! Borrowed block views over flat `f64` buffers.
//!
//! A state field is a sequence of state vectors of width `p`, stored
//! contiguously as `[q_0[0..p], q_1[0..p], ...]`. The views here are the
//! binding layer: constructing one validates the shape, and the engines
//! index blocks through them without further checks.

use crate::error::InputError;

/// Read-only view of a field as consecutive blocks of `width` values.
#[derive(Clone, Copy, Debug)]
pub struct StateBlocks<'a> {
    name: &'static str,
    data: &'a [f64],
    width: usize,
}

impl<'a> StateBlocks<'a> {
    /// Wrap `data` as blocks of `width` values.
    ///
    /// `name` identifies the buffer in error messages.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `width` is zero or `data.len()` is not a multiple
    /// of `width`.
    pub fn new(name: &'static str, data: &'a [f64], width: usize) -> Result<Self, InputError> {
        check_shape(name, data.len(), width)?;
        Ok(Self { name, data, width })
    }

    /// Buffer name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Values per block.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of blocks.
    pub fn count(&self) -> usize {
        self.data.len() / self.width
    }

    /// Block `k`. Panics if `k >= count()`.
    #[inline]
    pub fn block(&self, k: usize) -> &'a [f64] {
        &self.data[k * self.width..(k + 1) * self.width]
    }

    /// The underlying flat slice.
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Check this view has the given width and at least `needed` blocks.
    pub fn require(&self, width: usize, needed: usize) -> Result<(), InputError> {
        if self.width != width {
            return Err(InputError::WidthMismatch {
                name: self.name,
                expected: width,
                found: self.width,
            });
        }
        if self.count() < needed {
            return Err(InputError::TooFewBlocks {
                name: self.name,
                needed,
                found: self.count(),
            });
        }
        Ok(())
    }
}

/// Mutable view of an output field as consecutive rows of `width` values.
#[derive(Debug)]
pub struct StateBlocksMut<'a> {
    name: &'static str,
    data: &'a mut [f64],
    width: usize,
}

impl<'a> StateBlocksMut<'a> {
    /// Wrap `data` as rows of `width` values.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `width` is zero or `data.len()` is not a multiple
    /// of `width`.
    pub fn new(
        name: &'static str,
        data: &'a mut [f64],
        width: usize,
    ) -> Result<Self, InputError> {
        check_shape(name, data.len(), width)?;
        Ok(Self { name, data, width })
    }

    /// Buffer name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Values per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (cells).
    pub fn count(&self) -> usize {
        self.data.len() / self.width
    }

    /// Row `i`. Panics if `i >= count()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// Mutable row `i`. Panics if `i >= count()`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.width..(i + 1) * self.width]
    }

    /// The underlying flat slice.
    pub fn as_slice(&self) -> &[f64] {
        self.data
    }

    /// The underlying flat slice, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.data
    }
}

fn check_shape(name: &'static str, len: usize, width: usize) -> Result<(), InputError> {
    if width == 0 {
        return Err(InputError::ZeroWidth { name });
    }
    if !len.is_multiple_of(width) {
        return Err(InputError::RaggedLength { name, len, width });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_index_by_width() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let q = StateBlocks::new("q", &data, 2).unwrap();
        assert_eq!(q.count(), 3);
        assert_eq!(q.block(0), &[0.0, 1.0]);
        assert_eq!(q.block(2), &[4.0, 5.0]);
    }

    #[test]
    fn zero_width_rejected() {
        let err = StateBlocks::new("q", &[1.0], 0).unwrap_err();
        assert_eq!(err, InputError::ZeroWidth { name: "q" });
    }

    #[test]
    fn ragged_length_rejected() {
        let err = StateBlocks::new("q", &[1.0, 2.0, 3.0], 2).unwrap_err();
        assert_eq!(
            err,
            InputError::RaggedLength {
                name: "q",
                len: 3,
                width: 2
            }
        );
    }

    #[test]
    fn empty_buffer_is_zero_blocks() {
        let q = StateBlocks::new("q", &[], 3).unwrap();
        assert_eq!(q.count(), 0);
    }

    #[test]
    fn require_checks_width_then_count() {
        let data = [0.0; 6];
        let q = StateBlocks::new("q_plus", &data, 2).unwrap();
        assert!(q.require(2, 3).is_ok());
        assert_eq!(
            q.require(3, 1).unwrap_err(),
            InputError::WidthMismatch {
                name: "q_plus",
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            q.require(2, 4).unwrap_err(),
            InputError::TooFewBlocks {
                name: "q_plus",
                needed: 4,
                found: 3
            }
        );
    }

    #[test]
    fn rows_are_writable() {
        let mut data = [0.0; 4];
        let mut out = StateBlocksMut::new("f", &mut data, 2).unwrap();
        out.row_mut(1).copy_from_slice(&[7.0, 8.0]);
        assert_eq!(out.row(1), &[7.0, 8.0]);
        assert_eq!(out.as_slice(), &[0.0, 0.0, 7.0, 8.0]);
    }
}
