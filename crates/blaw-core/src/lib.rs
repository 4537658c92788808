//! Core types for the Blaw balance-law kernels.
//!
//! This is the leaf crate of the workspace. It defines the pieces shared by
//! the flux and source engines: error types, borrowed block views over
//! caller buffers, the dense linear operator, validated cell widths, and
//! engine-owned scratch lanes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blocks;
pub mod error;
pub mod grid;
pub mod operator;
pub mod scratch;

pub use blocks::{StateBlocks, StateBlocksMut};
pub use error::{ConfigError, EvalError, InputError};
pub use grid::CellWidths;
pub use operator::DenseOperator;
pub use scratch::ScratchLanes;

/// Check a dissipation coefficient is finite and non-negative.
pub fn check_alpha(alpha: f64) -> Result<f64, ConfigError> {
    if !(alpha >= 0.0) || !alpha.is_finite() {
        return Err(ConfigError::InvalidAlpha { value: alpha });
    }
    Ok(alpha)
}
