//! Error types for the Blaw flux and source engines.
//!
//! Split by who is at fault: [`ConfigError`] for engine configuration that
//! is invalid or disagrees with the data it is asked to process, and
//! [`InputError`] for malformed caller buffers detected at the binding
//! layer. Evaluation entry points return [`EvalError`], which wraps both.
//!
//! The numerical kernels themselves never return errors.

use std::error::Error;
use std::fmt;

/// Invalid or inconsistent engine configuration.
///
/// Raised by builders and setters at configuration time, and by
/// `evaluate()` when the configured dimensions disagree with the supplied
/// state width or cell count.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required builder field was never set.
    Missing {
        /// Name of the missing field.
        field: &'static str,
    },
    /// The dissipation coefficient is negative, NaN, or infinite.
    InvalidAlpha {
        /// The rejected value.
        value: f64,
    },
    /// No cell widths were supplied.
    EmptyCellWidths,
    /// A cell width is zero, negative, NaN, or infinite.
    InvalidCellWidth {
        /// Index of the offending cell.
        index: usize,
        /// The rejected width.
        value: f64,
    },
    /// An operator with zero rows or zero columns.
    EmptyOperator,
    /// Operator data length does not equal `rows * cols`.
    OperatorShape {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
        /// Actual number of entries supplied.
        len: usize,
    },
    /// Operator dimensions disagree with the state width of a call.
    DimensionMismatch {
        /// Operator row count.
        rows: usize,
        /// Operator column count.
        cols: usize,
        /// State width `p` of the supplied fields.
        width: usize,
    },
    /// The configured cell widths do not cover the output rows.
    CellCountMismatch {
        /// Number of configured cell widths.
        configured: usize,
        /// Number of output rows supplied.
        cells: usize,
    },
    /// More ghost cells were requested than the domain can hold.
    GhostBandTooWide {
        /// Ghost cells per side.
        ghost_cells: usize,
        /// Number of cells in the domain.
        cells: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::InvalidAlpha { value } => {
                write!(f, "alpha must be finite and >= 0, got {value}")
            }
            Self::EmptyCellWidths => write!(f, "cell widths must not be empty"),
            Self::InvalidCellWidth { index, value } => {
                write!(f, "cell width {index} must be finite and > 0, got {value}")
            }
            Self::EmptyOperator => write!(f, "operator must have at least one row and column"),
            Self::OperatorShape { rows, cols, len } => write!(
                f,
                "operator data has {len} entries, expected {rows}x{cols} = {}",
                rows * cols
            ),
            Self::DimensionMismatch { rows, cols, width } => write!(
                f,
                "operator is {rows}x{cols} but state width is {width}"
            ),
            Self::CellCountMismatch { configured, cells } => write!(
                f,
                "{configured} cell widths configured but output has {cells} rows"
            ),
            Self::GhostBandTooWide { ghost_cells, cells } => write!(
                f,
                "{ghost_cells} ghost cells per side do not fit in {cells} cells"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Malformed caller buffers, reported by the binding layer.
///
/// Covers everything a host binding checks before handing buffers to an
/// engine: block widths, ragged lengths, and block counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    /// A view was constructed with a block width of zero.
    ZeroWidth {
        /// Name of the buffer.
        name: &'static str,
    },
    /// Buffer length is not a whole number of blocks.
    RaggedLength {
        /// Name of the buffer.
        name: &'static str,
        /// Buffer length in elements.
        len: usize,
        /// Block width.
        width: usize,
    },
    /// A buffer's block width differs from the output's.
    WidthMismatch {
        /// Name of the buffer.
        name: &'static str,
        /// Width of the output field.
        expected: usize,
        /// Width of this buffer.
        found: usize,
    },
    /// A buffer holds fewer blocks than the sweep reads.
    TooFewBlocks {
        /// Name of the buffer.
        name: &'static str,
        /// Blocks the sweep needs.
        needed: usize,
        /// Blocks supplied.
        found: usize,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidth { name } => write!(f, "{name}: block width must be > 0"),
            Self::RaggedLength { name, len, width } => write!(
                f,
                "{name}: length {len} is not a multiple of block width {width}"
            ),
            Self::WidthMismatch {
                name,
                expected,
                found,
            } => write!(f, "{name}: block width {found}, expected {expected}"),
            Self::TooFewBlocks {
                name,
                needed,
                found,
            } => write!(f, "{name}: {found} blocks supplied, {needed} needed"),
        }
    }
}

impl Error for InputError {}

/// Failure of an `evaluate()` call.
///
/// Nothing has been written to the output when this is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalError {
    /// The engine's configuration disagrees with the call.
    Config(ConfigError),
    /// The supplied buffers are malformed.
    Input(InputError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Input(e) => write!(f, "input validation error: {e}"),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EvalError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<InputError> for EvalError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}
