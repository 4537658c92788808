//! Blaw: finite-volume kernels for one-dimensional hyperbolic balance laws
//! `q_t + f(q)_x = s(q)`.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Blaw sub-crates and adds [`LinearBalanceLaw`], the combined right-hand
//! side of `q_t + A q_x = B q`.
//!
//! # Quick start
//!
//! ```rust
//! use blaw::prelude::*;
//!
//! // Scalar advection with speed 1 on 3 cells.
//! let mut flux = LinearLfFlux::builder()
//!     .operator(DenseOperator::diagonal(&[1.0]).unwrap())
//!     .alpha(1.0)
//!     .cell_widths(vec![1.0; 3])
//!     .build()
//!     .unwrap();
//!
//! // Interface states for interfaces 0..=3.
//! let q_left = [0.0, 1.0, 2.0, 3.0];
//! let q_right = [1.0, 2.0, 3.0, 4.0];
//! let mut net = [0.0; 3];
//! flux.evaluate(
//!     StateBlocks::new("q_left", &q_left, 1).unwrap(),
//!     StateBlocks::new("q_right", &q_right, 1).unwrap(),
//!     &mut StateBlocksMut::new("out", &mut net, 1).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(net, [0.0, -2.0, -1.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `blaw-core` | Errors, block views, operators, cell widths, scratch |
//! | [`flux`] | `blaw-flux` | Lax–Friedrichs kernel, sweep, flux engines |
//! | [`source`] | `blaw-source` | Quadrature rules and the linear source engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod balance;

pub use balance::{LinearBalanceLaw, LinearBalanceLawBuilder};

/// Core types (`blaw-core`).
///
/// Error enums, the [`types::StateBlocks`] views that bind caller buffers,
/// [`types::DenseOperator`] and [`types::CellWidths`].
pub use blaw_core as types;

/// Lax–Friedrichs flux engines (`blaw-flux`).
///
/// [`flux::LfFlux`] for caller-evaluated physical fluxes,
/// [`flux::LinearLfFlux`] for `f(q) = A q`.
pub use blaw_flux as flux;

/// Quadrature source engines (`blaw-source`).
pub use blaw_source as source;

/// Common imports for typical Blaw usage.
///
/// ```rust
/// use blaw::prelude::*;
/// ```
pub mod prelude {
    // Buffers and configuration
    pub use blaw_core::{CellWidths, DenseOperator, StateBlocks, StateBlocksMut};

    // Errors
    pub use blaw_core::{ConfigError, EvalError, InputError};

    // Engines
    pub use blaw_flux::{LfFlux, LinearLfFlux};
    pub use blaw_source::{LinearQuad3Source, QuadratureRule};

    pub use crate::LinearBalanceLaw;
}
