//! Lax–Friedrichs flux engines for one-dimensional finite-volume schemes.
//!
//! Two engines share one divergence sweep:
//!
//! - [`LfFlux`]: the caller supplies reconstructed states and evaluated
//!   physical fluxes on both sides of every interface.
//! - [`LinearLfFlux`]: the caller supplies states only; the physical flux
//!   is `A·q` for a configured dense operator `A`.
//!
//! Both write `-(F_{i+1/2} - F_{i-1/2}) / dx_i` into rows `1..N` of a
//! caller-allocated `N x p` output. See [`sweep`] for the exact interface
//! indexing and the treatment of row 0.
//!
//! Enable the `parallel` feature for rayon-backed `par_evaluate`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod lax_friedrichs;
pub mod linear;
pub mod nonlinear;
pub mod sweep;

pub use lax_friedrichs::lax_friedrichs;
pub use linear::{LinearLfFlux, LinearLfFluxBuilder};
pub use nonlinear::{LfFlux, LfFluxBuilder};
pub use sweep::{interfaces_needed, InterfaceFlux, SweepConfig};

/// Default rows per chunk for `par_evaluate`.
pub const DEFAULT_CHUNK_ROWS: usize = 4096;
