//! Cell-averaged source terms for one-dimensional balance laws.
//!
//! [`LinearQuad3Source`] approximates `(1/dx) ∫ B q dx` over each cell from
//! states sampled at three quadrature points, for a constant dense operator
//! `B`. The rule combining the samples is a [`QuadratureRule`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod linear;
pub mod quadrature;

pub use linear::{LinearQuad3Source, LinearQuad3SourceBuilder};
pub use quadrature::{QuadratureRule, POINTS};
