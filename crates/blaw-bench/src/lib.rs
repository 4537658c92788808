//! Benchmark profiles for the Blaw kernels.
//!
//! - [`reference_profile`]: 1600 cells, `p = 3`, the advection system
//!   `A = diag(2, -1, -2)` with a random source operator
//! - [`stress_profile`]: same system on 100K cells
//!
//! All fields are drawn from a seeded RNG, so runs are reproducible.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use blaw_core::{ConfigError, DenseOperator};
use blaw_flux::{LfFlux, LinearLfFlux};
use blaw_source::LinearQuad3Source;
use blaw_test_utils::{map_blocks, random_field, random_operator, seeded_rng};

/// Inputs for one benchmark run.
#[derive(Clone, Debug)]
pub struct BenchProfile {
    /// Number of cells `N`.
    pub cells: usize,
    /// State width `p`.
    pub width: usize,
    /// Dissipation coefficient.
    pub alpha: f64,
    /// Cell widths.
    pub dx: Vec<f64>,
    /// Flux operator `A`.
    pub flux_operator: DenseOperator,
    /// Source operator `B`.
    pub source_operator: DenseOperator,
    /// States left of interfaces `0..=N`.
    pub q_left: Vec<f64>,
    /// States right of interfaces `0..=N`.
    pub q_right: Vec<f64>,
    /// `A q_left`.
    pub f_left: Vec<f64>,
    /// `A q_right`.
    pub f_right: Vec<f64>,
    /// Quadrature-point states, three per cell.
    pub quad_states: Vec<f64>,
}

impl BenchProfile {
    /// Generate a profile over `[0, length]` split into `cells` cells.
    pub fn generate(cells: usize, length: f64, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = seeded_rng(seed);
        let a = DenseOperator::diagonal(&[2.0, -1.0, -2.0])?;
        let width = a.rows();
        let b = random_operator(&mut rng, width, 0.1);
        let q_left = random_field(&mut rng, cells + 1, width, -1.0, 1.0);
        let q_right = random_field(&mut rng, cells + 1, width, -1.0, 1.0);
        let quad_states = random_field(&mut rng, 3 * cells, width, -1.0, 1.0);
        let f_left = map_blocks(&q_left, width, |q, f| a.apply(q, f));
        let f_right = map_blocks(&q_right, width, |q, f| a.apply(q, f));
        Ok(Self {
            cells,
            width,
            alpha: 2.0,
            dx: vec![length / cells as f64; cells],
            flux_operator: a,
            source_operator: b,
            q_left,
            q_right,
            f_left,
            f_right,
            quad_states,
        })
    }

    /// Nonlinear engine over this profile's grid.
    pub fn lf_flux(&self) -> Result<LfFlux, ConfigError> {
        LfFlux::builder()
            .alpha(self.alpha)
            .cell_widths(self.dx.clone())
            .scratch_width(self.width)
            .build()
    }

    /// Linear engine over this profile's grid.
    pub fn linear_lf_flux(&self) -> Result<LinearLfFlux, ConfigError> {
        LinearLfFlux::builder()
            .operator(self.flux_operator.clone())
            .alpha(self.alpha)
            .cell_widths(self.dx.clone())
            .build()
    }

    /// Source engine with the default rule.
    pub fn source(&self) -> Result<LinearQuad3Source, ConfigError> {
        LinearQuad3Source::builder()
            .operator(self.source_operator.clone())
            .build()
    }
}

/// 1600 cells on `[0, 800]`.
pub fn reference_profile(seed: u64) -> Result<BenchProfile, ConfigError> {
    BenchProfile::generate(1600, 800.0, seed)
}

/// 100K cells on `[0, 800]`.
pub fn stress_profile(seed: u64) -> Result<BenchProfile, ConfigError> {
    BenchProfile::generate(100_000, 800.0, seed)
}
