//! Lax–Friedrichs net flux for systems with caller-evaluated physical flux.
//!
//! The caller reconstructs states on both sides of every interface and
//! evaluates the physical flux there; this engine combines them with
//! [`lax_friedrichs`] and sweeps the divergence across the grid.
//!
//! Constructed via the builder pattern: [`LfFlux::builder`].

use blaw_core::{CellWidths, ConfigError, EvalError, ScratchLanes, StateBlocks, StateBlocksMut};

use crate::lax_friedrichs::lax_friedrichs;
use crate::sweep::{self, interfaces_needed, InterfaceFlux, SweepConfig, SWEEP_LANES};

/// Nonlinear Lax–Friedrichs flux engine.
///
/// Each [`evaluate`](Self::evaluate) computes, for rows `i = 1..N`,
/// ```text
/// out[i] = -(F(i+1) - F(left(i))) / dx[i]
/// F(k)   = 0.5 * (f⁻_k + f⁺_k - alpha * (q⁺_k - q⁻_k))
/// ```
/// where `left(1) = 0` and `left(i) = i` otherwise. Row 0 is not written.
///
/// # Construction
///
/// ```
/// use blaw_flux::LfFlux;
///
/// let engine = LfFlux::builder()
///     .alpha(1.0)
///     .cell_widths(vec![0.1; 100])
///     .build()
///     .unwrap();
/// assert_eq!(engine.cells(), 100);
/// ```
#[derive(Clone, Debug)]
pub struct LfFlux {
    config: SweepConfig,
    scratch: ScratchLanes,
}

/// Builder for [`LfFlux`].
///
/// Required: `alpha` and `cell_widths`. Optional: `ghost_cells` (default 0)
/// and `scratch_width` to presize scratch for a known state width.
#[derive(Clone, Debug, Default)]
pub struct LfFluxBuilder {
    alpha: Option<f64>,
    dx: Option<Vec<f64>>,
    ghost_cells: usize,
    scratch_width: usize,
}

/// Per-call binding of the four interface fields.
struct SuppliedFlux<'a> {
    alpha: f64,
    q_minus: StateBlocks<'a>,
    q_plus: StateBlocks<'a>,
    f_minus: StateBlocks<'a>,
    f_plus: StateBlocks<'a>,
}

impl InterfaceFlux for SuppliedFlux<'_> {
    fn width(&self) -> usize {
        self.q_minus.width()
    }

    #[inline]
    fn flux_at(&self, k: usize, _minus: &mut [f64], _plus: &mut [f64], out: &mut [f64]) {
        lax_friedrichs(
            self.alpha,
            self.q_minus.block(k),
            self.q_plus.block(k),
            self.f_minus.block(k),
            self.f_plus.block(k),
            out,
        );
    }
}

impl LfFlux {
    /// Create a new builder.
    pub fn builder() -> LfFluxBuilder {
        LfFluxBuilder::default()
    }

    /// Dissipation coefficient.
    pub fn alpha(&self) -> f64 {
        self.config.alpha()
    }

    /// Number of cells the engine is configured for.
    pub fn cells(&self) -> usize {
        self.config.cells()
    }

    /// Sweep settings (alpha, cell widths, ghost band).
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Replace the dissipation coefficient.
    ///
    /// # Errors
    ///
    /// Returns `Err` (and keeps the old value) if `alpha` is negative or
    /// not finite.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), ConfigError> {
        self.config.set_alpha(alpha)?;
        log::debug!("lf_flux: alpha set to {alpha}");
        Ok(())
    }

    /// Replace the cell widths.
    ///
    /// # Errors
    ///
    /// Returns `Err` (and keeps the old grid) if the widths are invalid or
    /// the ghost band no longer fits.
    pub fn set_cell_widths(&mut self, dx: Vec<f64>) -> Result<(), ConfigError> {
        self.config.set_cell_widths(CellWidths::new(dx)?)?;
        log::debug!("lf_flux: regridded to {} cells", self.config.cells());
        Ok(())
    }

    /// Free scratch storage. The next evaluation reallocates it.
    pub fn release_scratch(&mut self) {
        self.scratch.release();
    }

    /// See [`SweepConfig::max_stable_dt`].
    pub fn max_stable_dt(&self) -> Option<f64> {
        self.config.max_stable_dt()
    }

    /// See [`SweepConfig::check_dt`].
    pub fn check_dt(&self, dt: f64) -> bool {
        self.config.check_dt(dt)
    }

    fn bind<'a>(
        &self,
        q_minus: StateBlocks<'a>,
        q_plus: StateBlocks<'a>,
        f_minus: StateBlocks<'a>,
        f_plus: StateBlocks<'a>,
        out: &StateBlocksMut<'_>,
    ) -> Result<SuppliedFlux<'a>, EvalError> {
        let cells = out.count();
        self.config.cell_widths().check_cells(cells)?;
        let needed = interfaces_needed(cells);
        for view in [&q_minus, &q_plus, &f_minus, &f_plus] {
            view.require(out.width(), needed)?;
        }
        Ok(SuppliedFlux {
            alpha: self.config.alpha(),
            q_minus,
            q_plus,
            f_minus,
            f_plus,
        })
    }

    /// Compute the net flux of every cell into `out`.
    ///
    /// `q_minus`/`q_plus` are the states left and right of interfaces
    /// `0..=N`, `f_minus`/`f_plus` the physical fluxes there. `out` has one
    /// row per cell. Row 0 is left untouched unless a ghost band is set.
    ///
    /// # Errors
    ///
    /// Returns `Err` before writing anything if the widths disagree, an
    /// interface field holds fewer than `N + 1` blocks, or `out` does not
    /// have one row per configured cell.
    pub fn evaluate(
        &mut self,
        q_minus: StateBlocks<'_>,
        q_plus: StateBlocks<'_>,
        f_minus: StateBlocks<'_>,
        f_plus: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
    ) -> Result<(), EvalError> {
        let iface = self.bind(q_minus, q_plus, f_minus, f_plus, out)?;
        let width = iface.width();
        if self.scratch.resize(width) {
            log::debug!("lf_flux: scratch sized for width {width}");
        }
        log::trace!("lf_flux: sweeping {} cells, width {width}", out.count());

        sweep::sweep(
            &iface,
            self.config.cell_widths().as_slice(),
            &mut self.scratch,
            out,
        );
        sweep::zero_ghost_band(out, self.config.ghost_cells());
        Ok(())
    }

    /// Parallel [`evaluate`](Self::evaluate) over chunks of `chunk_rows`
    /// rows. Bitwise identical output.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    #[cfg(feature = "parallel")]
    pub fn par_evaluate(
        &self,
        q_minus: StateBlocks<'_>,
        q_plus: StateBlocks<'_>,
        f_minus: StateBlocks<'_>,
        f_plus: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
        chunk_rows: usize,
    ) -> Result<(), EvalError> {
        let iface = self.bind(q_minus, q_plus, f_minus, f_plus, out)?;
        sweep::par_sweep(
            &iface,
            self.config.cell_widths().as_slice(),
            chunk_rows,
            out,
        );
        sweep::zero_ghost_band(out, self.config.ghost_cells());
        Ok(())
    }
}

impl LfFluxBuilder {
    /// Set the dissipation coefficient. Must be finite and >= 0.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the cell widths, one per cell. Each must be finite and > 0.
    pub fn cell_widths(mut self, dx: Vec<f64>) -> Self {
        self.dx = Some(dx);
        self
    }

    /// Number of cells on each side whose net flux is zeroed (default 0).
    pub fn ghost_cells(mut self, k: usize) -> Self {
        self.ghost_cells = k;
        self
    }

    /// Presize scratch for states of width `p` (default: sized on first use).
    pub fn scratch_width(mut self, p: usize) -> Self {
        self.scratch_width = p;
        self
    }

    /// Build the engine, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `alpha` or `cell_widths` is not set
    /// - `alpha` is negative or not finite
    /// - a cell width is not finite and > 0
    /// - `2 * ghost_cells` exceeds the number of cells
    pub fn build(self) -> Result<LfFlux, ConfigError> {
        let alpha = self.alpha.ok_or(ConfigError::Missing { field: "alpha" })?;
        let dx = self.dx.ok_or(ConfigError::Missing {
            field: "cell_widths",
        })?;
        let config = SweepConfig::new(alpha, CellWidths::new(dx)?, self.ghost_cells)?;
        log::debug!(
            "lf_flux: built for {} cells, alpha = {alpha}, ghost cells = {}",
            config.cells(),
            config.ghost_cells()
        );
        Ok(LfFlux {
            config,
            scratch: ScratchLanes::new(SWEEP_LANES, self.scratch_width),
        })
    }
}
