//! Lax–Friedrichs net flux for linear systems `q_t + A q_x = 0`.
//!
//! Same sweep as [`LfFlux`](crate::LfFlux), but the physical flux on each
//! side of an interface is computed internally as `A·q` into engine-owned
//! scratch, so the caller only supplies reconstructed states.

use blaw_core::{
    CellWidths, ConfigError, DenseOperator, EvalError, ScratchLanes, StateBlocks, StateBlocksMut,
};

use crate::lax_friedrichs::lax_friedrichs;
use crate::sweep::{self, interfaces_needed, InterfaceFlux, SweepConfig, SWEEP_LANES};

/// Linear Lax–Friedrichs flux engine.
///
/// Interface flux:
/// ```text
/// F(k) = 0.5 * (A q_l[k] + A q_r[k] - alpha * (q_r[k] - q_l[k]))
/// ```
/// then the divergence sweep of [`LfFlux`](crate::LfFlux). The operator
/// must be `p x p` for states of width `p`.
///
/// # Construction
///
/// ```
/// use blaw_core::DenseOperator;
/// use blaw_flux::LinearLfFlux;
///
/// let a = DenseOperator::diagonal(&[2.0, -1.0, -2.0]).unwrap();
/// let engine = LinearLfFlux::builder()
///     .operator(a)
///     .alpha(2.0)
///     .cell_widths(vec![0.5; 1600])
///     .build()
///     .unwrap();
/// assert_eq!(engine.operator().rows(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct LinearLfFlux {
    operator: DenseOperator,
    config: SweepConfig,
    scratch: ScratchLanes,
}

/// Builder for [`LinearLfFlux`].
///
/// Required: `operator`, `alpha`, `cell_widths`. Optional: `ghost_cells`.
#[derive(Clone, Debug, Default)]
pub struct LinearLfFluxBuilder {
    operator: Option<DenseOperator>,
    alpha: Option<f64>,
    dx: Option<Vec<f64>>,
    ghost_cells: usize,
}

/// Per-call binding of the operator and the two state fields.
struct OperatorFlux<'a> {
    alpha: f64,
    operator: &'a DenseOperator,
    q_left: StateBlocks<'a>,
    q_right: StateBlocks<'a>,
}

impl InterfaceFlux for OperatorFlux<'_> {
    fn width(&self) -> usize {
        self.q_left.width()
    }

    #[inline]
    fn flux_at(&self, k: usize, minus: &mut [f64], plus: &mut [f64], out: &mut [f64]) {
        let ql = self.q_left.block(k);
        let qr = self.q_right.block(k);
        self.operator.apply(ql, minus);
        self.operator.apply(qr, plus);
        lax_friedrichs(self.alpha, ql, qr, minus, plus, out);
    }
}

impl LinearLfFlux {
    /// Create a new builder.
    pub fn builder() -> LinearLfFluxBuilder {
        LinearLfFluxBuilder::default()
    }

    /// The flux operator `A`.
    pub fn operator(&self) -> &DenseOperator {
        &self.operator
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

    /// Physical flux `A·q` of a single state.
    ///
    /// # Errors
    ///
    /// Returns `Err` without writing if `q` does not hold
    /// `operator().cols()` values or `out` does not hold
    /// `operator().rows()`.
    pub fn physical_flux(&self, q: &[f64], out: &mut [f64]) -> Result<(), ConfigError> {
        let (rows, cols) = (self.operator.rows(), self.operator.cols());
        if q.len() != cols || out.len() != rows {
            return Err(ConfigError::DimensionMismatch {
                rows,
                cols,
                width: if q.len() != cols { q.len() } else { out.len() },
            });
        }
        self.operator.apply(q, out);
        Ok(())
    }

    /// Replace the operator and resize scratch to its row count.
    pub fn set_operator(&mut self, operator: DenseOperator) {
        let rows = operator.rows();
        self.operator = operator;
        if self.scratch.resize(rows) {
            log::debug!("linear_lf_flux: scratch resized to {rows}");
        }
    }

    /// Replace the dissipation coefficient.
    ///
    /// # Errors
    ///
    /// Returns `Err` (and keeps the old value) if `alpha` is negative or
    /// not finite.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), ConfigError> {
        self.config.set_alpha(alpha)?;
        log::debug!("linear_lf_flux: alpha set to {alpha}");
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
        log::debug!("linear_lf_flux: regridded to {} cells", self.config.cells());
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
        operator: &'a DenseOperator,
        config: &SweepConfig,
        q_left: StateBlocks<'a>,
        q_right: StateBlocks<'a>,
        out: &StateBlocksMut<'_>,
    ) -> Result<OperatorFlux<'a>, EvalError> {
        let cells = out.count();
        let width = out.width();
        operator.check_square(width)?;
        config.cell_widths().check_cells(cells)?;
        let needed = interfaces_needed(cells);
        q_left.require(width, needed)?;
        q_right.require(width, needed)?;
        Ok(OperatorFlux {
            alpha: config.alpha(),
            operator,
            q_left,
            q_right,
        })
    }

    /// Compute the net flux of every cell into `out`.
    ///
    /// `q_left`/`q_right` are the states left and right of interfaces
    /// `0..=N`. Row 0 is left untouched unless a ghost band is set.
    ///
    /// # Errors
    ///
    /// Returns `Err` before writing anything if the operator is not
    /// `p x p`, the state fields are short or of the wrong width, or `out`
    /// does not have one row per configured cell.
    pub fn evaluate(
        &mut self,
        q_left: StateBlocks<'_>,
        q_right: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
    ) -> Result<(), EvalError> {
        let iface = Self::bind(&self.operator, &self.config, q_left, q_right, out)?;
        let width = iface.width();
        if self.scratch.resize(width) {
            log::debug!("linear_lf_flux: scratch sized for width {width}");
        }
        log::trace!("linear_lf_flux: sweeping {} cells, width {width}", out.count());

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
        q_left: StateBlocks<'_>,
        q_right: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
        chunk_rows: usize,
    ) -> Result<(), EvalError> {
        let iface = Self::bind(&self.operator, &self.config, q_left, q_right, out)?;
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

impl LinearLfFluxBuilder {
    /// Set the flux operator `A` (`p x p`).
    pub fn operator(mut self, operator: DenseOperator) -> Self {
        self.operator = Some(operator);
        self
    }

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

    /// Build the engine, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `operator`, `alpha` or `cell_widths` is not set
    /// - `alpha` is negative or not finite
    /// - a cell width is not finite and > 0
    /// - `2 * ghost_cells` exceeds the number of cells
    pub fn build(self) -> Result<LinearLfFlux, ConfigError> {
        let operator = self.operator.ok_or(ConfigError::Missing { field: "operator" })?;
        let alpha = self.alpha.ok_or(ConfigError::Missing { field: "alpha" })?;
        let dx = self.dx.ok_or(ConfigError::Missing {
            field: "cell_widths",
        })?;
        let config = SweepConfig::new(alpha, CellWidths::new(dx)?, self.ghost_cells)?;
        log::debug!(
            "linear_lf_flux: built {}x{} operator over {} cells, alpha = {alpha}",
            operator.rows(),
            operator.cols(),
            config.cells()
        );
        let scratch = ScratchLanes::new(SWEEP_LANES, operator.rows());
        Ok(LinearLfFlux {
            operator,
            config,
            scratch,
        })
    }
}
