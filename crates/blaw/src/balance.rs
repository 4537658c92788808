//! Semi-discrete right-hand side of `q_t + A q_x = B q`.

use blaw_core::{ConfigError, DenseOperator, EvalError, StateBlocks, StateBlocksMut};
use blaw_flux::LinearLfFlux;
use blaw_source::{LinearQuad3Source, QuadratureRule};

/// Linear flux and source engines over one grid.
///
/// [`rhs`](Self::rhs) writes `net flux + cell-averaged source` into rows
/// `1..N`, skipping any ghost band. Row 0 is left as the caller supplied
/// it, like the flux engine does. No time stepping happens here: pair the
/// result with [`max_stable_dt`](Self::max_stable_dt) in the caller's
/// integrator.
///
/// ```
/// use blaw::prelude::*;
///
/// let mut law = LinearBalanceLaw::builder()
///     .flux_operator(DenseOperator::diagonal(&[1.0]).unwrap())
///     .source_operator(DenseOperator::diagonal(&[-1.0]).unwrap())
///     .alpha(1.0)
///     .cell_widths(vec![0.5; 2])
///     .build()
///     .unwrap();
/// assert_eq!(law.max_stable_dt(), Some(0.25));
///
/// let q = [1.0; 3];
/// let qq = [1.0; 6];
/// let mut out = [0.0; 2];
/// law.rhs(
///     StateBlocks::new("q_left", &q, 1).unwrap(),
///     StateBlocks::new("q_right", &q, 1).unwrap(),
///     StateBlocks::new("quad_states", &qq, 1).unwrap(),
///     &mut StateBlocksMut::new("out", &mut out, 1).unwrap(),
/// )
/// .unwrap();
/// // Uniform state: no net flux, source is B q.
/// assert!((out[1] + 1.0).abs() < 1e-14);
/// ```
#[derive(Clone, Debug)]
pub struct LinearBalanceLaw {
    flux: LinearLfFlux,
    source: LinearQuad3Source,
    source_buf: Vec<f64>,
}

/// Builder for [`LinearBalanceLaw`].
///
/// Required: `flux_operator`, `source_operator`, `alpha`, `cell_widths`.
/// Optional: `ghost_cells` (default 0) and `rule` (default
/// [`QuadratureRule::GaussLegendre3`]).
#[derive(Clone, Debug, Default)]
pub struct LinearBalanceLawBuilder {
    flux_operator: Option<DenseOperator>,
    source_operator: Option<DenseOperator>,
    alpha: Option<f64>,
    dx: Option<Vec<f64>>,
    ghost_cells: usize,
    rule: QuadratureRule,
}

impl LinearBalanceLaw {
    /// Create a new builder.
    pub fn builder() -> LinearBalanceLawBuilder {
        LinearBalanceLawBuilder::default()
    }

    /// The flux engine.
    pub fn flux(&self) -> &LinearLfFlux {
        &self.flux
    }

    /// The flux engine, for reconfiguration.
    pub fn flux_mut(&mut self) -> &mut LinearLfFlux {
        &mut self.flux
    }

    /// The source engine.
    pub fn source(&self) -> &LinearQuad3Source {
        &self.source
    }

    /// The source engine, for reconfiguration.
    pub fn source_mut(&mut self) -> &mut LinearQuad3Source {
        &mut self.source
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.flux.cells()
    }

    /// Largest stable step of the flux discretization.
    pub fn max_stable_dt(&self) -> Option<f64> {
        self.flux.max_stable_dt()
    }

    /// Free scratch held by both engines and the source buffer.
    pub fn release_scratch(&mut self) {
        self.flux.release_scratch();
        self.source.release_scratch();
        self.source_buf = Vec::new();
    }

    /// Evaluate `dq/dt` for every interior cell into `out`.
    ///
    /// `q_left`/`q_right` hold `N + 1` interface states, `quad_states`
    /// `3 N` quadrature-point states.
    ///
    /// # Errors
    ///
    /// Any error of [`LinearLfFlux::evaluate`] or
    /// [`LinearQuad3Source::evaluate`]. `out` is not modified on error.
    pub fn rhs(
        &mut self,
        q_left: StateBlocks<'_>,
        q_right: StateBlocks<'_>,
        quad_states: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
    ) -> Result<(), EvalError> {
        let width = out.width();
        let cells = out.count();

        // Source first, into owned storage, so a rejected call leaves `out`
        // alone.
        if self.source_buf.len() != cells * width {
            log::debug!("linear_balance_law: source buffer sized for {cells}x{width}");
            self.source_buf.clear();
            self.source_buf.resize(cells * width, 0.0);
        }
        let mut averaged = StateBlocksMut::new("source", &mut self.source_buf, width)?;
        self.source.evaluate(quad_states, &mut averaged)?;

        self.flux.evaluate(q_left, q_right, out)?;

        let k = self.flux.config().ghost_cells();
        for i in k.max(1)..cells - k {
            for (o, s) in out.row_mut(i).iter_mut().zip(averaged.row(i)) {
                *o += s;
            }
        }
        Ok(())
    }
}

impl LinearBalanceLawBuilder {
    /// Set the flux operator `A` (`p x p`).
    pub fn flux_operator(mut self, operator: DenseOperator) -> Self {
        self.flux_operator = Some(operator);
        self
    }

    /// Set the source operator `B` (`p x p`).
    pub fn source_operator(mut self, operator: DenseOperator) -> Self {
        self.source_operator = Some(operator);
        self
    }

    /// Set the dissipation coefficient. Must be finite and >= 0.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the cell widths, one per cell.
    pub fn cell_widths(mut self, dx: Vec<f64>) -> Self {
        self.dx = Some(dx);
        self
    }

    /// Rows on each side left at zero (default 0).
    pub fn ghost_cells(mut self, k: usize) -> Self {
        self.ghost_cells = k;
        self
    }

    /// Source quadrature rule.
    pub fn rule(mut self, rule: QuadratureRule) -> Self {
        self.rule = rule;
        self
    }

    /// Build both engines.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a required field is missing, either engine rejects
    /// its configuration, or `A` and `B` are not square of the same size.
    pub fn build(self) -> Result<LinearBalanceLaw, ConfigError> {
        let a = self.flux_operator.ok_or(ConfigError::Missing {
            field: "flux_operator",
        })?;
        let b = self.source_operator.ok_or(ConfigError::Missing {
            field: "source_operator",
        })?;
        let width = a.rows();
        a.check_square(width)?;
        b.check_square(width)?;

        let mut flux = LinearLfFlux::builder().operator(a).ghost_cells(self.ghost_cells);
        if let Some(alpha) = self.alpha {
            flux = flux.alpha(alpha);
        }
        if let Some(dx) = self.dx {
            flux = flux.cell_widths(dx);
        }
        let flux = flux.build()?;
        let source = LinearQuad3Source::builder()
            .operator(b)
            .rule(self.rule)
            .build()?;

        let source_buf = vec![0.0; flux.cells() * width];
        Ok(LinearBalanceLaw {
            flux,
            source,
            source_buf,
        })
    }
}
