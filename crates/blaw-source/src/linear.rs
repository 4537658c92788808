//! Linear source `S(q) = B q` averaged over each cell by quadrature.
//!
//! States are supplied at [`POINTS`] quadrature points per cell, cell `i`
//! owning blocks `3i, 3i+1, 3i+2`. Every row of the output is written.

use blaw_core::{ConfigError, DenseOperator, EvalError, ScratchLanes, StateBlocks, StateBlocksMut};

use crate::quadrature::{QuadratureRule, POINTS};

/// Scratch lanes: operator output at one point, per-cell accumulator.
const SOURCE_LANES: usize = 2;

/// Quadrature source engine for a constant operator `B`.
///
/// ```text
/// out[i] = 0.5 * Σ_l w_l B q[3i + l]      (GaussLegendre3)
/// ```
///
/// # Construction
///
/// ```
/// use blaw_core::DenseOperator;
/// use blaw_source::{LinearQuad3Source, QuadratureRule};
///
/// let source = LinearQuad3Source::builder()
///     .operator(DenseOperator::diagonal(&[-1.0, -1.0]).unwrap())
///     .rule(QuadratureRule::GaussLegendre3)
///     .build()
///     .unwrap();
/// assert_eq!(source.operator().rows(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LinearQuad3Source {
    operator: DenseOperator,
    rule: QuadratureRule,
    scratch: ScratchLanes,
}

/// Builder for [`LinearQuad3Source`].
///
/// Required: `operator`. Optional: `rule` (default
/// [`QuadratureRule::GaussLegendre3`]).
#[derive(Clone, Debug, Default)]
pub struct LinearQuad3SourceBuilder {
    operator: Option<DenseOperator>,
    rule: QuadratureRule,
}

impl LinearQuad3Source {
    /// Create a new builder.
    pub fn builder() -> LinearQuad3SourceBuilder {
        LinearQuad3SourceBuilder::default()
    }

    /// The source operator `B`.
    pub fn operator(&self) -> &DenseOperator {
        &self.operator
    }

    /// Active quadrature rule.
    pub fn rule(&self) -> QuadratureRule {
        self.rule
    }

    /// Replace the operator and resize scratch to its row count.
    pub fn set_operator(&mut self, operator: DenseOperator) {
        let rows = operator.rows();
        self.operator = operator;
        if self.scratch.resize(rows) {
            log::debug!("linear_quad3_source: scratch resized to {rows}");
        }
    }

    /// Replace the quadrature rule.
    pub fn set_rule(&mut self, rule: QuadratureRule) {
        self.rule = rule;
    }

    /// Free scratch storage. The next evaluation reallocates it.
    pub fn release_scratch(&mut self) {
        self.scratch.release();
    }

    /// Compute the cell-averaged source of every cell into `out`.
    ///
    /// `quad_states` holds at least `3 N` blocks for an `N`-row output.
    ///
    /// # Errors
    ///
    /// Returns `Err` before writing anything if the operator is not
    /// `p x p` for the output width `p`, or `quad_states` has the wrong
    /// width or too few blocks.
    pub fn evaluate(
        &mut self,
        quad_states: StateBlocks<'_>,
        out: &mut StateBlocksMut<'_>,
    ) -> Result<(), EvalError> {
        let width = out.width();
        let cells = out.count();
        self.operator.check_square(width)?;
        quad_states.require(width, POINTS * cells)?;
        if self.scratch.resize(width) {
            log::debug!("linear_quad3_source: scratch sized for width {width}");
        }
        log::trace!(
            "linear_quad3_source: {cells} cells, width {width}, {:?}",
            self.rule
        );

        let (point, acc) = self.scratch.pair();
        for i in 0..cells {
            acc.fill(0.0);
            for l in 0..POINTS {
                self.operator.apply(quad_states.block(POINTS * i + l), point);
                self.rule.fold(acc, point, self.rule.weight(l));
            }
            for (o, a) in out.row_mut(i).iter_mut().zip(acc.iter()) {
                *o = 0.5 * a;
            }
        }
        Ok(())
    }
}

impl LinearQuad3SourceBuilder {
    /// Set the source operator `B` (`p x p`).
    pub fn operator(mut self, operator: DenseOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set the quadrature rule.
    pub fn rule(mut self, rule: QuadratureRule) -> Self {
        self.rule = rule;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no operator is set.
    pub fn build(self) -> Result<LinearQuad3Source, ConfigError> {
        let operator = self.operator.ok_or(ConfigError::Missing { field: "operator" })?;
        log::debug!(
            "linear_quad3_source: built {}x{} operator, {:?}",
            operator.rows(),
            operator.cols(),
            self.rule
        );
        let scratch = ScratchLanes::new(SOURCE_LANES, operator.rows());
        Ok(LinearQuad3Source {
            operator,
            rule: self.rule,
            scratch,
        })
    }
}
