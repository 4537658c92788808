//! The divergence-form cell sweep shared by both flux engines.
//!
//! Given a numerical flux `F_k` at every interface `k`, the sweep writes
//! `-(F_right - F_left) / dx[i]` into row `i` for `i = 1..N`. The running
//! right flux is carried into the next row as its left flux, so each
//! interface is evaluated once. The kernel is evaluated one interface ahead
//! of the row being written:
//!
//! - row 1 differences interfaces 2 and 0,
//! - row `i >= 2` differences interfaces `i + 1` and `i`,
//! - row 0 is never written (see [`SweepConfig::ghost_cells`]).
//!
//! Interface fields therefore hold `N + 1` blocks.

use blaw_core::{check_alpha, CellWidths, ConfigError, ScratchLanes, StateBlocksMut};

/// Scratch lanes a sweep needs: left, right, and two kernel temporaries.
pub const SWEEP_LANES: usize = 4;

/// Numerical flux evaluated at one interface.
///
/// Implemented by the per-call bindings of the nonlinear and linear
/// engines; the sweep only sees interface indices.
pub trait InterfaceFlux {
    /// State width `p`.
    fn width(&self) -> usize;

    /// Write the numerical flux at interface `k` into `out`.
    ///
    /// `minus` and `plus` are scratch lanes of width [`width()`](Self::width)
    /// the implementation may overwrite freely.
    fn flux_at(&self, k: usize, minus: &mut [f64], plus: &mut [f64], out: &mut [f64]);
}

/// Number of interface blocks a sweep over `cells` rows reads.
pub fn interfaces_needed(cells: usize) -> usize {
    match cells {
        0 => 0,
        1 => 1,
        n => n + 1,
    }
}

/// Interface whose flux is the left flux of row `row` (`row >= 1`).
#[cfg(any(feature = "parallel", test))]
#[inline]
pub(crate) fn left_interface(row: usize) -> usize {
    if row == 1 {
        0
    } else {
        row
    }
}

#[inline]
fn write_divergence(row: &mut [f64], left: &[f64], right: &[f64], dx: f64) {
    for ((r, fl), fr) in row.iter_mut().zip(left).zip(right) {
        *r = -(fr - fl) / dx;
    }
}

/// Sequential sweep over all rows of `out`.
///
/// `scratch` must have at least [`SWEEP_LANES`] lanes of width
/// `out.width()`, and `dx` at least `out.count()` entries.
pub fn sweep<I: InterfaceFlux + ?Sized>(
    iface: &I,
    dx: &[f64],
    scratch: &mut ScratchLanes,
    out: &mut StateBlocksMut<'_>,
) {
    let cells = out.count();
    if cells == 0 {
        return;
    }
    let [left, right, minus, plus] = scratch.quad();

    iface.flux_at(0, minus, plus, right);
    for i in 1..cells {
        left.copy_from_slice(right);
        iface.flux_at(i + 1, minus, plus, right);
        write_divergence(out.row_mut(i), left, right, dx[i]);
    }
}

/// Parallel sweep: rows `1..N` split into chunks of `chunk_rows`.
///
/// Each chunk re-evaluates the interface a sequential sweep would carry
/// into its first row, so results are bitwise identical to [`sweep`].
#[cfg(feature = "parallel")]
pub fn par_sweep<I: InterfaceFlux + Sync + ?Sized>(
    iface: &I,
    dx: &[f64],
    chunk_rows: usize,
    out: &mut StateBlocksMut<'_>,
) {
    use rayon::prelude::*;

    let width = out.width();
    let cells = out.count();
    if cells < 2 {
        return;
    }
    let chunk_rows = chunk_rows.max(1);

    out.as_mut_slice()[width..]
        .par_chunks_mut(chunk_rows * width)
        .enumerate()
        .for_each(|(c, chunk)| {
            let first = 1 + c * chunk_rows;
            let mut lanes = ScratchLanes::new(SWEEP_LANES, width);
            let [left, right, minus, plus] = lanes.quad();

            iface.flux_at(left_interface(first), minus, plus, right);
            for (r, row) in chunk.chunks_exact_mut(width).enumerate() {
                let i = first + r;
                left.copy_from_slice(right);
                iface.flux_at(i + 1, minus, plus, right);
                write_divergence(row, left, right, dx[i]);
            }
        });
}

/// Zero rows `0..k` and `N-k..N`.
pub fn zero_ghost_band(out: &mut StateBlocksMut<'_>, k: usize) {
    if k == 0 {
        return;
    }
    let cells = out.count();
    for i in (0..k.min(cells)).chain(cells.saturating_sub(k)..cells) {
        out.row_mut(i).fill(0.0);
    }
}

/// Settings shared by the flux engines: dissipation, grid, ghost band.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    alpha: f64,
    dx: CellWidths,
    ghost_cells: usize,
}

impl SweepConfig {
    /// Validate and bundle the sweep settings.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `alpha` is negative or not finite, or the ghost
    /// band does not fit in the grid.
    pub fn new(alpha: f64, dx: CellWidths, ghost_cells: usize) -> Result<Self, ConfigError> {
        let alpha = check_alpha(alpha)?;
        check_ghost_band(ghost_cells, dx.len())?;
        Ok(Self {
            alpha,
            dx,
            ghost_cells,
        })
    }

    /// Dissipation coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Cell widths.
    pub fn cell_widths(&self) -> &CellWidths {
        &self.dx
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.dx.len()
    }

    /// Rows zeroed on each side after a sweep. With `0`, row 0 is left
    /// exactly as the caller supplied it.
    pub fn ghost_cells(&self) -> usize {
        self.ghost_cells
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) -> Result<(), ConfigError> {
        self.alpha = check_alpha(alpha)?;
        Ok(())
    }

    pub(crate) fn set_cell_widths(&mut self, dx: CellWidths) -> Result<(), ConfigError> {
        check_ghost_band(self.ghost_cells, dx.len())?;
        self.dx = dx;
        Ok(())
    }

    /// Largest step satisfying `alpha * dt < 0.5 * min(dx)`.
    ///
    /// `None` when `alpha` is zero (no constraint).
    pub fn max_stable_dt(&self) -> Option<f64> {
        if self.alpha > 0.0 {
            Some(0.5 * self.dx.min() / self.alpha)
        } else {
            None
        }
    }

    /// Whether `dt` is finite, positive and satisfies the CFL bound. Logs a
    /// warning if not.
    pub fn check_dt(&self, dt: f64) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("time step must be finite and > 0, got {dt}");
            return false;
        }
        match self.max_stable_dt() {
            Some(max) if dt >= max => {
                log::warn!(
                    "cfl condition not satisfied (alpha dt = {:.4e} >= {:.4e} = 0.5 dx)",
                    self.alpha * dt,
                    0.5 * self.dx.min()
                );
                false
            }
            _ => true,
        }
    }
}

fn check_ghost_band(ghost_cells: usize, cells: usize) -> Result<(), ConfigError> {
    if ghost_cells.saturating_mul(2) > cells {
        return Err(ConfigError::GhostBandTooWide { ghost_cells, cells });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interface flux equal to the interface index, for checking indexing.
    struct IndexFlux;

    impl InterfaceFlux for IndexFlux {
        fn width(&self) -> usize {
            1
        }

        fn flux_at(&self, k: usize, _minus: &mut [f64], _plus: &mut [f64], out: &mut [f64]) {
            out[0] = k as f64;
        }
    }

    fn run(cells: usize) -> Vec<f64> {
        let mut data = vec![f64::NAN; cells];
        let mut out = StateBlocksMut::new("f", &mut data, 1).unwrap();
        let dx = vec![1.0; cells];
        let mut scratch = ScratchLanes::new(SWEEP_LANES, 1);
        sweep(&IndexFlux, &dx, &mut scratch, &mut out);
        data
    }

    #[test]
    fn interface_offsets() {
        let f = run(5);
        assert!(f[0].is_nan(), "row 0 must not be written");
        // row 1: -(F2 - F0)
        assert_eq!(f[1], -2.0);
        // rows >= 2: -(F_{i+1} - F_i)
        assert_eq!(&f[2..], &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn single_and_empty_domains_write_nothing() {
        assert!(run(1)[0].is_nan());
        assert!(run(0).is_empty());
    }

    #[test]
    fn interfaces_needed_covers_reads() {
        assert_eq!(interfaces_needed(0), 0);
        assert_eq!(interfaces_needed(1), 1);
        assert_eq!(interfaces_needed(3), 4);
    }

    #[test]
    fn left_interface_matches_carry() {
        assert_eq!(left_interface(1), 0);
        assert_eq!(left_interface(2), 2);
        assert_eq!(left_interface(7), 7);
    }

    #[test]
    fn ghost_band_zeroes_edges_only() {
        let mut data = vec![5.0; 6];
        let mut out = StateBlocksMut::new("f", &mut data, 1).unwrap();
        zero_ghost_band(&mut out, 2);
        assert_eq!(data, [0.0, 0.0, 5.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn sweep_config_validation() {
        let dx = CellWidths::uniform(4, 1.0).unwrap();
        assert!(SweepConfig::new(-1.0, dx.clone(), 0).is_err());
        assert!(SweepConfig::new(f64::NAN, dx.clone(), 0).is_err());
        assert_eq!(
            SweepConfig::new(1.0, dx.clone(), 3),
            Err(ConfigError::GhostBandTooWide {
                ghost_cells: 3,
                cells: 4
            })
        );
        assert!(SweepConfig::new(1.0, dx, 2).is_ok());
    }

    #[test]
    fn cfl_bound() {
        let dx = CellWidths::new(vec![0.5, 1.0]).unwrap();
        let cfg = SweepConfig::new(2.0, dx.clone(), 0).unwrap();
        // 0.5 * 0.5 / 2
        assert_eq!(cfg.max_stable_dt(), Some(0.125));
        assert!(cfg.check_dt(0.1));
        assert!(!cfg.check_dt(0.125));

        let still = SweepConfig::new(0.0, dx, 0).unwrap();
        assert_eq!(still.max_stable_dt(), None);
        assert!(still.check_dt(1e9));
        assert!(!still.check_dt(f64::NAN));
        assert!(!still.check_dt(0.0));
    }

    #[test]
    fn cfl_rejects_non_positive_and_non_finite_steps() {
        let cfg = SweepConfig::new(2.0, CellWidths::uniform(4, 1.0).unwrap(), 0).unwrap();
        assert_eq!(cfg.max_stable_dt(), Some(0.25));
        assert!(cfg.check_dt(0.2));
        assert!(!cfg.check_dt(f64::NAN));
        assert!(!cfg.check_dt(-1.0));
        assert!(!cfg.check_dt(0.0));
        assert!(!cfg.check_dt(f64::INFINITY));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential_offsets() {
        for chunk in [1, 2, 3, 64] {
            let mut data = vec![f64::NAN; 9];
            let mut out = StateBlocksMut::new("f", &mut data, 1).unwrap();
            par_sweep(&IndexFlux, &[1.0; 9], chunk, &mut out);
            assert!(data[0].is_nan());
            assert_eq!(data[1..], run(9)[1..], "chunk_rows = {chunk}");
        }
    }
}
