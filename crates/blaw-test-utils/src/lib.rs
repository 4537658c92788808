//! Test fixtures and reference implementations for Blaw development.
//!
//! Seeded random operators and fields for reproducible tests and
//! benchmarks, plus deliberately naive reference computations the engines
//! are checked against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use blaw_core::DenseOperator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for fixtures.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `n x n` operator with entries uniform in `[-scale, scale)`.
pub fn random_operator(rng: &mut ChaCha8Rng, n: usize, scale: f64) -> DenseOperator {
    let data = (0..n * n).map(|_| rng.gen_range(-scale..scale)).collect();
    DenseOperator::from_row_major(n, n, data).expect("n must be > 0")
}

/// `blocks` state vectors of `width` values uniform in `[lo, hi)`.
pub fn random_field(rng: &mut ChaCha8Rng, blocks: usize, width: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..blocks * width).map(|_| rng.gen_range(lo..hi)).collect()
}

/// `blocks` copies of `state`.
pub fn constant_field(blocks: usize, state: &[f64]) -> Vec<f64> {
    state.repeat(blocks)
}

/// Apply `flux` to every block of `q`.
pub fn map_blocks(q: &[f64], width: usize, mut flux: impl FnMut(&[f64], &mut [f64])) -> Vec<f64> {
    let mut out = vec![0.0; q.len()];
    for (qb, ob) in q.chunks_exact(width).zip(out.chunks_exact_mut(width)) {
        flux(qb, ob);
    }
    out
}

/// Row-by-row mat-vec with explicit indexing.
pub fn reference_matvec(op: &DenseOperator, q: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; op.rows()];
    for i in 0..op.rows() {
        for j in 0..op.cols() {
            out[i] += op.get(i, j) * q[j];
        }
    }
    out
}

/// Net flux computed the long way: every interface flux first, then the
/// divergence for rows `1..N`. Row 0 is `NaN`.
#[allow(clippy::too_many_arguments)]
pub fn reference_net_flux(
    alpha: f64,
    q_minus: &[f64],
    q_plus: &[f64],
    f_minus: &[f64],
    f_plus: &[f64],
    dx: &[f64],
    width: usize,
) -> Vec<f64> {
    let cells = dx.len();
    let interfaces = q_minus.len() / width;
    let mut flux = vec![0.0; interfaces * width];
    for k in 0..interfaces {
        for j in 0..width {
            let at = k * width + j;
            flux[at] = 0.5 * (f_minus[at] + f_plus[at] - alpha * (q_plus[at] - q_minus[at]));
        }
    }

    let mut out = vec![f64::NAN; cells * width];
    for i in 1..cells {
        let left = if i == 1 { 0 } else { i };
        for j in 0..width {
            out[i * width + j] = -(flux[(i + 1) * width + j] - flux[left * width + j]) / dx[i];
        }
    }
    out
}

/// Three-point source the long way, for both weightings.
///
/// With `accumulate` the Gauss–Legendre weights `(5/9, 8/9, 5/9)` are
/// summed; without it only the last point survives, weighted `5/9`.
pub fn reference_quad3_source(op: &DenseOperator, qq: &[f64], width: usize, accumulate: bool) -> Vec<f64> {
    let cells = qq.len() / (3 * width);
    let weights = [5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0];
    let mut out = vec![0.0; cells * width];
    for i in 0..cells {
        let mut g = vec![0.0; width];
        for (l, w) in weights.iter().enumerate() {
            let start = (3 * i + l) * width;
            let s = reference_matvec(op, &qq[start..start + width]);
            for j in 0..width {
                if accumulate {
                    g[j] += w * s[j];
                } else {
                    g[j] = 5.0 / 9.0 * s[j];
                }
            }
        }
        for j in 0..width {
            out[i * width + j] = 0.5 * g[j];
        }
    }
    out
}

/// Assert two slices agree to a relative tolerance, ignoring positions
/// where `expected` is `NaN`.
pub fn assert_close(actual: &[f64], expected: &[f64], rel: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            continue;
        }
        let tol = rel * (1.0 + e.abs());
        assert!((a - e).abs() <= tol, "index {i}: got {a}, expected {e}");
    }
}
