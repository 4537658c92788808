//! Three-point quadrature rules.

/// Quadrature points per cell.
pub const POINTS: usize = 3;

/// How the three point samples of a cell are combined.
///
/// Both rules scale the result by `0.5` (the reference interval has
/// length 2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuadratureRule {
    /// `0.5 * (5/9 s0 + 8/9 s1 + 5/9 s2)`.
    #[default]
    GaussLegendre3,
    /// `0.5 * 5/9 * s2`: each point overwrites the accumulator and only the
    /// last survives. Reproduces results produced by earlier solvers.
    LegacyLastPoint,
}

impl QuadratureRule {
    /// Gauss–Legendre weights on `[-1, 1]`, shared by both rules.
    pub const WEIGHTS: [f64; POINTS] = [5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0];

    /// Weight of point `l`.
    pub fn weight(self, l: usize) -> f64 {
        Self::WEIGHTS[l]
    }

    /// Fold the weighted sample `w * s` into `acc`.
    #[inline]
    pub(crate) fn fold(self, acc: &mut [f64], sample: &[f64], w: f64) {
        match self {
            Self::GaussLegendre3 => {
                for (a, s) in acc.iter_mut().zip(sample) {
                    *a += w * s;
                }
            }
            Self::LegacyLastPoint => {
                for (a, s) in acc.iter_mut().zip(sample) {
                    *a = w * s;
                }
            }
        }
    }
}
