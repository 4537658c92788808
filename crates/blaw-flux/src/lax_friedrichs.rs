//! Lax–Friedrichs numerical flux at a single interface.

/// Scalar-dissipation Lax–Friedrichs flux.
///
/// ```text
/// out[j] = 0.5 * (f_minus[j] + f_plus[j] - alpha * (q_plus[j] - q_minus[j]))
/// ```
///
/// `q_minus`/`f_minus` are the state and physical flux on the left of the
/// interface, `q_plus`/`f_plus` on the right. All slices hold at least
/// `out.len()` values. When the two sides agree the result is the common
/// flux exactly.
///
/// ```
/// use blaw_flux::lax_friedrichs;
///
/// let mut f = [0.0];
/// lax_friedrichs(1.0, &[0.0], &[1.0], &[0.0], &[1.0], &mut f);
/// assert_eq!(f, [0.0]);
/// ```
#[inline]
pub fn lax_friedrichs(
    alpha: f64,
    q_minus: &[f64],
    q_plus: &[f64],
    f_minus: &[f64],
    f_plus: &[f64],
    out: &mut [f64],
) {
    for (j, o) in out.iter_mut().enumerate() {
        *o = 0.5 * (f_minus[j] + f_plus[j] - alpha * (q_plus[j] - q_minus[j]));
    }
}
