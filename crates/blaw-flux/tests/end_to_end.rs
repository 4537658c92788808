//! End-to-end checks of both flux engines against hand-computed values and
//! the reference implementation in `blaw-test-utils`.

use blaw_core::{ConfigError, DenseOperator, EvalError, InputError, StateBlocks, StateBlocksMut};
use blaw_flux::{interfaces_needed, LfFlux, LinearLfFlux};
use blaw_test_utils::{
    assert_close, constant_field, map_blocks, random_field, random_operator, reference_net_flux,
    seeded_rng,
};

fn view<'a>(name: &'static str, data: &'a [f64], width: usize) -> StateBlocks<'a> {
    StateBlocks::new(name, data, width).unwrap()
}

#[test]
fn identity_flux_three_cells() {
    // f = q, alpha = 1: F(k) = q⁻_k, so F = [0, 1, 2, 3].
    let q_minus = [0.0, 1.0, 2.0, 3.0];
    let q_plus = [1.0, 2.0, 3.0, 4.0];
    let mut engine = LfFlux::builder()
        .alpha(1.0)
        .cell_widths(vec![1.0; 3])
        .build()
        .unwrap();

    let mut data = [7.0; 3];
    let mut out = StateBlocksMut::new("out", &mut data, 1).unwrap();
    engine
        .evaluate(
            view("q_minus", &q_minus, 1),
            view("q_plus", &q_plus, 1),
            view("f_minus", &q_minus, 1),
            view("f_plus", &q_plus, 1),
            &mut out,
        )
        .unwrap();

    // row 1: -(F2 - F0), row 2: -(F3 - F2); row 0 untouched.
    assert_eq!(data, [7.0, -2.0, -1.0]);
}

#[test]
fn three_interfaces_for_three_cells_is_rejected() {
    let q = [0.0, 1.0, 2.0];
    let mut engine = LfFlux::builder()
        .alpha(1.0)
        .cell_widths(vec![1.0; 3])
        .build()
        .unwrap();
    let mut data = [7.0; 3];
    let mut out = StateBlocksMut::new("out", &mut data, 1).unwrap();

    let err = engine
        .evaluate(
            view("q_minus", &q, 1),
            view("q_plus", &q, 1),
            view("f_minus", &q, 1),
            view("f_plus", &q, 1),
            &mut out,
        )
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::Input(InputError::TooFewBlocks {
            name: "q_minus",
            needed: interfaces_needed(3),
            found: 3,
        })
    );
    assert_eq!(data, [7.0; 3]);
}

#[test]
fn constant_state_has_zero_divergence() {
    let state = [1.5, -0.25];
    let q = constant_field(4, &state);
    let f = constant_field(4, &[3.0, 0.5]);
    let mut engine = LfFlux::builder()
        .alpha(0.7)
        .cell_widths(vec![0.1, 0.2, 0.3])
        .build()
        .unwrap();

    let mut data = [9.0; 6];
    let mut out = StateBlocksMut::new("out", &mut data, 2).unwrap();
    engine
        .evaluate(
            view("q_minus", &q, 2),
            view("q_plus", &q, 2),
            view("f_minus", &f, 2),
            view("f_plus", &f, 2),
            &mut out,
        )
        .unwrap();
    assert_eq!(&data[..2], &[9.0, 9.0]);
    assert_eq!(&data[2..], &[0.0; 4]);
}

#[test]
fn nonlinear_matches_reference_on_burgers() {
    let mut rng = seeded_rng(11);
    let cells = 40;
    let dx: Vec<f64> = random_field(&mut rng, cells, 1, 0.05, 0.2);
    let q_minus = random_field(&mut rng, cells + 1, 1, -2.0, 2.0);
    let q_plus = random_field(&mut rng, cells + 1, 1, -2.0, 2.0);
    let burgers = |q: &[f64], f: &mut [f64]| f[0] = 0.5 * q[0] * q[0];
    let f_minus = map_blocks(&q_minus, 1, burgers);
    let f_plus = map_blocks(&q_plus, 1, burgers);
    let alpha = 2.0;

    let mut engine = LfFlux::builder()
        .alpha(alpha)
        .cell_widths(dx.clone())
        .build()
        .unwrap();
    let mut data = vec![0.0; cells];
    let mut out = StateBlocksMut::new("out", &mut data, 1).unwrap();
    engine
        .evaluate(
            view("q_minus", &q_minus, 1),
            view("q_plus", &q_plus, 1),
            view("f_minus", &f_minus, 1),
            view("f_plus", &f_plus, 1),
            &mut out,
        )
        .unwrap();

    let expected = reference_net_flux(alpha, &q_minus, &q_plus, &f_minus, &f_plus, &dx, 1);
    assert_close(&data, &expected, 1e-12);
}

#[test]
fn linear_engine_agrees_with_supplied_flux() {
    let mut rng = seeded_rng(3);
    let (cells, p) = (25, 3);
    let a = random_operator(&mut rng, p, 1.0);
    let q_left = random_field(&mut rng, cells + 1, p, -1.0, 1.0);
    let q_right = random_field(&mut rng, cells + 1, p, -1.0, 1.0);
    let dx = vec![0.04; cells];
    let alpha = 1.3;

    let mut linear = LinearLfFlux::builder()
        .operator(a.clone())
        .alpha(alpha)
        .cell_widths(dx.clone())
        .build()
        .unwrap();
    let mut lin = vec![0.0; cells * p];
    linear
        .evaluate(
            view("q_left", &q_left, p),
            view("q_right", &q_right, p),
            &mut StateBlocksMut::new("out", &mut lin, p).unwrap(),
        )
        .unwrap();

    let f_left = map_blocks(&q_left, p, |q, f| a.apply(q, f));
    let f_right = map_blocks(&q_right, p, |q, f| a.apply(q, f));
    let mut nonlinear = LfFlux::builder()
        .alpha(alpha)
        .cell_widths(dx.clone())
        .build()
        .unwrap();
    let mut nl = vec![0.0; cells * p];
    nonlinear
        .evaluate(
            view("q_minus", &q_left, p),
            view("q_plus", &q_right, p),
            view("f_minus", &f_left, p),
            view("f_plus", &f_right, p),
            &mut StateBlocksMut::new("out", &mut nl, p).unwrap(),
        )
        .unwrap();

    // Same arithmetic on both paths.
    assert_eq!(lin[p..], nl[p..]);
    let expected = reference_net_flux(alpha, &q_left, &q_right, &f_left, &f_right, &dx, p);
    assert_close(&lin, &expected, 1e-12);
}

#[test]
fn linear_operator_width_must_match_states() {
    let mut engine = LinearLfFlux::builder()
        .operator(DenseOperator::identity(2).unwrap())
        .alpha(1.0)
        .cell_widths(vec![1.0; 2])
        .build()
        .unwrap();
    let q = [0.0; 9];
    let mut data = [4.0; 6];
    let err = engine
        .evaluate(
            view("q_left", &q, 3),
            view("q_right", &q, 3),
            &mut StateBlocksMut::new("out", &mut data, 3).unwrap(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::Config(ConfigError::DimensionMismatch {
            rows: 2,
            cols: 2,
            width: 3,
        })
    );
    assert_eq!(data, [4.0; 6]);
}

#[test]
fn engines_are_reusable_across_calls() {
    let mut engine = LinearLfFlux::builder()
        .operator(DenseOperator::diagonal(&[1.0]).unwrap())
        .alpha(1.0)
        .cell_widths(vec![1.0; 3])
        .build()
        .unwrap();
    let ql = [0.0, 1.0, 2.0, 3.0];
    let qr = [1.0, 2.0, 3.0, 4.0];

    let mut first = [0.0; 3];
    let mut second = [0.0; 3];
    for data in [&mut first, &mut second] {
        engine
            .evaluate(
                view("q_left", &ql, 1),
                view("q_right", &qr, 1),
                &mut StateBlocksMut::new("out", data, 1).unwrap(),
            )
            .unwrap();
    }
    assert_eq!(first, second);
    assert_eq!(&first[1..], &[-2.0, -1.0]);
}

#[test]
fn ghost_band_only_touches_edge_rows() {
    let mut rng = seeded_rng(17);
    let (cells, p, k) = (10, 2, 3);
    let a = random_operator(&mut rng, p, 1.0);
    let ql = random_field(&mut rng, cells + 1, p, -1.0, 1.0);
    let qr = random_field(&mut rng, cells + 1, p, -1.0, 1.0);

    let mut results = Vec::new();
    for ghost_cells in [0, k] {
        let mut engine = LinearLfFlux::builder()
            .operator(a.clone())
            .alpha(1.0)
            .cell_widths(vec![0.1; cells])
            .ghost_cells(ghost_cells)
            .build()
            .unwrap();
        let mut data = vec![5.0; cells * p];
        engine
            .evaluate(
                view("q_left", &ql, p),
                view("q_right", &qr, p),
                &mut StateBlocksMut::new("out", &mut data, p).unwrap(),
            )
            .unwrap();
        results.push(data);
    }

    let (plain, banded) = (&results[0], &results[1]);
    assert_eq!(banded[..k * p], vec![0.0; k * p][..]);
    assert_eq!(banded[(cells - k) * p..], vec![0.0; k * p][..]);
    assert_eq!(banded[k * p..(cells - k) * p], plain[k * p..(cells - k) * p]);
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;

    #[test]
    fn par_evaluate_is_bitwise_identical() {
        let mut rng = seeded_rng(99);
        let (cells, p) = (1000, 2);
        let a = random_operator(&mut rng, p, 2.0);
        let ql = random_field(&mut rng, cells + 1, p, -1.0, 1.0);
        let qr = random_field(&mut rng, cells + 1, p, -1.0, 1.0);
        let dx = random_field(&mut rng, cells, 1, 0.01, 0.02);
        let mut engine = LinearLfFlux::builder()
            .operator(a)
            .alpha(2.5)
            .cell_widths(dx)
            .build()
            .unwrap();

        let mut seq = vec![0.0; cells * p];
        engine
            .evaluate(
                view("q_left", &ql, p),
                view("q_right", &qr, p),
                &mut StateBlocksMut::new("out", &mut seq, p).unwrap(),
            )
            .unwrap();

        for chunk_rows in [1, 7, 128, blaw_flux::DEFAULT_CHUNK_ROWS] {
            let mut par = vec![0.0; cells * p];
            engine
                .par_evaluate(
                    view("q_left", &ql, p),
                    view("q_right", &qr, p),
                    &mut StateBlocksMut::new("out", &mut par, p).unwrap(),
                    chunk_rows,
                )
                .unwrap();
            assert_eq!(par, seq, "chunk_rows = {chunk_rows}");
        }
    }
}
