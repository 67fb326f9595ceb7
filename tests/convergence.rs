//! Convergence tests for the stable schemes
//!
//! These tests verify that the schemes exhibit the expected convergence
//! rates when refining the grid at fixed Courant number.
//! When dx → dx/2 the max-norm error at the final time should drop by about
//! 2 for first-order schemes and about 4 for second-order ones.

use advect_rs::physics::{ShapeParameters, WaveShape};
use advect_rs::solver::{run, SchemeKind, SimulationConfig};

fn final_errors(kind: SchemeKind, resolutions: &[usize]) -> Vec<f64> {
    resolutions
        .iter()
        .map(|&nx| {
            let config = SimulationConfig::new(1.0, 1.0, 0.5, nx, 0.5, WaveShape::Gaussian)
                .with_shape_parameters(ShapeParameters::centered(0.1));
            let report = run(&config, &[kind]).unwrap();
            report.outcome(kind).unwrap().diagnostics.final_error()
        })
        .collect()
}

fn assert_ratios(kind: SchemeKind, errors: &[f64], low: f64, high: f64) {
    for i in 0..errors.len() - 1 {
        let ratio = errors[i] / errors[i + 1];
        println!("{} convergence ratio {}->{}: {}", kind, i, i + 1, ratio);

        assert!(
            ratio > low && ratio < high,
            "{}: convergence ratio {} outside ({}, {})",
            kind,
            ratio,
            low,
            high
        );
    }
}

#[test]
fn test_upwind_first_order_convergence() {
    // Ratios approach 2 from below as the Gaussian gets resolved
    let errors = final_errors(SchemeKind::Upwind, &[50, 100, 200, 400]);
    assert_ratios(SchemeKind::Upwind, &errors, 1.5, 2.1);
}

#[test]
fn test_lax_wendroff_second_order_convergence() {
    let errors = final_errors(SchemeKind::LaxWendroff, &[50, 100, 200, 400]);
    assert_ratios(SchemeKind::LaxWendroff, &errors, 3.5, 4.5);
}

#[test]
fn test_crank_nicolson_second_order_convergence() {
    let errors = final_errors(SchemeKind::CrankNicolson, &[50, 100, 200]);
    assert_ratios(SchemeKind::CrankNicolson, &errors, 3.5, 4.5);
}

#[test]
fn test_refinement_reduces_error_for_every_stable_scheme() {
    for kind in [
        SchemeKind::Upwind,
        SchemeKind::Leapfrog,
        SchemeKind::LaxWendroff,
        SchemeKind::CrankNicolson,
        SchemeKind::BackwardEuler,
    ] {
        let errors = final_errors(kind, &[50, 200]);
        assert!(errors[1] < errors[0], "{}: {:?}", kind, errors);
    }
}
