//! Helper functions for integration tests

#![allow(dead_code)]

use advect_rs::physics::{FieldState, ShapeParameters, WaveShape};
use advect_rs::solver::{SchemeOutcome, SimulationConfig};

/// L = 1, v = 1, T = 0.5, Nx = 100, shape of width 0.1 at the midpoint
pub fn base_config(shape: WaveShape, courant: f64) -> SimulationConfig {
    SimulationConfig::new(1.0, 1.0, 0.5, 100, courant, shape)
        .with_shape_parameters(ShapeParameters::centered(0.1))
}

/// Assert that two field states are close (within tolerance)
pub fn assert_states_close(a: &FieldState, b: &FieldState, tolerance: f64, message: &str) {
    assert_eq!(a.len(), b.len(), "{}: Dimension mismatch", message);

    for (i, (&v1, &v2)) in a.as_slice().iter().zip(b.as_slice()).enumerate() {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// True when every value is larger than the previous one
pub fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}

/// max |u| of the last stored state
pub fn final_max(outcome: &SchemeOutcome) -> f64 {
    outcome
        .history
        .final_state()
        .map(FieldState::max_abs)
        .unwrap_or(f64::NAN)
}
