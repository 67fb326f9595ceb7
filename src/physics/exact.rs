//! Analytical solution of the linear advection equation
//!
//! For ∂u/∂t + v·∂u/∂x = 0 on a periodic domain the solution is the initial
//! profile translated by v·t and wrapped:
//!
//! ```text
//! u(x, t) = u0((x - v·t) mod L)
//! ```
//!
//! This is the ground truth every scheme is compared against.

use crate::error::Result;
use crate::physics::grid::Grid;
use crate::physics::profile::{InitialProfile, ShapeParameters, WaveShape};
use crate::physics::state::FieldState;

/// Exact solution at time `t` on `grid`
///
/// `exact(.., t = 0.0, ..)` is bit-identical to
/// [`initial_condition`](crate::physics::initial_condition): both evaluate the
/// same profile at `x - v·0 = x`.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::{build_grid, exact, initial_condition, ShapeParameters, WaveShape};
///
/// let grid = build_grid(1.0, 50).unwrap();
/// let params = ShapeParameters::centered(0.1);
///
/// let u0 = initial_condition(WaveShape::Gaussian, &grid, &params).unwrap();
/// let at_zero = exact(WaveShape::Gaussian, &grid, 1.0, 0.0, &params).unwrap();
/// assert_eq!(u0, at_zero);
/// ```
pub fn exact(
    shape: WaveShape,
    grid: &Grid,
    velocity: f64,
    t: f64,
    params: &ShapeParameters,
) -> Result<FieldState> {
    let profile = InitialProfile::new(shape, params, grid.length())?;
    Ok(exact_state(&profile, grid, velocity, t))
}

/// Exact solution at time `t` for an already resolved profile
pub fn exact_state(profile: &InitialProfile, grid: &Grid, velocity: f64, t: f64) -> FieldState {
    let shift = velocity * t;
    FieldState::from_fn(grid.len(), |i| profile.evaluate(grid.x(i) - shift))
}

/// Exact solution at every time point
pub fn exact_history(
    profile: &InitialProfile,
    grid: &Grid,
    velocity: f64,
    time_points: &[f64],
) -> Vec<FieldState> {
    time_points
        .iter()
        .map(|&t| exact_state(profile, grid, velocity, t))
        .collect()
}
