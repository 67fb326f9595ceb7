//! Explicit finite-difference schemes
//!
//! # Mathematical Background
//!
//! Every explicit scheme advances the field with a local stencil. Writing
//! `c = v·dt/dx` for the signed Courant number and using periodic indices
//! (i ± 1 wraps modulo Nx):
//!
//! ```text
//! FECS          u_i^{n+1} = u_i^n − c/2·(u_{i+1}^n − u_{i-1}^n)
//! Upwind (c≥0)  u_i^{n+1} = u_i^n − c·(u_i^n − u_{i-1}^n)
//! Upwind (c<0)  u_i^{n+1} = u_i^n − c·(u_{i+1}^n − u_i^n)
//! Leapfrog      u_i^{n+1} = u_i^{n-1} − c·(u_{i+1}^n − u_{i-1}^n)
//! Lax-Wendroff  u_i^{n+1} = u_i^n − c/2·(u_{i+1}^n − u_{i-1}^n)
//!                                 + c²/2·(u_{i+1}^n − 2u_i^n + u_{i-1}^n)
//! ```
//!
//! # Characteristics
//!
//! | Scheme | Order | Stability | Behaviour |
//! |---|---|---|---|
//! | FECS | 1 in time | never | amplitude grows every step |
//! | Upwind | 1 | \|c\| ≤ 1 | diffusive |
//! | Leapfrog | 2 | \|c\| ≤ 1 | non-dissipative, dispersive, computational mode |
//! | Lax-Wendroff | 2 | \|c\| ≤ 1 | mildly dispersive |
//!
//! All four are written in flux form, so Σu_i is conserved to rounding for any
//! c, including the unstable cases.
//!
//! # Leapfrog bootstrap
//!
//! Leapfrog reads two previous levels but only u^0 exists at start. The first
//! step is one FECS step:
//!
//! ```text
//! u^1 = fecs_step(u^0)
//! ```
//!
//! From then on a two-slot [`StateWindow`] holds u^{n-1} and u^n. The leapfrog
//! computational mode (odd/even decoupling) is not filtered.
//!
//! # Instability
//!
//! Running a scheme outside its stability region is not an error. The values
//! grow until they overflow and the history records them as they are. The
//! first non-finite value of a run is logged once and stored in the history
//! metadata.

use crate::error::Result;
use crate::physics::FieldState;
use crate::solver::config::TimeStepping;
use crate::solver::traits::{Scheme, SchemeHistory, SchemeKind, StencilParameters};
use log::warn;

// =================================================================================================
// Step functions
// =================================================================================================

/// One FECS step
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::FieldState;
/// use advect_rs::solver::StencilParameters;
/// use advect_rs::solver::methods::explicit::fecs_step;
///
/// let u = FieldState::from_vec(vec![0.0, 1.0, 0.0, 0.0]);
/// let next = fecs_step(&u, &StencilParameters::new(1.0, 0.5, 1.0));
/// assert_eq!(next.as_slice(), &[-0.25, 1.0, 0.25, 0.0]);
/// ```
pub fn fecs_step(u: &FieldState, params: &StencilParameters) -> FieldState {
    let half_c = 0.5 * params.courant();
    FieldState::from_fn(u.len(), |i| u[i] - half_c * (u.right(i) - u.left(i)))
}

/// One first-order upwind step
///
/// The stencil reads the neighbour the flow comes from: `i - 1` when `v ≥ 0`,
/// `i + 1` when `v < 0`.
pub fn upwind_step(u: &FieldState, params: &StencilParameters) -> FieldState {
    let c = params.courant();

    if c >= 0.0 {
        FieldState::from_fn(u.len(), |i| u[i] - c * (u[i] - u.left(i)))
    } else {
        FieldState::from_fn(u.len(), |i| u[i] - c * (u.right(i) - u[i]))
    }
}

/// One leapfrog step from u^{n-1} (`previous`) and u^n (`current`)
pub fn leapfrog_step(
    previous: &FieldState,
    current: &FieldState,
    params: &StencilParameters,
) -> FieldState {
    assert_eq!(previous.len(), current.len(), "Field lengths must match");

    let c = params.courant();
    FieldState::from_fn(current.len(), |i| {
        previous[i] - c * (current.right(i) - current.left(i))
    })
}

/// One Lax-Wendroff step
pub fn lax_wendroff_step(u: &FieldState, params: &StencilParameters) -> FieldState {
    let c = params.courant();
    let advection = 0.5 * c;
    let diffusion = 0.5 * c * c;

    FieldState::from_fn(u.len(), |i| {
        let (left, centre, right) = (u.left(i), u[i], u.right(i));
        centre - advection * (right - left) + diffusion * (right - 2.0 * centre + left)
    })
}

// =================================================================================================
// Two-level ring
// =================================================================================================

/// Fixed two-slot ring holding u^{n-1} and u^n
///
/// [`StateWindow::advance`] overwrites the oldest slot, so stepping never
/// retains more than two levels.
#[derive(Debug, Clone)]
pub struct StateWindow {
    slots: [FieldState; 2],
    newest: usize,
}

impl StateWindow {
    /// Start from u^{n-1} and u^n
    pub fn new(previous: FieldState, current: FieldState) -> Self {
        Self {
            slots: [previous, current],
            newest: 1,
        }
    }

    /// u^{n-1}
    pub fn previous(&self) -> &FieldState {
        &self.slots[1 - self.newest]
    }

    /// u^n
    pub fn current(&self) -> &FieldState {
        &self.slots[self.newest]
    }

    /// Shift the window: `next` becomes current, current becomes previous
    pub fn advance(&mut self, next: FieldState) {
        let oldest = 1 - self.newest;
        self.slots[oldest] = next;
        self.newest = oldest;
    }
}

// =================================================================================================
// Shared marching loop
// =================================================================================================

/// Remembers the first non-finite value of a run
struct NonFiniteWatch {
    kind: SchemeKind,
    first: Option<(usize, usize)>,
}

impl NonFiniteWatch {
    fn new(kind: SchemeKind) -> Self {
        Self { kind, first: None }
    }

    fn inspect(&mut self, state: &FieldState, step: usize) {
        if self.first.is_some() {
            return;
        }
        if let Some(index) = state.first_non_finite() {
            warn!(
                "{}: non-finite value at grid index {} from step {} on (unstable run, continuing)",
                self.kind, index, step
            );
            self.first = Some((step, index));
        }
    }
}

fn describe(history: &mut SchemeHistory, stepping: &TimeStepping, watch: &NonFiniteWatch) {
    history.add_metadata("scheme", history.kind.name());
    history.add_metadata("time steps", &stepping.steps().to_string());
    history.add_metadata("dt", &stepping.dt().to_string());
    history.add_metadata("dx", &stepping.dx().to_string());
    history.add_metadata("courant", &stepping.courant().to_string());

    if let Some((step, _)) = watch.first {
        history.add_metadata("first non-finite step", &step.to_string());
    }
}

/// March a one-level scheme over every step of `stepping`
fn march<F>(kind: SchemeKind, initial: &FieldState, stepping: &TimeStepping, step: F) -> SchemeHistory
where
    F: Fn(&FieldState, &StencilParameters) -> FieldState,
{
    let params = stepping.stencil();
    let steps = stepping.steps();

    let mut states = Vec::with_capacity(steps + 1);
    states.push(initial.clone());

    let mut watch = NonFiniteWatch::new(kind);

    for n in 0..steps {
        let next = step(&states[n], &params);
        watch.inspect(&next, n + 1);
        states.push(next);
    }

    let mut history = SchemeHistory::new(kind, stepping.time_points(), states);
    describe(&mut history, stepping, &watch);
    history
}

// =================================================================================================
// Schemes
// =================================================================================================

/// Forward Euler, centred space
#[derive(Debug, Clone, Copy, Default)]
pub struct FecsScheme;

impl Scheme for FecsScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Fecs
    }

    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory> {
        Ok(march(self.kind(), initial, stepping, fecs_step))
    }
}

/// First-order upwind
#[derive(Debug, Clone, Copy, Default)]
pub struct UpwindScheme;

impl Scheme for UpwindScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Upwind
    }

    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory> {
        Ok(march(self.kind(), initial, stepping, upwind_step))
    }
}

/// Lax-Wendroff
#[derive(Debug, Clone, Copy, Default)]
pub struct LaxWendroffScheme;

impl Scheme for LaxWendroffScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::LaxWendroff
    }

    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory> {
        Ok(march(self.kind(), initial, stepping, lax_wendroff_step))
    }
}

/// Leapfrog with a FECS bootstrap step
#[derive(Debug, Clone, Copy, Default)]
pub struct LeapfrogScheme;

impl Scheme for LeapfrogScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Leapfrog
    }

    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory> {
        let params = stepping.stencil();
        let steps = stepping.steps();

        let mut states = Vec::with_capacity(steps + 1);
        states.push(initial.clone());

        let mut watch = NonFiniteWatch::new(self.kind());

        if steps > 0 {
            let bootstrap = fecs_step(initial, &params);
            watch.inspect(&bootstrap, 1);
            states.push(bootstrap.clone());

            let mut window = StateWindow::new(initial.clone(), bootstrap);

            for n in 1..steps {
                let next = leapfrog_step(window.previous(), window.current(), &params);
                watch.inspect(&next, n + 1);
                states.push(next.clone());
                window.advance(next);
            }
        }

        let mut history = SchemeHistory::new(self.kind(), stepping.time_points(), states);
        describe(&mut history, stepping, &watch);
        history.add_metadata("bootstrap", "FECS");
        Ok(history)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// c = 0.5 exactly
    fn half() -> StencilParameters {
        StencilParameters::new(1.0, 0.5, 1.0)
    }

    fn spike() -> FieldState {
        FieldState::from_vec(vec![0.0, 1.0, 0.0, 0.0])
    }

    // ====== Single steps ======

    #[test]
    fn test_fecs_single_step() {
        let next = fecs_step(&spike(), &half());
        assert_eq!(next.as_slice(), &[-0.25, 1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_upwind_single_step_positive_velocity() {
        let next = upwind_step(&spike(), &half());
        assert_eq!(next.as_slice(), &[0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_upwind_mirrors_for_negative_velocity() {
        let params = StencilParameters::new(1.0, 0.5, -1.0);
        let next = upwind_step(&spike(), &params);
        assert_eq!(next.as_slice(), &[0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_upwind_unit_courant_shifts_one_cell() {
        let u = FieldState::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let params = StencilParameters::new(0.5, 0.5, 1.0);
        let next = upwind_step(&u, &params);
        assert_eq!(next.as_slice(), &[5.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_lax_wendroff_single_step() {
        let next = lax_wendroff_step(&spike(), &half());
        assert_eq!(next.as_slice(), &[-0.125, 0.75, 0.375, 0.0]);
    }

    #[test]
    fn test_leapfrog_single_step() {
        let previous = spike();
        let current = fecs_step(&previous, &half());
        let next = leapfrog_step(&previous, &current, &half());
        assert_eq!(next.as_slice(), &[-0.5, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_steps_are_pure() {
        let u = spike();
        let a = lax_wendroff_step(&u, &half());
        let b = lax_wendroff_step(&u, &half());
        assert_eq!(a, b);
        assert_eq!(u, spike());
    }

    #[test]
    fn test_single_steps_conserve_sum() {
        let u = FieldState::from_fn(16, |i| (i as f64 * 0.7).sin() + 1.0);
        let before = u.sum();
        let params = StencilParameters::new(0.1, 0.13, 1.0); // c = 1.3, unstable

        for next in [fecs_step(&u, &params), upwind_step(&u, &params), lax_wendroff_step(&u, &params)] {
            assert_relative_eq!(next.sum(), before, epsilon = 1e-12);
        }
    }

    // ====== Ring ======

    #[test]
    fn test_state_window_rotation() {
        let mut window = StateWindow::new(FieldState::uniform(2, 0.0), FieldState::uniform(2, 1.0));
        assert_eq!(window.previous()[0], 0.0);
        assert_eq!(window.current()[0], 1.0);

        window.advance(FieldState::uniform(2, 2.0));
        assert_eq!(window.previous()[0], 1.0);
        assert_eq!(window.current()[0], 2.0);

        window.advance(FieldState::uniform(2, 3.0));
        assert_eq!(window.previous()[0], 2.0);
        assert_eq!(window.current()[0], 3.0);
    }

    // ====== Schemes ======

    #[test]
    fn test_history_shape_and_metadata() {
        let stepping = TimeStepping::new(1.0, 0.5, 5, 1.0);
        let history = UpwindScheme.integrate(&spike(), &stepping).unwrap();

        assert_eq!(history.len(), 6);
        assert_eq!(history.time_points.len(), 6);
        assert_eq!(history.states[0], spike());
        assert_eq!(history.metadata("scheme"), Some("Upwind"));
        assert_eq!(history.metadata("time steps"), Some("5"));
    }

    #[test]
    fn test_leapfrog_bootstrap_is_fecs() {
        let stepping = TimeStepping::new(1.0, 0.5, 3, 1.0);
        let history = LeapfrogScheme.integrate(&spike(), &stepping).unwrap();

        assert_eq!(history.states[0], spike());
        assert_eq!(history.states[1].as_slice(), &[-0.25, 1.0, 0.25, 0.0]);
        assert_eq!(history.states[2].as_slice(), &[-0.5, 0.75, 0.5, 0.25]);
        assert_eq!(history.metadata("bootstrap"), Some("FECS"));
    }

    #[test]
    fn test_leapfrog_zero_steps() {
        let stepping = TimeStepping::new(1.0, 0.5, 0, 1.0);
        let history = LeapfrogScheme.integrate(&spike(), &stepping).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_leapfrog_matches_manual_stepping() {
        let params = half();
        let stepping = TimeStepping::new(1.0, 0.5, 6, 1.0);
        let history = LeapfrogScheme.integrate(&spike(), &stepping).unwrap();

        let mut manual = vec![spike(), fecs_step(&spike(), &params)];
        for n in 1..6 {
            let next = leapfrog_step(&manual[n - 1], &manual[n], &params);
            manual.push(next);
        }
        assert_eq!(history.states, manual);
    }

    #[test]
    fn test_unstable_run_completes_and_records_overflow() {
        // FECS at c = 5 on a rough field overflows within a few hundred steps
        let u = FieldState::from_fn(8, |i| {
            let parity = if i % 2 == 0 { 1.0 } else { 0.0 };
            parity + i as f64 * 0.1
        });
        let stepping = TimeStepping::new(1.0, 5.0, 2000, 1.0);
        let history = FecsScheme.integrate(&u, &stepping).unwrap();

        assert_eq!(history.len(), 2001);
        assert!(!history.final_state().unwrap().is_finite());
        assert!(history.metadata("first non-finite step").is_some());
    }
}
