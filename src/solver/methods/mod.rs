//! Concrete discretisations
//!
//! This module contains the implementations of the [`Scheme`] trait.
//!
//! # Architecture
//!
//! The separation between the abstract interface (`solver::traits`) and the
//! concrete schemes (`solver::methods`) keeps callers closed to change: the
//! orchestrator only sees `Box<dyn Scheme>` obtained from [`scheme_for`].
//!
//! # Available Methods
//!
//! ## Explicit stencils ([`explicit`])
//!
//! - **[`FecsScheme`]**: forward Euler, centred space. Always unstable, kept
//!   for contrast
//! - **[`UpwindScheme`]**: first order, diffusive, stable for |C| ≤ 1
//! - **[`LeapfrogScheme`]**: second order, two levels, FECS bootstrap
//! - **[`LaxWendroffScheme`]**: second order, stable for |C| ≤ 1
//!
//! ## Implicit θ-schemes ([`implicit`])
//!
//! - **[`ThetaScheme::crank_nicolson`]**: θ = 1/2, energy preserving
//! - **[`ThetaScheme::backward_euler`]**: θ = 1, strongly damping
//!
//! # Example
//!
//! ```rust
//! use advect_rs::physics::FieldState;
//! use advect_rs::solver::{scheme_for, SchemeKind, TimeStepping};
//!
//! let u0 = FieldState::from_fn(50, |i| if (20..30).contains(&i) { 1.0 } else { 0.0 });
//! let stepping = TimeStepping::new(0.02, 0.02, 10, 1.0); // C = 1
//!
//! let history = scheme_for(SchemeKind::Upwind).integrate(&u0, &stepping).unwrap();
//!
//! // At C = 1 upwind is an exact shift by one cell per step
//! assert_eq!(history.final_state().unwrap()[35], 1.0);
//! ```

pub mod explicit;
pub mod implicit;

pub use explicit::{
    fecs_step, lax_wendroff_step, leapfrog_step, upwind_step, FecsScheme, LaxWendroffScheme,
    LeapfrogScheme, StateWindow, UpwindScheme,
};
pub use implicit::{build_matrix, solve_step, ImplicitSystem, ThetaScheme};

use crate::solver::traits::{Scheme, SchemeKind};

/// Scheme object for `kind`
pub fn scheme_for(kind: SchemeKind) -> Box<dyn Scheme> {
    match kind {
        SchemeKind::Fecs => Box::new(FecsScheme),
        SchemeKind::Upwind => Box::new(UpwindScheme),
        SchemeKind::Leapfrog => Box::new(LeapfrogScheme),
        SchemeKind::LaxWendroff => Box::new(LaxWendroffScheme),
        SchemeKind::CrankNicolson => Box::new(ThetaScheme::crank_nicolson()),
        SchemeKind::BackwardEuler => Box::new(ThetaScheme::backward_euler()),
    }
}
