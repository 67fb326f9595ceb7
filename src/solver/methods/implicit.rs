//! Implicit θ-schemes
//!
//! # Mathematical Background
//!
//! With D the periodic central-difference operator
//!
//! ```text
//!     ┌  0   1   0  …   0  -1 ┐
//!     │ -1   0   1  …   0   0 │
//! D = │  ⋮       ⋱   ⋱       ⋮ │
//!     │  0   0  … -1    0   1 │
//!     └  1   0  …  0   -1   0 ┘
//! ```
//!
//! the θ-scheme for ∂u/∂t + v·∂u/∂x = 0 reads
//!
//! ```text
//! (I + θ·c/2·D) u^{n+1} = (I − (1−θ)·c/2·D) u^n
//! ```
//!
//! - θ = 1/2: Crank-Nicolson, second order, amplification factor of modulus 1
//! - θ = 1: Backward Euler, first order, damps every non-constant mode
//!
//! Both are unconditionally stable. The left matrix has eigenvalues
//! `1 + i·θ·c·sin(k·dx)`, never zero, so the factorisation only fails on
//! degenerate input.
//!
//! # Caching
//!
//! Both matrices are constant for a run. [`ImplicitSystem::assemble`] builds
//! them once and LU-factors the left one; [`solve_step`] reuses the factor for
//! every step.

use crate::error::{AdvectionError, Result};
use crate::physics::{periodic_neighbors, FieldState};
use crate::solver::config::TimeStepping;
use crate::solver::traits::{Scheme, SchemeHistory, SchemeKind};
use log::{debug, error, trace};
use nalgebra::{DMatrix, Dyn, LU};

// =================================================================================================
// Matrix assembly
// =================================================================================================

/// Periodic central-difference operator D (unscaled)
///
/// `D[i, i+1] = 1`, `D[i, i-1] = -1`, with indices wrapped so that
/// `D[0, nx-1] = -1` and `D[nx-1, 0] = 1`. Requires `nx ≥ 3`.
pub fn central_difference_operator(nx: usize) -> DMatrix<f64> {
    let mut d = DMatrix::zeros(nx, nx);
    for i in 0..nx {
        let (left, right) = periodic_neighbors(i, nx);
        d[(i, right)] = 1.0;
        d[(i, left)] = -1.0;
    }
    d
}

/// Left-hand matrix `I + θ·c/2·D`
///
/// # Example
///
/// ```rust
/// use advect_rs::solver::methods::implicit::build_matrix;
///
/// let a = build_matrix(4, 0.8, 0.5);
/// assert_eq!(a[(0, 0)], 1.0);
/// assert!((a[(0, 1)] - 0.2).abs() < 1e-15);
/// assert!((a[(0, 3)] + 0.2).abs() < 1e-15); // corner wrap
/// ```
pub fn build_matrix(nx: usize, courant: f64, theta: f64) -> DMatrix<f64> {
    DMatrix::identity(nx, nx) + central_difference_operator(nx) * (0.5 * theta * courant)
}

/// Right-hand matrix `I − (1−θ)·c/2·D`
pub fn build_explicit_matrix(nx: usize, courant: f64, theta: f64) -> DMatrix<f64> {
    DMatrix::identity(nx, nx) - central_difference_operator(nx) * (0.5 * (1.0 - theta) * courant)
}

// =================================================================================================
// Factored system
// =================================================================================================

/// The two θ-scheme matrices with the left one LU-factored
#[derive(Debug, Clone)]
pub struct ImplicitSystem {
    kind: SchemeKind,
    lu: LU<f64, Dyn, Dyn>,
    explicit: DMatrix<f64>,
}

impl ImplicitSystem {
    /// Build and factor the system for `nx` points at Courant number `courant`
    pub fn assemble(kind: SchemeKind, nx: usize, courant: f64, theta: f64) -> Result<Self> {
        let system = Self::from_parts(
            kind,
            build_matrix(nx, courant, theta),
            build_explicit_matrix(nx, courant, theta),
        )?;

        debug!(
            "{}: factored {}x{} system (c = {:.4}, theta = {})",
            kind, nx, nx, courant, theta
        );

        Ok(system)
    }

    /// Factor an arbitrary left matrix and pair it with a right matrix
    pub fn from_parts(kind: SchemeKind, implicit: DMatrix<f64>, explicit: DMatrix<f64>) -> Result<Self> {
        if !implicit.is_square() || implicit.shape() != explicit.shape() {
            return Err(AdvectionError::invalid(
                "Nx",
                format!(
                    "matrix shapes {:?} and {:?} do not form a square system",
                    implicit.shape(),
                    explicit.shape()
                ),
            ));
        }

        let lu = implicit.lu();
        if !lu.is_invertible() {
            return Err(AdvectionError::singular(kind, "LU factorisation has a zero pivot"));
        }

        Ok(Self { kind, lu, explicit })
    }

    /// Scheme this system belongs to
    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    /// Number of unknowns
    pub fn len(&self) -> usize {
        self.explicit.nrows()
    }

    /// True for a 0×0 system
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Solve `A·u^{n+1} = B·u^n` with the cached factor of A
pub fn solve_step(system: &ImplicitSystem, previous: &FieldState) -> Result<FieldState> {
    if previous.len() != system.len() {
        return Err(AdvectionError::invalid(
            "Nx",
            format!(
                "state has {} points but the system expects {}",
                previous.len(),
                system.len()
            ),
        ));
    }

    let rhs = &system.explicit * previous.values();

    let Some(next) = system.lu.solve(&rhs) else {
        return Err(AdvectionError::singular(system.kind, "LU solve returned no solution"));
    };

    Ok(FieldState::new(next))
}

// =================================================================================================
// θ-scheme
// =================================================================================================

/// Implicit θ-scheme (Crank-Nicolson or Backward Euler)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThetaScheme {
    theta: f64,
    kind: SchemeKind,
}

impl ThetaScheme {
    /// θ = 1/2
    pub fn crank_nicolson() -> Self {
        Self {
            theta: 0.5,
            kind: SchemeKind::CrankNicolson,
        }
    }

    /// θ = 1
    pub fn backward_euler() -> Self {
        Self {
            theta: 1.0,
            kind: SchemeKind::BackwardEuler,
        }
    }

    /// Implicitness weight
    pub fn theta(&self) -> f64 {
        self.theta
    }
}

impl Scheme for ThetaScheme {
    fn kind(&self) -> SchemeKind {
        self.kind
    }

    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory> {
        let steps = stepping.steps();

        let system = ImplicitSystem::assemble(self.kind, initial.len(), stepping.courant(), self.theta)
            .inspect_err(|e| error!("{}", e))?;

        let mut states = Vec::with_capacity(steps + 1);
        states.push(initial.clone());

        for n in 0..steps {
            let next = solve_step(&system, &states[n]).inspect_err(|e| error!("{} at step {}", e, n + 1))?;
            trace!("{}: step {}/{} solved", self.kind, n + 1, steps);
            states.push(next);
        }

        let mut history = SchemeHistory::new(self.kind, stepping.time_points(), states);
        history.add_metadata("scheme", self.kind.name());
        history.add_metadata("time steps", &steps.to_string());
        history.add_metadata("dt", &stepping.dt().to_string());
        history.add_metadata("dx", &stepping.dx().to_string());
        history.add_metadata("courant", &stepping.courant().to_string());
        history.add_metadata("theta", &self.theta.to_string());

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

    #[test]
    fn test_operator_structure() {
        let d = central_difference_operator(5);

        // Corners
        assert_eq!(d[(0, 4)], -1.0);
        assert_eq!(d[(4, 0)], 1.0);

        // Interior row
        assert_eq!(d[(2, 1)], -1.0);
        assert_eq!(d[(2, 3)], 1.0);
        assert_eq!(d[(2, 2)], 0.0);

        // Each row sums to zero, D is antisymmetric
        for i in 0..5 {
            assert_eq!(d.row(i).sum(), 0.0);
        }
        assert_eq!(d.transpose(), -d);
    }

    #[test]
    fn test_build_matrix_coefficients() {
        let a = build_matrix(6, 0.8, 1.0);
        for i in 0..6 {
            assert_eq!(a[(i, i)], 1.0);
            assert_relative_eq!(a[(i, (i + 1) % 6)], 0.4, epsilon = 1e-15);
            assert_relative_eq!(a[(i, (i + 5) % 6)], -0.4, epsilon = 1e-15);
        }

        // Backward Euler has a pure identity on the right
        assert_eq!(build_explicit_matrix(6, 0.8, 1.0), DMatrix::identity(6, 6));
    }

    #[test]
    fn test_step_satisfies_linear_system() {
        let nx = 12;
        let c = 2.5;
        let system = ImplicitSystem::assemble(SchemeKind::CrankNicolson, nx, c, 0.5).unwrap();
        let u = FieldState::from_fn(nx, |i| (i as f64).cos());

        let next = solve_step(&system, &u).unwrap();

        let lhs = build_matrix(nx, c, 0.5) * next.values();
        let rhs = build_explicit_matrix(nx, c, 0.5) * u.values();
        for i in 0..nx {
            assert_relative_eq!(lhs[i], rhs[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_uniform_field_is_steady() {
        let system = ImplicitSystem::assemble(SchemeKind::BackwardEuler, 8, 3.0, 1.0).unwrap();
        let next = solve_step(&system, &FieldState::uniform(8, 2.0)).unwrap();
        for i in 0..8 {
            assert_relative_eq!(next[i], 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let result = ImplicitSystem::from_parts(
            SchemeKind::CrankNicolson,
            DMatrix::zeros(4, 4),
            DMatrix::identity(4, 4),
        );

        match result {
            Err(AdvectionError::SingularSystem { scheme, .. }) => {
                assert_eq!(scheme, SchemeKind::CrankNicolson)
            }
            other => panic!("expected SingularSystem, got {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let system = ImplicitSystem::assemble(SchemeKind::BackwardEuler, 5, 1.0, 1.0).unwrap();
        assert!(solve_step(&system, &FieldState::uniform(4, 1.0)).is_err());
    }

    #[test]
    fn test_crank_nicolson_preserves_energy() {
        let nx = 32;
        let u0 = FieldState::from_fn(nx, |i| (-((i as f64 - 16.0) / 3.0).powi(2)).exp());
        let stepping = TimeStepping::new(1.0 / nx as f64, 2.0 / nx as f64, 40, 1.0);

        let cn = ThetaScheme::crank_nicolson().integrate(&u0, &stepping).unwrap();
        let be = ThetaScheme::backward_euler().integrate(&u0, &stepping).unwrap();

        let energy = |u: &FieldState| u.values().norm_squared();
        let e0 = energy(&u0);

        assert_relative_eq!(energy(cn.final_state().unwrap()), e0, max_relative = 1e-10);
        assert!(energy(be.final_state().unwrap()) < 0.9 * e0);
    }

    #[test]
    fn test_history_metadata() {
        let stepping = TimeStepping::new(0.1, 0.1, 3, 1.0);
        let history = ThetaScheme::backward_euler()
            .integrate(&FieldState::uniform(10, 1.0), &stepping)
            .unwrap();

        assert_eq!(history.len(), 4);
        assert_eq!(history.kind, SchemeKind::BackwardEuler);
        assert_eq!(history.metadata("theta"), Some("1"));
    }
}
