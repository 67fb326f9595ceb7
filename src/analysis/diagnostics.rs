//! Conservation and accuracy diagnostics
//!
//! Three series are computed for every scheme history, one value per time
//! level:
//!
//! ```text
//! mass(u)          = dx · Σ u_i
//! error(u, exact)  = max_i |u_i − exact_i|            (ErrorNorm::Max, default)
//!                  = sqrt(dx · Σ (u_i − exact_i)²)     (ErrorNorm::L2)
//! energy(u)        = dx · Σ u_i²
//! ```
//!
//! Mass is a discrete invariant of every flux-form periodic stencil in this
//! crate, FECS included, so it stays flat even for diverging runs. Energy and
//! error are what expose instability (growth) and dissipation (decay).

use crate::error::{AdvectionError, Result};
use crate::physics::FieldState;
use crate::solver::SchemeHistory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =================================================================================================
// Norms
// =================================================================================================

/// Distance used for the error-against-exact series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorNorm {
    /// max_i |u_i − exact_i|
    #[default]
    Max,

    /// sqrt(dx · Σ (u_i − exact_i)²)
    L2,
}

impl ErrorNorm {
    /// Distance between `state` and `exact` on cells of width `dx`
    ///
    /// # Panics
    ///
    /// Panics if the two fields have different lengths.
    pub fn distance(&self, state: &FieldState, exact: &FieldState, dx: f64) -> f64 {
        assert_eq!(state.len(), exact.len(), "Field lengths must match");

        let diffs = state
            .as_slice()
            .iter()
            .zip(exact.as_slice())
            .map(|(u, e)| u - e);

        match self {
            ErrorNorm::Max => propagating_max(diffs.map(f64::abs)),
            ErrorNorm::L2 => (dx * diffs.map(|d| d * d).sum::<f64>()).sqrt(),
        }
    }
}

impl fmt::Display for ErrorNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorNorm::Max => write!(f, "max"),
            ErrorNorm::L2 => write!(f, "L2"),
        }
    }
}

impl FromStr for ErrorNorm {
    type Err = AdvectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "linf" | "inf" => Ok(ErrorNorm::Max),
            "l2" => Ok(ErrorNorm::L2),
            _ => Err(AdvectionError::invalid(
                "error norm",
                format!("unknown norm '{}'", s),
            )),
        }
    }
}

/// Maximum that lets NaN through instead of skipping it
fn propagating_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}

// =================================================================================================
// Scalar diagnostics
// =================================================================================================

/// Discrete mass dx · Σu (midpoint rule on the periodic grid)
pub fn mass(state: &FieldState, dx: f64) -> f64 {
    dx * state.sum()
}

/// Max-norm distance to the exact solution
///
/// This is the norm every scheme is compared with unless a run selects
/// [`ErrorNorm::L2`].
pub fn error(state: &FieldState, exact: &FieldState) -> f64 {
    ErrorNorm::Max.distance(state, exact, 1.0)
}

/// Discrete energy dx · Σu²
pub fn energy(state: &FieldState, dx: f64) -> f64 {
    dx * state.values().norm_squared()
}

// =================================================================================================
// Per-scheme series
// =================================================================================================

/// Mass, error and energy series of one scheme history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub time_points: Vec<f64>,
    pub mass: Vec<f64>,
    pub error: Vec<f64>,
    pub energy: Vec<f64>,
    pub norm: ErrorNorm,
}

impl Diagnostics {
    /// Compute every series of `history` against the exact history
    ///
    /// `exact` must hold one state per time level of `history`.
    pub fn compute(
        history: &SchemeHistory,
        exact: &[FieldState],
        dx: f64,
        norm: ErrorNorm,
    ) -> Result<Self> {
        if exact.len() != history.len() {
            return Err(AdvectionError::invalid(
                "Nt",
                format!(
                    "exact history has {} levels, {} history has {}",
                    exact.len(),
                    history.kind,
                    history.len()
                ),
            ));
        }

        let mass: Vec<f64> = history.states.iter().map(|u| mass(u, dx)).collect();
        let energy: Vec<f64> = history.states.iter().map(|u| energy(u, dx)).collect();
        let error: Vec<f64> = history
            .states
            .iter()
            .zip(exact)
            .map(|(u, e)| norm.distance(u, e, dx))
            .collect();

        Ok(Self {
            time_points: history.time_points.clone(),
            mass,
            error,
            energy,
            norm,
        })
    }

    /// Number of time levels
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// True when no level was recorded
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// (t, mass) pairs
    pub fn mass_series(&self) -> Vec<(f64, f64)> {
        pair(&self.time_points, &self.mass)
    }

    /// (t, error) pairs
    pub fn error_series(&self) -> Vec<(f64, f64)> {
        pair(&self.time_points, &self.error)
    }

    /// (t, energy) pairs
    pub fn energy_series(&self) -> Vec<(f64, f64)> {
        pair(&self.time_points, &self.energy)
    }

    /// Largest |m_n − m_0| relative to |m_0| (absolute when m_0 = 0)
    pub fn relative_mass_drift(&self) -> f64 {
        let Some(&initial) = self.mass.first() else {
            return 0.0;
        };
        let scale = if initial == 0.0 { 1.0 } else { initial.abs() };
        propagating_max(self.mass.iter().map(|m| (m - initial).abs() / scale))
    }

    /// Error at the last time level
    pub fn final_error(&self) -> f64 {
        self.error.last().copied().unwrap_or(0.0)
    }

    /// Largest error over the run
    pub fn max_error(&self) -> f64 {
        propagating_max(self.error.iter().copied())
    }

    /// E(t_Nt) / E(t_0): > 1 for growth, < 1 for dissipation
    pub fn energy_growth(&self) -> f64 {
        match (self.energy.first(), self.energy.last()) {
            (Some(&first), Some(&last)) if first != 0.0 => last / first,
            _ => 1.0,
        }
    }
}

fn pair(times: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    times.iter().copied().zip(values.iter().copied()).collect()
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SchemeKind;
    use approx::assert_relative_eq;

    fn field(values: &[f64]) -> FieldState {
        FieldState::from_vec(values.to_vec())
    }

    #[test]
    fn test_mass_and_energy() {
        let u = field(&[1.0, 2.0, -1.0, 0.0]);
        assert_relative_eq!(mass(&u, 0.25), 0.5);
        assert_relative_eq!(energy(&u, 0.25), 1.5);
    }

    #[test]
    fn test_error_norms() {
        let u = field(&[1.0, 2.0, 3.0, 4.0]);
        let exact = field(&[1.0, 1.0, 3.0, 6.0]);

        assert_eq!(error(&u, &exact), 2.0);
        assert_eq!(ErrorNorm::Max.distance(&u, &exact, 0.5), 2.0);
        // sqrt(0.5 · (1 + 4))
        assert_relative_eq!(ErrorNorm::L2.distance(&u, &exact, 0.5), 2.5_f64.sqrt());
    }

    #[test]
    fn test_error_of_identical_fields_is_zero() {
        let u = field(&[0.3, 0.1, 0.7]);
        assert_eq!(error(&u, &u), 0.0);
        assert_eq!(ErrorNorm::L2.distance(&u, &u, 0.1), 0.0);
    }

    #[test]
    fn test_max_norm_propagates_nan() {
        let u = field(&[f64::NAN, 0.0]);
        assert!(error(&u, &field(&[0.0, 0.0])).is_nan());
    }

    #[test]
    fn test_norm_parse_and_display() {
        assert_eq!("Linf".parse::<ErrorNorm>().unwrap(), ErrorNorm::Max);
        assert_eq!("l2".parse::<ErrorNorm>().unwrap(), ErrorNorm::L2);
        assert!("h1".parse::<ErrorNorm>().is_err());
        assert_eq!(ErrorNorm::L2.to_string(), "L2");
    }

    fn history() -> SchemeHistory {
        SchemeHistory::new(
            SchemeKind::Upwind,
            vec![0.0, 0.5, 1.0],
            vec![field(&[1.0, 1.0]), field(&[1.5, 0.5]), field(&[2.0, 0.5])],
        )
    }

    #[test]
    fn test_compute_series() {
        let exact = vec![field(&[1.0, 1.0]); 3];
        let diagnostics = Diagnostics::compute(&history(), &exact, 0.5, ErrorNorm::Max).unwrap();

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.mass, vec![1.0, 1.0, 1.25]);
        assert_eq!(diagnostics.error, vec![0.0, 0.5, 1.0]);
        assert_eq!(diagnostics.energy, vec![1.0, 1.25, 2.125]);
        assert_eq!(diagnostics.mass_series()[2], (1.0, 1.25));

        assert_relative_eq!(diagnostics.relative_mass_drift(), 0.25);
        assert_eq!(diagnostics.final_error(), 1.0);
        assert_eq!(diagnostics.max_error(), 1.0);
        assert_relative_eq!(diagnostics.energy_growth(), 2.125);
    }

    #[test]
    fn test_compute_rejects_mismatched_exact_history() {
        let exact = vec![field(&[1.0, 1.0]); 2];
        assert!(Diagnostics::compute(&history(), &exact, 0.5, ErrorNorm::Max).is_err());
    }

    #[test]
    fn test_serializes_to_json() {
        let exact = vec![field(&[1.0, 1.0]); 3];
        let diagnostics = Diagnostics::compute(&history(), &exact, 0.5, ErrorNorm::L2).unwrap();
        let json = serde_json::to_string(&diagnostics).unwrap();
        let back: Diagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diagnostics);
    }
}
