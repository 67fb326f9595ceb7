//! Linear (von Neumann) stability of the schemes
//!
//! A Fourier mode `u_i^n = g^n · e^{i·k·x_i}` is an exact solution of every
//! linear stencil in this crate. With `θ = k·dx`, `s = sin θ`, `q = 1 − cos θ`
//! and Courant number `c`, the amplification factors are:
//!
//! ```text
//! FECS          |g|² = 1 + c²s²
//! Upwind        |g|² = (1 − |c|q)² + c²s²
//! Lax-Wendroff  |g|² = (1 − c²q)² + c²s²
//! Leapfrog      g² + 2i·c·s·g − 1 = 0       |g| = 1 if |cs| ≤ 1
//! θ-scheme      |g|² = (1 + (1−θ)²c²s²) / (1 + θ²c²s²)
//! ```
//!
//! A scheme is stable when `max_θ |g| ≤ 1`. The orchestrator only uses the
//! classification to warn: unstable runs are still executed.

use crate::solver::SchemeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stability of a scheme at a given Courant number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilityClass {
    /// Every mode is bounded
    Stable,

    /// Stable for |C| ≤ 1, but not at this Courant number
    ConditionallyUnstable,

    /// Unstable for every C > 0
    AlwaysUnstable,
}

impl StabilityClass {
    /// True for [`StabilityClass::Stable`]
    pub fn is_stable(&self) -> bool {
        matches!(self, StabilityClass::Stable)
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StabilityClass::Stable => "stable",
            StabilityClass::ConditionallyUnstable => "unstable (CFL condition |C| <= 1 violated)",
            StabilityClass::AlwaysUnstable => "unconditionally unstable",
        };
        write!(f, "{}", label)
    }
}

/// Classify `kind` at Courant number `courant` (sign ignored)
///
/// # Example
///
/// ```rust
/// use advect_rs::analysis::{classify, StabilityClass};
/// use advect_rs::solver::SchemeKind;
///
/// assert_eq!(classify(SchemeKind::Upwind, 0.8), StabilityClass::Stable);
/// assert_eq!(classify(SchemeKind::Upwind, 1.5), StabilityClass::ConditionallyUnstable);
/// assert_eq!(classify(SchemeKind::Fecs, 0.1), StabilityClass::AlwaysUnstable);
/// assert_eq!(classify(SchemeKind::CrankNicolson, 50.0), StabilityClass::Stable);
/// ```
pub fn classify(kind: SchemeKind, courant: f64) -> StabilityClass {
    match kind {
        SchemeKind::Fecs => StabilityClass::AlwaysUnstable,
        SchemeKind::Upwind | SchemeKind::Leapfrog | SchemeKind::LaxWendroff => {
            if courant.abs() <= 1.0 {
                StabilityClass::Stable
            } else {
                StabilityClass::ConditionallyUnstable
            }
        }
        SchemeKind::CrankNicolson | SchemeKind::BackwardEuler => StabilityClass::Stable,
    }
}

/// |g| for the mode of phase `phase = k·dx`
///
/// For leapfrog the larger root modulus is returned.
pub fn amplification_factor(kind: SchemeKind, courant: f64, phase: f64) -> f64 {
    let c = courant;
    let s = phase.sin();
    let q = 1.0 - phase.cos();
    let cs2 = c * c * s * s;

    let theta_scheme = |theta: f64| {
        ((1.0 + (1.0 - theta).powi(2) * cs2) / (1.0 + theta * theta * cs2)).sqrt()
    };

    match kind {
        SchemeKind::Fecs => (1.0 + cs2).sqrt(),
        SchemeKind::Upwind => ((1.0 - c.abs() * q).powi(2) + cs2).sqrt(),
        SchemeKind::LaxWendroff => ((1.0 - c * c * q).powi(2) + cs2).sqrt(),
        SchemeKind::Leapfrog => {
            let a = (c * s).abs();
            if a <= 1.0 { 1.0 } else { a + (a * a - 1.0).sqrt() }
        }
        SchemeKind::CrankNicolson => theta_scheme(0.5),
        SchemeKind::BackwardEuler => theta_scheme(1.0),
    }
}

/// max_θ |g| sampled on `samples` phases in (0, π]
pub fn max_amplification(kind: SchemeKind, courant: f64, samples: usize) -> f64 {
    (1..=samples.max(1))
        .map(|j| std::f64::consts::PI * j as f64 / samples.max(1) as f64)
        .map(|phase| amplification_factor(kind, courant, phase))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classification_table() {
        assert_eq!(SchemeKind::Fecs.stability(0.5), StabilityClass::AlwaysUnstable);
        for kind in [SchemeKind::Upwind, SchemeKind::Leapfrog, SchemeKind::LaxWendroff] {
            assert!(kind.stability(1.0).is_stable());
            assert!(kind.stability(-0.9).is_stable());
            assert_eq!(kind.stability(1.01), StabilityClass::ConditionallyUnstable);
        }
        for kind in [SchemeKind::CrankNicolson, SchemeKind::BackwardEuler] {
            assert!(kind.stability(5.0).is_stable());
        }
    }

    #[test]
    fn test_classification_agrees_with_amplification() {
        for kind in SchemeKind::ALL {
            for c in [0.3, 0.8, 1.0, 1.5, 5.0] {
                let growth = max_amplification(kind, c, 256);
                let bounded = growth <= 1.0 + 1e-12;
                assert_eq!(
                    bounded,
                    classify(kind, c).is_stable(),
                    "{} at C = {}: max |g| = {}",
                    kind,
                    c,
                    growth
                );
            }
        }
    }

    #[test]
    fn test_crank_nicolson_is_neutral() {
        for phase in [0.1, 1.0, 2.5] {
            assert_relative_eq!(
                amplification_factor(SchemeKind::CrankNicolson, 5.0, phase),
                1.0,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_backward_euler_damps() {
        assert!(amplification_factor(SchemeKind::BackwardEuler, 5.0, 1.0) < 0.5);
    }

    #[test]
    fn test_upwind_unit_courant_is_exact_shift() {
        for phase in [0.2, 1.3, 3.0] {
            assert_relative_eq!(
                amplification_factor(SchemeKind::Upwind, 1.0, phase),
                1.0,
                epsilon = 1e-14
            );
        }
    }
}
