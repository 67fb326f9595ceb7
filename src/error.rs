//! Error taxonomy of the solver core
//!
//! Only two things can go wrong in a run:
//!
//! - **Invalid configuration**: rejected before any computation starts and fatal
//!   to the whole run.
//! - **Singular implicit system**: reported per scheme by the orchestrator, the
//!   other schemes still return their results.
//!
//! Numerical instability is NOT an error. An unstable scheme runs to completion
//! and its diverging mass/energy/error series are the diagnosis.

use crate::solver::SchemeKind;
use thiserror::Error;

/// Errors produced by the advection solver core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvectionError {
    /// Malformed grid, time or shape parameter
    #[error("Invalid configuration: {parameter} {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    /// The implicit system could not be factored or solved
    #[error("Singular system in {scheme}: {reason}")]
    SingularSystem { scheme: SchemeKind, reason: String },

    /// `run` was called without any scheme to compute
    #[error("No scheme selected: at least one scheme must be requested")]
    EmptySelection,
}

impl AdvectionError {
    /// Build an [`AdvectionError::InvalidConfig`]
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }

    /// Build an [`AdvectionError::SingularSystem`]
    pub fn singular(scheme: SchemeKind, reason: impl Into<String>) -> Self {
        Self::SingularSystem {
            scheme,
            reason: reason.into(),
        }
    }

    /// True for errors that abort the whole run rather than a single scheme
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::SingularSystem { .. })
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AdvectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let error = AdvectionError::invalid("Nx", "must be at least 3, got 2");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: Nx must be at least 3, got 2"
        );
        assert!(error.is_fatal());
    }

    #[test]
    fn test_singular_system_is_per_scheme() {
        let error = AdvectionError::singular(SchemeKind::CrankNicolson, "zero pivot");
        assert!(!error.is_fatal());
        assert!(error.to_string().contains("Crank-Nicolson"));
    }
}
