//! Simulation configuration
//!
//! # Design
//!
//! `SimulationConfig` carries the user-facing parameters (L, v, T, Nx, C and
//! the initial shape). It is immutable once built and owned by the orchestrator
//! for one run. [`SimulationConfig::time_stepping`] validates it and derives the
//! discretisation every scheme shares:
//!
//! ```text
//! dx = L / Nx
//! dt = C · dx / |v|
//! c  = v · dt / dx       (signed Courant number, |c| = C)
//! Nt = ceil(T / dt)
//! ```
//!
//! # Example
//!
//! ```rust
//! use advect_rs::solver::SimulationConfig;
//! use advect_rs::physics::WaveShape;
//!
//! let config = SimulationConfig::new(1.0, 1.0, 0.5, 100, 0.8, WaveShape::Gaussian);
//! let stepping = config.time_stepping().unwrap();
//!
//! assert!((stepping.dx() - 0.01).abs() < 1e-15);
//! assert!((stepping.dt() - 0.008).abs() < 1e-15);
//! assert_eq!(stepping.steps(), 63); // ceil(62.5)
//! ```

use crate::analysis::ErrorNorm;
use crate::error::{AdvectionError, Result};
use crate::physics::grid::MIN_POINTS;
use crate::physics::profile::{ShapeParameters, WaveShape};
use crate::solver::traits::StencilParameters;
use serde::{Deserialize, Serialize};

/// Relative slack when rounding T/dt up to a step count
///
/// Keeps ratios such as 62.000000000001 at 62 steps instead of 63.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

// =================================================================================================
// Simulation configuration
// =================================================================================================

/// Parameters of one advection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Domain length L (> 0)
    pub length: f64,

    /// Advection velocity v (sign gives direction, must be nonzero)
    pub velocity: f64,

    /// Simulated time T (≥ 0)
    pub total_time: f64,

    /// Number of grid points Nx (≥ 3)
    pub nx: usize,

    /// Courant number magnitude C (> 0), fixes dt
    pub courant: f64,

    /// Initial waveform
    pub shape: WaveShape,

    /// Center and width of the waveform
    #[serde(default)]
    pub shape_parameters: ShapeParameters,

    /// Norm used for the error-against-exact series
    #[serde(default)]
    pub error_norm: ErrorNorm,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            length: 1.0,
            velocity: 1.0,
            total_time: 1.0,
            nx: 100,
            courant: 0.8,
            shape: WaveShape::Gaussian,
            shape_parameters: ShapeParameters::default(),
            error_norm: ErrorNorm::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with default shape parameters and max-norm error
    pub fn new(
        length: f64,
        velocity: f64,
        total_time: f64,
        nx: usize,
        courant: f64,
        shape: WaveShape,
    ) -> Self {
        Self {
            length,
            velocity,
            total_time,
            nx,
            courant,
            shape,
            ..Default::default()
        }
    }

    /// Replace the shape parameters
    pub fn with_shape_parameters(mut self, parameters: ShapeParameters) -> Self {
        self.shape_parameters = parameters;
        self
    }

    /// Replace the error norm
    pub fn with_error_norm(mut self, norm: ErrorNorm) -> Self {
        self.error_norm = norm;
        self
    }

    /// Check every parameter, in the order a user would fix them
    pub fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(AdvectionError::invalid(
                "L",
                format!("must be positive and finite, got {}", self.length),
            ));
        }

        if self.nx < MIN_POINTS {
            return Err(AdvectionError::invalid(
                "Nx",
                format!("must be at least {}, got {}", MIN_POINTS, self.nx),
            ));
        }

        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(AdvectionError::invalid(
                "T",
                format!("must be non-negative and finite, got {}", self.total_time),
            ));
        }

        // dt = C·dx/|v| needs a nonzero velocity
        if !self.velocity.is_finite() || self.velocity == 0.0 {
            return Err(AdvectionError::invalid(
                "v",
                format!("must be nonzero and finite, got {}", self.velocity),
            ));
        }

        if !self.courant.is_finite() || self.courant <= 0.0 {
            return Err(AdvectionError::invalid(
                "C",
                format!("must be positive and finite, got {}", self.courant),
            ));
        }

        self.shape_parameters.validate()
    }

    /// Validate and derive dx, dt, Nt and the signed Courant number
    pub fn time_stepping(&self) -> Result<TimeStepping> {
        self.validate()?;

        let dx = self.length / self.nx as f64;
        let dt = self.courant * dx / self.velocity.abs();

        let ratio = self.total_time / dt;
        let steps = (ratio - STEP_COUNT_TOLERANCE * ratio.max(1.0)).ceil().max(0.0);

        if !dt.is_finite() || dt <= 0.0 || !steps.is_finite() || steps > usize::MAX as f64 {
            return Err(AdvectionError::invalid(
                "C",
                format!("gives an unusable time step dt = {}", dt),
            ));
        }

        Ok(TimeStepping {
            dx,
            dt,
            steps: steps as usize,
            velocity: self.velocity,
        })
    }
}

// =================================================================================================
// Derived discretisation
// =================================================================================================

/// Discretisation derived from a validated [`SimulationConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStepping {
    dx: f64,
    dt: f64,
    steps: usize,
    velocity: f64,
}

impl TimeStepping {
    /// Build directly from dx, dt, Nt and v (used by tests and benches)
    pub fn new(dx: f64, dt: f64, steps: usize, velocity: f64) -> Self {
        Self {
            dx,
            dt,
            steps,
            velocity,
        }
    }

    /// Cell width
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Time step
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of time steps Nt; histories hold Nt + 1 states
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Advection velocity
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Signed Courant number c = v·dt/dx
    #[inline]
    pub fn courant(&self) -> f64 {
        self.stencil().courant()
    }

    /// Stencil inputs shared by every step
    #[inline]
    pub fn stencil(&self) -> StencilParameters {
        StencilParameters::new(self.dx, self.dt, self.velocity)
    }

    /// t_n = n·dt, computed from the index
    #[inline]
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }

    /// t_0 … t_Nt
    pub fn time_points(&self) -> Vec<f64> {
        (0..=self.steps).map(|n| self.time_at(n)).collect()
    }

    /// t_Nt, at or just past T
    pub fn final_time(&self) -> f64 {
        self.time_at(self.steps)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
