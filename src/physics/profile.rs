//! Initial waveform shapes
//!
//! Defines u(x, t=0) on the periodic domain.
//!
//! # Periodic distance
//!
//! Every shape is evaluated on the signed periodic distance to its center:
//!
//! ```text
//! d = ((x - x0) mod L), folded into [-L/2, L/2)
//! r = |d|
//! ```
//!
//! so u(0) = u(L) for any center and any width, and translating the profile
//! by v·t never introduces a seam at the boundary.
//!
//! # Shapes
//!
//! | Shape | Formula | Support |
//! |-------|---------|---------|
//! | Gaussian bell | `exp(-(d/σ)²)` | whole domain |
//! | Square pulse | `1` | `r < σ` |
//! | Triangle wave | `1 - r/σ` | `r < σ` |
//! | Cosine hat | `cos²(π·r / 2σ)` | `r < σ` |
//!
//! # Example
//!
//! ```rust
//! use advect_rs::physics::{build_grid, initial_condition, ShapeParameters, WaveShape};
//!
//! let grid = build_grid(1.0, 100).unwrap();
//! let params = ShapeParameters::centered(0.1);
//! let u0 = initial_condition(WaveShape::Square, &grid, &params).unwrap();
//!
//! assert_eq!(u0[50], 1.0); // x = 0.5 is the center
//! assert_eq!(u0[0], 0.0);
//! ```

use crate::error::{AdvectionError, Result};
use crate::physics::grid::Grid;
use crate::physics::state::FieldState;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

// =================================================================================================
// Shape kind
// =================================================================================================

/// Closed-form initial waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaveShape {
    /// Smooth bell, nonzero everywhere but negligible far from the center
    Gaussian,

    /// Discontinuous top-hat of height 1
    Square,

    /// Continuous, kinked at the apex and at the support edges
    Triangle,

    /// Raised cosine, C¹ at the support edges
    CosineHat,
}

impl WaveShape {
    /// Every shape, in display order
    pub const ALL: [WaveShape; 4] = [
        WaveShape::Gaussian,
        WaveShape::Square,
        WaveShape::Triangle,
        WaveShape::CosineHat,
    ];

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            WaveShape::Gaussian => "Gaussian Bell",
            WaveShape::Square => "Square Pulse",
            WaveShape::Triangle => "Triangle Wave",
            WaveShape::CosineHat => "Cosine Hat",
        }
    }

    /// Profile value at signed periodic distance `d` from the center
    #[inline]
    pub fn evaluate(&self, d: f64, width: f64) -> f64 {
        let r = d.abs();
        match self {
            WaveShape::Gaussian => {
                let z = d / width;
                (-z * z).exp()
            }
            WaveShape::Square => {
                if r < width {
                    1.0
                } else {
                    0.0
                }
            }
            WaveShape::Triangle => {
                if r < width {
                    1.0 - r / width
                } else {
                    0.0
                }
            }
            WaveShape::CosineHat => {
                if r < width {
                    let c = (PI * r / (2.0 * width)).cos();
                    c * c
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveShape {
    type Err = AdvectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match key.as_str() {
            "gaussian" | "gaussianbell" | "gauss" => Ok(WaveShape::Gaussian),
            "square" | "squarepulse" => Ok(WaveShape::Square),
            "triangle" | "trianglewave" => Ok(WaveShape::Triangle),
            "cosine" | "cosinehat" | "cos" => Ok(WaveShape::CosineHat),
            _ => Err(AdvectionError::invalid(
                "initial condition",
                format!("unknown shape '{}'", s),
            )),
        }
    }
}

// =================================================================================================
// Shape parameters
// =================================================================================================

/// Tunable parameters shared by every shape
///
/// - `center`: x0; `None` puts the shape at the domain midpoint
/// - `width`: σ; Gaussian e-folding length, half-width of the support otherwise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    pub center: Option<f64>,
    pub width: f64,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            center: None,
            width: 0.05,
        }
    }
}

impl ShapeParameters {
    /// Shape at the domain midpoint with width `width`
    pub fn centered(width: f64) -> Self {
        Self {
            center: None,
            width,
        }
    }

    /// Shape at `center` with width `width`
    pub fn at(center: f64, width: f64) -> Self {
        Self {
            center: Some(center),
            width,
        }
    }

    /// Check width and center are usable
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(AdvectionError::invalid(
                "width",
                format!("must be positive and finite, got {}", self.width),
            ));
        }
        if let Some(center) = self.center
            && !center.is_finite()
        {
            return Err(AdvectionError::invalid(
                "center",
                format!("must be finite, got {}", center),
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Resolved profile
// =================================================================================================

/// A shape bound to a concrete domain
///
/// Resolving once per run fixes the center (midpoint default) and gives a
/// cheap `evaluate(x)` usable by both the initial condition and the exact
/// solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialProfile {
    shape: WaveShape,
    center: f64,
    width: f64,
    length: f64,
}

impl InitialProfile {
    /// Bind `shape` and `params` to a domain of length `length`
    pub fn new(shape: WaveShape, params: &ShapeParameters, length: f64) -> Result<Self> {
        params.validate()?;
        if !length.is_finite() || length <= 0.0 {
            return Err(AdvectionError::invalid(
                "L",
                format!("must be positive and finite, got {}", length),
            ));
        }

        Ok(Self {
            shape,
            center: params.center.unwrap_or(0.5 * length),
            width: params.width,
            length,
        })
    }

    /// Shape kind
    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    /// Resolved center x0
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Width σ
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Signed periodic distance from the center, in `[-L/2, L/2)`
    #[inline]
    pub fn periodic_distance(&self, x: f64) -> f64 {
        let d = (x - self.center).rem_euclid(self.length);
        if d >= 0.5 * self.length {
            d - self.length
        } else {
            d
        }
    }

    /// u0 at any real position; periodic in x with period L
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.shape.evaluate(self.periodic_distance(x), self.width)
    }

    /// Evaluate at every grid point
    pub fn sample(&self, grid: &Grid) -> FieldState {
        FieldState::from_fn(grid.len(), |i| self.evaluate(grid.x(i)))
    }
}

/// Initial field for `shape` on `grid`
///
/// # Errors
///
/// [`AdvectionError::InvalidConfig`] if the shape parameters are unusable.
pub fn initial_condition(shape: WaveShape, grid: &Grid, params: &ShapeParameters) -> Result<FieldState> {
    let profile = InitialProfile::new(shape, params, grid.length())?;
    Ok(profile.sample(grid))
}

// =================================================================================================
// Tests
// =================================================================================================
