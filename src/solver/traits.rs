//! Scheme traits and types
//!
//! # Design Philosophy
//!
//! - Central enum `SchemeKind` identifies WHICH discretisation is run. It is the
//!   key of every per-scheme result and the identifier a presentation layer
//!   sends in.
//! - `Scheme` trait: one object per discretisation, turning an initial field
//!   into a full `SchemeHistory`.
//! - `SchemeHistory` keeps metadata for extensibility, like every result type in
//!   this crate.
//!
//! # Stability Guarantee
//!
//! - `Scheme` trait: stable, new schemes implement it without touching callers
//! - `SchemeKind` enum: EXTENSIBLE (new variants can be added)

use crate::analysis::stability::{classify, StabilityClass};
use crate::error::{AdvectionError, Result};
use crate::physics::FieldState;
use crate::solver::config::TimeStepping;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =================================================================================================
// Scheme identifiers
// =================================================================================================

/// Finite-difference discretisation of the advection equation
///
/// # Examples
///
/// ```rust
/// use advect_rs::solver::SchemeKind;
///
/// let kind: SchemeKind = "lax-wendroff".parse().unwrap();
/// assert_eq!(kind, SchemeKind::LaxWendroff);
/// assert_eq!(kind.to_string(), "Lax-Wendroff");
/// assert!(!kind.is_implicit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchemeKind {
    /// Forward Euler in time, centred in space
    Fecs,

    /// First-order one-sided difference against the flow
    Upwind,

    /// Centred in time and space, two-level
    Leapfrog,

    /// Second-order Taylor expansion in time
    LaxWendroff,

    /// θ = 1/2 implicit scheme
    CrankNicolson,

    /// θ = 1 implicit scheme
    BackwardEuler,
}

impl SchemeKind {
    /// Every scheme, explicit first
    pub const ALL: [SchemeKind; 6] = [
        SchemeKind::Fecs,
        SchemeKind::Upwind,
        SchemeKind::Leapfrog,
        SchemeKind::LaxWendroff,
        SchemeKind::CrankNicolson,
        SchemeKind::BackwardEuler,
    ];

    /// Explicit schemes only
    pub const EXPLICIT: [SchemeKind; 4] = [
        SchemeKind::Fecs,
        SchemeKind::Upwind,
        SchemeKind::Leapfrog,
        SchemeKind::LaxWendroff,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SchemeKind::Fecs => "FECS",
            SchemeKind::Upwind => "Upwind",
            SchemeKind::Leapfrog => "Leapfrog",
            SchemeKind::LaxWendroff => "Lax-Wendroff",
            SchemeKind::CrankNicolson => "Crank-Nicolson",
            SchemeKind::BackwardEuler => "Backward Euler",
        }
    }

    /// Stable lowercase identifier, used in CSV rows and file names
    pub fn slug(&self) -> &'static str {
        match self {
            SchemeKind::Fecs => "fecs",
            SchemeKind::Upwind => "upwind",
            SchemeKind::Leapfrog => "leapfrog",
            SchemeKind::LaxWendroff => "lax-wendroff",
            SchemeKind::CrankNicolson => "crank-nicolson",
            SchemeKind::BackwardEuler => "backward-euler",
        }
    }

    /// True for schemes that solve a linear system every step
    pub fn is_implicit(&self) -> bool {
        matches!(self, SchemeKind::CrankNicolson | SchemeKind::BackwardEuler)
    }

    /// Number of previous time levels the update reads
    pub fn levels(&self) -> usize {
        match self {
            SchemeKind::Leapfrog => 2,
            _ => 1,
        }
    }

    /// Linear stability of this scheme at Courant number `courant`
    pub fn stability(&self, courant: f64) -> StabilityClass {
        classify(*self, courant)
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SchemeKind {
    type Err = AdvectionError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "fecs" | "ftcs" => Ok(SchemeKind::Fecs),
            "upwind" => Ok(SchemeKind::Upwind),
            "leapfrog" => Ok(SchemeKind::Leapfrog),
            "laxwendroff" | "lw" => Ok(SchemeKind::LaxWendroff),
            "cranknicolson" | "cn" => Ok(SchemeKind::CrankNicolson),
            "backwardeuler" | "be" | "implicit" => Ok(SchemeKind::BackwardEuler),
            _ => Err(AdvectionError::invalid(
                "scheme",
                format!("unknown scheme '{}'", s),
            )),
        }
    }
}

// =================================================================================================
// Stencil parameters
// =================================================================================================

/// Inputs every explicit stencil reads besides the field itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilParameters {
    /// Cell width
    pub dx: f64,

    /// Time step
    pub dt: f64,

    /// Advection velocity (signed)
    pub velocity: f64,
}

impl StencilParameters {
    /// Create stencil parameters
    pub fn new(dx: f64, dt: f64, velocity: f64) -> Self {
        Self { dx, dt, velocity }
    }

    /// Signed Courant number c = v·dt/dx
    #[inline]
    pub fn courant(&self) -> f64 {
        self.velocity * self.dt / self.dx
    }
}

// =================================================================================================
// Scheme trait
// =================================================================================================

/// A time-stepping discretisation of ∂u/∂t + v·∂u/∂x = 0
///
/// Implementations are stateless: everything a run needs comes from the
/// initial field and the [`TimeStepping`]. Any cached data (such as an LU
/// factor) is built inside [`Scheme::integrate`] and dropped with it, so one
/// scheme object can be shared across threads and runs.
pub trait Scheme: Send + Sync {
    /// Which discretisation this is
    fn kind(&self) -> SchemeKind;

    /// Human-readable name
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Advance `initial` over `stepping.steps()` steps
    ///
    /// The returned history holds `steps + 1` states, the first being a copy of
    /// `initial`. Instability is not an error: diverging values are returned
    /// as computed.
    fn integrate(&self, initial: &FieldState, stepping: &TimeStepping) -> Result<SchemeHistory>;
}

// =================================================================================================
// Scheme history
// =================================================================================================

/// Full time history of one scheme
///
/// # Fields
///
/// - `time_points`: t_0 … t_Nt
/// - `states`: u^0 … u^Nt, same length as `time_points`
/// - `metadata`: free-form key/value pairs (scheme name, dt, bootstrap rule…)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeHistory {
    pub kind: SchemeKind,
    pub time_points: Vec<f64>,
    pub states: Vec<FieldState>,
    pub metadata: HashMap<String, String>,
}

impl SchemeHistory {
    /// Create a history without metadata
    pub fn new(kind: SchemeKind, time_points: Vec<f64>, states: Vec<FieldState>) -> Self {
        Self {
            kind,
            time_points,
            states,
            metadata: HashMap::new(),
        }
    }

    /// Number of stored time levels (Nt + 1)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of grid points per state
    pub fn points(&self) -> usize {
        self.states.first().map_or(0, FieldState::len)
    }

    /// State at time index `step`
    pub fn state_at(&self, step: usize) -> Option<&FieldState> {
        self.states.get(step)
    }

    /// u^0
    pub fn initial_state(&self) -> Option<&FieldState> {
        self.states.first()
    }

    /// u^Nt
    pub fn final_state(&self) -> Option<&FieldState> {
        self.states.last()
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Look a metadata entry up
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// History as a (time × space) array, row n being u^n
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), self.points()), |(n, i)| self.states[n][i])
    }
}

// =================================================================================================
// Tests
// =================================================================================================
