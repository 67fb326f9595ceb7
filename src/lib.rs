//! advect-rs: Finite-Difference Schemes for Linear Advection
//!
//! Solves u_t + v·u_x = 0 on a periodic 1D domain with six classic schemes
//! and compares each against the exact solution u(x, t) = u0(x − v·t).
//!
//! # Architecture
//!
//! advect-rs is built on two core principles:
//!
//! 1. **Separation of Problem and Numerics**
//!    - The configuration and the initial profile define what to solve
//!    - Schemes define how one time step is taken
//!
//! 2. **Pure Entry Points**
//!    - [`solver::run`] depends only on its arguments
//!    - Every scheme's history is independent, so schemes run side by side
//!
//! # Quick Start
//!
//! ```rust
//! use advect_rs::prelude::*;
//!
//! // 1. Describe the problem
//! let config = SimulationConfig::new(
//!     1.0,   // L: domain length
//!     1.0,   // v: velocity
//!     0.5,   // T: final time
//!     100,   // Nx: grid points
//!     0.8,   // C: Courant number
//!     WaveShape::Gaussian,
//! );
//!
//! // 2. Run the schemes of interest
//! let report = run(&config, &[SchemeKind::Upwind, SchemeKind::CrankNicolson]).unwrap();
//!
//! // 3. Inspect diagnostics
//! let upwind = report.outcome(SchemeKind::Upwind).unwrap();
//! assert!(upwind.diagnostics.relative_mass_drift() < 1e-12);
//! println!("{}", report);
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Grid, field state, initial profiles and exact solution
//! - [`solver`]: Configuration, schemes and the run orchestrator
//! - [`analysis`]: Mass/error/energy diagnostics and von Neumann stability
//! - [`output`]: CSV export and static plots
//! - [`error`]: Error type shared by the core

// Core modules
pub mod error;
pub mod physics;

pub mod analysis;
pub mod solver;

pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use advect_rs::prelude::*;
    //! ```
    pub use crate::analysis::{Diagnostics, ErrorNorm, StabilityClass};
    pub use crate::error::{AdvectionError, Result};
    pub use crate::physics::{build_grid, FieldState, Grid, InitialProfile, ShapeParameters, WaveShape};
    pub use crate::solver::{
        run, run_all, scheme_for, Scheme, SchemeHistory, SchemeKind, SchemeOutcome, SimulationConfig,
        SimulationReport, TimeStepping,
    };
}
