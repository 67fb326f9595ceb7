//! Physical problem definition
//!
//! This module describes WHAT is being solved, independently of any numerical
//! scheme:
//!
//! - **Grid**: the uniform periodic mesh over `[0, L)`
//! - **FieldState**: the scalar field u at one instant
//! - **Initial profiles**: the four closed-form waveforms u(x, 0)
//! - **Exact solution**: u(x, t) = u0((x - v·t) mod L)
//!
//! # Example
//!
//! ```rust
//! use advect_rs::physics::{build_grid, exact, initial_condition, ShapeParameters, WaveShape};
//!
//! let grid = build_grid(1.0, 100).unwrap();
//! let params = ShapeParameters::centered(0.05);
//!
//! let u0 = initial_condition(WaveShape::Gaussian, &grid, &params).unwrap();
//! let u_half = exact(WaveShape::Gaussian, &grid, 1.0, 0.5, &params).unwrap();
//!
//! // After half a period the bell sits at x = 0 (wrapped)
//! assert!((u_half[0] - 1.0).abs() < 1e-12);
//! assert!((u0[50] - 1.0).abs() < 1e-12);
//! ```

pub mod exact;
pub mod grid;
pub mod profile;
pub mod state;

pub use exact::{exact, exact_history, exact_state};
pub use grid::{build_grid, periodic_neighbors, Grid, MIN_POINTS};
pub use profile::{initial_condition, InitialProfile, ShapeParameters, WaveShape};
pub use state::FieldState;
