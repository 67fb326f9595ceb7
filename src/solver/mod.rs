//! Numerical schemes and run orchestration
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Configuration** (`SimulationConfig`): WHAT to solve
//!    - Domain length, velocity, horizon
//!    - Resolution and Courant number
//!    - Initial waveform
//!
//! 2. **Schemes** (`Scheme` trait): HOW to advance the field
//!    - Explicit stencils (FECS, Upwind, Leapfrog, Lax-Wendroff)
//!    - Implicit θ-schemes (Crank-Nicolson, Backward Euler)
//!
//! 3. **Orchestrator** (`run`): runs the selected schemes on one
//!    configuration, evaluates the exact solution and packages histories and
//!    diagnostics.
//!
//! # Module Organization
//!
//! - **`config`**: `SimulationConfig`, `TimeStepping`
//! - **`traits`**: `SchemeKind`, `Scheme`, `StencilParameters`, `SchemeHistory`
//! - **`methods`**: concrete schemes and `scheme_for`
//! - **`simulation`**: `run`, `SimulationReport`, `SchemeOutcome`
//!
//! # Quick Start Example
//!
//! ```rust
//! use advect_rs::physics::WaveShape;
//! use advect_rs::solver::{run, SchemeKind, SimulationConfig};
//!
//! let config = SimulationConfig::new(
//!     1.0,  // L
//!     1.0,  // v
//!     0.5,  // T
//!     100,  // Nx
//!     0.8,  // C
//!     WaveShape::Square,
//! );
//!
//! let report = run(&config, &SchemeKind::ALL).unwrap();
//!
//! for (kind, outcome) in report.successes() {
//!     println!(
//!         "{:<16} final error {:.3e}",
//!         kind,
//!         outcome.diagnostics.final_error()
//!     );
//! }
//! ```
//!
//! # Error Handling
//!
//! Configuration problems fail the run with
//! [`AdvectionError::InvalidConfig`](crate::error::AdvectionError). A scheme
//! whose linear system cannot be solved fails only its own entry of the
//! report. Instability is never an error.

// =================================================================================================
// Module Declarations
// =================================================================================================
pub mod config;
pub mod methods;
pub mod simulation;
pub mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work to Rayon is an execution concern and lives
// here, next to the orchestrator that uses it.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (benchmarks and tests) without a mutex. Relaxed ordering is enough:
// the value is a performance hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default work size (`Nx · (Nt + 1) · schemes`) above which [`run`] computes
/// scheme histories on the rayon pool.
///
/// Below it, thread-pool dispatch costs more than the stencil updates it
/// would spread out.
const DEFAULT_PARALLEL_THRESHOLD: usize = 49_999;

/// Runtime-configurable parallel-execution threshold.
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Only has an effect when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use advect_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// Only the scheduling changes: reports are bit-identical on both sides of
/// the threshold.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use advect_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds.
///
/// ```rust,ignore
/// let _guard = crate::solver::ThresholdGuard::save(50);
/// // threshold is now 50 …
/// // … and is automatically restored when _guard is dropped.
/// ```
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
    _exclusive: std::sync::MutexGuard<'static, ()>,
}

/// Serialises guards across concurrently running tests.
#[cfg(test)]
static GUARD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    ///
    /// Guards must not be nested: a second `save` on the same thread blocks.
    pub(crate) fn save(new_value: usize) -> Self {
        let exclusive = GUARD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self {
            previous,
            _exclusive: exclusive,
        }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use config::{SimulationConfig, TimeStepping};
pub use methods::scheme_for;
pub use simulation::{run, run_all, SchemeOutcome, SimulationReport};
pub use traits::{Scheme, SchemeHistory, SchemeKind, StencilParameters};

// =================================================================================================
// Tests
// =================================================================================================
