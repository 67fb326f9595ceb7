//! Post-processing of scheme histories
//!
//! - **`diagnostics`**: mass, error against the exact solution and energy, per
//!   time level and per scheme
//! - **`stability`**: von Neumann amplification factors and the CFL
//!   classification used to warn about unstable selections

pub mod diagnostics;
pub mod stability;

pub use diagnostics::{energy, error, mass, Diagnostics, ErrorNorm};
pub use stability::{amplification_factor, classify, max_amplification, StabilityClass};
