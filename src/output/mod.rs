//! Output module for simulation reports
//!
//! - **Visualization**: PNG/SVG plots using plotters
//! - **Export**: CSV export for external analysis
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── visualization/      ← Plots
//! │   ├── mod.rs
//! │   ├── config.rs
//! │   ├── series.rs
//! │   └── profiles.rs
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use advect_rs::output::{plot_diagnostics, CsvExporter, DiagnosticSeries, Exporter};
//! use advect_rs::solver::{run_all, SimulationConfig};
//! use std::path::Path;
//!
//! let report = run_all(&SimulationConfig::default()).unwrap();
//!
//! plot_diagnostics(&report, DiagnosticSeries::Error, "error.png", None).unwrap();
//! CsvExporter::default()
//!     .export_report(&report, Path::new("diagnostics.csv"))
//!     .unwrap();
//! ```
//!
//! Both sub-modules only read a [`SimulationReport`](crate::solver::SimulationReport);
//! nothing here feeds back into the solver.

pub mod export;
pub mod visualization;

// Re-export commonly used items for convenience
pub use visualization::{plot_diagnostics, plot_profiles, DiagnosticSeries, PlotConfig};

pub use export::{CsvConfig, CsvExporter, Exporter, HistoryLayout};
