//! Export of simulation results
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file and existing ones stay untouched.
//!
//! # Available formats
//!
//! | Format | Module  |
//! |--------|---------|
//! | CSV    | [`csv`] |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use advect_rs::output::export::{CsvExporter, Exporter};
//! use advect_rs::solver::{run_all, SchemeKind, SimulationConfig};
//! use std::path::Path;
//!
//! let report = run_all(&SimulationConfig::default()).unwrap();
//! let exporter = CsvExporter::default();
//!
//! // Diagnostics of every scheme
//! exporter.export_report(&report, Path::new("diagnostics.csv")).unwrap();
//!
//! // Lax-Wendroff history downsampled to 50 snapshots
//! let lw = report.outcome(SchemeKind::LaxWendroff).unwrap();
//! exporter
//!     .export_history(&lw.history, &report.grid, Some(50), Path::new("lw.csv"))
//!     .unwrap();
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, HistoryLayout};

use crate::physics::Grid;
use crate::solver::{SchemeHistory, SimulationReport};
use std::path::Path;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so the caller
/// can react to the precise failure without boxing.
///
/// # Parameter `n_snapshots`
///
/// - `None`: exports every time level
/// - `Some(n)`: keeps `n` uniformly spread levels, always including the
///   **first and last** (see [`downsample_indices`])
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Export the field history of one scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the history is empty, does not match the grid, or
    /// the file cannot be written.
    fn export_history(
        &self,
        history: &SchemeHistory,
        grid: &Grid,
        n_snapshots: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Export the mass, error and energy series of every successful scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if no scheme succeeded or the file cannot be written.
    fn export_report(&self, report: &SimulationReport, path: &Path) -> Result<(), Self::Error>;
}

/// Indices of `n` levels uniformly spread over `0..len`
///
/// The first and last index are always kept. `n ≥ len` keeps everything,
/// `n < 2` still keeps both ends.
///
/// # Example
///
/// ```rust
/// use advect_rs::output::export::downsample_indices;
///
/// assert_eq!(downsample_indices(11, 3), vec![0, 5, 10]);
/// assert_eq!(downsample_indices(4, 10), vec![0, 1, 2, 3]);
/// ```
pub fn downsample_indices(len: usize, n: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    if n >= len || len <= 2 {
        return (0..len).collect();
    }

    let n = n.max(2);
    let last = len - 1;

    let mut indices: Vec<usize> = (0..n)
        .map(|k| ((k as f64 * last as f64) / (n - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_keeps_ends() {
        let indices = downsample_indices(101, 7);
        assert_eq!(indices.len(), 7);
        assert_eq!(indices[0], 0);
        assert_eq!(*indices.last().unwrap(), 100);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_downsample_small_requests() {
        assert_eq!(downsample_indices(10, 0), vec![0, 9]);
        assert_eq!(downsample_indices(10, 1), vec![0, 9]);
        assert_eq!(downsample_indices(1, 5), vec![0]);
        assert!(downsample_indices(0, 5).is_empty());
    }
}
