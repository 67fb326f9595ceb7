//! Static plots of simulation reports
//!
//! This module draws PNG or SVG images (chosen by file extension) with the
//! `plotters` library.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **series**: Diagnostics over time (mass, error, energy), one curve per scheme
//! - **profiles**: u(x) of every scheme at one snapshot against the exact solution
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use advect_rs::output::visualization::{plot_diagnostics, plot_profiles, DiagnosticSeries, PlotConfig};
//! use advect_rs::solver::{run_all, SimulationConfig};
//!
//! let report = run_all(&SimulationConfig::default()).unwrap();
//!
//! plot_diagnostics(&report, DiagnosticSeries::Mass, "mass.png", None).unwrap();
//!
//! let mut config = PlotConfig::diagnostics("Error");
//! config.log_scale = true;
//! plot_diagnostics(&report, DiagnosticSeries::Error, "error.svg", Some(&config)).unwrap();
//!
//! let last = report.stepping.steps();
//! plot_profiles(&report, last, "final.png", None).unwrap();
//! ```
//!
//! Non-finite samples (unstable schemes) are skipped so that one blown-up
//! curve does not prevent drawing the others.
//!
//! | Use Case | Function |
//! |----------|----------|
//! | Mass conservation / dissipation | `plot_diagnostics(.., Mass, ..)` |
//! | Accuracy or instability | `plot_diagnostics(.., Error, ..)` |
//! | Amplification | `plot_diagnostics(.., Energy, ..)` |
//! | Dispersion and diffusion shapes | `plot_profiles` |

pub mod config;
pub mod profiles;
pub mod series;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};
pub use profiles::plot_profiles;
pub use series::{plot_diagnostics, DiagnosticSeries};

/// Axis range covering every value, padded by 5%
///
/// A flat range is widened so that plotters gets a non-empty interval.
/// Returns None when there is no value.
pub(crate) fn padded_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let span = hi - lo;
    let pad = if span > 0.0 {
        0.05 * span
    } else {
        (0.1 * hi.abs()).max(1e-10)
    };

    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range([0.0, 2.0, 1.0]).unwrap();
        assert_relative_eq!(lo, -0.1);
        assert_relative_eq!(hi, 2.1);
    }

    #[test]
    fn test_flat_range_is_widened() {
        let (lo, hi) = padded_range([0.0, 0.0]).unwrap();
        assert!(lo < 0.0 && hi > 0.0);

        let (lo, hi) = padded_range([5.0]).unwrap();
        assert_relative_eq!(lo, 4.5);
        assert_relative_eq!(hi, 5.5);
    }

    #[test]
    fn test_empty_range() {
        assert!(padded_range(std::iter::empty()).is_none());
    }
}
