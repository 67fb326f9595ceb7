//! Diagnostics over time
//!
//! One curve per successful scheme for the chosen quantity. Mass and energy
//! also get the exact solution's value as a reference line. Both are
//! invariants of the continuous problem, but the sampled sums wobble with the
//! sub-cell position of the profile, so the line is only approximately flat
//! (exactly flat when v·dt is a whole number of cells).
//!
//! ```rust,ignore
//! plot_diagnostics(&report, DiagnosticSeries::Energy, "energy.png", None)?;
//! ```

use plotters::prelude::*;
use std::error::Error;
use std::fmt;

use super::config::PlotConfig;
use super::padded_range;
use crate::analysis::{energy, mass, Diagnostics};
use crate::physics::FieldState;
use crate::solver::{SchemeKind, SimulationReport};

/// Quantity drawn by [`plot_diagnostics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeries {
    Mass,
    Error,
    Energy,
}

impl DiagnosticSeries {
    pub const ALL: [DiagnosticSeries; 3] = [Self::Mass, Self::Error, Self::Energy];

    /// Axis label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mass => "mass  dx·Σu",
            Self::Error => "error vs exact",
            Self::Energy => "energy  dx·Σu²",
        }
    }

    fn points(&self, diagnostics: &Diagnostics) -> Vec<(f64, f64)> {
        match self {
            Self::Mass => diagnostics.mass_series(),
            Self::Error => diagnostics.error_series(),
            Self::Energy => diagnostics.energy_series(),
        }
    }

    /// Same quantity evaluated on the exact solution (none for the error)
    fn reference(&self, report: &SimulationReport) -> Option<Vec<(f64, f64)>> {
        let dx = report.stepping.dx();
        let measure: fn(&FieldState, f64) -> f64 = match self {
            Self::Mass => mass,
            Self::Energy => energy,
            Self::Error => return None,
        };

        Some(
            report
                .time_points
                .iter()
                .zip(&report.exact)
                .map(|(t, state)| (*t, measure(state, dx)))
                .collect(),
        )
    }
}

impl fmt::Display for DiagnosticSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mass => "mass",
            Self::Error => "error",
            Self::Energy => "energy",
        };
        write!(f, "{}", name)
    }
}

/// Keep drawable points; with a log axis, map y to log10 and drop y ≤ 0
fn plottable(points: Vec<(f64, f64)>, log_scale: bool) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .filter_map(|(t, y)| {
            if log_scale {
                (y > 0.0).then_some((t, y.log10()))
            } else {
                Some((t, y))
            }
        })
        .filter(|(t, y)| t.is_finite() && y.is_finite())
        .collect()
}

// =================================================================================================
// Plotting
// =================================================================================================

/// Plot `series` over time for every successful scheme of `report`
///
/// # Arguments
///
/// * `report` - Result of [`run`](crate::solver::run)
/// * `series` - Mass, error or energy
/// * `output_path` - Path to save the plot (PNG or SVG)
/// * `config` - Optional plot configuration (default: [`PlotConfig::diagnostics`])
///
/// # Errors
///
/// Fails when no scheme succeeded, when nothing finite is left to draw, or on
/// any drawing backend error.
pub fn plot_diagnostics(
    report: &SimulationReport,
    series: DiagnosticSeries,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    // Create default config if needed (avoid temporary value)
    let default_config = PlotConfig::diagnostics(format!("{} over time", series));
    let config = config.unwrap_or(&default_config);

    let curves: Vec<(SchemeKind, Vec<(f64, f64)>)> = report
        .successes()
        .map(|(kind, outcome)| (kind, plottable(series.points(&outcome.diagnostics), config.log_scale)))
        .collect();

    if curves.is_empty() {
        return Err("No successful scheme to plot".into());
    }

    let reference = series
        .reference(report)
        .map(|points| plottable(points, config.log_scale));

    let (y_min, y_max) = padded_range(
        curves
            .iter()
            .map(|(_, points)| points)
            .chain(reference.iter())
            .flat_map(|points| points.iter().map(|p| p.1)),
    )
    .ok_or("No finite value to plot")?;

    let t_start = report.time_points.first().copied().unwrap_or(0.0);
    let t_end = report.time_points.last().copied().unwrap_or(t_start);
    let t_end = if t_end > t_start { t_end } else { t_start + 1.0 };

    let ylabel = match (config.ylabel.is_empty(), config.log_scale) {
        (false, _) => config.ylabel.clone(),
        (true, false) => series.label().to_string(),
        (true, true) => format!("log10 {}", series.label()),
    };

    let frame = Frame {
        x_range: (t_start, t_end),
        y_range: (y_min, y_max),
        ylabel,
    };

    // Determine backend and plot
    let ext = std::path::Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            plot_series_impl(backend, &curves, reference.as_deref(), &frame, config)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            plot_series_impl(backend, &curves, reference.as_deref(), &frame, config)
        }
    }
}

struct Frame {
    x_range: (f64, f64),
    y_range: (f64, f64),
    ylabel: String,
}

/// Implementation for diagnostics plotting with concrete backend
fn plot_series_impl<DB: DrawingBackend>(
    backend: DB,
    curves: &[(SchemeKind, Vec<(f64, f64)>)],
    reference: Option<&[(f64, f64)]>,
    frame: &Frame,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(
            frame.x_range.0..frame.x_range.1,
            frame.y_range.0..frame.y_range.1,
        )?;

    let log_scale = config.log_scale;
    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&frame.ylabel)
            .x_label_formatter(&|x| format!("{:.3}", x))
            .y_label_formatter(&|y| {
                if log_scale {
                    format!("1e{:.1}", y)
                } else {
                    format!("{:.3e}", y)
                }
            })
            .draw()?;
    }

    if let Some(points) = reference {
        let color = config.exact_color;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), &color))?
            .label("Exact")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    for (kind, points) in curves {
        let color = config.scheme_color(*kind);

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                ShapeStyle::from(&color).stroke_width(config.line_width),
            ))?
            .label(kind.name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&config.background.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
