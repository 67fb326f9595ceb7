//! Spatial profiles at one snapshot
//!
//! Overlays u(x) of every successful scheme at time index `step` on the exact
//! solution, which makes numerical diffusion (flattened peaks) and dispersion
//! (trailing wiggles) visible side by side.

use plotters::prelude::*;
use std::error::Error;

use super::config::{PlotConfig, NO_TITLE};
use super::padded_range;
use crate::physics::{FieldState, Grid};
use crate::solver::{SchemeKind, SimulationReport};

/// Finite (x, u) samples of `state`
fn samples(grid: &Grid, state: &FieldState) -> Vec<(f64, f64)> {
    state
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, u)| (grid.x(i), *u))
        .filter(|(_, u)| u.is_finite())
        .collect()
}

/// Plot every scheme's field at time index `step` against the exact solution
///
/// # Arguments
///
/// * `report` - Result of [`run`](crate::solver::run)
/// * `step` - Time index, `0..=Nt`
/// * `output_path` - Path to save the plot (PNG or SVG)
/// * `config` - Optional plot configuration (default: [`PlotConfig::profiles`]
///   titled with the snapshot time)
///
/// # Example
///
/// ```rust,ignore
/// let last = report.stepping.steps();
/// plot_profiles(&report, last, "final.svg", None)?;
/// ```
pub fn plot_profiles(
    report: &SimulationReport,
    step: usize,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let exact_state = report
        .exact
        .get(step)
        .ok_or_else(|| format!("Snapshot {} out of range (Nt = {})", step, report.stepping.steps()))?;

    let exact = samples(&report.grid, exact_state);

    let curves: Vec<(SchemeKind, Vec<(f64, f64)>)> = report
        .successes()
        .filter_map(|(kind, outcome)| {
            outcome
                .history
                .state_at(step)
                .map(|state| (kind, samples(&report.grid, state)))
        })
        .collect();

    if curves.is_empty() {
        return Err("No successful scheme to plot".into());
    }

    // Create default config if needed (avoid temporary value)
    let default_config = match report.time_points.get(step) {
        Some(t) => PlotConfig::profiles(format!("u(x) at t = {:.4}", t)),
        None => PlotConfig::profiles(NO_TITLE),
    };
    let config = config.unwrap_or(&default_config);

    let (u_min, u_max) = padded_range(
        curves
            .iter()
            .map(|(_, points)| points)
            .chain(std::iter::once(&exact))
            .flat_map(|points| points.iter().map(|p| p.1)),
    )
    .ok_or("No finite value to plot")?;

    let length = report.grid.length();

    // Determine backend and plot
    let ext = std::path::Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            plot_profiles_impl(backend, &exact, &curves, config, length, (u_min, u_max))
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            plot_profiles_impl(backend, &exact, &curves, config, length, (u_min, u_max))
        }
    }
}

/// Implementation for profile plotting with concrete backend
fn plot_profiles_impl<DB: DrawingBackend>(
    backend: DB,
    exact: &[(f64, f64)],
    curves: &[(SchemeKind, Vec<(f64, f64)>)],
    config: &PlotConfig,
    length: f64,
    u_range: (f64, f64),
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
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..length, u_range.0..u_range.1)?;

    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&config.ylabel)
            .x_label_formatter(&|x| format!("{:.3}", x))
            .y_label_formatter(&|y| format!("{:.3}", y))
            .draw()?;
    }

    let exact_color = config.exact_color;
    chart
        .draw_series(LineSeries::new(
            exact.iter().copied(),
            ShapeStyle::from(&exact_color).stroke_width(config.line_width + 1),
        ))?
        .label("Exact")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &exact_color));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{build_grid, WaveShape};
    use crate::solver::{run, SimulationConfig};

    #[test]
    fn test_samples_skip_non_finite() {
        let grid = build_grid(1.0, 4).unwrap();
        let state = FieldState::from_vec(vec![1.0, f64::NAN, f64::INFINITY, 2.0]);
        assert_eq!(samples(&grid, &state), vec![(0.0, 1.0), (0.75, 2.0)]);
    }

    #[test]
    fn test_step_out_of_range() {
        let config = SimulationConfig::new(1.0, 1.0, 0.1, 20, 0.5, WaveShape::Square);
        let report = run(&config, &[SchemeKind::LaxWendroff]).unwrap();
        let beyond = report.stepping.steps() + 1;

        let error = plot_profiles(&report, beyond, "unused.png", None).unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }
}
