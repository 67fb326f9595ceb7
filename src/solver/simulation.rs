//! Simulation orchestrator
//!
//! [`run`] is the single entry point a presentation layer calls:
//!
//! ```text
//! SimulationConfig ──► validate ──► Grid ──► u0 ──┬──► scheme 1 ──┐
//!                                                 ├──► scheme 2 ──┼──► diagnostics ──► SimulationReport
//!                                                 ├──►   …       ──┤
//!                                                 └──► exact  ────┘
//! ```
//!
//! - Configuration errors (and an empty selection) fail the whole run before
//!   anything is computed.
//! - A failing scheme only loses its own entry: every entry of
//!   [`SimulationReport::outcomes`] is its own `Result`.
//! - Unstable selections are logged and run anyway.
//!
//! Scheme histories are independent of each other. With the `parallel`
//! feature they are computed on the rayon pool once the work size
//! `Nx · (Nt + 1) · schemes` exceeds [`parallel_threshold`]; the output is
//! the same either way.

use crate::analysis::Diagnostics;
use crate::error::{AdvectionError, Result};
use crate::physics::{build_grid, exact_history, FieldState, Grid, InitialProfile};
use crate::solver::config::{SimulationConfig, TimeStepping};
use crate::solver::methods::scheme_for;
use crate::solver::parallel_threshold;
use crate::solver::traits::{Scheme, SchemeHistory, SchemeKind};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =================================================================================================
// Results
// =================================================================================================

/// History and diagnostics of one scheme
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeOutcome {
    pub history: SchemeHistory,
    pub diagnostics: Diagnostics,
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Configuration the run was made with
    pub config: SimulationConfig,

    /// Periodic mesh
    pub grid: Grid,

    /// dx, dt, Nt and Courant number
    pub stepping: TimeStepping,

    /// t_0 … t_Nt
    pub time_points: Vec<f64>,

    /// Exact solution at every time point
    pub exact: Vec<FieldState>,

    /// Per-scheme result, ordered by [`SchemeKind`]
    pub outcomes: BTreeMap<SchemeKind, Result<SchemeOutcome>>,
}

impl SimulationReport {
    /// Successful outcome of `kind`, if it was selected and did not fail
    pub fn outcome(&self, kind: SchemeKind) -> Option<&SchemeOutcome> {
        self.outcomes.get(&kind).and_then(|r| r.as_ref().ok())
    }

    /// Failure of `kind`, if it was selected and failed
    pub fn failure(&self, kind: SchemeKind) -> Option<&AdvectionError> {
        self.outcomes.get(&kind).and_then(|r| r.as_ref().err())
    }

    /// Selected schemes, in order
    pub fn schemes(&self) -> impl Iterator<Item = SchemeKind> + '_ {
        self.outcomes.keys().copied()
    }

    /// Successful outcomes, in order
    pub fn successes(&self) -> impl Iterator<Item = (SchemeKind, &SchemeOutcome)> {
        self.outcomes
            .iter()
            .filter_map(|(kind, result)| result.as_ref().ok().map(|outcome| (*kind, outcome)))
    }

    /// Number of selected schemes
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no scheme was selected (never the case for a report from [`run`])
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// u^0
    pub fn initial_state(&self) -> Option<&FieldState> {
        self.exact.first()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Nx = {}, dx = {:.4e}, dt = {:.4e}, Nt = {}, C = {:.3}, error norm = {}",
            self.grid.len(),
            self.stepping.dx(),
            self.stepping.dt(),
            self.stepping.steps(),
            self.stepping.courant(),
            self.config.error_norm
        )?;
        writeln!(
            f,
            "{:<16} {:<44} {:>12} {:>12} {:>12}",
            "scheme", "stability", "mass drift", "final error", "energy ×"
        )?;

        for (kind, result) in &self.outcomes {
            let stability = kind.stability(self.stepping.courant());
            match result {
                Ok(outcome) => writeln!(
                    f,
                    "{:<16} {:<44} {:>12.3e} {:>12.3e} {:>12.4}",
                    kind.name(),
                    stability.to_string(),
                    outcome.diagnostics.relative_mass_drift(),
                    outcome.diagnostics.final_error(),
                    outcome.diagnostics.energy_growth()
                )?,
                Err(e) => writeln!(f, "{:<16} failed: {}", kind.name(), e)?,
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Orchestration
// =================================================================================================

/// Run every selected scheme on `config` and compare it with the exact solution
///
/// Duplicate selections are collapsed.
///
/// # Errors
///
/// - [`AdvectionError::InvalidConfig`] for a malformed configuration
/// - [`AdvectionError::EmptySelection`] when `schemes` is empty
///
/// Per-scheme failures ([`AdvectionError::SingularSystem`]) are stored in the
/// report, not returned.
///
/// # Parallel execution
///
/// [`parallel_threshold`](crate::solver::parallel_threshold) only decides
/// whether histories are computed on the rayon pool. The report is
/// bit-identical either way, so the threshold is a scheduling knob and never
/// an input of the result.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::WaveShape;
/// use advect_rs::solver::{run, SchemeKind, SimulationConfig};
///
/// let config = SimulationConfig::new(1.0, 1.0, 0.5, 100, 0.8, WaveShape::Gaussian);
/// let report = run(&config, &[SchemeKind::LaxWendroff, SchemeKind::CrankNicolson]).unwrap();
///
/// assert_eq!(report.len(), 2);
/// let lw = report.outcome(SchemeKind::LaxWendroff).unwrap();
/// assert_eq!(lw.history.len(), report.time_points.len());
/// assert!(lw.diagnostics.relative_mass_drift() < 1e-12);
/// ```
pub fn run(config: &SimulationConfig, schemes: &[SchemeKind]) -> Result<SimulationReport> {
    run_with(config, schemes, scheme_for)
}

/// [`run`] with the scheme implementations supplied by `make_scheme`
fn run_with<S>(config: &SimulationConfig, schemes: &[SchemeKind], make_scheme: S) -> Result<SimulationReport>
where
    S: Fn(SchemeKind) -> Box<dyn Scheme> + Sync,
{
    let stepping = config.time_stepping()?;

    let selected: BTreeSet<SchemeKind> = schemes.iter().copied().collect();
    if selected.is_empty() {
        return Err(AdvectionError::EmptySelection);
    }

    let grid = build_grid(config.length, config.nx)?;
    let profile = InitialProfile::new(config.shape, &config.shape_parameters, config.length)?;
    let initial = profile.sample(&grid);
    let time_points = stepping.time_points();

    debug!(
        "advection run: L = {}, v = {}, T = {}, Nx = {}, dx = {:.4e}, dt = {:.4e}, Nt = {}, C = {:.4}, shape = {}",
        config.length,
        config.velocity,
        config.total_time,
        grid.len(),
        stepping.dx(),
        stepping.dt(),
        stepping.steps(),
        stepping.courant(),
        profile.shape()
    );

    for kind in &selected {
        let stability = kind.stability(stepping.courant());
        if !stability.is_stable() {
            warn!(
                "{} is {} at C = {:.3}; running anyway, diagnostics will show the divergence",
                kind,
                stability,
                stepping.courant()
            );
        }
    }

    let kinds: Vec<SchemeKind> = selected.into_iter().collect();
    let work = grid.len() * time_points.len() * kinds.len();

    let (histories, exact) = compute(&kinds, &make_scheme, &initial, &stepping, work, || {
        exact_history(&profile, &grid, config.velocity, &time_points)
    });

    let mut outcomes = BTreeMap::new();
    for (kind, history) in kinds.into_iter().zip(histories) {
        let outcome = history.and_then(|history| {
            let diagnostics =
                Diagnostics::compute(&history, &exact, stepping.dx(), config.error_norm)?;
            Ok(SchemeOutcome {
                history,
                diagnostics,
            })
        });

        if let Err(e) = &outcome {
            warn!("{} failed, other schemes are kept: {}", kind, e);
        }
        outcomes.insert(kind, outcome);
    }

    let failed = outcomes.values().filter(|r| r.is_err()).count();
    info!(
        "advection run finished: {} scheme(s), {} failed, {} time levels",
        outcomes.len(),
        failed,
        time_points.len()
    );

    Ok(SimulationReport {
        config: config.clone(),
        grid,
        stepping,
        time_points,
        exact,
        outcomes,
    })
}

/// Run every scheme in [`SchemeKind::ALL`]
pub fn run_all(config: &SimulationConfig) -> Result<SimulationReport> {
    run(config, &SchemeKind::ALL)
}

/// Scheme histories (in `kinds` order) and the exact history
fn compute<S, E>(
    kinds: &[SchemeKind],
    make_scheme: &S,
    initial: &FieldState,
    stepping: &TimeStepping,
    work: usize,
    exact: E,
) -> (Vec<Result<SchemeHistory>>, Vec<FieldState>)
where
    S: Fn(SchemeKind) -> Box<dyn Scheme> + Sync,
    E: FnOnce() -> Vec<FieldState> + Send,
{
    let integrate = |kind: &SchemeKind| make_scheme(*kind).integrate(initial, stepping);

    if work > parallel_threshold() {
        // Above threshold: schemes and exact history are independent tasks
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            debug!("computing {} scheme(s) on the rayon pool (work = {})", kinds.len(), work);
            let (histories, exact) =
                rayon::join(|| kinds.par_iter().map(integrate).collect::<Vec<_>>(), exact);
            return (histories, exact);
        }
    }

    (kinds.iter().map(integrate).collect(), exact())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ErrorNorm;
    use crate::physics::WaveShape;
    use crate::solver::ThresholdGuard;

    /// Implicit stand-in whose linear system never solves
    struct SingularScheme;

    impl Scheme for SingularScheme {
        fn kind(&self) -> SchemeKind {
            SchemeKind::CrankNicolson
        }

        fn integrate(&self, _: &FieldState, _: &TimeStepping) -> Result<SchemeHistory> {
            Err(AdvectionError::singular(self.kind(), "zero pivot"))
        }
    }

    fn singular_crank_nicolson(kind: SchemeKind) -> Box<dyn Scheme> {
        match kind {
            SchemeKind::CrankNicolson => Box::new(SingularScheme),
            other => scheme_for(other),
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(1.0, 1.0, 0.2, 40, 0.8, WaveShape::Gaussian)
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert_eq!(run(&config(), &[]).unwrap_err(), AdvectionError::EmptySelection);
    }

    #[test]
    fn test_invalid_config_fails_before_selection_check() {
        let mut bad = config();
        bad.nx = 2;
        assert!(matches!(
            run(&bad, &[]),
            Err(AdvectionError::InvalidConfig { parameter: "Nx", .. })
        ));
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let report = run(&config(), &[SchemeKind::Upwind, SchemeKind::Upwind]).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.schemes().collect::<Vec<_>>(), vec![SchemeKind::Upwind]);
    }

    #[test]
    fn test_report_shapes() {
        let report = run_all(&config()).unwrap();
        let levels = report.stepping.steps() + 1;

        assert_eq!(report.len(), 6);
        assert_eq!(report.time_points.len(), levels);
        assert_eq!(report.exact.len(), levels);

        for (kind, outcome) in report.successes() {
            assert_eq!(outcome.history.kind, kind);
            assert_eq!(outcome.history.len(), levels);
            assert_eq!(outcome.diagnostics.len(), levels);
            assert_eq!(outcome.history.states[0], report.exact[0]);
        }
        assert_eq!(report.successes().count(), 6);
    }

    #[test]
    fn test_sequential_and_parallel_paths_agree() {
        let sequential = {
            let _guard = ThresholdGuard::save(usize::MAX);
            run_all(&config()).unwrap()
        };
        let parallel = {
            let _guard = ThresholdGuard::save(1);
            run_all(&config()).unwrap()
        };

        assert_eq!(sequential.exact, parallel.exact);
        assert_eq!(sequential.outcomes, parallel.outcomes);
    }

    #[test]
    fn test_display_lists_every_scheme() {
        let report = run_all(&config()).unwrap();
        let text = report.to_string();
        for kind in SchemeKind::ALL {
            assert!(text.contains(kind.name()), "missing {}", kind);
        }
        assert!(text.contains("unconditionally unstable"));
    }

    #[test]
    fn test_error_norm_follows_config() {
        let report = run(&config().with_error_norm(ErrorNorm::L2), &[SchemeKind::Upwind]).unwrap();
        let outcome = report.outcome(SchemeKind::Upwind).unwrap();
        assert_eq!(outcome.diagnostics.norm, ErrorNorm::L2);
        assert!(report.failure(SchemeKind::Upwind).is_none());
    }

    #[test]
    fn test_scheme_failure_is_isolated() {
        for threshold in [usize::MAX, 1] {
            let _guard = ThresholdGuard::save(threshold);
            let report = run_with(&config(), &SchemeKind::ALL, singular_crank_nicolson).unwrap();

            assert_eq!(report.len(), 6);
            assert!(matches!(
                report.failure(SchemeKind::CrankNicolson),
                Some(AdvectionError::SingularSystem { scheme: SchemeKind::CrankNicolson, .. })
            ));
            assert!(report.outcome(SchemeKind::CrankNicolson).is_none());
            assert_eq!(report.successes().count(), 5);

            let reference = run(&config(), &[SchemeKind::BackwardEuler]).unwrap();
            assert_eq!(
                report.outcome(SchemeKind::BackwardEuler),
                reference.outcome(SchemeKind::BackwardEuler)
            );
            assert!(report.to_string().contains("failed: "));
            assert!(report.to_string().contains("zero pivot"));
        }
    }
}
