//! CSV export of advection results
//!
//! CSV is readable by spreadsheets, pandas, MATLAB and most plotting tools.
//!
//! # Features
//!
//! - **Histories**: one scheme's u(x, t) in long (`time,x,u`) or wide
//!   (`time,u(x=…),…`) layout, optionally downsampled in time
//! - **Diagnostics**: mass, error and energy of every scheme of a report
//! - **Metadata**: optional `#` header with run parameters and a timestamp
//! - **Locale**: delimiter, decimal separator and precision are configurable
//!
//! Non-finite values from unstable runs are written as `NaN`/`inf`: they are
//! data, not errors.
//!
//! # Output (`export_report`, metadata enabled)
//!
//! ```csv
//! # Linear Advection Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # L: 1
//! # v: 1
//! # ...
//! #
//! scheme,time,mass,error,energy
//! fecs,0.000000,0.088623,0.000000,0.062666
//! ...
//! ```

use crate::physics::Grid;
use crate::solver::{SchemeHistory, SimulationReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use super::{downsample_indices, Exporter};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by the CSV exporter
#[derive(Debug, Error)]
pub enum CsvError {
    /// File creation or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to export
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// History and grid (or time points) disagree
    #[error("Data length mismatch: {0}")]
    LengthMismatch(String),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Row layout of a history export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryLayout {
    /// One row per (time, x) pair: `time,x,u`
    #[default]
    Long,

    /// One row per time level, one column per grid point
    Wide,
}

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use advect_rs::output::export::{CsvConfig, HistoryLayout};
///
/// let config = CsvConfig::european()
///     .precision(10)
///     .layout(HistoryLayout::Wide)
///     .with_metadata();
/// assert_eq!(config.delimiter, ';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places (default: 6)
    pub precision: usize,

    /// Write the `#` metadata header (default: false)
    pub include_metadata: bool,

    /// History layout (default: long)
    pub layout: HistoryLayout,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            layout: HistoryLayout::Long,
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter, comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// 12 decimal places
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: set history layout
    pub fn layout(mut self, layout: HistoryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder pattern: enable the metadata header
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Write `# key: value` lines framed by a title and a closing `#`
fn write_metadata_header<W: Write>(out: &mut W, entries: &[(String, String)]) -> Result<(), CsvError> {
    writeln!(out, "# Linear Advection Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    for (key, value) in entries {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;
    Ok(())
}

fn history_metadata(history: &SchemeHistory, grid: &Grid) -> Vec<(String, String)> {
    let mut entries = vec![
        ("Scheme".to_string(), history.kind.name().to_string()),
        ("L".to_string(), grid.length().to_string()),
        ("Nx".to_string(), grid.len().to_string()),
    ];

    let mut extra: Vec<_> = history
        .metadata
        .iter()
        .filter(|(key, _)| key.as_str() != "scheme")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    extra.sort();

    entries.extend(extra);
    entries
}

fn report_metadata(report: &SimulationReport) -> Vec<(String, String)> {
    let config = &report.config;
    let mut entries = vec![
        ("L".to_string(), config.length.to_string()),
        ("v".to_string(), config.velocity.to_string()),
        ("T".to_string(), config.total_time.to_string()),
        ("Nx".to_string(), config.nx.to_string()),
        ("C".to_string(), config.courant.to_string()),
        ("Shape".to_string(), config.shape.name().to_string()),
        ("Width".to_string(), config.shape_parameters.width.to_string()),
        ("dx".to_string(), report.stepping.dx().to_string()),
        ("dt".to_string(), report.stepping.dt().to_string()),
        ("Nt".to_string(), report.stepping.steps().to_string()),
        ("Error norm".to_string(), config.error_norm.to_string()),
    ];

    for (kind, result) in &report.outcomes {
        if let Err(e) = result {
            entries.push((format!("Failed {}", kind.name()), e.to_string()));
        }
    }

    entries
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
///
/// The `write_*` methods target any [`Write`]; the [`Exporter`] methods wrap
/// them around a buffered file.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    /// Exporter with a custom configuration
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Write one scheme history
    pub fn write_history<W: Write>(
        &self,
        out: &mut W,
        history: &SchemeHistory,
        grid: &Grid,
        n_snapshots: Option<usize>,
    ) -> Result<(), CsvError> {
        // ============================= Validation =============================

        if history.is_empty() {
            return Err(CsvError::EmptyData(format!("{} history has no state", history.kind)));
        }

        if history.time_points.len() != history.len() {
            return Err(CsvError::LengthMismatch(format!(
                "{} time points versus {} states",
                history.time_points.len(),
                history.len()
            )));
        }

        if history.points() != grid.len() {
            return Err(CsvError::LengthMismatch(format!(
                "states have {} points, grid has {}",
                history.points(),
                grid.len()
            )));
        }

        let config = &self.config;
        let d = config.delimiter;

        // ============================= Metadata ===============================

        if config.include_metadata {
            write_metadata_header(out, &history_metadata(history, grid))?;
        }

        // ============================= Data ===================================

        let levels = match n_snapshots {
            Some(n) => downsample_indices(history.len(), n),
            None => (0..history.len()).collect(),
        };

        match config.layout {
            HistoryLayout::Long => {
                writeln!(out, "time{d}x{d}u")?;
                for &n in &levels {
                    let t = format_number(history.time_points[n], config);
                    let state = &history.states[n];
                    for i in 0..grid.len() {
                        writeln!(
                            out,
                            "{}{d}{}{d}{}",
                            t,
                            format_number(grid.x(i), config),
                            format_number(state[i], config)
                        )?;
                    }
                }
            }
            HistoryLayout::Wide => {
                write!(out, "time")?;
                for i in 0..grid.len() {
                    write!(out, "{d}u(x={})", format_number(grid.x(i), config))?;
                }
                writeln!(out)?;

                for &n in &levels {
                    write!(out, "{}", format_number(history.time_points[n], config))?;
                    for value in history.states[n].as_slice() {
                        write!(out, "{d}{}", format_number(*value, config))?;
                    }
                    writeln!(out)?;
                }
            }
        }

        Ok(())
    }

    /// Write the diagnostics table of every successful scheme
    pub fn write_report<W: Write>(&self, out: &mut W, report: &SimulationReport) -> Result<(), CsvError> {
        if report.successes().next().is_none() {
            return Err(CsvError::EmptyData("no scheme of the report succeeded".to_string()));
        }

        let config = &self.config;
        let d = config.delimiter;

        if config.include_metadata {
            write_metadata_header(out, &report_metadata(report))?;
        }

        writeln!(out, "scheme{d}time{d}mass{d}error{d}energy")?;

        for (kind, outcome) in report.successes() {
            let diagnostics = &outcome.diagnostics;
            for n in 0..diagnostics.len() {
                writeln!(
                    out,
                    "{}{d}{}{d}{}{d}{}{d}{}",
                    kind.slug(),
                    format_number(diagnostics.time_points[n], config),
                    format_number(diagnostics.mass[n], config),
                    format_number(diagnostics.error[n], config),
                    format_number(diagnostics.energy[n], config)
                )?;
            }
        }

        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_history(
        &self,
        history: &SchemeHistory,
        grid: &Grid,
        n_snapshots: Option<usize>,
        path: &Path,
    ) -> Result<(), CsvError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_history(&mut out, history, grid, n_snapshots)?;
        out.flush()?;
        Ok(())
    }

    fn export_report(&self, report: &SimulationReport, path: &Path) -> Result<(), CsvError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_report(&mut out, report)?;
        out.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
