//! End-to-end: configuration → run → CSV files

use advect_rs::output::export::{CsvConfig, CsvExporter, Exporter, HistoryLayout};
use advect_rs::physics::WaveShape;
use advect_rs::solver::{run_all, SchemeKind};
use std::fs;

mod common;
use common::base_config;

#[test]
fn test_report_and_histories_to_csv() {
    let report = run_all(&base_config(WaveShape::Square, 0.8)).unwrap();
    let levels = report.time_points.len();
    let dir = tempfile::tempdir().unwrap();

    let exporter = CsvExporter::new(CsvConfig::default().with_metadata());
    let diagnostics_path = dir.path().join("diagnostics.csv");
    exporter.export_report(&report, &diagnostics_path).unwrap();

    let text = fs::read_to_string(&diagnostics_path).unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows[0], "scheme,time,mass,error,energy");
    assert_eq!(rows.len(), 1 + SchemeKind::ALL.len() * levels);
    assert!(text.contains("# Nt: 63"));

    let wide = CsvExporter::new(CsvConfig::european().layout(HistoryLayout::Wide));
    for (kind, outcome) in report.successes() {
        let path = dir.path().join(format!("{}.csv", kind.slug()));
        wide.export_history(&outcome.history, &report.grid, Some(10), &path)
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 10, "{}", kind);
        assert_eq!(lines[1].split(';').count(), 1 + report.grid.len());
        assert!(lines[1].starts_with("0,000000;"));
    }
}

#[test]
fn test_unstable_values_are_exported_verbatim() {
    // FECS at C = 5 over many steps overflows to inf/NaN
    let mut config = base_config(WaveShape::Gaussian, 5.0);
    config.total_time = 200.0;
    let report = advect_rs::solver::run(&config, &[SchemeKind::Fecs]).unwrap();
    let fecs = report.outcome(SchemeKind::Fecs).unwrap();
    assert!(fecs.history.final_state().is_some_and(|s| !s.is_finite()));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fecs.csv");
    CsvExporter::default()
        .export_history(&fecs.history, &report.grid, Some(2), &path)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("NaN") || text.contains("inf"));
}
