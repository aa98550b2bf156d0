// tests/pipeline_e2e.rs
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use paddock::config::options::PipelineOptions;
use paddock::csv::{Delim, parse_table};
use paddock::harmonize::CORE_COLUMNS;
use paddock::progress::{NullProgress, Progress};
use paddock::race::Series;
use paddock::runner;
use paddock::store::DataSet;
use paddock::Error;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Temp root laid out like the real data directory.
fn workspace() -> (TempDir, PipelineOptions) {
    let dir = tempfile::tempdir().unwrap();
    let opts = PipelineOptions::rooted(dir.path());
    for (series, name) in [
        (Series::F1, "f1_race_driver_clean.csv"),
        (Series::F2, "f2_results_fia_drivers_clean.csv"),
        (Series::F3, "f3_races_clean.csv"),
    ] {
        let dest = opts.input(series);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::copy(fixture(name), dest).unwrap();
    }
    (dir, opts)
}

fn read(path: &Path) -> DataSet {
    parse_table(&fs::read_to_string(path).unwrap(), Delim::Csv)
}

fn num(t: &DataSet, row: usize, col: &str) -> Option<f64> {
    t.get(row, col).and_then(|c| c.as_f64())
}

fn find_row(t: &DataSet, code: &str) -> usize {
    (0..t.len())
        .find(|&i| t.get(i, "driver_code").and_then(|c| c.as_str()) == Some(code))
        .unwrap()
}

#[test]
fn full_run_writes_every_artefact() {
    let (_dir, opts) = workspace();
    let summary = runner::run(&opts, None).unwrap();

    assert_eq!(summary.files_written.len(), 8);
    for p in &summary.files_written {
        assert!(p.is_file(), "missing {}", p.display());
    }
    assert!(summary.findings.is_empty(), "{:?}", summary.findings);

    let master = read(&opts.master_path());
    assert_eq!(master.len(), 3 + 2 + 3);
    assert!(master.has_col("year"));
    assert!(!master.has_col("season"));
    assert!(!master.has_col("constructor_name"));

    let mut sorted = master.headers.clone();
    sorted.sort();
    assert_eq!(master.headers, sorted);
}

#[test]
fn master_is_sorted_by_series_year_driver() {
    let (_dir, opts) = workspace();
    let summary = runner::run(&opts, None).unwrap();
    let m = &summary.master;

    let keys: Vec<(String, String)> = (0..m.len())
        .map(|i| (m.get(i, "series").unwrap().to_string(), m.get(i, "driver_name").unwrap().to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("F1".into(), "Lewis Hamilton".into()),
            ("F1".into(), "Max Verstappen".into()),
            ("F1".into(), "Nikita Mazepin".into()),
            ("F2".into(), "Frederik Vesti".into()),
            ("F2".into(), "Theo Pourchaire".into()),
            ("F3".into(), "Oliver Bearman".into()),
            ("F3".into(), "Victor Martins".into()),
            ("F3".into(), "Zak O'Sullivan".into()),
        ]
    );
}

#[test]
fn rerun_is_byte_identical() {
    let (_dir, opts) = workspace();
    runner::run(&opts, None).unwrap();
    let first = fs::read(opts.master_path()).unwrap();
    runner::run(&opts, None).unwrap();
    let second = fs::read(opts.master_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn harmonized_table_only_pads() {
    let (_dir, opts) = workspace();
    runner::run(&opts, None).unwrap();

    for series in Series::ALL {
        let own = read(&opts.features_path(series));
        let harmonized = read(&opts.harmonized_path(series));
        assert_eq!(own.len(), harmonized.len());

        for col in &own.headers {
            let shared = match col.as_str() {
                "season" => "year",
                "constructor_name" => "team_name",
                c => c,
            };
            for row in 0..own.len() {
                assert_eq!(own.get(row, col), harmonized.get(row, shared), "{series} {col}[{row}]");
            }
        }
    }
}

#[test]
fn core_master_has_shared_columns_only() {
    let (_dir, opts) = workspace();
    let summary = runner::run(&opts, None).unwrap();

    let core = read(&opts.master_core_path());
    assert_eq!(core.headers, CORE_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    assert!(summary.core_dropped.contains(&"avg_grid".to_string()));
    assert!(summary.core_dropped.contains(&"dns_rate".to_string()));
    assert!(summary.core_dropped.contains(&"avg_best_lap_s".to_string()));
}

#[test]
fn season_statistics_from_fixtures() {
    let (_dir, opts) = workspace();
    runner::run(&opts, None).unwrap();

    let f1 = read(&opts.features_path(Series::F1));
    let maz = find_row(&f1, "MAZ");
    assert_eq!(num(&f1, maz, "n_races"), Some(2.0));
    assert_eq!(num(&f1, maz, "dnf_rate"), Some(0.5));
    assert_eq!(num(&f1, maz, "best_finish"), Some(3.0));

    // F2 sheets carry no points: 25/18 scale by derived position.
    let f2 = read(&opts.features_path(Series::F2));
    assert_eq!(num(&f2, find_row(&f2, "VES"), "total_points"), Some(68.0));
    assert_eq!(num(&f2, find_row(&f2, "POU"), "total_points"), Some(61.0));
    assert_eq!(num(&f2, find_row(&f2, "POU"), "n_races"), Some(2.0));
    assert_eq!(num(&f2, find_row(&f2, "POU"), "dnf_rate"), Some(0.5));

    let f3 = read(&opts.features_path(Series::F3));
    let bea = find_row(&f3, "BEA");
    assert_eq!(num(&f3, bea, "best_finish"), None);
    assert_eq!(num(&f3, bea, "dns_rate"), Some(1.0));
    assert_eq!(num(&f3, find_row(&f3, "OSU"), "avg_finish"), Some(2.0));
}

#[test]
fn written_master_passes_checks() {
    let (_dir, opts) = workspace();
    runner::run(&opts, None).unwrap();
    let findings = runner::check_file(&opts.master_path()).unwrap();
    assert!(findings.is_empty(), "{findings:?}");

    let m = read(&opts.master_path());
    for row in 0..m.len() {
        let [w, p, t] = ["win_rate", "podium_rate", "top10_rate"].map(|c| num(&m, row, c).unwrap());
        assert!(0.0 <= w && w <= p && p <= t && t <= 1.0);
    }
}

#[test]
fn missing_input_aborts_before_writing() {
    let (_dir, opts) = workspace();
    fs::remove_file(opts.input(Series::F2)).unwrap();

    let err = runner::run(&opts, None).unwrap_err();
    match err {
        Error::MissingInput { path } => assert!(path.ends_with("f2_results_fia_drivers_clean.csv")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!opts.out_dir.exists());
}

#[test]
fn missing_identity_column_is_fatal() {
    let (_dir, opts) = workspace();
    fs::write(opts.input(Series::F3), "season,race_id,team_name\n2022,r1,Prema\n").unwrap();

    let err = runner::run(&opts, None).unwrap_err();
    match err {
        Error::MissingColumns { context, columns } => {
            assert_eq!(columns, vec!["driver_name"]);
            assert!(context.contains("f3_races_clean.csv"), "{context}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tsv_output_uses_tab_and_extension() {
    let (_dir, mut opts) = workspace();
    opts.format = Delim::Tsv;
    let summary = runner::run(&opts, None).unwrap();
    assert!(summary.files_written.iter().all(|p| p.extension().is_some_and(|e| e == "tsv")));

    let text = fs::read_to_string(opts.master_path()).unwrap();
    let master = parse_table(&text, Delim::Tsv);
    assert_eq!(master.len(), 8);
}

#[derive(Default)]
struct Recorder {
    total: usize,
    lines: Vec<String>,
    stages: Vec<(String, bool)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn stage_done(&mut self, stage: &str, path: Option<&Path>) {
        self.stages.push((stage.to_string(), path.is_some()));
    }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn progress_sees_every_stage() {
    let (_dir, mut opts) = workspace();
    opts.artefacts.harmonized = false;

    let mut rec = Recorder::default();
    let summary = runner::run(&opts, Some(&mut rec)).unwrap();

    assert_eq!(rec.total, 8);
    assert_eq!(rec.stages.len(), 8);
    assert_eq!(rec.lines.len(), 3);
    assert!(rec.finished);
    assert_eq!(rec.stages.iter().filter(|(s, wrote)| s == "harmonized" && !wrote).count(), 3);
    assert_eq!(summary.files_written.len(), 5);
    assert!(!opts.harmonized_path(Series::F1).exists());

    // A no-op sink behaves like no sink at all.
    let again = runner::run(&opts, Some(&mut NullProgress)).unwrap();
    assert_eq!(again.master.rows, summary.master.rows);
}
