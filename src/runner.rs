// src/runner.rs
use std::path::{Path, PathBuf};

use crate::{
    check::{self, Finding},
    config::options::PipelineOptions,
    error::Result,
    file::{delim_for, read_table, write_table},
    harmonize, merge,
    progress::Progress,
    race::Series,
    season,
    series::adapter,
    store::DataSet,
};

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub master: DataSet,
    /// Columns the core projection left out.
    pub core_dropped: Vec<String>,
    /// Invariant findings over ranked rows and the master table.
    pub findings: Vec<Finding>,
}

/// Stages reported to `Progress`: 3 feature tables, 3 harmonized, master, core.
const STAGES: usize = 8;

/// Raw race table → season feature table for one series.
/// Position findings are returned alongside, never fatal.
pub fn build_features(series: Series, raw: &DataSet) -> Result<(DataSet, Vec<Finding>)> {
    let adapter = adapter(series);
    let (entries, policy) = adapter.ranked_entries(raw)?;
    let findings = check::check_positions(&entries);

    let records = season::aggregate(series, &entries, policy);
    Ok((season::to_table(&records, adapter.output_columns()), findings))
}

/// Full pipeline: per-series features → harmonized tables → master → core.
/// Any missing input or required column aborts before anything is written.
pub fn run(opts: &PipelineOptions, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(STAGES);
    }

    let mut findings = Vec::new();
    let mut features: Vec<(Series, DataSet)> = Vec::with_capacity(Series::ALL.len());
    for series in Series::ALL {
        let input = opts.input(series);
        logf!("{series}: reading {}", input.display());
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("{series}: reading {}", input.display()));
        }
        let raw = read_table(input, delim_for(input))?;
        let (table, mut found) = build_features(series, &raw).map_err(|e| e.in_file(input))?;
        findings.append(&mut found);
        features.push((series, table));
    }

    let mut written = Vec::new();
    let mut emit = |stage: &str, path: PathBuf, table: &DataSet, enabled: bool| -> Result<()> {
        if enabled {
            written.push(write_table(&path, table, opts.format)?);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.stage_done(stage, enabled.then_some(path.as_path()));
        }
        Ok(())
    };

    let art = opts.artefacts;
    for (series, table) in &features {
        emit("features", opts.features_path(*series), table, art.features)?;
    }

    let harmonized = harmonize::harmonize(&features);
    for (series, table) in &harmonized {
        emit("harmonized", opts.harmonized_path(*series), table, art.harmonized)?;
    }

    let master = merge::merge(harmonized.iter().map(|(_, t)| t));
    emit("master", opts.master_path(), &master, art.master)?;

    let (core, core_dropped) = harmonize::project_core(&master);
    emit("core", opts.master_core_path(), &core, art.core)?;

    let union = harmonize::union_columns(harmonized.iter().map(|(_, t)| t));
    findings.extend(check::check_master(&master, Some(union.as_slice())));
    for f in &findings {
        logw!("check: {f}");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!("Pipeline done: {} files, {} master rows, {} findings", written.len(), master.len(), findings.len());

    Ok(RunSummary { files_written: written, master, core_dropped, findings })
}

/// Read one table and run the master-table checks on it.
pub fn check_file(path: &Path) -> Result<Vec<Finding>> {
    let table = read_table(path, delim_for(path))?;
    Ok(check::check_master(&table, None))
}
