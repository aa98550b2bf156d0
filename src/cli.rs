// src/cli.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

use crate::{
    config::{consts::DEFAULT_LOG_LEVEL, options::PipelineOptions},
    csv::Delim,
    error::{Error, Result},
    kb::{DriverRecord, Engine, TeamRecord, VehicleRecord},
    progress::Progress,
    runner,
};

#[derive(Parser, Debug)]
#[command(name = "paddock", version)]
#[command(about = "Season feature pipeline and rule-based scoring for F1 / F2 / F3 results")]
pub struct Cli {
    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Append log lines to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build per-series features, harmonized tables and the master table
    Build {
        #[arg(long, value_name = "FILE")]
        f1: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        f2: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        f3: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Print the scoring profile of one driver / team / vehicle as JSON
    Profile {
        /// Rule document (defaults to the built-in one)
        #[arg(long, value_name = "FILE")]
        kb: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        driver: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        team: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        vehicle: Option<PathBuf>,
    },
    /// Check a master table; exits non-zero when anything is found
    Check {
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
}

impl From<Format> for Delim {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => Delim::Csv,
            Format::Tsv => Delim::Tsv,
        }
    }
}

/// Prints stage completions to stderr.
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) { self.total = total; }

    fn stage_done(&mut self, stage: &str, path: Option<&Path>) {
        self.done += 1;
        match path {
            Some(p) => eprintln!("[{}/{}] {stage}: {}", self.done, self.total, p.display()),
            None => eprintln!("[{}/{}] {stage}: skipped", self.done, self.total),
        }
    }
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Build { f1, f2, f3, out, format } => {
            let mut opts = PipelineOptions::default();
            if let Some(p) = f1 { opts.f1_input = p; }
            if let Some(p) = f2 { opts.f2_input = p; }
            if let Some(p) = f3 { opts.f3_input = p; }
            if let Some(d) = out { opts.out_dir = d; }
            opts.format = format.into();

            let mut progress = StderrProgress { total: 0, done: 0 };
            let summary = runner::run(&opts, Some(&mut progress))?;
            println!("Wrote {} files ({} master rows)", summary.files_written.len(), summary.master.len());
            if !summary.findings.is_empty() {
                println!("{} check findings (see log)", summary.findings.len());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Profile { kb, driver, team, vehicle } => {
            let engine = match kb {
                Some(path) => Engine::from_path(&path)?,
                None => Engine::builtin()?,
            };
            let driver: DriverRecord = read_json_or_default(driver.as_deref())?;
            let team: TeamRecord = read_json_or_default(team.as_deref())?;
            let vehicle: VehicleRecord = read_json_or_default(vehicle.as_deref())?;

            let profile = engine.generate_full_profile(&driver, &team, &vehicle);
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path } => {
            let findings = runner::check_file(&path)?;
            for f in &findings {
                println!("{f}");
            }
            if findings.is_empty() {
                println!("{}: ok", path.display());
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else { return Ok(T::default()) };
    if !path.is_file() {
        return Err(Error::MissingInput { path: path.to_path_buf() });
    }
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_flags() {
        let cli = Cli::try_parse_from(["paddock", "--log-level", "debug", "build", "--f2", "x.csv", "--format", "tsv"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Command::Build { f2, format, f1, .. } => {
                assert_eq!(f2, Some(PathBuf::from("x.csv")));
                assert_eq!(f1, None);
                assert_eq!(format, Format::Tsv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_needs_a_path() {
        assert!(Cli::try_parse_from(["paddock", "check"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
