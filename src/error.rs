// src/error.rs
//! Error taxonomy for the pipeline and the scoring engine.
//!
//! Per-cell parse failures are not errors: they become null cells where
//! they happen. Everything here aborts the run.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required source table does not exist.
    #[error("Missing input: expected table at {}", path.display())]
    MissingInput { path: PathBuf },

    /// A table exists but lacks columns the stage cannot run without.
    #[error("Missing required columns for {context}: {}", columns.join(", "))]
    MissingColumns { context: String, columns: Vec<String> },

    /// Knowledge base document is malformed or incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach the source file to a column error, so the message names
    /// both the file and the columns it lacks.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Error::MissingColumns { context, columns } => Error::MissingColumns {
                context: format!("{context} ({})", path.display()),
                columns,
            },
            other => other,
        }
    }
}

/// Fail with `MissingColumns` unless every `required` name is in `columns`.
pub fn require_columns(columns: &[String], required: &[&str], context: &str) -> Result<()> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|r| !columns.iter().any(|c| c == *r))
        .map(|r| r.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(Error::MissingColumns { context: context.to_string(), columns: missing })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_columns_lists_missing_sorted() {
        let cols = strings!["year", "driver_name"];
        let err = require_columns(&cols, &["race_id", "year", "laps"], "F1 features").unwrap_err();
        match err {
            Error::MissingColumns { context, columns } => {
                assert_eq!(context, "F1 features");
                assert_eq!(columns, vec!["laps", "race_id"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn in_file_names_the_source() {
        let err = require_columns(&strings!["season"], &["race_id"], "F3 features").unwrap_err();
        let msg = err.in_file(Path::new("data/f3/races.csv")).to_string();
        assert_eq!(msg, "Missing required columns for F3 features (data/f3/races.csv): race_id");

        let other = Error::Config(s!("x")).in_file(Path::new("a.csv"));
        assert!(matches!(other, Error::Config(_)));
    }

    #[test]
    fn require_columns_ok_when_all_present() {
        let cols = strings!["a", "b"];
        assert!(require_columns(&cols, &["b", "a"], "x").is_ok());
    }
}
