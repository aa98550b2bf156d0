// src/series.rs
//! # Per-series adapters
//!
//! Each racing series publishes results with its own column vocabulary,
//! timing format and status codes. An adapter turns one series' raw
//! race table into `RaceEntry` rows and declares the fixed column order
//! of its season table. Everything downstream (ranking, aggregation,
//! harmonization, merging) is series-agnostic.
//!
//! ## What lives here
//! - Required raw columns (checked before any row is read).
//! - The status vocabulary of the series, as an explicit mapping.
//! - Whether points / status exist, so missing statistics stay null.
//! - Series-specific fix-ups after ranking (e.g. F2 points by position).
//!
//! ## Adding a series
//! Implement `SeriesAdapter` and add it to `adapter()`. The harmonizer
//! unions whatever columns the new season table declares.

use crate::error::{Result, require_columns};
use crate::position::assign_positions;
use crate::race::{RaceEntry, Series, Status};
use crate::season::{self, SeasonPolicy, SeasonRecord};
use crate::store::{Cell, DataSet};

pub mod f1;
pub mod f2;
pub mod f3;

pub trait SeriesAdapter: Sync {
    fn series(&self) -> Series;

    /// Raw columns without which the series can not be aggregated.
    fn required_columns(&self) -> &'static [&'static str];

    /// Season table column order.
    fn output_columns(&self) -> &'static [&'static str];

    fn parse_status(&self, raw: &str) -> Status;

    /// Typed rows plus what the raw table can support.
    fn load_entries(&self, raw: &DataSet) -> (Vec<RaceEntry>, SeasonPolicy);

    /// Hook that runs after positions are assigned.
    fn after_ranking(&self, _raw: &DataSet, _entries: &mut [RaceEntry]) {}

    /// Required-column check, typed load, ranking and post-ranking fix-ups.
    fn ranked_entries(&self, raw: &DataSet) -> Result<(Vec<RaceEntry>, SeasonPolicy)> {
        let context = format!("{} features", self.series());
        require_columns(&raw.headers, self.required_columns(), &context)?;

        let (mut entries, policy) = self.load_entries(raw);
        // DNS rows stay in the table but never take a ranking slot.
        assign_positions(&mut entries, |e| !e.is_dns());
        self.after_ranking(raw, &mut entries);
        Ok((entries, policy))
    }

    /// Raw table → season records, sorted by (season, driver_name).
    fn season_records(&self, raw: &DataSet) -> Result<Vec<SeasonRecord>> {
        let (entries, policy) = self.ranked_entries(raw)?;
        Ok(season::aggregate(self.series(), &entries, policy))
    }

    /// Raw table → season table in this series' column order.
    fn season_table(&self, raw: &DataSet) -> Result<DataSet> {
        let records = self.season_records(raw)?;
        Ok(season::to_table(&records, self.output_columns()))
    }
}

pub fn adapter(series: Series) -> &'static dyn SeriesAdapter {
    match series {
        Series::F1 => &f1::F1,
        Series::F2 => &f2::F2,
        Series::F3 => &f3::F3,
    }
}

/* ---------------- Raw row access ---------------- */

/// Typed, forgiving reads from one raw table. Bad cells read as `None`.
pub(crate) struct RawRows<'a> {
    ds: &'a DataSet,
}

impl<'a> RawRows<'a> {
    pub fn new(ds: &'a DataSet) -> Self { Self { ds } }

    pub fn has(&self, col: &str) -> bool { self.ds.has_col(col) }

    pub fn len(&self) -> usize { self.ds.len() }

    pub fn cell(&self, row: usize, col: &str) -> &'a Cell {
        static NULL: Cell = Cell::Null;
        self.ds.get(row, col).unwrap_or(&NULL)
    }

    /// Trimmed text; empty and null markers (`nan`, `\N`, `NULL`, `NA`) read as `None`.
    pub fn text(&self, row: usize, col: &str) -> Option<String> {
        let c = self.cell(row, col);
        let s = match c {
            Cell::Null => return None,
            Cell::Text(t) => t.trim().to_string(),
            other => other.to_string(),
        };
        (!is_null_marker(&s)).then_some(s)
    }

    pub fn float(&self, row: usize, col: &str) -> Option<f64> {
        let c = self.cell(row, col);
        let v = c.as_f64();
        if v.is_none() && self.text(row, col).is_some() {
            logd!("{col}[{row}]: unparsable number {:?} → null", c.to_string());
        }
        v
    }

    /// Integers; tolerates `"12.0"` from float-typed exports.
    pub fn int(&self, row: usize, col: &str) -> Option<i64> {
        let f = self.float(row, col)?;
        (f.fract() == 0.0).then_some(f as i64)
    }
}

/// Missing-value spellings left behind by upstream exports
/// (pandas `nan`, Ergast / MySQL `\N`, SQL `NULL`, R `NA`).
fn is_null_marker(s: &str) -> bool {
    s.is_empty() || s == "\\N" || ["nan", "null", "na"].iter().any(|m| s.eq_ignore_ascii_case(m))
}

/// Status vocabulary shared by the FIA-timed junior series (F2, F3).
/// No status text on a classified row means the driver finished.
pub fn parse_fia_status(raw: &str) -> Status {
    match raw.trim().to_ascii_uppercase().as_str() {
        "" | "NAN" | "CLASSIFIED" | "FINISHED" => Status::Finished,
        "DNF" | "RET" | "NC" => Status::Dnf,
        "DNS" => Status::Dns,
        "DSQ" | "DQ" | "EXC" => Status::Dsq,
        _ => Status::Unknown,
    }
}
