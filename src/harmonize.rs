// src/harmonize.rs
//! Per-series season tables → one shared column space.
//!
//! Steps, in order:
//! 1. rename series-specific columns onto shared names (`season` → `year`);
//! 2. tag every row with its source series;
//! 3. compute the sorted union of all columns;
//! 4. pad every table to that union with explicit nulls.
//!
//! Nothing is dropped here. `project_core` is the only place columns
//! are removed, and it reports what it removed.

use std::collections::BTreeSet;

use crate::race::Series;
use crate::store::{Cell, DataSet};

/// (series-specific name, shared name)
pub const ALIASES: &[(&str, &str)] = &[
    ("season", "year"),
    ("constructor_name", "team_name"),
];

/// Columns every series can fill; the strict shared schema.
pub const CORE_COLUMNS: &[&str] = &[
    "series", "year", "driver_name", "driver_code", "team_name",
    "n_races", "total_points", "avg_points",
    "avg_finish", "best_finish", "worst_finish",
    "wins", "win_rate", "podiums", "podium_rate",
    "points_finishes", "points_rate", "top10_finishes", "top10_rate",
    "total_laps", "avg_kph", "finish_std", "points_std",
    "dnf_count", "dnf_rate",
];

/// Rename aliases and tag with `series`. Existing shared names win.
pub fn align(table: &DataSet, series: Series) -> DataSet {
    let mut out = table.clone();
    for (from, to) in ALIASES {
        if out.rename_col(from, to) {
            logd!("{series}: renamed {from} → {to}");
        }
    }
    out.fill_col("series", Cell::text(series.as_str()));
    out
}

/// Sorted union of the header rows of `tables`.
pub fn union_columns<'a>(tables: impl IntoIterator<Item = &'a DataSet>) -> Vec<String> {
    tables.into_iter()
        .flat_map(|t| t.headers.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Align all tables and pad each to the shared union, same order everywhere.
pub fn harmonize(tables: &[(Series, DataSet)]) -> Vec<(Series, DataSet)> {
    let aligned: Vec<(Series, DataSet)> = tables.iter().map(|(s, t)| (*s, align(t, *s))).collect();
    let columns = union_columns(aligned.iter().map(|(_, t)| t));

    aligned.into_iter()
        .map(|(series, t)| {
            let padded: Vec<&str> = columns.iter()
                .filter(|c| !t.has_col(c))
                .map(String::as_str)
                .collect();
            if !padded.is_empty() {
                logf!("{series}: padded {} columns with nulls: {}", padded.len(), padded.join(", "));
            }
            (series, t.project(&columns))
        })
        .collect()
}

/// Restrict to `CORE_COLUMNS`. Returns the table and the dropped columns.
pub fn project_core(table: &DataSet) -> (DataSet, Vec<String>) {
    let core: Vec<String> = CORE_COLUMNS.iter().map(|c| c.to_string()).collect();
    let dropped: Vec<String> = table.headers.iter()
        .filter(|h| !CORE_COLUMNS.contains(&h.as_str()))
        .cloned()
        .collect();
    if !dropped.is_empty() {
        logf!("Core projection drops {} series-specific columns: {}", dropped.len(), dropped.join(", "));
    }
    (table.project(&core), dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], row: Vec<Cell>) -> DataSet {
        let mut ds = DataSet::new(headers.iter().map(|h| h.to_string()).collect());
        ds.push_row(row);
        ds
    }

    #[test]
    fn season_becomes_year_and_union_is_sorted() {
        let f1 = table(&["year", "driver_name", "avg_grid"], vec![Cell::Int(2021), Cell::text("A"), Cell::Float(3.5)]);
        let f3 = table(&["season", "driver_name", "dns_rate"], vec![Cell::Int(2022), Cell::text("B"), Cell::Float(0.0)]);
        let out = harmonize(&[(Series::F1, f1), (Series::F3, f3)]);

        let expected = strings!["avg_grid", "driver_name", "dns_rate", "series", "year"];
        for (_, t) in &out {
            assert_eq!(t.headers, expected);
        }
        let f3 = &out[1].1;
        assert_eq!(f3.get(0, "year"), Some(&Cell::Int(2022)));
        assert_eq!(f3.get(0, "avg_grid"), Some(&Cell::Null));
        assert_eq!(f3.get(0, "series"), Some(&Cell::text("F3")));
    }

    #[test]
    fn alias_does_not_clobber_shared_name() {
        let t = table(&["team_name", "constructor_name"], vec![Cell::text("Shared"), Cell::text("Own")]);
        let out = align(&t, Series::F1);
        assert_eq!(out.get(0, "team_name"), Some(&Cell::text("Shared")));
        assert!(out.has_col("constructor_name"));
    }

    #[test]
    fn core_reports_drops() {
        let t = table(&["series", "year", "avg_grid"], vec![Cell::text("F1"), Cell::Int(2020), Cell::Float(1.0)]);
        let (core, dropped) = project_core(&t);
        assert_eq!(core.headers.len(), CORE_COLUMNS.len());
        assert_eq!(dropped, strings!["avg_grid"]);
        assert_eq!(core.get(0, "wins"), Some(&Cell::Null));
    }
}
