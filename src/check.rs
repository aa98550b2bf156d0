// src/check.rs
//! Post-build sanity checks over finished tables and ranked race rows.
//! Each check returns findings instead of failing; callers decide.

use std::collections::BTreeMap;
use std::fmt;

use crate::race::RaceEntry;
use crate::store::DataSet;

/// (rate column, count column)
pub const RATE_PAIRS: &[(&str, &str)] = &[
    ("win_rate", "wins"),
    ("podium_rate", "podiums"),
    ("points_rate", "points_finishes"),
    ("top10_rate", "top10_finishes"),
    ("dnf_rate", "dnf_count"),
    ("dns_rate", "dns_count"),
    ("dsq_rate", "dsq_count"),
];

const EPS: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    /// Data row (0-based, header excluded), when the finding is row-level.
    pub row: Option<usize>,
    pub message: String,
}

impl Finding {
    fn table(message: impl Into<String>) -> Self { Self { row: None, message: message.into() } }
    fn at(row: usize, message: impl Into<String>) -> Self { Self { row: Some(row), message: message.into() } }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(r) => write!(f, "row {}: {}", r + 1, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Column set is the sorted union (no duplicates), rates are consistent
/// with their counts, and `win_rate <= podium_rate <= top10_rate`.
/// `expected` pins the exact column list when the caller knows it.
pub fn check_master(table: &DataSet, expected: Option<&[String]>) -> Vec<Finding> {
    let mut out = Vec::new();

    let mut sorted = table.headers.clone();
    sorted.sort();
    sorted.dedup();
    if sorted != table.headers {
        out.push(Finding::table("Header is not a sorted, duplicate-free column union"));
    }
    if let Some(exp) = expected {
        if exp != table.headers.as_slice() {
            out.push(Finding::table(format!(
                "Header has {} columns, expected {}",
                table.headers.len(),
                exp.len()
            )));
        }
    }

    for row in 0..table.len() {
        check_row(table, row, &mut out);
    }
    out
}

fn num(table: &DataSet, row: usize, col: &str) -> Option<f64> {
    table.get(row, col).and_then(|c| c.as_f64())
}

fn check_row(table: &DataSet, row: usize, out: &mut Vec<Finding>) {
    let n = num(table, row, "n_races").filter(|n| *n > 0.0);

    for (rate_col, count_col) in RATE_PAIRS {
        if !table.has_col(rate_col) {
            continue;
        }
        let rate = num(table, row, rate_col);
        let count = num(table, row, count_col);
        match (rate, n) {
            (Some(r), _) if !(0.0..=1.0).contains(&r) => {
                out.push(Finding::at(row, format!("{rate_col}={r} outside [0, 1]")));
            }
            (Some(_), None) => {
                out.push(Finding::at(row, format!("{rate_col} set while n_races is null or 0")));
            }
            (Some(r), Some(n)) => {
                if count.is_none_or(|c| (c / n - r).abs() > EPS) {
                    out.push(Finding::at(row, format!("{rate_col}={r} disagrees with {count_col}/n_races")));
                }
            }
            (None, Some(_)) if count.is_some() => {
                out.push(Finding::at(row, format!("{rate_col} null although {count_col} is set")));
            }
            _ => {}
        }
    }

    let ladder = ["win_rate", "podium_rate", "top10_rate"].map(|c| num(table, row, c));
    if let [Some(w), Some(p), Some(t)] = ladder {
        if w > p + EPS || p > t + EPS {
            out.push(Finding::at(row, format!("rate ladder broken: win {w} / podium {p} / top10 {t}")));
        }
    }
}

/// Within each race group, non-null positions must be exactly 1..=k.
pub fn check_positions(entries: &[RaceEntry]) -> Vec<Finding> {
    let mut groups: BTreeMap<(i64, &str, Option<&str>), Vec<i64>> = BTreeMap::new();
    for e in entries {
        if let Some(p) = e.finishing_position {
            groups.entry(e.race_key()).or_default().push(p);
        }
    }

    groups.into_iter()
        .filter_map(|((season, race, session), mut pos)| {
            pos.sort_unstable();
            let ok = pos.iter().enumerate().all(|(i, p)| *p == i as i64 + 1);
            (!ok).then(|| Finding::table(format!(
                "{season} {race}{}: positions {pos:?} are not 1..{}",
                session.map(|s| format!(" ({s})")).unwrap_or_default(),
                pos.len()
            )))
        })
        .collect()
}
