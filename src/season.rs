// src/season.rs
//! Race rows → one record per driver per season.
//!
//! Counting fields (`wins`, `podiums`, `dnf_count`, …) count *races*: a
//! race_id is a hit when any of the driver's sessions in it is. Rates are
//! never stored; they are derived from the counts on every read, so they
//! can not go stale and never exceed 1.

use std::collections::{HashMap, HashSet};

use crate::race::{RaceEntry, Series, Status};
use crate::stats;
use crate::store::{Cell, DataSet};

/// What a series' raw data can support. Unsupported statistics are
/// emitted as null instead of zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonPolicy {
    pub points_available: bool,
    pub status_available: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamSeason {
    pub total_points: Option<f64>,
    pub avg_points: Option<f64>,
    pub avg_finish: Option<f64>,
    pub speed: Option<f64>,
    pub n_races: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeasonRecord {
    pub series: Option<Series>,
    pub season: i64,
    pub driver_id: Option<String>,
    pub driver_name: String,
    pub driver_code: Option<String>,
    pub driver_nationality: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,

    pub n_races: i64,
    pub total_points: Option<f64>,
    pub avg_points: Option<f64>,
    pub points_std: Option<f64>,
    pub avg_grid: Option<f64>,
    pub avg_finish: Option<f64>,
    pub best_finish: Option<i64>,
    pub worst_finish: Option<i64>,
    pub finish_std: Option<f64>,
    pub wins: Option<i64>,
    pub podiums: Option<i64>,
    pub points_finishes: Option<i64>,
    pub top10_finishes: Option<i64>,
    pub total_laps: Option<i64>,
    pub avg_kph: Option<f64>,
    pub avg_best_lap_s: Option<f64>,
    pub avg_time_from_winner_s: Option<f64>,
    pub avg_pos_change: Option<f64>,
    pub pos_change_std: Option<f64>,
    pub dnf_count: Option<i64>,
    pub dns_count: Option<i64>,
    pub dsq_count: Option<i64>,

    pub team: Option<TeamSeason>,
}

impl SeasonRecord {
    pub fn win_rate(&self) -> Option<f64> { stats::rate(self.wins, self.n_races) }
    pub fn podium_rate(&self) -> Option<f64> { stats::rate(self.podiums, self.n_races) }
    pub fn points_rate(&self) -> Option<f64> { stats::rate(self.points_finishes, self.n_races) }
    pub fn top10_rate(&self) -> Option<f64> { stats::rate(self.top10_finishes, self.n_races) }
    pub fn dnf_rate(&self) -> Option<f64> { stats::rate(self.dnf_count, self.n_races) }
    pub fn dns_rate(&self) -> Option<f64> { stats::rate(self.dns_count, self.n_races) }
    pub fn dsq_rate(&self) -> Option<f64> { stats::rate(self.dsq_count, self.n_races) }

    fn team_field(&self, f: impl Fn(&TeamSeason) -> Option<f64>) -> Option<f64> {
        self.team.as_ref().and_then(f)
    }

    /// Value of one output column. Unknown names are null.
    pub fn cell(&self, column: &str) -> Cell {
        let diff = |a: Option<f64>, b: Option<f64>| a.zip(b).map(|(a, b)| a - b);
        match column {
            "series" => Cell::opt_text(self.series.map(Series::as_str)),
            "year" | "season" => Cell::Int(self.season),
            "driver_id" => Cell::opt_text(self.driver_id.as_deref()),
            "driver_name" => Cell::text(self.driver_name.as_str()),
            "driver_code" => Cell::opt_text(self.driver_code.as_deref()),
            "driver_nationality" => Cell::opt_text(self.driver_nationality.as_deref()),
            "constructor_id" | "team_id" => Cell::opt_text(self.team_id.as_deref()),
            "team_name" | "constructor_name" => Cell::opt_text(self.team_name.as_deref()),

            "n_races" => Cell::Int(self.n_races),
            "total_points" => Cell::float(self.total_points),
            "avg_points" => Cell::float(self.avg_points),
            "points_std" => Cell::float(self.points_std),
            "avg_grid" => Cell::float(self.avg_grid),
            "avg_finish" => Cell::float(self.avg_finish),
            "best_finish" => Cell::int(self.best_finish),
            "worst_finish" => Cell::int(self.worst_finish),
            "finish_std" => Cell::float(self.finish_std),
            "wins" => Cell::int(self.wins),
            "win_rate" => Cell::float(self.win_rate()),
            "podiums" => Cell::int(self.podiums),
            "podium_rate" => Cell::float(self.podium_rate()),
            "points_finishes" => Cell::int(self.points_finishes),
            "points_rate" => Cell::float(self.points_rate()),
            "top10_finishes" => Cell::int(self.top10_finishes),
            "top10_rate" => Cell::float(self.top10_rate()),
            "total_laps" => Cell::int(self.total_laps),
            "avg_kph" | "driver_speed" => Cell::float(self.avg_kph),
            "avg_best_lap_s" => Cell::float(self.avg_best_lap_s),
            "avg_time_from_winner_s" => Cell::float(self.avg_time_from_winner_s),
            "avg_pos_change" => Cell::float(self.avg_pos_change),
            "pos_change_std" => Cell::float(self.pos_change_std),
            "dnf_count" => Cell::int(self.dnf_count),
            "dnf_rate" => Cell::float(self.dnf_rate()),
            "dns_count" => Cell::int(self.dns_count),
            "dns_rate" => Cell::float(self.dns_rate()),
            "dsq_count" => Cell::int(self.dsq_count),
            "dsq_rate" => Cell::float(self.dsq_rate()),

            "team_total_points" => Cell::float(self.team_field(|t| t.total_points)),
            "team_avg_points" => Cell::float(self.team_field(|t| t.avg_points)),
            "team_avg_pos_season" => Cell::float(self.team_field(|t| t.avg_finish)),
            "team_speed" => Cell::float(self.team_field(|t| t.speed)),
            "team_n_races" => Cell::int(self.team.as_ref().map(|t| t.n_races)),
            "driver_vs_team_speed" => Cell::float(diff(self.avg_kph, self.team_field(|t| t.speed))),
            "driver_vs_team_avg_finish" => {
                Cell::float(diff(self.team_field(|t| t.avg_finish), self.avg_finish))
            }
            "driver_vs_team_avg_points" => {
                Cell::float(diff(self.avg_points, self.team_field(|t| t.avg_points)))
            }
            _ => Cell::Null,
        }
    }
}

/// Render records with a fixed column order.
pub fn to_table(records: &[SeasonRecord], columns: &[&str]) -> DataSet {
    let mut ds = DataSet::new(columns.iter().map(|c| c.to_string()).collect());
    for r in records {
        ds.push_row(columns.iter().map(|c| r.cell(c)).collect());
    }
    ds
}

/* ---------------- Aggregation ---------------- */

/// Group in first-appearance order so ties resolve to the earliest row.
fn group_by<'a, K: Eq + std::hash::Hash + Clone>(
    entries: &'a [RaceEntry],
    key: impl Fn(&RaceEntry) -> K,
) -> Vec<(K, Vec<&'a RaceEntry>)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&RaceEntry>)> = Vec::new();
    for e in entries {
        let k = key(e);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(e),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![e]));
            }
        }
    }
    groups
}

/// Distinct race_ids for which `hit` holds on at least one row.
fn races_where(rows: &[&RaceEntry], hit: impl Fn(&RaceEntry) -> bool) -> i64 {
    rows.iter()
        .filter(|e| hit(**e))
        .map(|e| e.race_id.as_str())
        .collect::<HashSet<_>>()
        .len() as i64
}

fn position_hit(e: &RaceEntry, max: i64) -> bool {
    e.finishing_position.is_some_and(|p| p <= max)
}

fn team_key(e: &RaceEntry) -> Option<&str> {
    e.team_id.as_deref().or(e.team_name.as_deref()).filter(|t| !t.is_empty())
}

fn aggregate_teams(entries: &[RaceEntry]) -> HashMap<(i64, String), TeamSeason> {
    let grouped = group_by(entries, |e| (e.season, team_key(e).map(str::to_string)));
    grouped.into_iter()
        .filter_map(|((season, team), rows)| {
            let team = team?;
            let pos = |e: &&RaceEntry| e.finishing_position.map(|p| p as f64);
            let ts = TeamSeason {
                total_points: stats::sum(rows.iter().map(|e| e.points)),
                avg_points: stats::mean(rows.iter().map(|e| e.points)),
                avg_finish: stats::mean(rows.iter().map(pos)),
                speed: stats::mean(rows.iter().map(|e| e.average_speed)),
                n_races: races_where(&rows, |_| true),
            };
            Some(((season, team), ts))
        })
        .collect()
}

type RaceKey = (i64, String, Option<String>);

fn race_key(e: &RaceEntry) -> RaceKey {
    (e.season, e.race_id.clone(), e.session.clone())
}

/// Winning time and distance per race session.
fn winner_times(entries: &[RaceEntry]) -> HashMap<RaceKey, (f64, Option<i64>)> {
    entries.iter()
        .filter(|e| e.finishing_position == Some(1))
        .filter_map(|e| Some((race_key(e), (e.elapsed_time_seconds?, e.laps_completed))))
        .collect()
}

/// Seconds behind the session winner: the published gap, else the time
/// difference when both covered the same number of laps.
fn time_from_winner(e: &RaceEntry, winners: &HashMap<RaceKey, (f64, Option<i64>)>) -> Option<f64> {
    if e.gap_to_leader_seconds.is_some() {
        return e.gap_to_leader_seconds;
    }
    let elapsed = e.elapsed_time_seconds?;
    let &(win_time, win_laps) = winners.get(&race_key(e))?;
    match (e.laps_completed, win_laps) {
        (Some(a), Some(b)) if a != b => None,
        _ => Some(elapsed - win_time),
    }
}

/// Most frequent non-empty value of a text field across the group.
fn pick(rows: &[&RaceEntry], f: impl Fn(&RaceEntry) -> Option<&str>) -> Option<String> {
    stats::mode_first(rows.iter().filter_map(|e| f(*e)).filter(|s| !s.is_empty())).map(str::to_string)
}

fn aggregate_driver(
    series: Series,
    season: i64,
    rows: &[&RaceEntry],
    policy: SeasonPolicy,
    winners: &HashMap<RaceKey, (f64, Option<i64>)>,
) -> SeasonRecord {
    let positions = || rows.iter().map(|e| e.finishing_position.map(|p| p as f64));
    let pos_change = || rows.iter().map(|e| {
        e.grid_position.zip(e.finishing_position).map(|(g, f)| (g - f) as f64)
    });
    let points = || rows.iter().map(|e| e.points);
    let status_count = |wanted: &dyn Fn(Status) -> bool| {
        policy.status_available
            .then(|| races_where(rows, |e| e.status.is_some_and(wanted)))
    };

    SeasonRecord {
        series: Some(series),
        season,
        driver_id: pick(rows, |e| e.driver_id.as_deref()),
        driver_name: pick(rows, |e| Some(e.driver_name.as_str())).unwrap_or_default(),
        driver_code: pick(rows, |e| e.driver_code.as_deref()),
        driver_nationality: pick(rows, |e| e.driver_nationality.as_deref()),
        team_id: pick(rows, |e| e.team_id.as_deref()),
        team_name: pick(rows, |e| e.team_name.as_deref()),

        n_races: races_where(rows, |_| true),
        total_points: policy.points_available.then(|| stats::sum(points())).flatten(),
        avg_points: policy.points_available.then(|| stats::mean(points())).flatten(),
        points_std: policy.points_available.then(|| stats::std(points())).flatten(),
        avg_grid: stats::mean(rows.iter().map(|e| e.grid_position.map(|g| g as f64))),
        avg_finish: stats::mean(positions()),
        best_finish: stats::min(positions()).map(|p| p as i64),
        worst_finish: stats::max(positions()).map(|p| p as i64),
        finish_std: stats::std(positions()),
        wins: Some(races_where(rows, |e| position_hit(e, 1))),
        podiums: Some(races_where(rows, |e| position_hit(e, 3))),
        points_finishes: policy.points_available
            .then(|| races_where(rows, |e| e.points.is_some_and(|p| p > 0.0))),
        top10_finishes: Some(races_where(rows, |e| position_hit(e, 10))),
        total_laps: rows.iter().filter_map(|e| e.laps_completed).reduce(|a, b| a + b),
        avg_kph: stats::mean(rows.iter().map(|e| e.average_speed)),
        avg_best_lap_s: stats::mean(rows.iter().map(|e| e.best_lap_seconds)),
        avg_time_from_winner_s: stats::mean(rows.iter().map(|e| time_from_winner(e, winners))),
        avg_pos_change: stats::mean(pos_change()),
        pos_change_std: stats::std(pos_change()),
        dnf_count: status_count(&Status::is_dnf_or_dsq),
        dns_count: status_count(&|s| s == Status::Dns),
        dsq_count: status_count(&|s| s == Status::Dsq),

        team: None,
    }
}

/// Aggregate one series' race rows. Output is sorted by (season, driver_name).
pub fn aggregate(series: Series, entries: &[RaceEntry], policy: SeasonPolicy) -> Vec<SeasonRecord> {
    let teams = aggregate_teams(entries);
    let winners = winner_times(entries);

    let mut out: Vec<SeasonRecord> = group_by(entries, |e| (e.season, e.identity().to_string()))
        .into_iter()
        .map(|((season, _), rows)| {
            let mut rec = aggregate_driver(series, season, &rows, policy, &winners);
            let team = stats::mode_first(rows.iter().filter_map(|e| team_key(e)));
            rec.team = team.and_then(|t| teams.get(&(season, t.to_string())).cloned());
            rec
        })
        .collect();

    // Stable: same-name drivers keep first-appearance order.
    out.sort_by(|a, b| a.season.cmp(&b.season).then_with(|| a.driver_name.cmp(&b.driver_name)));
    logf!("{}: aggregated {} rows into {} driver-seasons", series, entries.len(), out.len());
    out
}
