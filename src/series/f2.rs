// src/series/f2.rs
//! Formula 2: FIA classification sheets, sprint and feature races per round.

use crate::race::{RaceEntry, Series, Status};
use crate::season::SeasonPolicy;
use crate::store::DataSet;
use crate::timing::{gap_cell_seconds, time_cell_seconds};

use super::{RawRows, SeriesAdapter, parse_fia_status};

pub struct F2;

const REQUIRED: &[&str] = &[
    "season", "race_id", "session", "laps", "race_time", "best_lap_time",
    "gap", "status", "driver_name", "driver_code", "team_name",
];

const COLUMNS: &[&str] = &[
    "series", "year", "driver_name", "driver_code", "team_name",
    "n_races", "total_points", "avg_points",
    "avg_finish", "best_finish", "worst_finish",
    "wins", "win_rate", "podiums", "podium_rate",
    "points_finishes", "points_rate", "top10_finishes", "top10_rate",
    "total_laps", "avg_kph", "avg_best_lap_s", "avg_time_from_winner_s",
    "finish_std", "points_std",
    "dnf_count", "dnf_rate",
    "team_total_points", "team_avg_points", "team_avg_pos_season", "team_speed", "team_n_races",
    "driver_speed", "driver_vs_team_speed", "driver_vs_team_avg_finish", "driver_vs_team_avg_points",
];

/// Simplified championship scale used when the sheets carry no points.
pub const POINTS_TABLE: [f64; 10] = [25.0, 18.0, 15.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0];

pub fn points_for(position: i64) -> f64 {
    usize::try_from(position - 1)
        .ok()
        .and_then(|i| POINTS_TABLE.get(i).copied())
        .unwrap_or(0.0)
}

impl F2 {
    fn points_derived(raw: &DataSet) -> bool { !raw.has_col("points") }
}

impl SeriesAdapter for F2 {
    fn series(&self) -> Series { Series::F2 }

    fn required_columns(&self) -> &'static [&'static str] { REQUIRED }

    fn output_columns(&self) -> &'static [&'static str] { COLUMNS }

    fn parse_status(&self, raw: &str) -> Status { parse_fia_status(raw) }

    fn load_entries(&self, raw: &DataSet) -> (Vec<RaceEntry>, SeasonPolicy) {
        let rows = RawRows::new(raw);
        // Points either come from the sheet or from the table after ranking.
        let policy = SeasonPolicy { points_available: true, status_available: true };

        let mut out = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for i in 0..rows.len() {
            let (Some(season), Some(race_id), Some(driver_name)) =
                (rows.int(i, "season"), rows.text(i, "race_id"), rows.text(i, "driver_name"))
            else {
                skipped += 1;
                continue;
            };
            out.push(RaceEntry {
                series: Some(Series::F2),
                season,
                race_id,
                session: rows.text(i, "session"),
                driver_name,
                driver_code: rows.text(i, "driver_code"),
                team_name: rows.text(i, "team_name"),
                laps_completed: rows.int(i, "laps"),
                elapsed_time_seconds: time_cell_seconds(rows.cell(i, "race_time")),
                gap_to_leader_seconds: gap_cell_seconds(rows.cell(i, "gap")),
                best_lap_seconds: time_cell_seconds(rows.cell(i, "best_lap_time")),
                average_speed: rows.float(i, "kph"),
                points: rows.float(i, "points"),
                status: Some(self.parse_status(&rows.text(i, "status").unwrap_or_default())),
                ..Default::default()
            });
        }
        if skipped > 0 {
            logw!("F2: skipped {skipped} rows without season / race_id / driver_name");
        }
        (out, policy)
    }

    fn after_ranking(&self, raw: &DataSet, entries: &mut [RaceEntry]) {
        if !Self::points_derived(raw) {
            return;
        }
        logd!("F2: no points column, points follow the championship table");
        for e in entries.iter_mut() {
            e.points = e.finishing_position.map(points_for);
        }
    }
}
