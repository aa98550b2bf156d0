// src/series/f3.rs
//! Formula 3: pre-cleaned race tables with times already in seconds
//! (text times are still accepted and parsed).

use crate::race::{RaceEntry, Series, Status};
use crate::season::SeasonPolicy;
use crate::store::DataSet;
use crate::timing::{gap_cell_seconds, time_cell_seconds};

use super::{RawRows, SeriesAdapter, parse_fia_status};

pub struct F3;

const REQUIRED: &[&str] = &["season", "race_id", "driver_name", "team_name"];

const COLUMNS: &[&str] = &[
    "series", "season", "driver_name", "driver_code", "team_name",
    "n_races", "total_points", "avg_points",
    "avg_finish", "best_finish", "worst_finish",
    "wins", "win_rate", "podiums", "podium_rate",
    "points_finishes", "points_rate", "top10_finishes", "top10_rate",
    "total_laps", "avg_kph", "avg_best_lap_s", "avg_time_from_winner_s",
    "finish_std", "points_std",
    "dnf_count", "dnf_rate", "dns_count", "dns_rate", "dsq_count", "dsq_rate",
    "team_total_points", "team_avg_points", "team_avg_pos_season", "team_speed", "team_n_races",
    "driver_speed", "driver_vs_team_speed", "driver_vs_team_avg_finish", "driver_vs_team_avg_points",
];

impl SeriesAdapter for F3 {
    fn series(&self) -> Series { Series::F3 }

    fn required_columns(&self) -> &'static [&'static str] { REQUIRED }

    fn output_columns(&self) -> &'static [&'static str] { COLUMNS }

    fn parse_status(&self, raw: &str) -> Status { parse_fia_status(raw) }

    fn load_entries(&self, raw: &DataSet) -> (Vec<RaceEntry>, SeasonPolicy) {
        let rows = RawRows::new(raw);
        let has_status = rows.has("status");
        let policy = SeasonPolicy { points_available: rows.has("points"), status_available: has_status };

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
                series: Some(Series::F3),
                season,
                race_id,
                session: rows.text(i, "session_type"),
                driver_name,
                driver_code: rows.text(i, "driver_code"),
                team_name: rows.text(i, "team_name"),
                laps_completed: rows.int(i, "laps"),
                elapsed_time_seconds: time_cell_seconds(rows.cell(i, "time_s")),
                gap_to_leader_seconds: gap_cell_seconds(rows.cell(i, "gap_s")),
                best_lap_seconds: time_cell_seconds(rows.cell(i, "best_lap_s")),
                average_speed: rows.float(i, "kph"),
                points: rows.float(i, "points"),
                status: has_status.then(|| self.parse_status(&rows.text(i, "status").unwrap_or_default())),
                ..Default::default()
            });
        }
        if skipped > 0 {
            logw!("F3: skipped {skipped} rows without season / race_id / driver_name");
        }
        (out, policy)
    }
}
