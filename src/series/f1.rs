// src/series/f1.rs
//! Formula 1: Ergast-style race results, one row per driver per race.

use crate::race::{RaceEntry, Series, Status};
use crate::season::SeasonPolicy;
use crate::store::DataSet;

use super::{RawRows, SeriesAdapter};

pub struct F1;

const REQUIRED: &[&str] = &["year", "race_id", "driver_name"];

const COLUMNS: &[&str] = &[
    "series", "year",
    "driver_id", "driver_name", "driver_code", "driver_nationality",
    "constructor_id", "constructor_name",
    "n_races",
    "total_points", "avg_points",
    "avg_grid", "avg_finish", "best_finish", "worst_finish",
    "wins", "win_rate", "podiums", "podium_rate",
    "points_finishes", "points_rate", "top10_finishes", "top10_rate",
    "total_laps", "avg_kph",
    "finish_std", "points_std", "avg_pos_change", "pos_change_std",
    "dnf_count", "dnf_rate",
    "team_total_points", "team_avg_points", "team_avg_pos_season", "team_speed", "team_n_races",
    "driver_speed", "driver_vs_team_speed", "driver_vs_team_avg_finish", "driver_vs_team_avg_points",
];

/// `+1 Lap`, `+3 Laps`: classified finishers a lap or more down.
fn is_laps_down(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('+') else { return false };
    let mut parts = rest.split_whitespace();
    let count = parts.next().is_some_and(|n| n.parse::<u32>().is_ok());
    let word = parts.next().is_some_and(|w| w.eq_ignore_ascii_case("lap") || w.eq_ignore_ascii_case("laps"));
    count && word && parts.next().is_none()
}

impl SeriesAdapter for F1 {
    fn series(&self) -> Series { Series::F1 }

    fn required_columns(&self) -> &'static [&'static str] { REQUIRED }

    fn output_columns(&self) -> &'static [&'static str] { COLUMNS }

    fn parse_status(&self, raw: &str) -> Status {
        let s = raw.trim();
        if s.is_empty() {
            return Status::Unknown;
        }
        if s.eq_ignore_ascii_case("finished") || is_laps_down(s) {
            return Status::Finished;
        }
        match s.to_ascii_lowercase().as_str() {
            "disqualified" | "excluded" => Status::Dsq,
            "did not start" | "withdrew" | "did not qualify" | "did not prequalify" => Status::Dns,
            // Engine, Collision, Accident, Gearbox, …
            _ => Status::Dnf,
        }
    }

    fn load_entries(&self, raw: &DataSet) -> (Vec<RaceEntry>, SeasonPolicy) {
        let rows = RawRows::new(raw);
        let has_status = rows.has("status_text");
        let policy = SeasonPolicy { points_available: rows.has("points"), status_available: has_status };
        let position_col = ["finishing_order", "finishing_position"].into_iter().find(|c| rows.has(c));

        let mut out = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for i in 0..rows.len() {
            let (Some(season), Some(race_id), Some(driver_name)) =
                (rows.int(i, "year"), rows.text(i, "race_id"), rows.text(i, "driver_name"))
            else {
                skipped += 1;
                continue;
            };
            out.push(RaceEntry {
                series: Some(Series::F1),
                season,
                race_id,
                session: None,
                driver_id: rows.text(i, "driver_id"),
                driver_name,
                driver_code: rows.text(i, "driver_code"),
                driver_nationality: rows.text(i, "driver_nationality"),
                team_id: rows.text(i, "constructor_id"),
                team_name: rows.text(i, "constructor_name"),
                laps_completed: rows.int(i, "laps_completed"),
                elapsed_time_seconds: rows.float(i, "result_ms").map(|ms| ms / 1000.0),
                gap_to_leader_seconds: None,
                best_lap_seconds: None,
                average_speed: rows.float(i, "fastest_lap_speed"),
                grid_position: rows.int(i, "grid_position"),
                points: rows.float(i, "points"),
                status: has_status.then(|| self.parse_status(&rows.text(i, "status_text").unwrap_or_default())),
                provided_position: position_col.and_then(|c| rows.int(i, c)),
                finishing_position: None,
            });
        }
        if skipped > 0 {
            logw!("F1: skipped {skipped} rows without year / race_id / driver_name");
        }
        (out, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::{Delim, parse_table};
    use crate::store::Cell;

    #[test]
    fn status_vocabulary() {
        assert_eq!(F1.parse_status("Finished"), Status::Finished);
        assert_eq!(F1.parse_status("+1 Lap"), Status::Finished);
        assert_eq!(F1.parse_status("+12 Laps"), Status::Finished);
        assert_eq!(F1.parse_status("Disqualified"), Status::Dsq);
        assert_eq!(F1.parse_status("Did not qualify"), Status::Dns);
        assert_eq!(F1.parse_status("Gearbox"), Status::Dnf);
        assert_eq!(F1.parse_status("+ Laps"), Status::Dnf);
        assert_eq!(F1.parse_status(""), Status::Unknown);
    }

    #[test]
    fn explicit_order_and_team_deltas() {
        let raw = parse_table(
            "year,race_id,driver_code,driver_name,constructor_id,constructor_name,grid_position,finishing_order,laps_completed,points,result_ms,fastest_lap_speed,status_text\n\
             2021,r1,VER,Max Verstappen,red_bull,Red Bull,2,1,58,25,5400000,210.0,Finished\n\
             2021,r1,PER,Sergio Perez,red_bull,Red Bull,5,3,58,15,5410000,200.0,Finished\n\
             2021,r1,HAM,Lewis Hamilton,mercedes,Mercedes,1,2,58,18,5401000,209.0,Finished\n\
             2021,r2,HAM,Lewis Hamilton,mercedes,Mercedes,2,1,58,25,5300000,211.0,Finished\n\
             2021,r2,VER,Max Verstappen,red_bull,Red Bull,1,,30,0,,,Engine\n",
            Delim::Csv,
        );
        let recs = F1.season_records(&raw).unwrap();
        let ver = recs.iter().find(|r| r.driver_code.as_deref() == Some("VER")).unwrap();
        assert_eq!(ver.n_races, 2);
        assert_eq!(ver.wins, Some(1));
        assert_eq!(ver.dnf_count, Some(1));
        assert_eq!(ver.best_finish, Some(1));
        assert_eq!(ver.worst_finish, Some(2));
        // +1 in r1 (2 → 1), -1 in r2 (1 → 2)
        assert_eq!(ver.avg_pos_change, Some(0.0));

        // Team: mean points over 3 rows = 40/3; VER = 12.5.
        let delta = ver.cell("driver_vs_team_avg_points").as_f64().unwrap();
        assert!((delta - (12.5 - 40.0 / 3.0)).abs() < 1e-9);
        assert_eq!(ver.cell("team_n_races"), Cell::Int(2));
    }

    #[test]
    fn ergast_null_codes_fall_back_to_name() {
        let raw = parse_table(
            "year,race_id,driver_id,driver_code,driver_name,finishing_order,points,status_text\n\
             1985,r1,prost,\\N,Alain Prost,1,9,Finished\n\
             1985,r1,senna,\\N,Ayrton Senna,2,6,Finished\n\
             1985,r1,lauda,\\N,Niki Lauda,3,4,Finished\n",
            Delim::Csv,
        );
        let recs = F1.season_records(&raw).unwrap();
        assert_eq!(recs.len(), 3);

        let summary: Vec<_> = recs.iter()
            .map(|r| (r.driver_name.as_str(), r.driver_code.clone(), r.wins, r.total_points))
            .collect();
        assert_eq!(summary, vec![
            ("Alain Prost", None, Some(1), Some(9.0)),
            ("Ayrton Senna", None, Some(0), Some(6.0)),
            ("Niki Lauda", None, Some(0), Some(4.0)),
        ]);
        assert_eq!(recs[0].driver_id.as_deref(), Some("prost"));
    }

    #[test]
    fn table_has_fixed_order() {
        let raw = parse_table("year,race_id,driver_name\n2020,r1,A\n", Delim::Csv);
        let t = F1.season_table(&raw).unwrap();
        assert_eq!(t.headers.len(), COLUMNS.len());
        assert_eq!(t.get(0, "series"), Some(&Cell::text("F1")));
        // No points / status columns: null, not zero.
        assert_eq!(t.get(0, "total_points"), Some(&Cell::Null));
        assert_eq!(t.get(0, "dnf_rate"), Some(&Cell::Null));
        assert_eq!(t.get(0, "best_finish"), Some(&Cell::Int(1)));
    }
}
