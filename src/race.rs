// src/race.rs
//! Race-level rows: one driver in one race (or one session of a race).

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Series {
    F1,
    F2,
    F3,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::F1, Series::F2, Series::F3];

    pub fn as_str(self) -> &'static str {
        match self { Series::F1 => "F1", Series::F2 => "F2", Series::F3 => "F3" }
    }

    /// Lowercase tag used in file names (`f1_features.csv`).
    pub fn tag(self) -> &'static str {
        match self { Series::F1 => "f1", Series::F2 => "f2", Series::F3 => "f3" }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Finished,
    Dnf,
    Dns,
    Dsq,
    #[default]
    Unknown,
}

impl Status {
    /// Retired or disqualified: the race was started but not completed on merit.
    pub fn is_dnf_or_dsq(self) -> bool { matches!(self, Status::Dnf | Status::Dsq) }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RaceEntry {
    pub series: Option<Series>,
    pub season: i64,
    pub race_id: String,
    pub session: Option<String>,

    pub driver_id: Option<String>,
    pub driver_name: String,
    pub driver_code: Option<String>,
    pub driver_nationality: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,

    pub laps_completed: Option<i64>,
    pub elapsed_time_seconds: Option<f64>,
    pub gap_to_leader_seconds: Option<f64>,
    pub best_lap_seconds: Option<f64>,
    pub average_speed: Option<f64>,
    pub grid_position: Option<i64>,
    pub points: Option<f64>,

    /// `None` when the source has no status column at all.
    pub status: Option<Status>,
    /// Position taken verbatim from the source, when it has one.
    pub provided_position: Option<i64>,
    /// Final 1-based rank; null for rows excluded from ranking (DNS).
    pub finishing_position: Option<i64>,
}

impl RaceEntry {
    /// Grouping identity: driver code when present and non-empty, else name.
    pub fn identity(&self) -> &str {
        match self.driver_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.driver_name,
        }
    }

    /// Key shared by all entries ranked against each other.
    pub fn race_key(&self) -> (i64, &str, Option<&str>) {
        (self.season, self.race_id.as_str(), self.session.as_deref())
    }

    pub fn is_dns(&self) -> bool { self.status == Some(Status::Dns) }
}
