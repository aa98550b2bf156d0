// src/timing.rs
//! Timing strings → elapsed seconds.
//!
//! Accepted shapes: plain seconds (`"95.2"`), `MM:SS.mmm` and
//! `H:MM:SS.mmm`. Non-finish markers, lap-count gaps (`"+1 LAP"`) and
//! anything unparsable yield `None`; these functions never fail on
//! present-but-malformed input.

use crate::store::Cell;

/// Markers that mean "no time was set".
const NON_FINISH: [&str; 5] = ["", "-", "DNF", "DNS", "DSQ"];

fn is_non_finish(s: &str) -> bool {
    NON_FINISH.iter().any(|m| s.eq_ignore_ascii_case(m))
}

fn has_lap_marker(s: &str) -> bool {
    s.to_ascii_uppercase().contains("LAP")
}

fn finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// `"1:47.175"` → `107.175`, `"43:01.023"` → `2581.023`, `"1:02:03.5"` → `3723.5`.
pub fn parse_time_to_seconds(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if is_non_finish(s) || has_lap_marker(s) {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [secs] => finite(secs),
        [m, sec] => {
            let m: u32 = m.trim().parse().ok()?;
            let sec = finite(sec.trim())?;
            Some(f64::from(m) * 60.0 + sec)
        }
        [h, m, sec] => {
            let h: u32 = h.trim().parse().ok()?;
            let m: u32 = m.trim().parse().ok()?;
            let sec = finite(sec.trim())?;
            Some(f64::from(h) * 3600.0 + f64::from(m) * 60.0 + sec)
        }
        _ => None,
    }
}

/// `"+2.341"` → `2.341`; `"+1 LAP"` / `"2 Laps"` → `None`.
pub fn parse_gap_to_seconds(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if is_non_finish(s) || has_lap_marker(s) {
        return None;
    }
    let s = s.strip_prefix('+').unwrap_or(s).trim();
    // Gaps over a minute come as "1:02.345".
    if s.contains(':') {
        return parse_time_to_seconds(s);
    }
    finite(s)
}

/// Cell-level entry point: numbers pass through, text is parsed.
pub fn time_cell_seconds(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Null => None,
        Cell::Int(i) => Some(*i as f64),
        Cell::Float(f) => Some(*f).filter(|x| x.is_finite()),
        Cell::Text(t) => {
            let out = parse_time_to_seconds(t);
            if out.is_none() && !is_non_finish(t.trim()) {
                logd!("Unparsable time {:?} → null", t);
            }
            out
        }
    }
}

pub fn gap_cell_seconds(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Null => None,
        Cell::Int(i) => Some(*i as f64),
        Cell::Float(f) => Some(*f).filter(|x| x.is_finite()),
        Cell::Text(t) => parse_gap_to_seconds(t),
    }
}
