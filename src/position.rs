// src/position.rs
//! Finishing order for one race group.
//!
//! Order: source-provided position (when present), then laps completed
//! descending, then elapsed time ascending, then gap ascending. Nulls sort
//! after every non-null value at each step, and exact ties keep input
//! order. The result is always a gap-free 1..N ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::race::RaceEntry;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RankKey {
    pub provided: Option<i64>,
    pub laps: Option<i64>,
    pub time: Option<f64>,
    pub gap: Option<f64>,
}

impl RankKey {
    pub fn of(e: &RaceEntry) -> Self {
        Self {
            provided: e.provided_position,
            laps: e.laps_completed,
            time: e.elapsed_time_seconds,
            gap: e.gap_to_leader_seconds,
        }
    }
}

fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &RankKey, b: &RankKey) -> Ordering {
    nulls_last(a.provided, b.provided, |x, y| x.cmp(&y))
        .then_with(|| nulls_last(a.laps, b.laps, |x, y| y.cmp(&x)))
        .then_with(|| nulls_last(a.time, b.time, |x, y| x.total_cmp(&y)))
        .then_with(|| nulls_last(a.gap, b.gap, |x, y| x.total_cmp(&y)))
}

/// Rank one group. `out[i]` is the 1-based position of `keys[i]`.
pub fn rank_group(keys: &[RankKey]) -> Vec<i64> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    // sort_by is stable: equal keys keep input order
    order.sort_by(|&i, &j| compare(&keys[i], &keys[j]));

    let mut out = vec![0i64; keys.len()];
    for (rank, &i) in order.iter().enumerate() {
        out[i] = rank as i64 + 1;
    }
    out
}

/// Assign `finishing_position` across all race groups in `entries`.
/// Rows rejected by `ranked` get a null position and do not take a slot.
pub fn assign_positions(entries: &mut [RaceEntry], ranked: impl Fn(&RaceEntry) -> bool) {
    let mut groups: HashMap<(i64, String, Option<String>), Vec<usize>> = HashMap::new();
    for (i, e) in entries.iter().enumerate() {
        if !ranked(e) {
            continue;
        }
        let (season, race, session) = e.race_key();
        groups.entry((season, race.to_string(), session.map(str::to_string)))
            .or_default()
            .push(i);
    }

    for e in entries.iter_mut() {
        e.finishing_position = None;
    }

    for members in groups.values() {
        let keys: Vec<RankKey> = members.iter().map(|&i| RankKey::of(&entries[i])).collect();
        for (&i, pos) in members.iter().zip(rank_group(&keys)) {
            entries[i].finishing_position = Some(pos);
        }
    }
}
