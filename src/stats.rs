// src/stats.rs
//! Null-safe column statistics. Every helper skips `None` values, and
//! an input with no values yields `None` rather than zero.

use std::collections::HashMap;
use std::hash::Hash;

pub fn sum(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (n, total) = values.into_iter().flatten().fold((0usize, 0.0), |(n, t), v| (n + 1, t + v));
    (n > 0).then(|| total / n as f64)
}

/// Sample standard deviation (n − 1). Fewer than two values → `None`.
pub fn std(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let xs: Vec<f64> = values.into_iter().flatten().collect();
    if xs.len() < 2 {
        return None;
    }
    let m = xs.iter().sum::<f64>() / xs.len() as f64;
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn min(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().reduce(f64::min)
}

pub fn max(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().reduce(f64::max)
}

/// `numerator / n`, null when `n == 0` or the numerator is null.
pub fn rate(numerator: Option<i64>, n: i64) -> Option<f64> {
    match numerator {
        Some(k) if n > 0 => Some(k as f64 / n as f64),
        _ => None,
    }
}

/// Most frequent value; ties go to the value seen first.
pub fn mode_first<T: Eq + Hash + Clone>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (i, v) in values.into_iter().enumerate() {
        counts.entry(v).or_insert((0, i)).0 += 1;
    }
    counts.into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_null_is_null_not_zero() {
        let none = [None, None];
        assert_eq!(sum(none), None);
        assert_eq!(mean(none), None);
        assert_eq!(std(none), None);
        assert_eq!(min(none), None);
    }

    #[test]
    fn sample_std_matches_textbook() {
        let v = [Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(5.0), Some(5.0), Some(7.0), Some(9.0)];
        let s = std(v).unwrap();
        assert!((s - 2.138089935299395).abs() < 1e-12);
        assert_eq!(std([Some(1.0)]), None);
    }

    #[test]
    fn rate_guards_zero() {
        assert_eq!(rate(Some(1), 0), None);
        assert_eq!(rate(None, 4), None);
        assert_eq!(rate(Some(1), 4), Some(0.25));
    }

    #[test]
    fn mode_ties_go_to_first_seen() {
        assert_eq!(mode_first(["Prema", "ART", "ART", "Prema"]), Some("Prema"));
        assert_eq!(mode_first(["Prema", "ART", "ART"]), Some("ART"));
        assert_eq!(mode_first(Vec::<&str>::new()), None);
    }
}
