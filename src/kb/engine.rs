// src/kb/engine.rs
//! Racing intelligence engine: rule document + record → feature vector.
//!
//! Four evaluators, each owning a disjoint key namespace, plus
//! `generate_full_profile` which concatenates them. Evaluators are pure:
//! they read the immutable `KnowledgeBase` and the input record, fill
//! absent fields from the defaults table, and never fail.
//!
//! The key set is the contract with downstream consumers. New evaluators
//! add keys; existing keys are never renamed or repurposed.

use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::records::{DriverRecord, TeamRecord, VehicleRecord};
use super::rules::KnowledgeBase;
use crate::error::Result;
use crate::store::{Cell, DataSet};

pub const ELIGIBILITY_KEYS: &[&str] = &[
    "f1_qualified", "f1_marketing_boost", "f1_risk_factor",
    "f2_stagnation_penalty", "f2_banned", "f3_pathway_score",
];
pub const BIOMETRIC_KEYS: &[&str] = &["phys_weight_score", "phys_neck_strength", "age_peak_window"];
pub const TEAM_KEYS: &[&str] = &["team_political_power", "financial_viability"];
pub const VEHICLE_KEYS: &[&str] = &["vehicle_engine_damaged", "vehicle_tire_damaged", "aero_mode_attack"];

/// Full profile key order.
pub const FEATURE_KEYS: &[&str] = &[
    "f1_qualified", "f1_marketing_boost", "f1_risk_factor",
    "f2_stagnation_penalty", "f2_banned", "f3_pathway_score",
    "phys_weight_score", "phys_neck_strength", "age_peak_window",
    "team_political_power", "financial_viability",
    "vehicle_engine_damaged", "vehicle_tire_damaged", "aero_mode_attack",
];

/* ---------------- Feature vector ---------------- */

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureValue {
    /// 0 / 1 indicator.
    Flag(bool),
    Score(f64),
}

impl FeatureValue {
    pub fn as_f64(self) -> f64 {
        match self {
            FeatureValue::Flag(b) => if b { 1.0 } else { 0.0 },
            FeatureValue::Score(x) => x,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            FeatureValue::Flag(b) => Cell::Int(i64::from(b)),
            FeatureValue::Score(x) => Cell::Float(x),
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            FeatureValue::Flag(b) => s.serialize_u8(u8::from(b)),
            FeatureValue::Score(x) => s.serialize_f64(x),
        }
    }
}

/// Ordered key → value mapping. Serializes as a JSON object in key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(&'static str, FeatureValue)>,
}

impl FeatureVector {
    fn flag(&mut self, key: &'static str, v: bool) { self.entries.push((key, FeatureValue::Flag(v))); }
    fn score(&mut self, key: &'static str, v: f64) { self.entries.push((key, FeatureValue::Score(v))); }

    /// Append another evaluator's output. Namespaces are disjoint.
    fn absorb(&mut self, other: FeatureVector) {
        for (k, _) in &other.entries {
            debug_assert!(self.get(k).is_none(), "feature key collision: {k}");
        }
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<FeatureValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/* ---------------- Engine ---------------- */

/// Holds the validated rule document. `Send + Sync`; share by reference.
#[derive(Clone, Debug)]
pub struct Engine {
    kb: KnowledgeBase,
}

impl Engine {
    pub fn new(kb: KnowledgeBase) -> Result<Self> {
        kb.validate()?;
        Ok(Self { kb })
    }

    /// Engine over the rule document shipped with the crate.
    pub fn builtin() -> Result<Self> { Self::new(KnowledgeBase::builtin()?) }

    pub fn from_path(path: &Path) -> Result<Self> { Self::new(KnowledgeBase::from_path(path)?) }


    pub fn evaluate_eligibility(&self, driver: &DriverRecord) -> FeatureVector {
        let d = driver.resolve(&self.kb.defaults);
        let f1 = &self.kb.series_rules.f1;
        let f2 = &self.kb.series_rules.f2;
        let f3 = &self.kb.series_rules.f3.requirements;
        let mut out = FeatureVector::default();

        let req = &f1.requirements;
        out.flag(
            "f1_qualified",
            d.superlicense_points >= req.min_superlicense_points
                && d.age >= req.min_age
                && d.junior_series_years >= req.junior_series_experience_years,
        );
        out.flag("f1_marketing_boost", f1.market_value_boost.high_value_nations.contains(&d.nationality));
        out.flag("f1_risk_factor", f1.market_value_boost.negative_traits.contains(&d.social_media_behavior));

        out.flag("f2_stagnation_penalty", d.years_in_f3 > f2.requirements.max_years_in_f3);
        out.flag("f2_banned", f2.anti_patterns.ban_reigning_champion && d.is_f2_champion);

        let pathway = if f3.preferred_pathway.contains(&d.previous_series) {
            1.0
        } else if f3.risky_pathway.contains(&d.previous_series) {
            0.0
        } else {
            0.5
        };
        out.score("f3_pathway_score", pathway);
        out
    }

    pub fn evaluate_biometrics(&self, driver: &DriverRecord) -> FeatureVector {
        let d = driver.resolve(&self.kb.defaults);
        let bio = &self.kb.driver_profile.biometrics;
        let career = &self.kb.driver_profile.career;
        let mut out = FeatureVector::default();

        let (lo, hi) = (bio.ideal_weight_min_kg, bio.ideal_weight_max_kg);
        let weight = if (lo..=hi).contains(&d.weight_kg) {
            1.0
        } else {
            let dist = (d.weight_kg - lo).abs().min((d.weight_kg - hi).abs());
            (1.0 - dist * bio.weight_penalty_per_kg).max(0.0)
        };
        out.score("phys_weight_score", weight);
        out.score("phys_neck_strength", if d.neck_cm >= bio.neck_circumference_min_cm { 1.0 } else { 0.5 });
        out.flag(
            "age_peak_window",
            (career.peak_performance_age_start..=career.peak_performance_age_end).contains(&d.age),
        );
        out
    }

    pub fn evaluate_team_fit(&self, team: &TeamRecord, driver: &DriverRecord) -> FeatureVector {
        let defaults = &self.kb.defaults;
        let team_name = team.team_name.as_ref().unwrap_or(&defaults.team_name);
        let capital = driver.sponsor_capital_chf.unwrap_or(defaults.sponsor_capital_chf);
        let reference = self.kb.team_profile.financial.reference_sponsor_capital_chf;
        let mut out = FeatureVector::default();

        out.flag("team_political_power", self.kb.team_profile.political_power.has_veto_right.contains(team_name));
        out.score("financial_viability", (capital / reference).clamp(0.0, 1.0));
        out
    }

    pub fn evaluate_vehicle(&self, vehicle: &VehicleRecord) -> FeatureVector {
        let defaults = &self.kb.defaults;
        let markers = &self.kb.vehicle_telemetry.damaged_markers;
        let damaged = |v: &Option<String>, fallback: &String| markers.contains(v.as_ref().unwrap_or(fallback));
        let mut out = FeatureVector::default();

        out.flag("vehicle_engine_damaged", damaged(&vehicle.engine_status, &defaults.engine_status));
        out.flag("vehicle_tire_damaged", damaged(&vehicle.tire_status, &defaults.tire_status));
        out.flag("aero_mode_attack", vehicle.drs_active.unwrap_or(defaults.drs_active));
        out
    }

    /// All evaluators, concatenated in `FEATURE_KEYS` order.
    pub fn generate_full_profile(
        &self,
        driver: &DriverRecord,
        team: &TeamRecord,
        vehicle: &VehicleRecord,
    ) -> FeatureVector {
        let mut out = self.evaluate_eligibility(driver);
        out.absorb(self.evaluate_biometrics(driver));
        out.absorb(self.evaluate_team_fit(team, driver));
        out.absorb(self.evaluate_vehicle(vehicle));
        out
    }

    /// Append the full profile of every row as `FEATURE_KEYS` columns.
    /// Driver and team fields are read by column name; the vehicle is
    /// the default record. Existing columns with a feature name are
    /// overwritten.
    pub fn enrich(&self, table: &DataSet) -> DataSet {
        let mut out = table.clone();
        let ixs: Vec<usize> = FEATURE_KEYS.iter()
            .map(|k| {
                out.fill_col(k, Cell::Null);
                out.col(k).unwrap_or_default()
            })
            .collect();

        let vehicle = VehicleRecord::default();
        for row in 0..table.len() {
            let profile = self.generate_full_profile(
                &DriverRecord::from_row(table, row),
                &TeamRecord::from_row(table, row),
                &vehicle,
            );
            for (&ix, (_, v)) in ixs.iter().zip(profile.iter()) {
                out.rows[row][ix] = v.to_cell();
            }
        }
        logf!("Enriched {} rows with {} profile features", table.len(), FEATURE_KEYS.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::builtin().unwrap()
    }

    fn flag(v: &FeatureVector, k: &str) -> f64 {
        v.get(k).map(FeatureValue::as_f64).unwrap()
    }

    #[test]
    fn qualified_at_exact_thresholds() {
        let d = DriverRecord {
            superlicense_points: Some(40.0),
            age: Some(19.0),
            junior_series_years: Some(3.0),
            ..Default::default()
        };
        assert_eq!(flag(&engine().evaluate_eligibility(&d), "f1_qualified"), 1.0);

        let short = DriverRecord { superlicense_points: Some(39.9), ..d };
        assert_eq!(flag(&engine().evaluate_eligibility(&short), "f1_qualified"), 0.0);
    }

    #[test]
    fn financial_viability_is_saturating() {
        let e = engine();
        let team = TeamRecord::default();
        let with = |c: f64| {
            let d = DriverRecord { sponsor_capital_chf: Some(c), ..Default::default() };
            flag(&e.evaluate_team_fit(&team, &d), "financial_viability")
        };
        assert_eq!(with(4_000_000.0), 0.5);
        assert_eq!(with(9_000_000.0), 1.0);
        assert_eq!(with(-5.0), 0.0);
    }

    #[test]
    fn weight_decays_from_nearer_bound() {
        let e = engine();
        let w = |kg: f64| {
            let d = DriverRecord { weight_kg: Some(kg), ..Default::default() };
            flag(&e.evaluate_biometrics(&d), "phys_weight_score")
        };
        assert_eq!(w(70.0), 1.0);
        assert!((w(75.0) - 0.7).abs() < 1e-9);
        assert!((w(63.0) - 0.8).abs() < 1e-9);
        assert_eq!(w(120.0), 0.0);
    }

    #[test]
    fn empty_input_gives_full_key_set() {
        let v = engine().generate_full_profile(
            &DriverRecord::default(),
            &TeamRecord::default(),
            &VehicleRecord::default(),
        );
        assert_eq!(v.keys().collect::<Vec<_>>(), FEATURE_KEYS);
        // Default age 20 sits outside the peak window; default neck 42 passes.
        assert_eq!(flag(&v, "age_peak_window"), 0.0);
        assert_eq!(flag(&v, "phys_neck_strength"), 1.0);
        assert_eq!(flag(&v, "f3_pathway_score"), 0.5);
    }

    #[test]
    fn evaluators_own_their_keys() {
        let e = engine();
        let d = DriverRecord::default();
        let keys = |v: FeatureVector| v.keys().collect::<Vec<_>>();
        assert_eq!(keys(e.evaluate_eligibility(&d)), ELIGIBILITY_KEYS);
        assert_eq!(keys(e.evaluate_biometrics(&d)), BIOMETRIC_KEYS);
        assert_eq!(keys(e.evaluate_team_fit(&TeamRecord::default(), &d)), TEAM_KEYS);
        assert_eq!(keys(e.evaluate_vehicle(&VehicleRecord::default())), VEHICLE_KEYS);
        let all = [ELIGIBILITY_KEYS, BIOMETRIC_KEYS, TEAM_KEYS, VEHICLE_KEYS].concat();
        assert_eq!(all, FEATURE_KEYS);
    }

    #[test]
    fn demo_driver_profile() {
        let driver: DriverRecord = serde_json::from_str(
            r#"{ "age": 19, "nationality": "USA", "weight_kg": 72, "neck_cm": 38,
                 "superlicense_points": 30, "years_in_f3": 1, "previous_series": "F4",
                 "sponsor_capital_chf": 9000000 }"#,
        )
        .unwrap();
        let team = TeamRecord { team_name: Some("Ferrari".into()), budget: Some("High".into()) };
        let vehicle = VehicleRecord {
            engine_status: Some("ok".into()),
            tire_status: Some("damaged".into()),
            drs_active: Some(true),
        };
        let v = engine().generate_full_profile(&driver, &team, &vehicle);
        assert_eq!(flag(&v, "f1_qualified"), 0.0);
        assert_eq!(flag(&v, "f1_marketing_boost"), 1.0);
        assert_eq!(flag(&v, "f3_pathway_score"), 0.0);
        assert_eq!(flag(&v, "phys_neck_strength"), 0.5);
        assert_eq!(flag(&v, "team_political_power"), 1.0);
        assert_eq!(flag(&v, "vehicle_tire_damaged"), 1.0);
        assert_eq!(flag(&v, "vehicle_engine_damaged"), 0.0);
        assert_eq!(flag(&v, "aero_mode_attack"), 1.0);

        let json = serde_json::to_string(&v).unwrap();
        assert!(json.starts_with(r#"{"f1_qualified":0,"#));
    }

    #[test]
    fn enrich_appends_feature_columns() {
        let ds = crate::csv::parse_table(
            "driver_name,team_name,age\nA,Ferrari,26\nB,,\n",
            crate::csv::Delim::Csv,
        );
        let out = engine().enrich(&ds);
        assert_eq!(out.headers.len(), 3 + FEATURE_KEYS.len());
        assert_eq!(out.get(0, "team_political_power"), Some(&Cell::Int(1)));
        assert_eq!(out.get(0, "age_peak_window"), Some(&Cell::Int(1)));
        assert_eq!(out.get(1, "team_political_power"), Some(&Cell::Int(0)));
        assert_eq!(out.get(1, "financial_viability"), Some(&Cell::Float(0.0)));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();

        let e = engine();
        let results: Vec<FeatureVector> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let e = &e;
                    s.spawn(move || {
                        let d = DriverRecord { age: Some(20.0 + i as f64), ..Default::default() };
                        e.generate_full_profile(&d, &TeamRecord::default(), &VehicleRecord::default())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|v| v.len() == FEATURE_KEYS.len()));
    }
}
