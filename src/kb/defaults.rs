// src/kb/defaults.rs
//! One table of fallbacks for absent input fields, keyed by field name.
//! The rule document may override it through its `defaults` section;
//! absent keys there keep the built-in value.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    // driver
    pub age: f64,
    pub nationality: String,
    pub superlicense_points: f64,
    pub junior_series_years: f64,
    pub years_in_f3: f64,
    pub is_f2_champion: bool,
    pub previous_series: String,
    pub social_media_behavior: String,
    pub weight_kg: f64,
    pub neck_cm: f64,
    pub sponsor_capital_chf: f64,
    // team
    pub team_name: String,
    // vehicle
    pub engine_status: String,
    pub tire_status: String,
    pub drs_active: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            age: 20.0,
            nationality: s!(),
            superlicense_points: 0.0,
            junior_series_years: 0.0,
            years_in_f3: 0.0,
            is_f2_champion: false,
            previous_series: s!(),
            social_media_behavior: s!("neutral"),
            weight_kg: 70.0,
            neck_cm: 42.0,
            sponsor_capital_chf: 0.0,
            team_name: s!(),
            engine_status: s!("ok"),
            tire_status: s!("ok"),
            drs_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_builtins() {
        let d: Defaults = serde_json::from_str(r#"{ "age": 22, "weight_kg": 68.5 }"#).unwrap();
        assert_eq!(d.age, 22.0);
        assert_eq!(d.weight_kg, 68.5);
        assert_eq!(d.neck_cm, 42.0);
        assert_eq!(d.social_media_behavior, "neutral");
    }

    #[test]
    fn unknown_default_key_is_rejected() {
        assert!(serde_json::from_str::<Defaults>(r#"{ "agee": 22 }"#).is_err());
    }
}
