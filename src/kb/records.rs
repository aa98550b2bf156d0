// src/kb/records.rs
//! Scoring inputs. Every field is optional; unknown JSON keys are ignored.

use serde::{Deserialize, Serialize};

use super::defaults::Defaults;
use crate::store::{Cell, DataSet};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverRecord {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub nationality: Option<String>,
    pub superlicense_points: Option<f64>,
    pub junior_series_years: Option<f64>,
    pub years_in_f3: Option<f64>,
    pub is_f2_champion: Option<bool>,
    pub previous_series: Option<String>,
    pub social_media_behavior: Option<String>,
    pub weight_kg: Option<f64>,
    pub neck_cm: Option<f64>,
    pub sponsor_capital_chf: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRecord {
    pub team_name: Option<String>,
    pub budget: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleRecord {
    pub engine_status: Option<String>,
    pub tire_status: Option<String>,
    pub drs_active: Option<bool>,
}

/* ---------------- Defaults applied ---------------- */

pub(crate) struct Driver {
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
}

impl DriverRecord {
    pub(crate) fn resolve(&self, d: &Defaults) -> Driver {
        let text = |v: &Option<String>, fallback: &str| v.clone().unwrap_or_else(|| fallback.to_string());
        Driver {
            age: self.age.unwrap_or(d.age),
            nationality: text(&self.nationality, &d.nationality),
            superlicense_points: self.superlicense_points.unwrap_or(d.superlicense_points),
            junior_series_years: self.junior_series_years.unwrap_or(d.junior_series_years),
            years_in_f3: self.years_in_f3.unwrap_or(d.years_in_f3),
            is_f2_champion: self.is_f2_champion.unwrap_or(d.is_f2_champion),
            previous_series: text(&self.previous_series, &d.previous_series),
            social_media_behavior: text(&self.social_media_behavior, &d.social_media_behavior),
            weight_kg: self.weight_kg.unwrap_or(d.weight_kg),
            neck_cm: self.neck_cm.unwrap_or(d.neck_cm),
            sponsor_capital_chf: self.sponsor_capital_chf.unwrap_or(d.sponsor_capital_chf),
        }
    }

    /// Driver fields read from one table row by column name.
    /// Missing columns and null cells stay `None`.
    pub fn from_row(ds: &DataSet, row: usize) -> Self {
        let num = |c: &str| ds.get(row, c).and_then(Cell::as_f64);
        let text = |c: &str| ds.get(row, c).filter(|v| !v.is_null()).map(ToString::to_string);
        Self {
            name: text("driver_name"),
            age: num("age"),
            nationality: text("nationality").or_else(|| text("driver_nationality")),
            superlicense_points: num("superlicense_points"),
            junior_series_years: num("junior_series_years"),
            years_in_f3: num("years_in_f3"),
            is_f2_champion: ds.get(row, "is_f2_champion").and_then(cell_bool),
            previous_series: text("previous_series"),
            social_media_behavior: text("social_media_behavior"),
            weight_kg: num("weight_kg"),
            neck_cm: num("neck_cm"),
            sponsor_capital_chf: num("sponsor_capital_chf"),
        }
    }
}

impl TeamRecord {
    pub fn from_row(ds: &DataSet, row: usize) -> Self {
        Self {
            team_name: ds.get(row, "team_name").filter(|v| !v.is_null()).map(ToString::to_string),
            budget: None,
        }
    }
}

fn cell_bool(c: &Cell) -> Option<bool> {
    match c {
        Cell::Int(i) => Some(*i != 0),
        Cell::Float(f) => Some(*f != 0.0),
        Cell::Text(t) => match t.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Cell::Null => None,
    }
}
