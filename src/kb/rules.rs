// src/kb/rules.rs
//! The rule document. Every threshold the engine uses lives here.
//!
//! Loaded once (built-in copy or a file override), validated, then only
//! ever read. A missing rule group fails deserialization, which surfaces
//! as `Error::Config` before any evaluation can run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults::Defaults;
use crate::error::{Error, Result};

/// Rule document shipped with the crate.
pub const BUILTIN_RULES: &str = include_str!("../../data/racing_criteria.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub version: Option<String>,
    pub series_rules: SeriesRules,
    pub driver_profile: DriverProfile,
    pub team_profile: TeamProfile,
    pub vehicle_telemetry: VehicleTelemetry,
    #[serde(default)]
    pub defaults: Defaults,
}

/* ---------------- Series ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesRules {
    pub f1: F1Rules,
    pub f2: F2Rules,
    pub f3: F3Rules,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F1Rules {
    pub requirements: F1Requirements,
    pub market_value_boost: MarketValueBoost,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F1Requirements {
    pub min_superlicense_points: f64,
    pub min_age: f64,
    pub junior_series_experience_years: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketValueBoost {
    pub high_value_nations: Vec<String>,
    pub negative_traits: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F2Rules {
    pub requirements: F2Requirements,
    pub anti_patterns: F2AntiPatterns,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F2Requirements {
    /// More F3 seasons than this counts as stagnation.
    pub max_years_in_f3: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F2AntiPatterns {
    pub ban_reigning_champion: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F3Rules {
    pub requirements: F3Requirements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F3Requirements {
    pub preferred_pathway: Vec<String>,
    pub risky_pathway: Vec<String>,
}

/* ---------------- Driver / team / vehicle ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub biometrics: Biometrics,
    pub career: Career,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub ideal_weight_min_kg: f64,
    pub ideal_weight_max_kg: f64,
    pub weight_penalty_per_kg: f64,
    pub neck_circumference_min_cm: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub peak_performance_age_start: f64,
    pub peak_performance_age_end: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub political_power: PoliticalPower,
    pub financial: Financial,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoliticalPower {
    pub has_veto_right: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Financial {
    /// Capital at which financial viability saturates at 1.0.
    pub reference_sponsor_capital_chf: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleTelemetry {
    /// Status strings that mark a component as damaged.
    pub damaged_markers: Vec<String>,
}

/* ---------------- Loading ---------------- */

impl KnowledgeBase {
    pub fn from_json(text: &str) -> Result<Self> {
        let kb: KnowledgeBase = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("knowledge base: {e}")))?;
        kb.validate()?;
        Ok(kb)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingInput { path: path.to_path_buf() });
        }
        let kb = Self::from_json(&fs::read_to_string(path)?)?;
        logf!("Loaded knowledge base {} (version {})", path.display(), kb.version.as_deref().unwrap_or("-"));
        Ok(kb)
    }

    pub fn builtin() -> Result<Self> { Self::from_json(BUILTIN_RULES) }

    /// Range and sign checks serde can not express.
    pub fn validate(&self) -> Result<()> {
        let bio = &self.driver_profile.biometrics;
        let career = &self.driver_profile.career;
        let capital = self.team_profile.financial.reference_sponsor_capital_chf;

        let mut problems = Vec::new();
        if bio.ideal_weight_min_kg > bio.ideal_weight_max_kg {
            problems.push("ideal_weight_min_kg exceeds ideal_weight_max_kg");
        }
        if !(bio.weight_penalty_per_kg >= 0.0) {
            problems.push("weight_penalty_per_kg must be >= 0");
        }
        if career.peak_performance_age_start > career.peak_performance_age_end {
            problems.push("peak_performance_age_start exceeds peak_performance_age_end");
        }
        if !(capital > 0.0) {
            problems.push("reference_sponsor_capital_chf must be > 0");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }
}
