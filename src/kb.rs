// src/kb.rs
//! Rule knowledge base and the scoring engine that evaluates it.
//!
//! - `rules`:    the JSON rule document, loaded once and validated.
//! - `defaults`: fallback values for absent driver/team/vehicle fields.
//! - `records`:  driver/team/vehicle inputs (every field optional).
//! - `engine`:   evaluators producing a fixed-key `FeatureVector`.

pub mod defaults;
pub mod engine;
pub mod records;
pub mod rules;

pub use engine::{Engine, FEATURE_KEYS, FeatureValue, FeatureVector};
pub use records::{DriverRecord, TeamRecord, VehicleRecord};
pub use rules::KnowledgeBase;
