// src/config/consts.rs

// Inputs (cleaned race-level tables, one per series)
pub const F1_INPUT: &str = "data/f1/interim/f1_race_driver_clean.csv";
pub const F2_INPUT: &str = "data/f2/interim/f2_results_fia_drivers_clean.csv";
pub const F3_INPUT: &str = "data/f3/interim/f3_races_clean.csv";

// Outputs
pub const DEFAULT_OUT_DIR: &str = "data/all_series/processed";
pub const FEATURES_SUFFIX: &str = "_features";
pub const HARMONIZED_SUFFIX: &str = "_features_harmonized";
pub const MASTER_STEM: &str = "all_series_master_features";
pub const MASTER_CORE_STEM: &str = "all_series_master_features_core";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
