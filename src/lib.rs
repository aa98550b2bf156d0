// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;

pub mod csv;
pub mod file;
pub mod store;

pub mod position;
pub mod race;
pub mod series;
pub mod stats;
pub mod timing;

pub mod check;
pub mod harmonize;
pub mod merge;
pub mod season;

pub mod kb;
pub mod progress;
pub mod runner;

pub use error::{Error, Result};
