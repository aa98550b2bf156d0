// src/config.rs
pub mod consts;
pub mod options;
