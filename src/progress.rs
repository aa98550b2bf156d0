// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting for pipeline runs.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of stages.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one stage completes; `path` is the file it wrote, if any.
    fn stage_done(&mut self, _stage: &str, _path: Option<&Path>) {}

    /// Called once every stage has completed.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
