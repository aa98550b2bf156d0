// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::csv::Delim;
use crate::race::Series;

/// Which artefacts a pipeline run writes. Everything by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Artefacts {
    pub features: bool,
    pub harmonized: bool,
    pub master: bool,
    pub core: bool,
}

impl Default for Artefacts {
    fn default() -> Self {
        Self { features: true, harmonized: true, master: true, core: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    pub f1_input: PathBuf,
    pub f2_input: PathBuf,
    pub f3_input: PathBuf,
    pub out_dir: PathBuf,
    /// Output delimiter. Inputs pick theirs from the file extension.
    pub format: Delim,
    pub artefacts: Artefacts,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            f1_input: PathBuf::from(F1_INPUT),
            f2_input: PathBuf::from(F2_INPUT),
            f3_input: PathBuf::from(F3_INPUT),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            format: Delim::Csv,
            artefacts: Artefacts::default(),
        }
    }
}

impl PipelineOptions {
    /// Every path is resolved against `root` (keeps absolute paths as-is).
    pub fn rooted(root: &Path) -> Self {
        let d = Self::default();
        Self {
            f1_input: root.join(d.f1_input),
            f2_input: root.join(d.f2_input),
            f3_input: root.join(d.f3_input),
            out_dir: root.join(d.out_dir),
            ..d
        }
    }

    pub fn input(&self, series: Series) -> &Path {
        match series {
            Series::F1 => &self.f1_input,
            Series::F2 => &self.f2_input,
            Series::F3 => &self.f3_input,
        }
    }

    fn out_file(&self, stem: &str) -> PathBuf {
        self.out_dir.join(format!("{stem}.{}", self.format.ext()))
    }

    /// `f1_features.csv`
    pub fn features_path(&self, series: Series) -> PathBuf {
        self.out_file(&format!("{}{FEATURES_SUFFIX}", series.tag()))
    }

    /// `f1_features_harmonized.csv`
    pub fn harmonized_path(&self, series: Series) -> PathBuf {
        self.out_file(&format!("{}{HARMONIZED_SUFFIX}", series.tag()))
    }

    pub fn master_path(&self) -> PathBuf { self.out_file(MASTER_STEM) }

    pub fn master_core_path(&self) -> PathBuf { self.out_file(MASTER_CORE_STEM) }
}
