//! JSON run reports for batch invocations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sequence::RotationConfig;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of one card pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardReport {
    pub id: String,
    /// Path of the written GIF; absent when the card failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub frames: u32,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one batch run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: RotationConfig,
    /// Pairs discovered, successful or not.
    pub pairs: usize,
    pub cards: Vec<CardReport>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.cards.iter().filter(|c| c.error.is_some()).count()
    }
}

/// Write `report` as pretty-printed JSON.
pub fn write_json(path: &Path, report: &BatchReport) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
