//! Dashboard Configuration Module
//! Catalog location and the reference constants used by the filtered series.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime configuration for one dashboard render.
///
/// The reference state and year drive the two filtered series (yearly
/// activity for one state, monthly activity for one year). They are plain
/// configuration, not constants baked into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path of the catalog CSV.
    pub data_path: PathBuf,
    /// State whose per-year activity series is rendered.
    pub reference_state: String,
    /// Year whose per-month activity series is rendered.
    pub reference_year: i32,
    /// How many trailing rows feed the map projection.
    pub map_tail: usize,
    /// Row limit of the state ranking table.
    pub top_states: usize,
    /// Row limit of the locality ranking table.
    pub top_localities: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/processed_data.csv"),
            reference_state: "OAX".to_string(),
            reference_year: 2024,
            map_tail: 50_000,
            top_states: 7,
            top_localities: 5,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file. Fields missing from the file
    /// keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
