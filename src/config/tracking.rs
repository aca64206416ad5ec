use crate::error::{Result, TrackingError};
use crate::tracking::TrackingOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub events_json: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

/// `track_demo` configuration: a traxel store, output paths and the tracking options.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tracking: TrackingOptions,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let data = fs::read_to_string(path).map_err(|source| TrackingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| TrackingError::Json {
        path: path.to_path_buf(),
        source,
    })
}
