//! JSON file helpers for traxel stores and reports.

use crate::error::{Result, TrackingError};
use crate::hypotheses::TraxelStore;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a traxel store written as a JSON array of traxels.
pub fn load_traxel_store(path: &Path) -> Result<TraxelStore> {
    let data = fs::read_to_string(path).map_err(|source| TrackingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| TrackingError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| TrackingError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| TrackingError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| TrackingError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
