//! Result and device descriptor records

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SearchError};

/// One parsed `encapp_*.json` result file
#[derive(Debug, Clone, Deserialize)]
pub struct ResultRecord {
    #[serde(skip)]
    pub path: PathBuf,
    pub encodedfile: String,
    /// Nested test configuration (`common`, `input`, `configure`, ...)
    pub test: serde_json::Map<String, serde_json::Value>,
    pub meanbitrate: serde_json::Value,
}

impl ResultRecord {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SearchError::record_read(path, e))?;
        let mut record: ResultRecord =
            serde_json::from_str(&content).map_err(|e| SearchError::record_read(path, e))?;
        record.path = path.to_path_buf();
        Ok(record)
    }
}

/// Device identity from the `device.json` next to a result file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceDescriptor {
    pub model: String,
    pub platform: String,
    pub serial: String,
}

#[derive(Deserialize)]
struct RawDevice {
    #[serde(default)]
    props: serde_json::Map<String, serde_json::Value>,
}

impl DeviceDescriptor {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SearchError::record_read(path, e))?;
        let raw: RawDevice =
            serde_json::from_str(&content).map_err(|e| SearchError::record_read(path, e))?;

        let prop = |key: &str| match raw.props.get(key) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        Ok(Self {
            model: prop("ro.product.model"),
            platform: prop("ro.board.platform"),
            serial: prop("ro.serialno"),
        })
    }

    /// Descriptor for the directory holding `result_path`; empty when absent or unreadable.
    pub fn for_result(result_path: &Path, device_file_name: &str) -> Self {
        let dir = result_path.parent().unwrap_or_else(|| Path::new("."));
        let path = dir.join(device_file_name);
        if !path.exists() {
            tracing::debug!("No device descriptor at {:?}", path);
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(device) => device,
            Err(e) => {
                tracing::warn!("Ignoring device descriptor: {}", e);
                Self::default()
            }
        }
    }
}
