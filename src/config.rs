//! Search configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Default name of the persisted index, stored directly under the search root
pub const INDEX_FILE_NAME: &str = ".encapp_index";

/// Default name of the per-directory device descriptor
pub const DEVICE_FILE_NAME: &str = "device.json";

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// File name of the index written at the search root
    pub index_file_name: String,

    /// File name of the device descriptor next to each result file
    pub device_file_name: String,

    /// Descend into subdirectories when indexing
    pub recursive: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Separator used between fields of a summary line
    pub summary_separator: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_file_name: INDEX_FILE_NAME.to_string(),
            device_file_name: DEVICE_FILE_NAME.to_string(),
            recursive: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            summary_separator: ",".to_string(),
        }
    }
}

impl SearchConfig {
    /// Path of the index file for a search root
    pub fn index_path(&self, root: &Path) -> std::path::PathBuf {
        root.join(&self.index_file_name)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SearchConfig =
            toml::from_str(&content).map_err(|e| SearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    #[cfg(test)]
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SearchError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("index_file_name", &self.index_file_name),
            ("device_file_name", &self.device_file_name),
        ] {
            if value.is_empty() {
                return Err(SearchError::Config(format!("{name} must not be empty")));
            }
            if value.contains('/') || value.contains(std::path::MAIN_SEPARATOR) {
                return Err(SearchError::Config(format!(
                    "{name} must be a plain file name, got {value:?}"
                )));
            }
        }
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(SearchError::Config(format!(
                "log_format must be 'pretty' or 'json', got {:?}",
                self.log_format
            )));
        }
        Ok(())
    }
}
