// Engine settings, loaded from an optional JSON file
use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub csv_delimiter: String, // Should be a single byte, but JSON string is easier
    pub home_currency: String,
    pub max_file_size_mb: u64,
    pub preview_rows: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            csv_delimiter: ",".to_string(),
            home_currency: "BRL".to_string(),
            max_file_size_mb: 10,
            preview_rows: 5,
        }
    }
}

impl EngineSettings {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: EngineSettings = serde_json::from_str(&raw)?;
        settings.delimiter_byte()?;
        Ok(settings)
    }

    pub fn delimiter_byte(&self) -> EngineResult<u8> {
        match self.csv_delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(EngineError::ConfigError(format!(
                "csv_delimiter must be a single byte, got '{}'",
                self.csv_delimiter
            ))),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
