//! Editor configuration.

use crate::export::{DOWNLOAD_FILE_NAME, HTML_MIME_TYPE};
use crate::preview::PRINT_TITLE;
use crate::properties::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Grid size must be a positive number, got {0}")]
    InvalidGridSize(f64),
    #[error("Font size range is empty: {0}..{1}")]
    InvalidFontRange(f64, f64),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Editor settings. Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapping grid in canvas pixels.
    pub grid_size: f64,
    /// Content of newly dropped text elements.
    pub text_placeholder: String,
    /// Content of newly dropped input elements.
    pub input_placeholder: String,
    /// Title shown while printing.
    pub print_title: String,
    /// File name offered for downloads.
    pub download_file_name: String,
    /// MIME type of downloads.
    pub download_mime_type: String,
    /// Advisory font size range of the property panel.
    pub font_size_range: (f64, f64),
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            text_placeholder: "text".to_string(),
            input_placeholder: "input".to_string(),
            print_title: PRINT_TITLE.to_string(),
            download_file_name: DOWNLOAD_FILE_NAME.to_string(),
            download_mime_type: HTML_MIME_TYPE.to_string(),
            font_size_range: (MIN_FONT_SIZE, MAX_FONT_SIZE),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        let (min, max) = self.font_size_range;
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidFontRange(min, max));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.print_title, "Invoice");
        assert_eq!(config.download_file_name, "generated-invoice.html");
        assert_eq!(config.download_mime_type, "text/html");
        assert_eq!(config.font_size_range, (8.0, 72.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"grid_size": 50, "text_placeholder": "Nový text"}"#).unwrap();
        assert_eq!(config.grid_size, 50.0);
        assert_eq!(config.text_placeholder, "Nový text");
        assert_eq!(config.input_placeholder, "input");
    }

    #[test]
    fn test_invalid_grid() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"grid_size": 0}"#),
            Err(ConfigError::InvalidGridSize(_))
        ));
    }

    #[test]
    fn test_invalid_font_range() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"font_size_range": [72, 8]}"#),
            Err(ConfigError::InvalidFontRange(_, _))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        let config = EditorConfig { grid_size: 20.0, ..EditorConfig::default() };
        fs::write(&path, config.to_json().unwrap()).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
        assert!(matches!(
            EditorConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
