//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::geometry::Rect;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Camera settings
    pub camera: CameraSettings,
    /// OCR settings
    pub ocr: OcrSettings,
    /// UI settings
    pub ui: UiSettings,
    /// Storage settings
    pub storage: StorageSettings,
}

/// Camera-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Device index to open at startup
    pub index: u32,
    /// Preview canvas width in pixels
    pub canvas_width: u32,
    /// Preview canvas height in pixels
    pub canvas_height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            canvas_width: 640,
            canvas_height: 480,
        }
    }
}

/// OCR-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract language code (e.g. "eng", "jpn")
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

/// UI-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Pipeline tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
        }
    }
}

/// Storage-related settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    /// Lookup database path; defaults to the platform data directory
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Canvas extent as a rectangle anchored at the origin.
    pub fn canvas(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.camera.canvas_width as i32,
            self.camera.canvas_height as i32,
        )
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.camera.index, 0);
        assert_eq!(config.camera.canvas_width, 640);
        assert_eq!(config.camera.canvas_height, 480);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ui.tick_interval_ms, 100);
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn test_canvas_rect() {
        let config = AppConfig::default();
        assert_eq!(config.canvas(), Rect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.camera.index = 2;
        config.ocr.language = "jpn".to_string();
        config.storage.db_path = Some(PathBuf::from("/tmp/lookup.db"));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.camera.index, 2);
        assert_eq!(parsed.ocr.language, "jpn");
        assert_eq!(parsed.storage.db_path, Some(PathBuf::from("/tmp/lookup.db")));
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.ui.tick_interval_ms, loaded.ui.tick_interval_ms);
        assert_eq!(config.ocr.language, loaded.ocr.language);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
