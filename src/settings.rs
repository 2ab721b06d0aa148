//! Run settings
//!
//! Persisted as JSON. Missing fields fall back to defaults, and command line
//! flags override whatever the file says.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub rows: u32,
    pub cols: u32,

    // === Population (random scenario) ===
    /// Number of randomly placed entities
    pub entities: usize,
    /// Glyph drawn for each random entity
    pub symbol: char,
    /// RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    // === Loop ===
    /// Ticks to run before exiting
    pub ticks: u64,
    /// Pause between frames in milliseconds (cosmetic only)
    pub clock_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,

            entities: 50,
            symbol: DEFAULT_SYMBOL,
            seed: None,

            ticks: 1000,
            clock_ms: 20,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "rows": 12, "seed": 99 }"#).unwrap();
        assert_eq!(settings.rows, 12);
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.cols, DEFAULT_COLS);
        assert_eq!(settings.symbol, '@');
        assert_eq!(settings.ticks, 1000);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("bouncy-grid-settings-{}.json", std::process::id()));
        let settings = Settings {
            entities: 7,
            clock_ms: 0,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_bad_json() {
        let path = std::env::temp_dir().join(format!("bouncy-grid-bad-{}.json", std::process::id()));
        fs::write(&path, "{ rows: ").unwrap();
        let result = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
