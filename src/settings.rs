use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// How many months past the viewed month to expand recurring rules.
    #[serde(default = "default_ahead_months")]
    pub ahead_months: u32,
}

fn default_ahead_months() -> u32 {
    12
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            ahead_months: default_ahead_months(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("easybudget")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".easybudget")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BudgetError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/budget".to_string(),
            ahead_months: 24,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.data_dir, "/tmp/budget");
        assert_eq!(loaded.ahead_months, 24);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.ahead_months, 12);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"data_dir": "/tmp/budget"}"#).unwrap();
        assert_eq!(s.ahead_months, 12);
        assert_eq!(s.data_dir, "/tmp/budget");
    }
}
