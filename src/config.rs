// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading and dumping the
//! configuration file.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file is missing or unreadable.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        log::warn!("Config not found at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load_or_default(path)
}

/// Load a configuration file and validate it.
///
/// Unlike [`load_config`] this never falls back to defaults.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = Config::load(path)
        .map_err(|e| AppError::config(format!("Failed to load {}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Render the effective configuration as TOML.
pub fn to_toml(config: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml"));
        assert_eq!(config.fetcher.max_concurrent, 5);
    }

    #[test]
    fn test_load_validated_rejects_bad_selector() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[site]
base_url = "https://site.example"

[site.selectors]
popular_entry = "[[broken"
"#
        )
        .unwrap();

        let result = load_validated(file.path());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_dump_reloads_to_same_values() {
        let mut config = Config::default();
        config.site.base_url = "https://other.example".to_string();
        config
            .preferences
            .insert("preferred_quality".to_string(), "1080p".to_string());

        let text = to_toml(&config).unwrap();
        let reloaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.site.base_url, "https://other.example");
        assert_eq!(reloaded.preferences["preferred_quality"], "1080p");
        assert_eq!(reloaded.ranking.rules, config.ranking.rules);
    }
}
