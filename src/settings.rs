//! Importer settings with persistence
//!
//! Settings live in `~/.config/kiln/settings.toml` unless `--config` names
//! another file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kiln_scene::ImportOptions;
use serde::{Deserialize, Serialize};
use tracing::info;

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub import: ImportOptions,
    pub log: LogSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kiln"))
    }

    /// The file settings are read from and written to.
    pub fn path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_dir().map(|p| p.join("settings.toml")),
        }
    }

    /// Read settings. `Ok(None)` when there is no settings file.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Option<Self>> {
        let Some(path) = Self::path(explicit) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;
        Ok(Some(settings))
    }

    /// Save settings to disk
    pub fn save(&self, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
        let Some(path) = Self::path(explicit) else {
            anyhow::bail!("Could not determine config directory");
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive, e.g. `info` or `kiln_mesh=debug`
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [import]
            import_shading = false
            "#,
        )
        .unwrap();
        assert!(!settings.import.import_shading);
        assert!(settings.import.import_normals);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("kiln-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");

        let mut settings = Settings::default();
        settings.import.viewport_color = false;
        settings.log.level = "debug".to_owned();
        settings.save(Some(&path)).unwrap();

        let loaded = Settings::load(Some(&path)).unwrap().unwrap();
        assert!(!loaded.import.viewport_color);
        assert_eq!(loaded.log.level, "debug");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("kiln-no-such-settings.toml");
        assert!(Settings::load(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("kiln-bad-{}.toml", std::process::id()));
        fs::write(&path, "[import\n").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
        fs::remove_file(&path).unwrap();
    }
}
