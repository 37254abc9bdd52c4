use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridSettings;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "CLINIC_AGENDA_CONFIG";

const SETTINGS_FILE: &str = "grid.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the settings file: `CLINIC_AGENDA_CONFIG` if set, else the
    /// platform config directory, else the current directory.
    pub fn from_env() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
            return Self::new(PathBuf::from(path));
        }

        if let Some(dirs) = ProjectDirs::from("com", "ClinicAgenda", "ClinicAgenda") {
            Self::new(dirs.config_dir().join(SETTINGS_FILE))
        } else {
            log::warn!("Unable to resolve project directory; using current dir for settings");
            Self::new(SETTINGS_FILE)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields defaults; invalid values are
    /// kept (the grid degrades gracefully) but logged.
    pub fn load(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            log::debug!("No settings at {}; using defaults", self.path.display());
            return Ok(GridSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: GridSettings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings from {}", self.path.display()))?;

        if let Err(err) = settings.validate() {
            log::warn!("Settings at {} are invalid: {}", self.path.display(), err);
        }

        log::info!("Loaded grid settings from {}", self.path.display());
        Ok(settings)
    }

    /// Validate and write settings, creating parent directories as needed
    pub fn save(&self, settings: &GridSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::column::GroupBy;
    use crate::models::settings::VisibleHours;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = SettingsService::new(dir.path().join("grid.toml"));
        assert_eq!(service.load().unwrap(), GridSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let service = SettingsService::new(dir.path().join("nested").join("grid.toml"));

        let settings = GridSettings {
            group_by: GroupBy::Box,
            time_slot_duration: 15,
            visible_hours: VisibleHours::new(7, 21),
            role: "front-desk".to_string(),
            timezone: Some("America/Santiago".to_string()),
            ..GridSettings::default()
        };
        service.save(&settings).unwrap();

        assert_eq!(service.load().unwrap(), settings);
    }

    #[test]
    fn test_save_rejects_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let service = SettingsService::new(dir.path().join("grid.toml"));
        let settings = GridSettings {
            time_slot_duration: 20,
            ..GridSettings::default()
        };

        let err = service.save(&settings).unwrap_err();
        assert!(err.to_string().starts_with("Invalid settings"));
        assert!(!service.path().exists());
    }

    #[test]
    fn test_invalid_file_is_still_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.toml");
        fs::write(&path, "time_slot_duration = 45\n").unwrap();

        let settings = SettingsService::new(&path).load().unwrap();
        assert_eq!(settings.time_slot_duration, 45);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.toml");
        fs::write(&path, "group_by = [").unwrap();

        let err = SettingsService::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse settings"));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::env::set_var(CONFIG_ENV_VAR, &path);
        let service = SettingsService::from_env();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(service.path(), path.as_path());
    }
}
