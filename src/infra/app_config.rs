use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the store inside the application data directory.
pub const DATABASE_FILE_NAME: &str = "TimeTracker.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Overrides `<data dir>/TimeTracker.db` when set.
    pub database_path: Option<PathBuf>,
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path(), config)
}

fn load_config_from(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring malformed config at {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}

fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

/// Location of `config.toml`; `TIMETRACKER_CONFIG_PATH` overrides it.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TIMETRACKER_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

/// Resolves the single directory the application keeps its files in.
pub fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("TIMETRACKER_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("TimeTracker");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("TimeTracker");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("timetracker");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("timetracker");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".timetracker")
}

/// Path of the store: `TIMETRACKER_DB_PATH`, then the config file, then the data dir.
pub fn database_path() -> PathBuf {
    if let Ok(path) = std::env::var("TIMETRACKER_DB_PATH") {
        return PathBuf::from(path);
    }
    if let Some(path) = load_config().database_path {
        return path;
    }
    app_data_dir().join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_roundtrip() {
        let config = AppConfig {
            database_path: Some(PathBuf::from("/tmp/tt/TimeTracker.db")),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);

        let empty: AppConfig = toml::from_str("").unwrap();
        assert_eq!(empty.database_path, None);
    }

    #[test]
    fn test_saved_config_is_loaded_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            database_path: Some(dir.path().join("work.db")),
        };

        save_config_to(&path, &config)?;
        assert_eq!(load_config_from(&path), config);
        Ok(())
    }

    #[test]
    fn test_missing_or_malformed_config_falls_back_to_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        assert_eq!(load_config_from(&path), AppConfig::default());

        std::fs::write(&path, "database_path = [")?;
        assert_eq!(load_config_from(&path), AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_default_store_lives_in_data_dir() {
        let path = app_data_dir().join(DATABASE_FILE_NAME);
        assert!(path.to_string_lossy().ends_with("TimeTracker.db"));
        assert!(path.starts_with(app_data_dir()));
    }
}
