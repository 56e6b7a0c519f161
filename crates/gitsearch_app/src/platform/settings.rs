use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gitsearch_core::{DEFAULT_CAPACITY, DEFAULT_PAGE_SIZE};
use gitsearch_engine::{FetchSettings, GITHUB_ACCEPT, GITHUB_API_ROOT};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const APP_DIR: &str = "gitsearch";
const SETTINGS_FILENAME: &str = "settings.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),
    #[error("parse failed: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// User settings, read from a RON file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_root: String,
    pub page_size: u32,
    pub history_capacity: usize,
    pub data_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Upper bound on how long the CLI waits for outstanding requests.
    pub settle_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_root: GITHUB_API_ROOT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            history_capacity: DEFAULT_CAPACITY,
            data_dir: None,
            user_agent: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            settle_timeout_secs: 60,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(SettingsError::Read(err)),
        };
        Ok(ron::from_str(&content)?)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(SETTINGS_FILENAME)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    pub fn level(&self) -> LevelFilter {
        gitsearch_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs.max(1))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            api_root: self.api_root.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            accept: GITHUB_ACCEPT.to_string(),
        }
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("settings.ron");
        fs::write(
            &path,
            r#"(page_size: 25, log_destination: Both, data_dir: Some("/tmp/gs"))"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.log_destination, LogDestination::Both);
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/gs"));
        assert_eq!(settings.history_capacity, DEFAULT_CAPACITY);
        assert_eq!(settings.api_root, GITHUB_API_ROOT);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("settings.ron");
        fs::write(&path, "(page_size: \"many\")").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn pretty_output_parses_back() {
        let settings = Settings {
            page_size: 5,
            log_level: "debug".to_string(),
            ..Settings::default()
        };
        let text = settings.to_ron().unwrap();
        let parsed: Settings = ron::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
        assert_eq!(parsed.level(), LevelFilter::Debug);
    }

    #[test]
    fn fetch_settings_follow_configuration() {
        let settings = Settings {
            api_root: "http://localhost:9000/".to_string(),
            request_timeout_secs: 3,
            user_agent: Some("tester".to_string()),
            ..Settings::default()
        };
        let fetch = settings.fetch_settings();
        assert_eq!(fetch.api_root, "http://localhost:9000/");
        assert_eq!(fetch.request_timeout, Duration::from_secs(3));
        assert_eq!(fetch.user_agent, "tester");
        assert_eq!(fetch.accept, GITHUB_ACCEPT);
    }
}
