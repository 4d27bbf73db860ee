//! Configuration for smart flashcards.

use crate::models::Subject;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .map(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    /// Parse TOML, falling back to defaults on error.
    pub fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", "smart-flashcards")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.config_dir().join("config.toml"))
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.data_dir().join("storage.db"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.data_dir().join("smart-flashcards.log"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default = "default_generator")]
    pub generator: String,
    #[serde(default)]
    pub default_subject: Subject,
    #[serde(default = "default_true")]
    pub reset_reveal_on_navigate: bool,
}

fn default_generator() -> String { "demo".to_string() }

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            default_subject: Subject::General,
            reset_reveal_on_navigate: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String { "flashcardData".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_timer: bool,
    #[serde(default = "default_true")]
    pub show_progress_bar: bool,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_true() -> bool { true }
fn default_tick_rate() -> u64 { 1000 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timer: true,
            show_progress_bar: true,
            tick_rate_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}
