//! Runtime configuration for the CLI.
//!
//! Precedence, lowest to highest: built-in defaults, JSON config file,
//! `NOTEKEEP_*` environment variables, command-line flags.

use anyhow::{Context, Result};
use chrono::Weekday;
use notekeep_core::{LogLevel, LogSettings, ProjectionOptions, SectionOrder};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "notekeep";
const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "notes.sqlite3";

pub const ENV_DB: &str = "NOTEKEEP_DB";
pub const ENV_LOG_LEVEL: &str = "NOTEKEEP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEKEEP_LOG_DIR";

/// First day of the week for the `Past Week` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for Weekday {
    fn from(value: WeekStart) -> Self {
        match value {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Shape of the optional JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    pub week_start: Option<WeekStart>,
    pub section_order: Option<SectionOrder>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid notekeep config")
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log: LogSettings,
    pub projection: ProjectionOptions,
}

impl AppConfig {
    /// Loads configuration from the platform directories and process env.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config_path {
            Some(path) => Some(read_config_file(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(read_config_file(&path)?),
                _ => None,
            },
        };
        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR);
        Self::resolve(
            file.unwrap_or_default(),
            |key| std::env::var(key).ok(),
            overrides,
            &data_dir,
        )
    }

    /// Merges the layers. `env` is injected so resolution stays testable.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
        data_dir: &Path,
    ) -> Result<Self> {
        let db_path = overrides
            .db_path
            .clone()
            .or_else(|| env(ENV_DB).map(PathBuf::from))
            .or(file.db_path)
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));

        let level = overrides
            .log_level
            .clone()
            .or_else(|| env(ENV_LOG_LEVEL))
            .or(file.log_level)
            .unwrap_or_else(|| LogLevel::build_default().as_str().to_string());
        let log_dir = env(ENV_LOG_DIR)
            .or(file.log_dir)
            .unwrap_or_else(|| data_dir.join("logs").to_string_lossy().into_owned());
        let log = LogSettings::parse(&level, &log_dir)?;

        let defaults = ProjectionOptions::default();
        Ok(Self {
            db_path,
            log,
            projection: ProjectionOptions {
                week_start: file.week_start.map_or(defaults.week_start, Weekday::from),
                section_order: file.section_order.unwrap_or(defaults.section_order),
            },
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config `{}`", path.display()))?;
    FileConfig::parse(&text).with_context(|| format!("in `{}`", path.display()))
}
