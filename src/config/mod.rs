use crate::errors::{AppError, AppResult};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

/// Where events come from. Never mixed within one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    File,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub source_mode: SourceMode,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_backoff")]
    pub retry_backoff_secs: u64,
    #[serde(default = "default_active_window")]
    pub active_window_minutes: i64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_unavailable_threshold")]
    pub unavailable_threshold: u32,
    #[serde(default = "default_synthetic_users")]
    pub synthetic_users: usize,
}

/// One year.
pub const MAX_ACTIVE_WINDOW_MINUTES: i64 = 525_600;
/// A hundred years.
pub const MAX_DAYS: u32 = 36_500;

/// Keys a complete configuration file contains.
pub const CONFIG_KEYS: [&str; 10] = [
    "database",
    "sources",
    "source_mode",
    "interval_secs",
    "retry_backoff_secs",
    "active_window_minutes",
    "history_days",
    "retention_days",
    "unavailable_threshold",
    "synthetic_users",
];

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_sources() -> Vec<String> {
    vec![
        "/var/log/wireguard_connections.log".to_string(),
        "/var/log/wireguard_traffic.txt".to_string(),
    ]
}
fn default_interval() -> u64 {
    10
}
fn default_backoff() -> u64 {
    10
}
fn default_active_window() -> i64 {
    5
}
fn default_history_days() -> u32 {
    7
}
fn default_retention_days() -> u32 {
    30
}
fn default_unavailable_threshold() -> u32 {
    3
}
fn default_synthetic_users() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            sources: default_sources(),
            source_mode: SourceMode::default(),
            interval_secs: default_interval(),
            retry_backoff_secs: default_backoff(),
            active_window_minutes: default_active_window(),
            history_days: default_history_days(),
            retention_days: default_retention_days(),
            unavailable_threshold: default_unavailable_threshold(),
            synthetic_users: default_synthetic_users(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("wgmonitor")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".wgmonitor")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("wgmonitor.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("wgmonitor.sqlite")
    }

    /// Load configuration from the standard file, or defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would stall or break the monitor loop.
    pub fn validate(&self) -> AppResult<()> {
        if self.interval_secs == 0 {
            return Err(AppError::Config("interval_secs must be at least 1".into()));
        }
        if !(1..=MAX_ACTIVE_WINDOW_MINUTES).contains(&self.active_window_minutes) {
            return Err(AppError::Config(format!(
                "active_window_minutes must be between 1 and {MAX_ACTIVE_WINDOW_MINUTES}"
            )));
        }
        for (key, days) in [
            ("history_days", self.history_days),
            ("retention_days", self.retention_days),
        ] {
            if days > MAX_DAYS {
                return Err(AppError::Config(format!(
                    "{key} must be at most {MAX_DAYS}"
                )));
            }
        }
        if self.database.trim().is_empty() {
            return Err(AppError::Config("database path is empty".into()));
        }
        Ok(())
    }

    /// Active-user window as a duration, clamped to the accepted range.
    pub fn active_window(&self) -> TimeDelta {
        TimeDelta::minutes(
            self.active_window_minutes
                .clamp(1, MAX_ACTIVE_WINDOW_MINUTES),
        )
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Initialize configuration directory and file.
    /// Returns the database path the configuration points to.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();

        let db_path = if let Some(name) = custom_db {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            fs::write(Self::config_file(), config.to_yaml()?)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(config.database)
    }
}
