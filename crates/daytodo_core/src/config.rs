//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Invalid values are reported, never silently replaced by defaults.

use crate::calendar::DayCalendar;
use crate::logging::{default_log_level, normalize_level};
use chrono::FixedOffset;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "DAYTODO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "DAYTODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "DAYTODO_LOG_DIR";
pub const UTC_OFFSET_ENV: &str = "DAYTODO_UTC_OFFSET_MINUTES";

const DEFAULT_DB_FILE_NAME: &str = "daytodo.sqlite3";
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Configuration value that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// `None` means the device's local time zone.
    pub utc_offset: Option<FixedOffset>,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => normalize_level(&value).map_err(|message| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                message,
            })?,
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_ENV).map(PathBuf::from);

        let utc_offset = match read(UTC_OFFSET_ENV) {
            Some(value) => Some(parse_offset_minutes(&value)?),
            None => None,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            utc_offset,
        })
    }

    /// Calendar used to resolve day keys.
    pub fn calendar(&self) -> DayCalendar {
        match self.utc_offset {
            Some(offset) => DayCalendar::fixed(offset),
            None => DayCalendar::local(),
        }
    }
}

fn parse_offset_minutes(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: UTC_OFFSET_ENV,
        message,
    };

    let minutes: i32 = value
        .parse()
        .map_err(|_| invalid(format!("expected whole minutes, got `{value}`")))?;
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(invalid(format!(
            "offset {minutes} exceeds +/-{MAX_OFFSET_MINUTES} minutes"
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| invalid(format!("offset {minutes} is not representable")))
}
