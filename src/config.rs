use std::path::PathBuf;
use thiserror::Error;

/// Request-size bounds and their defaults.
pub mod limits {
    pub const DEFAULT_MATCH_COUNT: u32 = 20;
    pub const MAX_MATCH_COUNT: u32 = 50;
    pub const DEFAULT_LEADERBOARD_SIZE: u32 = 50;
    pub const MAX_LEADERBOARD_SIZE: u32 = 100;
    pub const DEFAULT_SAMPLE_PER_PLAYER: u32 = 20;
    pub const MAX_SAMPLE_PER_PLAYER: u32 = 50;
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be an integer, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("{name} must be between 1 and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Postgres connection string. In-memory distributions when unset.
    pub database_url: Option<String>,
    /// JSON match catalog for the offline match source.
    pub match_data: Option<PathBuf>,
    pub default_match_count: u32,
    pub leaderboard_size: u32,
    pub sample_per_player: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            match_data: None,
            default_match_count: limits::DEFAULT_MATCH_COUNT,
            leaderboard_size: limits::DEFAULT_LEADERBOARD_SIZE,
            sample_per_player: limits::DEFAULT_SAMPLE_PER_PLAYER,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_addr: get("COACHLENS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: get("DATABASE_URL"),
            match_data: get("COACHLENS_MATCH_DATA").map(PathBuf::from),
            default_match_count: bounded(
                "COACHLENS_DEFAULT_MATCH_COUNT",
                get("COACHLENS_DEFAULT_MATCH_COUNT"),
                limits::DEFAULT_MATCH_COUNT,
                limits::MAX_MATCH_COUNT,
            )?,
            leaderboard_size: bounded(
                "COACHLENS_LEADERBOARD_SIZE",
                get("COACHLENS_LEADERBOARD_SIZE"),
                limits::DEFAULT_LEADERBOARD_SIZE,
                limits::MAX_LEADERBOARD_SIZE,
            )?,
            sample_per_player: bounded(
                "COACHLENS_SAMPLE_PER_PLAYER",
                get("COACHLENS_SAMPLE_PER_PLAYER"),
                limits::DEFAULT_SAMPLE_PER_PLAYER,
                limits::MAX_SAMPLE_PER_PLAYER,
            )?,
        })
    }
}

fn bounded(
    name: &'static str,
    raw: Option<String>,
    default: u32,
    max: u32,
) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: u32 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        name,
        value: raw.clone(),
    })?;
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { name, value, max })
    }
}
