//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Moderation engine tuning.
    #[serde(default)]
    pub moderation: ModerationConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Moderation engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Trailing window (hours) within which a repeat report of the same
    /// target by the same reporter counts as a duplicate.
    #[serde(default = "default_duplicate_report_window_hours")]
    pub duplicate_report_window_hours: i64,
    /// Longest temporary suspension a moderator or admin may apply, in days.
    #[serde(default = "default_max_suspension_days")]
    pub max_suspension_days: i32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            duplicate_report_window_hours: default_duplicate_report_window_hours(),
            max_suspension_days: default_max_suspension_days(),
        }
    }
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_duplicate_report_window_hours() -> i64 {
    24
}

const fn default_max_suspension_days() -> i32 {
    365
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CHORUS_ENV`)
    /// 3. Environment variables with `CHORUS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CHORUS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHORUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CHORUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_defaults() {
        let config = ModerationConfig::default();
        assert_eq!(config.duplicate_report_window_hours, 24);
        assert_eq!(config.max_suspension_days, 365);
    }
}
