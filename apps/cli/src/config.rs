//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CLIMA_*`)
//! 2. Config file (`<config dir>/climaquote/config.toml`)
//! 3. Defaults (this file)
//!
//! ```toml
//! # ~/.config/climaquote/config.toml
//! database_path = "/srv/climaquote/climaquote.db"
//! log_level = "info"
//! default_validity_days = 30
//! default_payment_terms = "50% na aprovação, 50% na conclusão"
//! db_max_connections = 2
//! db_acquire_timeout_secs = 5
//! ```
//!
//! Company details and the copper price live in the database, not here:
//! they are business data edited through `climaquote settings`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clima_core::validation::validate_validity_days;
use clima_core::{DEFAULT_PAYMENT_TERMS, DEFAULT_VALIDITY_DAYS};
use clima_db::DbConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix (`CLIMA_DATABASE_PATH`, ...).
pub const ENV_PREFIX: &str = "CLIMA";

/// Log filter used when neither `RUST_LOG` nor `log_level` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,clima=debug,sqlx=warn";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    /// Default: `<data dir>/climaquote.db`
    pub database_path: PathBuf,

    /// `tracing` filter directive. `RUST_LOG` still wins when set.
    pub log_level: String,

    /// Validity period stamped on new quotes.
    /// Default: 15
    pub default_validity_days: u32,

    /// Payment terms stamped on new quotes.
    pub default_payment_terms: String,

    /// Pool size for the database.
    /// Default: 4
    pub db_max_connections: u32,

    /// Seconds to wait for a free database connection.
    /// Default: 10
    pub db_acquire_timeout_secs: u64,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the application data directory")]
    NoDataDir,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl AppConfig {
    /// Loads defaults, then the user's config file, then `CLIMA_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let dirs = project_dirs()?;
        let file = dirs.config_dir().join("config.toml");

        let builder = defaults(dirs.data_dir())?
            .add_source(File::from(file).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::build(builder)
    }

    /// Loads defaults overridden by an in-memory TOML document.
    ///
    /// Environment variables are not consulted.
    pub fn from_toml(document: &str, data_dir: &Path) -> Result<Self, ConfigError> {
        let builder = defaults(data_dir)?.add_source(File::from_str(document, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_validity_days(self.default_validity_days).map_err(|e| {
            ConfigError::InvalidValue {
                field: "default_validity_days".to_string(),
                reason: e.to_string(),
            }
        })?;

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "db_max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Pool settings for [`clima_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
    }

    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self) -> &str {
        if self.log_level.trim().is_empty() {
            DEFAULT_LOG_FILTER
        } else {
            &self.log_level
        }
    }
}

/// Platform directories for ClimaQuote.
///
/// - **Linux**: `~/.config/climaquote`, `~/.local/share/climaquote`
/// - **macOS**: `~/Library/Application Support/com.climaquote.climaquote`
/// - **Windows**: `%APPDATA%\climaquote\climaquote`
fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "climaquote", "climaquote").ok_or(ConfigError::NoDataDir)
}

fn defaults(data_dir: &Path) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let database_path = data_dir.join("climaquote.db");

    let builder = Config::builder()
        .set_default("database_path", database_path.to_string_lossy().into_owned())?
        .set_default("log_level", DEFAULT_LOG_FILTER)?
        .set_default("default_validity_days", i64::from(DEFAULT_VALIDITY_DAYS))?
        .set_default("default_payment_terms", DEFAULT_PAYMENT_TERMS)?
        .set_default("db_max_connections", 4_i64)?
        .set_default("db_acquire_timeout_secs", 10_i64)?;

    Ok(builder)
}
