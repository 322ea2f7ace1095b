//! Configuration loading and management

use aiopass_auth::MAX_TOKEN_EXPIRY_HOURS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Secrets shorter than this are accepted but logged as weak
const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    /// File the settings were read from; None when defaults were used
    #[serde(skip)]
    pub source: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the database lives only for the life of the process
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// sqlx connection URL for the configured path
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Authentication configuration
///
/// The signing secret has no default: it must come from the config file,
/// `--jwt-secret`, or `AIOPASS_JWT_SECRET`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiry_hours: default_token_expiry_hours(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// CORS configuration
///
/// Empty means no CORS headers are sent (same-origin clients only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./database.db".to_string()
}

fn default_token_expiry_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file is not an error; defaults are used instead. Nothing is
    /// logged here since logging is configured from the result.
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.source = Some(path.to_string());
        Ok(config)
    }

    /// Check settings that have no safe default
    pub fn validate(&self) -> Result<()> {
        let secret = self
            .auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .context("No JWT secret configured; set auth.jwt_secret or AIOPASS_JWT_SECRET")?;

        // Tokens are signed with the exact bytes, so stray whitespace would
        // silently split instances that were meant to share a secret
        if secret.trim() != secret {
            anyhow::bail!("JWT secret has leading or trailing whitespace");
        }

        if secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            warn!(
                "JWT secret is shorter than {} bytes; use a longer random value",
                MIN_RECOMMENDED_SECRET_LEN
            );
        }

        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&self.auth.token_expiry_hours) {
            anyhow::bail!(
                "auth.token_expiry_hours must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_HOURS,
                self.auth.token_expiry_hours
            );
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            );
        }

        Ok(())
    }

    /// The validated signing secret
    pub fn jwt_secret(&self) -> Result<&str> {
        self.auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .context("No JWT secret configured")
    }
}
