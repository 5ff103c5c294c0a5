//! TOML-based configuration
//!
//! Server, authentication and database settings are read from a TOML file
//! (`genres.toml` by default). Secrets are never written in the file itself:
//! the file names the environment variables that hold them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum accepted length of the JWT signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: 30 days.
pub const MAX_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

/// Root configuration structure loaded from genres.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Token lifetime in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,

    /// Seconds between blacklist prunes; 0 disables the background task
    #[serde(default = "default_blacklist_cleanup_interval")]
    pub blacklist_cleanup_interval: u64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_expiry() -> i64 {
    3600
}

fn default_blacklist_cleanup_interval() -> u64 {
    600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_expiry: default_token_expiry(),
            blacklist_cleanup_interval: default_blacklist_cleanup_interval(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/genres.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without checking env vars or value ranges
    pub fn load_unvalidated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate value ranges and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.jwt_secret()?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "{} must be at least {} characters",
                self.auth.jwt_secret_env, MIN_JWT_SECRET_LEN
            )));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_body_bytes must be positive".to_string(),
            ));
        }

        if self.auth.token_expiry <= 0 || self.auth.token_expiry > MAX_TOKEN_EXPIRY {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_expiry must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRY
            )));
        }

        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// `host:port` the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
