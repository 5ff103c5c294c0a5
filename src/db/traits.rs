//! Storage abstraction traits
//!
//! The services never talk to libsql directly. They depend on three narrow
//! traits, one per owner in the data model:
//!
//! - [`CredentialStore`] - user records
//! - [`TokenBlacklist`] - revoked tokens
//! - [`GenreStore`] - the genre resource
//!
//! [`TursoClient`](super::turso::TursoClient) implements all three.
//!
//! # Example
//!
//! ```rust,ignore
//! use genres::db::DatabaseProvider;
//!
//! // In-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // File-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/genres.db".into() }.create_client().await?;
//! ```

use crate::types::{Genre, Result};
use crate::utils::toml_config::DatabaseConfig;
use async_trait::async_trait;
use std::sync::Arc;

use super::turso::TursoClient;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<TursoClient>> {
        let client = match self {
            DatabaseProvider::Memory => TursoClient::new_memory().await?,
            DatabaseProvider::SQLite { path } => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            crate::types::AppError::Database(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
                TursoClient::new_local(path).await?
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                TursoClient::new_remote(url.clone(), auth_token.clone()).await?
            }
        };

        Ok(Arc::new(client))
    }

    /// Pick a provider from the `[database]` section.
    ///
    /// Remote Turso wins when both of its env vars resolve to non-empty values
    /// (and the `turso` feature is on); otherwise `url` selects a file, with
    /// `:memory:` meaning an ephemeral database.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&config.turso_url_env, &config.turso_token_env)
            {
                if let (Ok(url), Ok(token)) = (std::env::var(url_env), std::env::var(token_env)) {
                    if !url.is_empty() && !token.is_empty() {
                        return DatabaseProvider::Turso {
                            url,
                            auth_token: token,
                        };
                    }
                }
            }
        }

        if config.url.is_empty() || config.url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: config.url.clone(),
            }
        }
    }
}

/// User record from the database
pub use super::turso::User;

/// Holds user records. Username and email are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user, failing with `DuplicateUsername`/`DuplicateEmail` on
    /// a uniqueness violation
    async fn create_user(&self, username: &str, email: &str, password_hash: &str)
        -> Result<User>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Revoked token digests with the expiry of the token they stand for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Record a revoked token. Recording the same digest twice is a no-op.
    async fn insert(&self, token_hash: &str, expires_at: i64) -> Result<()>;

    /// Whether the digest has been revoked
    async fn contains(&self, token_hash: &str) -> Result<bool>;

    /// Drop entries whose token expired at or before `now`; returns how many
    async fn prune_expired(&self, now: i64) -> Result<u64>;
}

/// Persistence for the genre resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn create(&self, name: &str) -> Result<Genre>;

    async fn list(&self) -> Result<Vec<Genre>>;

    async fn get(&self, id: i64) -> Result<Option<Genre>>;

    /// `None` when no genre has this id
    async fn update(&self, id: i64, name: &str) -> Result<Option<Genre>>;

    /// `false` when no genre has this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

// ============== Implementations for TursoClient ==============

#[async_trait]
impl CredentialStore for TursoClient {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        TursoClient::create_user(self, username, email, password_hash).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        TursoClient::get_user_by_id(self, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        TursoClient::get_user_by_username(self, username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        TursoClient::get_user_by_email(self, email).await
    }
}

#[async_trait]
impl TokenBlacklist for TursoClient {
    async fn insert(&self, token_hash: &str, expires_at: i64) -> Result<()> {
        self.blacklist_token(token_hash, expires_at).await
    }

    async fn contains(&self, token_hash: &str) -> Result<bool> {
        self.is_token_blacklisted(token_hash).await
    }

    async fn prune_expired(&self, now: i64) -> Result<u64> {
        self.prune_blacklist(now).await
    }
}

#[async_trait]
impl GenreStore for TursoClient {
    async fn create(&self, name: &str) -> Result<Genre> {
        self.create_genre(name).await
    }

    async fn list(&self) -> Result<Vec<Genre>> {
        self.list_genres().await
    }

    async fn get(&self, id: i64) -> Result<Option<Genre>> {
        self.get_genre(id).await
    }

    async fn update(&self, id: i64, name: &str) -> Result<Option<Genre>> {
        self.update_genre(id, name).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.delete_genre(id).await
    }
}
