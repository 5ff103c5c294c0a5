//! # genre-server
//!
//! A small authenticated CRUD backend built on Axum and libsql: user
//! registration and login with HS256 tokens, logout through a token
//! blacklist, and create/read/update/delete endpoints for genres.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `genre-server` binary
//! 2. **As a library** - Build the router into your own Axum application
//!
//! ### Embedding the Router
//!
//! ```rust,ignore
//! use genres::{AppConfig, AppState, DatabaseProvider};
//!
//! let config = AppConfig::load("genres.toml")?;
//! let db = DatabaseProvider::from_config(&config.database).create_client().await?;
//! let state = AppState::from_parts(config, db)?;
//!
//! let app = genres::api::routes::create_app(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Token issuing, authentication service and middleware
//! - [`db`] - Storage traits and the libsql client
//! - [`genres`] - Genre resource service
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Token authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database client (Turso/SQLite).
pub mod db;
/// Genre resource service.
pub mod genres;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::{jwt::TokenIssuer, service::AuthService};
pub use db::{DatabaseProvider, TursoClient};
pub use genres::GenreService;
pub use types::{AppError, Result};
pub use utils::toml_config::{AppConfig, ConfigError};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration
    pub config: Arc<AppConfig>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
    /// Genre resource service
    pub genre_service: Arc<GenreService>,
}

impl AppState {
    /// Wire the services over a single database client.
    ///
    /// Fails if the JWT secret env var named in `config` is not set.
    pub fn from_parts(
        config: AppConfig,
        db: Arc<TursoClient>,
    ) -> std::result::Result<Self, ConfigError> {
        let issuer = TokenIssuer::new(config.jwt_secret()?, config.auth.token_expiry);

        Ok(Self::with_issuer(config, db, issuer))
    }

    /// Like [`from_parts`](Self::from_parts) with an explicit token issuer.
    pub fn with_issuer(config: AppConfig, db: Arc<TursoClient>, issuer: TokenIssuer) -> Self {
        let auth_service = AuthService::new(issuer, db.clone(), db.clone());
        let genre_service = GenreService::new(db);

        Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
            genre_service: Arc::new(genre_service),
        }
    }
}
