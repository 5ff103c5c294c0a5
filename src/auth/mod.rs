//! Token Authentication and Middleware
//!
//! This module provides the authentication layer for the API: password
//! hashing, token signing, the auth service behind register/login/logout,
//! and the Axum middleware guarding protected routes.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - Password hashing, token encoding/decoding
//! - [`auth::service`](crate::auth::service) - Register, login, authenticate, logout
//! - [`auth::middleware`](crate::auth::middleware) - Axum middleware and extractor
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a random salt per password
//! - **Tokens**: HS256 JWTs carrying `user_id`, `iat` and `exp`
//! - **Revocation**: logged-out tokens are stored as SHA-256 digests and
//!   rejected until they expire, after which they are pruned
//!
//! # Usage
//!
//! ## Middleware
//!
//! `require_auth` resolves the bearer token and injects an `AuthUser` into
//! the request extensions, or answers 401:
//!
//! ```ignore
//! use genres::auth::middleware::require_auth;
//!
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .layer(middleware::from_fn_with_state(auth_service, require_auth));
//! ```
//!
//! ## Extracting the User in Handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser { user, .. }: AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via `genres.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the secret (min 32 chars)
//! token_expiry = 3600             # token validity in seconds
//! ```

/// Password hashing and token signing.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Register, login, authenticate and logout.
pub mod service;
