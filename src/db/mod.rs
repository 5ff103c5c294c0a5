//! Relational persistence.
//!
//! All state lives in a libsql database:
//! - **Memory**: ephemeral SQLite, used by tests and quick local runs
//! - **SQLite**: a local database file (default `./data/genres.db`)
//! - **Turso**: remote libsql, behind the `turso` feature
//!
//! Enable the remote backend via Cargo features:
//! ```toml
//! genre-server = { version = "*", features = ["turso"] }
//! ```

#![allow(missing_docs)]

pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{CredentialStore, DatabaseProvider, GenreStore, TokenBlacklist, User};
pub use turso::TursoClient;
