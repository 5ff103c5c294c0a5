//! Configuration utilities.

/// TOML configuration file (`genres.toml`).
pub mod toml_config;
