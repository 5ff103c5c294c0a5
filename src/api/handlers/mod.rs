//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login, logout, protected).
pub mod auth;
/// Genre CRUD handlers.
pub mod genres;
