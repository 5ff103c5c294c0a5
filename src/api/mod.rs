//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::docs`](crate::api::docs) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Authentication
//! - `POST /register` - Register new user
//! - `POST /login` - Login and receive a token
//! - `POST /logout` - Revoke the presented token
//! - `GET /protected` - Check that a token is accepted
//!
//! ## Genres
//! - `POST /genres` - Create a genre
//! - `GET /genres` - List genres
//! - `GET /genres/{id}` - Get a genre
//! - `PUT /genres/{id}` - Rename a genre
//! - `DELETE /genres/{id}` - Delete a genre
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # Authentication
//!
//! Everything except registration, login, health and docs requires a valid
//! token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive documentation is available at
//! `/swagger-ui/`.

/// OpenAPI document for all endpoints.
pub mod docs;
/// Extractors with JSON error bodies.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
