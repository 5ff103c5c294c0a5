//! Extractors whose rejections answer with the usual `{"error": ..}` body.
//!
//! Axum's own `Json` and `Path` reject with plain text; these wrappers route
//! the rejection through [`AppError`] so malformed bodies and ids get a 400
//! like every other invalid input.

use crate::types::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
