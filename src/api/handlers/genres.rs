//! Genre CRUD handlers.
//!
//! Every route here sits behind the auth middleware.

use crate::{
    auth::middleware::AuthUser,
    types::{ErrorResponse, Genre, GenreRequest, MessageResponse, Result},
    AppState,
};
use crate::api::extract::{ApiJson, ApiPath};
use axum::{extract::State, Json};

/// Create a genre.
#[utoipa::path(
    post,
    path = "/genres",
    request_body = GenreRequest,
    responses(
        (status = 200, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "genres",
    security(("bearer" = []))
)]
pub async fn create_genre(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(payload): ApiJson<GenreRequest>,
) -> Result<Json<Genre>> {
    let genre = state.genre_service.create(&payload.name).await?;

    Ok(Json(genre))
}

/// List all genres.
#[utoipa::path(
    get,
    path = "/genres",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "genres",
    security(("bearer" = []))
)]
pub async fn list_genres(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Genre>>> {
    Ok(Json(state.genre_service.list().await?))
}

/// Get a genre by id.
#[utoipa::path(
    get,
    path = "/genres/{id}",
    params(
        ("id" = i64, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "genres",
    security(("bearer" = []))
)]
pub async fn get_genre(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Genre>> {
    Ok(Json(state.genre_service.get(id).await?))
}

/// Rename a genre.
#[utoipa::path(
    put,
    path = "/genres/{id}",
    params(
        ("id" = i64, Path, description = "Genre ID")
    ),
    request_body = GenreRequest,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "genres",
    security(("bearer" = []))
)]
pub async fn update_genre(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<GenreRequest>,
) -> Result<Json<Genre>> {
    Ok(Json(state.genre_service.update(id, &payload.name).await?))
}

/// Delete a genre.
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    params(
        ("id" = i64, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre deleted", body = MessageResponse),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "genres",
    security(("bearer" = []))
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>> {
    state.genre_service.delete(id).await?;

    Ok(Json(MessageResponse::new("Genre deleted successfully")))
}
