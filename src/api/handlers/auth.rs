use crate::{
    auth::middleware::AuthUser,
    types::{
        ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
        RegisterResponse, Result,
    },
    AppState,
};
use crate::api::extract::ApiJson;
use axum::{extract::State, Json};

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Missing username, email or password", body = ErrorResponse),
        (status = 409, description = "Username or email already in use", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let registered = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(registered))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let session = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(session))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser { token, .. }: AuthUser,
) -> Result<Json<MessageResponse>> {
    state.auth_service.logout(&token).await?;

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// Check that a token is accepted
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Token accepted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn protected(_auth: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("This is a protected endpoint"))
}
