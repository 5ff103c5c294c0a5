use crate::api::docs::ApiDoc;
use crate::auth::{middleware::require_auth, service::AuthService};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/register", post(crate::api::handlers::auth::register))
        .route("/login", post(crate::api::handlers::auth::login));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/logout", post(crate::api::handlers::auth::logout))
        .route("/protected", get(crate::api::handlers::auth::protected))
        // Genre routes
        .route(
            "/genres",
            get(crate::api::handlers::genres::list_genres)
                .post(crate::api::handlers::genres::create_genre),
        )
        .route(
            "/genres/{id}",
            get(crate::api::handlers::genres::get_genre)
                .put(crate::api::handlers::genres::update_genre)
                .delete(crate::api::handlers::genres::delete_genre),
        )
        .layer(middleware::from_fn_with_state(auth_service, require_auth));

    public_routes.merge(protected_routes)
}

/// The complete application: API routes, health check, OpenAPI document and
/// the tracing, CORS and body-limit layers.
///
/// The body limit comes from `server.max_body_bytes`.
pub fn create_app(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;
    let router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(create_router(state.auth_service.clone()));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    );

    router
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
