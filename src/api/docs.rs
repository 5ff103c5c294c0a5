use crate::types::{
    ErrorResponse, Genre, GenreRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, RegisterResponse,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "genre-server",
        description = "Token-authenticated CRUD API for genres"
    ),
    paths(
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::auth::protected,
        crate::api::handlers::genres::create_genre,
        crate::api::handlers::genres::list_genres,
        crate::api::handlers::genres::get_genre,
        crate::api::handlers::genres::update_genre,
        crate::api::handlers::genres::delete_genre,
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        Genre,
        GenreRequest,
        MessageResponse,
        ErrorResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Registration, login and token revocation"),
        (name = "genres", description = "Genre resource")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
