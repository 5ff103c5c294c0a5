use crate::auth::service::AuthService;
use crate::db::User;
use crate::types::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// The caller verified by [`require_auth`], along with the token it presented.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

/// Rejects the request with 401 unless it carries a bearer token that
/// [`AuthService::authenticate`] accepts. On success the resolved
/// [`AuthUser`] is placed in the request extensions.
pub async fn require_auth(
    State(auth_service): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or(AppError::AuthenticationFailed)?
        .to_string();

    let user = auth_service
        .authenticate(&token)
        .await
        .ok_or(AppError::AuthenticationFailed)?;

    req.extensions_mut().insert(AuthUser { user, token });

    Ok(next.run(req).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers_with("abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    mod layer {
        use super::*;
        use crate::auth::jwt::TokenIssuer;
        use crate::db::TursoClient;
        use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
        use tower::ServiceExt;

        const SECRET: &str = "middleware_test_secret_at_least_32_chars";

        async fn app() -> (Router, Arc<AuthService>) {
            let db = Arc::new(TursoClient::new_memory().await.expect("db"));
            let service = Arc::new(AuthService::new(
                TokenIssuer::new(SECRET.to_string(), 3600),
                db.clone(),
                db,
            ));

            let router = Router::new()
                .route(
                    "/me",
                    get(|AuthUser { user, .. }: AuthUser| async move { user.username }),
                )
                .layer(middleware::from_fn_with_state(service.clone(), require_auth));

            (router, service)
        }

        fn request(auth: Option<&str>) -> Request {
            let mut builder = axum::http::Request::builder().uri("/me");
            if let Some(value) = auth {
                builder = builder.header(header::AUTHORIZATION, value);
            }
            builder.body(Body::empty()).expect("request")
        }

        #[tokio::test]
        async fn test_missing_token_is_unauthorized() {
            let (router, _) = app().await;

            let response = router.oneshot(request(None)).await.expect("response");

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE),
                Some(&HeaderValue::from_static("Bearer"))
            );
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
            assert_eq!(json["error"], "Authentication required");
        }

        #[tokio::test]
        async fn test_valid_token_reaches_handler() {
            let (router, service) = app().await;
            service
                .register("alice", "alice@example.com", "password123")
                .await
                .expect("register");
            let token = service
                .login("alice", "password123")
                .await
                .expect("login")
                .token;

            let response = router
                .oneshot(request(Some(&format!("Bearer {token}"))))
                .await
                .expect("response");

            assert_eq!(response.status(), StatusCode::OK);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            assert_eq!(&body[..], b"alice");
        }
    }
}
