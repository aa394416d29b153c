//! Authentication middleware layer.

use super::{jwt::TokenService, types::AuthUser};
use crate::error::ApiError;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Authentication layer.
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<TokenService>,
}

impl AuthLayer {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            tokens: self.tokens.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    tokens: Arc<TokenService>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match authenticate(&tokens, &req) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    inner.call(req).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

fn authenticate(tokens: &TokenService, req: &Request<Body>) -> Result<AuthUser, ApiError> {
    let token = extract_token(req)?;
    let claims = tokens.verify(token)?;
    AuthUser::from_claims(claims).ok_or(ApiError::InvalidToken)
}

fn extract_token(req: &Request<Body>) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let value = header.to_str().map_err(|_| ApiError::InvalidToken)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::InvalidToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use chrono::Utc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test_secret_key_32_chars_long!!!";

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route(
                "/",
                get(|axum::Extension(user): axum::Extension<AuthUser>| async move {
                    user.id.to_string()
                }),
            )
            .layer(AuthLayer::new(tokens))
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let req = request(Some("Bearer test_token"));
        assert_eq!(extract_token(&req).unwrap(), "test_token");
    }

    #[test]
    fn test_extract_token_missing() {
        let req = request(None);
        assert!(matches!(extract_token(&req), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_extract_token_wrong_scheme() {
        let req = request(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(extract_token(&req), Err(ApiError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let user_id = Uuid::new_v4();
        let issued = tokens.issue(user_id).unwrap();

        let res = app(tokens)
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let tokens = Arc::new(TokenService::new(SECRET, 10));
        let issued = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - chrono::Duration::seconds(11))
            .unwrap();

        let res = app(tokens)
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let res = app(tokens).oneshot(request(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
