//! Authentication extractors for handlers.

use super::types::AuthUser;
use crate::{error::ApiError, middleware::authz::Identity};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extractor for authenticated user (required).
pub struct Auth(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(Auth)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Identity confirmed by the authorization layer.
///
/// Only present on routes guarded by an [`AuthzLayer`](crate::middleware::authz::AuthzLayer);
/// anywhere else this rejects with 401.
pub struct Authorized(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Authorized
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Authorized)
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{auth::types::Claims, authz::Role};
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with(user: Option<AuthUser>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    fn user() -> AuthUser {
        AuthUser::from_claims(Claims::new(Uuid::new_v4(), 3600)).unwrap()
    }

    #[tokio::test]
    async fn test_auth_extractor_success() {
        let auth_user = user();
        let mut parts = parts_with(Some(auth_user.clone()));

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.id, auth_user.id);
    }

    #[tokio::test]
    async fn test_auth_extractor_missing() {
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authorized_requires_identity() {
        let mut parts = parts_with(Some(user()));
        assert!(Authorized::from_request_parts(&mut parts, &()).await.is_err());

        let identity = Identity {
            id: Uuid::new_v4(),
            role: Role::Vendor,
        };
        parts.extensions.insert(identity.clone());
        let Authorized(found) = Authorized::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, identity);
    }
}
