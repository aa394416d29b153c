//! Authorization middleware layer.

use super::{
    audit::AuthzAuditEvent,
    identity::IdentityStore,
    types::{ActionLabel, Decision, DenyReason, Identity, MalformedActionLabel, PermissionTable},
};
use crate::{error::ApiError, middleware::auth::types::AuthUser};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{error, warn};
use uuid::Uuid;

/// Decides whether an authenticated caller may perform an action.
#[derive(Clone)]
pub struct Authorizer {
    table: Arc<PermissionTable>,
    identities: Arc<dyn IdentityStore>,
}

impl Authorizer {
    pub fn new(table: Arc<PermissionTable>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { table, identities }
    }

    /// Resolve the caller and check the role-level permission.
    ///
    /// Denials come back as `ApiError::AccessDenied`; persistence failures
    /// propagate unchanged.
    pub async fn authorize(&self, caller: Uuid, action: &ActionLabel) -> Result<Identity, ApiError> {
        let Some(identity) = self.identities.find_identity(caller).await? else {
            let reason = DenyReason::UnknownIdentity;
            AuthzAuditEvent::denied(caller, None, action.as_str(), &reason).log();
            return Err(ApiError::AccessDenied(reason));
        };

        match self.table.decide(identity.role, action) {
            Decision::Allow => {
                AuthzAuditEvent::granted(identity.id, identity.role, action).log();
                Ok(identity)
            }
            Decision::Deny(reason) => {
                AuthzAuditEvent::denied(identity.id, Some(identity.role), action.as_str(), &reason)
                    .log();
                Err(ApiError::AccessDenied(reason))
            }
        }
    }

    /// Guard for a route bound to `label`.
    pub fn require(&self, label: &'static str) -> AuthzLayer {
        AuthzLayer::new(self.clone(), label)
    }
}

/// Authorization layer bound to one action label.
#[derive(Clone)]
pub struct AuthzLayer {
    authorizer: Authorizer,
    action: Result<ActionLabel, MalformedActionLabel>,
}

impl AuthzLayer {
    pub fn new(authorizer: Authorizer, label: &'static str) -> Self {
        let action = ActionLabel::parse(label);
        if let Err(err) = &action {
            error!(error = %err, "Route bound to malformed action label; every request will be denied");
        }
        Self { authorizer, action }
    }
}

impl<S> Layer<S> for AuthzLayer {
    type Service = AuthzMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthzMiddleware {
            inner,
            authorizer: self.authorizer.clone(),
            action: self.action.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthzMiddleware<S> {
    inner: S,
    authorizer: Authorizer,
    action: Result<ActionLabel, MalformedActionLabel>,
}

impl<S> Service<Request<Body>> for AuthzMiddleware<S>
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
        let authorizer = self.authorizer.clone();
        let action = self.action.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(caller) = req.extensions().get::<AuthUser>().map(|user| user.id) else {
                warn!("Authorization check without authentication");
                return Ok(ApiError::Unauthorized.into_response());
            };

            let action = match action {
                Ok(action) => action,
                Err(MalformedActionLabel(label)) => {
                    let reason = DenyReason::MalformedAction { label: label.clone() };
                    AuthzAuditEvent::denied(caller, None, &label, &reason).log();
                    return Ok(ApiError::AccessDenied(reason).into_response());
                }
            };

            match authorizer.authorize(caller, &action).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    inner.call(req).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ApiResult,
        middleware::{
            auth::types::Claims,
            authz::types::{actions::*, PermissionEntry, Role},
        },
    };
    use async_trait::async_trait;
    use axum::{http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct FixedIdentities(HashMap<Uuid, Role>);

    #[async_trait]
    impl IdentityStore for FixedIdentities {
        async fn find_identity(&self, id: Uuid) -> ApiResult<Option<Identity>> {
            Ok(self.0.get(&id).map(|role| Identity { id, role: *role }))
        }
    }

    fn authorizer(users: &[(Uuid, Role)]) -> Authorizer {
        let table = PermissionTable::from_entries([PermissionEntry::new(
            Role::User,
            [GET_PRODUCTS, GET_PRODUCTS_ID, COUNT_PRODUCTS],
        )])
        .unwrap();
        Authorizer::new(
            Arc::new(table),
            Arc::new(FixedIdentities(users.iter().copied().collect())),
        )
    }

    fn request_as(id: Option<Uuid>) -> Request<Body> {
        let mut req = Request::builder().uri("/").body(Body::empty()).unwrap();
        if let Some(id) = id {
            let claims = Claims::new(id, 3600);
            req.extensions_mut().insert(AuthUser::from_claims(claims).unwrap());
        }
        req
    }

    fn app(guard: AuthzLayer) -> Router {
        Router::new().route("/", get(|| async { "ok" }).route_layer(guard))
    }

    #[tokio::test]
    async fn test_permitted_action_passes_through() {
        let id = Uuid::new_v4();
        let authz = authorizer(&[(id, Role::User)]);

        let res = app(authz.require(GET_PRODUCTS)).oneshot(request_as(Some(id))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unpermitted_action_is_forbidden() {
        let id = Uuid::new_v4();
        let authz = authorizer(&[(id, Role::User)]);

        let res = app(authz.require(POST_PRODUCTS)).oneshot(request_as(Some(id))).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_without_entry_is_forbidden() {
        let id = Uuid::new_v4();
        let authz = authorizer(&[(id, Role::Vendor)]);

        let err = authz
            .authorize(id, &ActionLabel::parse(GET_PRODUCTS).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::AccessDenied(DenyReason::NoPermissionEntry { role: Role::Vendor })
        ));
    }

    #[tokio::test]
    async fn test_unknown_identity_is_denied() {
        let authz = authorizer(&[]);

        let err = authz
            .authorize(Uuid::new_v4(), &ActionLabel::parse(GET_PRODUCTS).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied(DenyReason::UnknownIdentity)));
    }

    #[tokio::test]
    async fn test_malformed_label_denies_instead_of_erroring() {
        let id = Uuid::new_v4();
        let authz = authorizer(&[(id, Role::User)]);

        let res = app(authz.require("Get Products")).oneshot(request_as(Some(id))).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_authentication_is_unauthorized() {
        let authz = authorizer(&[]);

        let res = app(authz.require(GET_PRODUCTS)).oneshot(request_as(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
