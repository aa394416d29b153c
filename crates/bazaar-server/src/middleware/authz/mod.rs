//! Authorization middleware for role-based access control.
//!
//! Requests pass through an ordered pipeline: authentication populates an
//! [`AuthUser`](crate::middleware::auth::AuthUser), the [`AuthzLayer`] bound to
//! the route's action label resolves the caller's role and consults the static
//! [`PermissionTable`], and ownership-scoped handlers finally mutate through an
//! [`OwnershipScope`]. Any denial short-circuits the request.

pub mod audit;
pub mod identity;
pub mod layer;
pub mod resource;
pub mod types;

pub use audit::AuthzAuditEvent;
pub use identity::IdentityStore;
pub use layer::{Authorizer, AuthzLayer, AuthzMiddleware};
pub use resource::{delete_scoped, update_scoped, OwnedResource, OwnershipScope};
pub use types::{
    actions, ActionLabel, Decision, DenyReason, Identity, MalformedActionLabel, PermissionEntry,
    PermissionTable, PermissionTableError, Role,
};
