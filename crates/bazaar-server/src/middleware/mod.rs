//! Middleware for the Bazaar API server.

pub mod auth;
pub mod authz;

pub use auth::{Auth, AuthLayer, AuthMiddleware, AuthUser, Authorized, TokenService};
pub use authz::{
    actions, ActionLabel, Authorizer, AuthzLayer, AuthzMiddleware, Identity, IdentityStore,
    OwnedResource, OwnershipScope, PermissionTable, Role,
};
