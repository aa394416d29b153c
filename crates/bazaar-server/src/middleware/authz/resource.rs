//! Resource-level authorization.
//!
//! Owned resources are never fetched, compared and then mutated. Every
//! mutation goes through an [`OwnershipScope`], which repositories turn into a
//! single statement filtering on both the resource id and its owner. A record
//! that does not exist and a record that belongs to someone else produce the
//! same `None`, and therefore the same 404.

use super::types::Identity;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use uuid::Uuid;

/// Matching filter for an ownership-scoped mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipScope {
    pub id: Uuid,
    pub owner: Uuid,
}

impl OwnershipScope {
    /// Scope `resource_id` to the authorized caller.
    pub fn for_caller(resource_id: Uuid, caller: &Identity) -> Self {
        Self {
            id: resource_id,
            owner: caller.id,
        }
    }
}

/// Storage that can mutate records only through an ownership filter.
#[async_trait]
pub trait OwnedResource: Send + Sync {
    /// Stored record.
    type Record: Send;
    /// Validated partial update.
    type Patch: Send + Sync;

    /// Human-readable resource name for not-found errors.
    const NAME: &'static str;

    async fn update_owned(
        &self,
        scope: OwnershipScope,
        patch: &Self::Patch,
    ) -> ApiResult<Option<Self::Record>>;

    async fn delete_owned(&self, scope: OwnershipScope) -> ApiResult<Option<Self::Record>>;
}

/// Update an owned record, mapping "missing" and "not yours" to the same 404.
pub async fn update_scoped<R: OwnedResource>(
    resources: &R,
    scope: OwnershipScope,
    patch: &R::Patch,
) -> ApiResult<R::Record> {
    resources
        .update_owned(scope, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(R::NAME.to_string()))
}

/// Delete an owned record, mapping "missing" and "not yours" to the same 404.
pub async fn delete_scoped<R: OwnedResource>(
    resources: &R,
    scope: OwnershipScope,
) -> ApiResult<R::Record> {
    resources
        .delete_owned(scope)
        .await?
        .ok_or_else(|| ApiError::NotFound(R::NAME.to_string()))
}
