//! Identity lookup seam used by the authorizer.

use super::types::Identity;
use crate::error::ApiResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Resolves an authenticated caller id to its current identity.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// `Ok(None)` when the id no longer resolves (e.g. deleted account).
    async fn find_identity(&self, id: Uuid) -> ApiResult<Option<Identity>>;
}
