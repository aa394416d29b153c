//! Category handlers.

use super::{discard_on_error, parse_id, stage_upload};
use crate::{
    db::{Category, CategoryRepository},
    error::{ApiResult, ErrorContext},
    middleware::{
        auth::Authorized,
        authz::{delete_scoped, update_scoped, OwnedResource, OwnershipScope},
    },
    request::{CategoryPatch, ListParams, NewCategory},
    response::{created, list as list_response, message, ok},
    state::AppState,
    uploads::FormInput,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Response,
};
use serde_json::json;
use tracing::info;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let query = params.into_query(&Category::LISTING)?;
    Ok(list_response(state.categories.list(&query).await?))
}

/// GET /api/v1/categories/count
pub async fn count(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let filters = params.into_filters(&Category::LISTING)?;
    let count = state.categories.count(&filters).await?;
    Ok(ok(json!({ "count": count })))
}

/// GET /api/v1/categories/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let id = parse_id(&id, CategoryRepository::NAME)?;
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .not_found(CategoryRepository::NAME)?;
    Ok(ok(category))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    form: FormInput,
) -> ApiResult<Response> {
    let (category, upload) = stage_upload::<NewCategory>(&state, form).await?;
    let stored = state.categories.create(&category, caller.id).await;
    let category = discard_on_error(&state, upload, stored).await?;

    info!(category_id = %category.id, owner = %caller.id, "Category created");
    Ok(created(category))
}

/// PATCH /api/v1/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    Path(id): Path<String>,
    form: FormInput,
) -> ApiResult<Response> {
    let id = parse_id(&id, CategoryRepository::NAME)?;
    let (patch, upload) = stage_upload::<CategoryPatch>(&state, form).await?;

    let scope = OwnershipScope::for_caller(id, &caller);
    let updated = update_scoped(&state.categories, scope, &patch).await;
    discard_on_error(&state, upload, updated).await?;

    info!(category_id = %id, owner = %caller.id, "Category updated");
    Ok(ok(patch))
}

/// DELETE /api/v1/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&id, CategoryRepository::NAME)?;
    delete_scoped(&state.categories, OwnershipScope::for_caller(id, &caller)).await?;

    info!(category_id = %id, owner = %caller.id, "Category deleted");
    Ok(message("Category deleted successfully"))
}
