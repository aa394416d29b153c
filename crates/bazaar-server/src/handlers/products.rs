//! Product handlers.
//!
//! Every route here sits behind authentication and an action-label guard;
//! mutations are additionally scoped to the caller's own products.

use super::{discard_on_error, parse_id, stage_upload};
use crate::{
    db::{Product, ProductRepository},
    error::{ApiResult, ErrorContext},
    middleware::{
        auth::Authorized,
        authz::{delete_scoped, update_scoped, OwnedResource, OwnershipScope},
    },
    request::{ListParams, NewProduct, ProductPatch},
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

/// List products
/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let query = params.into_query(&Product::LISTING)?;
    let products = state.products.list(&query).await?;
    Ok(list_response(products))
}

/// Count products matching a filter
/// GET /api/v1/products/count
pub async fn count(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let filters = params.into_filters(&Product::LISTING)?;
    let count = state.products.count(&filters).await?;
    Ok(ok(json!({ "count": count })))
}

/// Get one product
/// GET /api/v1/products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let id = parse_id(&id, ProductRepository::NAME)?;
    let product = state
        .products
        .find_by_id(id)
        .await?
        .not_found(ProductRepository::NAME)?;
    Ok(ok(product))
}

/// Create a product owned by the caller
/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    form: FormInput,
) -> ApiResult<Response> {
    let (product, upload) = stage_upload::<NewProduct>(&state, form).await?;
    let stored = state.products.create(&product, caller.id).await;
    let product = discard_on_error(&state, upload, stored).await?;

    info!(product_id = %product.id, owner = %caller.id, "Product created");
    Ok(created(product))
}

/// Update one of the caller's products; responds with the accepted changes
/// PATCH /api/v1/products/:id
pub async fn update(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    Path(id): Path<String>,
    form: FormInput,
) -> ApiResult<Response> {
    let id = parse_id(&id, ProductRepository::NAME)?;
    let (patch, upload) = stage_upload::<ProductPatch>(&state, form).await?;

    let scope = OwnershipScope::for_caller(id, &caller);
    let updated = update_scoped(&state.products, scope, &patch).await;
    discard_on_error(&state, upload, updated).await?;

    info!(product_id = %id, owner = %caller.id, "Product updated");
    Ok(ok(patch))
}

/// Delete one of the caller's products
/// DELETE /api/v1/products/:id
pub async fn delete(
    State(state): State<AppState>,
    Authorized(caller): Authorized,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&id, ProductRepository::NAME)?;
    delete_scoped(&state.products, OwnershipScope::for_caller(id, &caller)).await?;

    info!(product_id = %id, owner = %caller.id, "Product deleted");
    Ok(message("Product deleted successfully"))
}
