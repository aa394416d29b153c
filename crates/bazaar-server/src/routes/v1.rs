//! Version 1 API routes.
//!
//! Every guarded route is bound to exactly one action label at startup. The
//! authorization guard sits on the method route, authentication on the whole
//! protected router, so a request is authenticated before it is authorized.

use crate::{
    handlers::{categories, products, users},
    middleware::authz::actions::*,
    state::AppState,
};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

/// Create the v1 API router.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    let authz = &state.authorizer;

    Router::new()
        .route("/users/me", get(users::me))
        // Products
        .route(
            "/products",
            get(products::list).route_layer(authz.require(GET_PRODUCTS)),
        )
        .route(
            "/products",
            post(products::create).route_layer(authz.require(POST_PRODUCTS)),
        )
        .route(
            "/products/count",
            get(products::count).route_layer(authz.require(COUNT_PRODUCTS)),
        )
        .route(
            "/products/:id",
            get(products::get).route_layer(authz.require(GET_PRODUCTS_ID)),
        )
        .route(
            "/products/:id",
            patch(products::update).route_layer(authz.require(UPDATE_PRODUCTS)),
        )
        .route(
            "/products/:id",
            delete(products::delete).route_layer(authz.require(DELETE_PRODUCTS)),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list).route_layer(authz.require(GET_CATEGORIES)),
        )
        .route(
            "/categories",
            post(categories::create).route_layer(authz.require(POST_CATEGORIES)),
        )
        .route(
            "/categories/count",
            get(categories::count).route_layer(authz.require(COUNT_CATEGORIES)),
        )
        .route(
            "/categories/:id",
            get(categories::get).route_layer(authz.require(GET_CATEGORIES_ID)),
        )
        .route(
            "/categories/:id",
            patch(categories::update).route_layer(authz.require(UPDATE_CATEGORIES)),
        )
        .route(
            "/categories/:id",
            delete(categories::delete).route_layer(authz.require(DELETE_CATEGORIES)),
        )
        .route_layer(state.auth_layer())
}
