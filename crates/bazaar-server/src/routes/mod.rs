//! Route configuration for the Bazaar API server.

mod internal;
mod v1;

use crate::{error::ApiError, state::AppState};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    response::IntoResponse,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info_span, Level};

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;

    // Outermost first: the request id exists before the trace span opens.
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "request",
                        request_id = %request_id,
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        // Innermost: Timeout needs a response body with a `Default` impl.
        .layer(TimeoutLayer::new(server.request_timeout()));

    Router::new()
        .nest("/api/v1", v1::router(&state))
        .nest("/internal", internal::router())
        .fallback(fallback_handler)
        // The body limit above covers uploads too.
        .layer(DefaultBodyLimit::disable())
        .layer(common_middleware)
        .with_state(state)
}

async fn fallback_handler() -> impl IntoResponse {
    ApiError::NotFound("Route".into())
}
