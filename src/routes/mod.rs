//! HTTP route handlers.
//!
//! Dispatch is a fixed four-way switch: non-GET methods are refused, `/healthz`
//! reports state, `/admin/set-health` toggles it, and everything else gets the
//! landing banner. Paths match case-insensitively.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod admin;
pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::{HEALTHZ_PATH, SET_HEALTH_PATH};
use crate::middleware::{normalize_request, panic_response, request_id_layer};
use crate::state::AppState;

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(HEALTHZ_PATH, get(health::healthz))
        .route(SET_HEALTH_PATH, get(admin::set_health))
        .fallback(home::landing)
        .with_state(state);

    with_request_pipeline(routes)
}

/// Wrap `routes` in the request pipeline: request-id span, panic containment,
/// GET-only check and path normalization.
fn with_request_pipeline(routes: Router) -> Router {
    // Routing happens inside the outer router's fallback, so the path rewrite in
    // normalize_request is visible to the inner router.
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn(normalize_request))
        // Panic containment - a failing handler yields a 500, never a dropped task
        .layer(CatchPanicLayer::custom(panic_response))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
