//! Health probe endpoint for load balancers.
//!
//! Reports the current toggleable state rather than plain liveness, so a probe can
//! be driven to see the instance as failing without stopping the process.

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::health::HealthState;
use crate::response;
use crate::state::AppState;

/// Body of `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct ApplicationHealth {
    #[serde(rename = "ApplicationHealthState")]
    pub application_health_state: HealthState,
}

/// Health check handler.
///
/// Always 200; the state is carried in the body.
#[instrument(name = "health::healthz", skip(state))]
pub async fn healthz(State(state): State<AppState>) -> Result<Response, AppError> {
    response::json(
        StatusCode::OK,
        &ApplicationHealth {
            application_health_state: state.health.get(),
        },
    )
}
