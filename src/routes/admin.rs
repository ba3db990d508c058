//! Local-only administrative toggle for the reported health state.
//!
//! `GET /admin/set-health?state=Healthy|Unhealthy` flips what `/healthz` reports.
//! Callers must connect from loopback. When the peer address is unknown the `Host`
//! header is used instead, which a remote client can spoof.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Query, Request, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::health::HealthState;
use crate::response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetHealthParams {
    pub state: Option<String>,
}

/// Body of a successful toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHealthResponse {
    pub status: &'static str,
    pub new_state: HealthState,
}

/// Admin toggle handler.
///
/// Order matters: the locality check runs before the query is even decoded, so a
/// remote caller always sees 403 regardless of what it sent.
#[instrument(name = "admin::set_health", skip(state, request))]
pub async fn set_health(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    if !is_local_call(&request) {
        tracing::warn!("Rejected non-local admin request");
        return Err(AppError::Forbidden);
    }

    let params = Query::<SetHealthParams>::try_from_uri(request.uri())
        .map_err(|_| AppError::BadRequest)?;
    let new_state = params
        .0
        .state
        .as_deref()
        .and_then(HealthState::parse_admin)
        .ok_or(AppError::BadRequest)?;

    state.health.set(new_state);

    response::json(
        StatusCode::OK,
        &SetHealthResponse {
            status: "ok",
            new_state,
        },
    )
}

/// Whether the request originates from this host.
pub fn is_local_call(request: &Request) -> bool {
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => is_loopback(addr.ip()),
        None => {
            let host = request
                .headers()
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .or_else(|| request.uri().host())
                .unwrap_or_default();
            host_looks_local(host)
        }
    }
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback()),
    }
}

fn host_looks_local(host: &str) -> bool {
    host.to_ascii_lowercase().contains("localhost") || host.starts_with("127.0.0.1")
}
