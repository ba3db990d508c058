//! Landing banner served for every unmatched path.

use axum::{extract::State, http::StatusCode, response::Response};
use sysinfo::System;
use tracing::instrument;

use crate::config::{BANNER_TITLE, HEALTHZ_PATH};
use crate::error::AppError;
use crate::health::HealthState;
use crate::response;
use crate::state::AppState;

/// Shown when the hostname has no IPv4 address.
pub const UNKNOWN_IP: &str = "Unknown";

/// Identity of the machine serving the request.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub hostname: String,
    pub ipv4: String,
}

impl HostInfo {
    /// Look up the hostname and the first IPv4 address it resolves to.
    pub async fn discover() -> Result<Self, AppError> {
        let hostname = System::host_name()
            .ok_or_else(|| AppError::Internal("unable to determine hostname".to_string()))?;

        let ipv4 = match tokio::net::lookup_host((hostname.as_str(), 0)).await {
            Ok(mut addrs) => addrs
                .find(|addr| addr.is_ipv4())
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| UNKNOWN_IP.to_string()),
            Err(e) => {
                tracing::debug!(hostname = %hostname, error = %e, "Hostname lookup failed");
                UNKNOWN_IP.to_string()
            }
        };

        Ok(Self { hostname, ipv4 })
    }
}

/// Render the banner text.
pub fn banner(host: &HostInfo, port: u16, state: HealthState) -> String {
    format!(
        "{}\nVM Hostname: {}\nVM IP: {}\nHealth endpoint: GET http://localhost:{}{} (currently: {})",
        BANNER_TITLE, host.hostname, host.ipv4, port, HEALTHZ_PATH, state
    )
}

/// Landing page handler.
#[instrument(name = "home::landing", skip(state))]
pub async fn landing(State(state): State<AppState>) -> Result<Response, AppError> {
    let host = HostInfo::discover().await?;
    let body = banner(&host, state.config.http.port, state.health.get());
    Ok(response::text(StatusCode::OK, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_layout() {
        let host = HostInfo {
            hostname: "vm-01".to_string(),
            ipv4: "10.0.0.7".to_string(),
        };
        assert_eq!(
            banner(&host, 8080, HealthState::Unhealthy),
            "Immutable Infrastructure POC Running!\n\
             VM Hostname: vm-01\n\
             VM IP: 10.0.0.7\n\
             Health endpoint: GET http://localhost:8080/healthz (currently: Unhealthy)"
        );
    }
}
