//! Immutable Health - a toggleable liveness endpoint.
//!
//! Serves `/healthz` for load-balancer probes and a loopback-only
//! `/admin/set-health` switch that flips the reported state, so probe
//! behaviour can be exercised without touching the process.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use health::{HealthCell, HealthState};
pub use routes::create_router;
pub use state::AppState;
