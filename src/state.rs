//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::health::HealthCell;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the effective configuration and the health cell that `/healthz` reads
/// and `/admin/set-health` writes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub health: HealthCell,
}

impl AppState {
    /// Creates the state, seeding the health cell from the configured start state.
    pub fn new(config: AppConfig) -> Self {
        let health = HealthCell::new(config.start_state);
        Self {
            config: Arc::new(config),
            health,
        }
    }
}
