//! Reported application health and the shared cell that guards it.
//!
//! The service reports exactly one value, `Healthy` or `Unhealthy`. It starts from
//! `HEALTH_START_STATE` and is only ever changed by the admin endpoint. Nothing is
//! persisted; a restart returns to the startup value.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

/// The liveness value reported on `/healthz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HealthState {
    #[default]
    Healthy,
    Unhealthy,
}

impl HealthState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "Healthy",
            HealthState::Unhealthy => "Unhealthy",
        }
    }

    /// Parse a value supplied to the admin endpoint.
    ///
    /// Surrounding whitespace is ignored and the comparison is case-insensitive, so
    /// `" unHEALTHY "` yields `Unhealthy`. Anything else is rejected.
    pub fn parse_admin(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("Healthy") {
            Some(HealthState::Healthy)
        } else if value.eq_ignore_ascii_case("Unhealthy") {
            Some(HealthState::Unhealthy)
        } else {
            None
        }
    }

    /// Derive the startup state from the `HEALTH_START_STATE` variable.
    ///
    /// Only an exact (case-insensitive) `Unhealthy` starts the service unhealthy.
    pub fn from_start_env(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("Unhealthy") => HealthState::Unhealthy,
            _ => HealthState::Healthy,
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe holder for the current [`HealthState`].
///
/// Cloning shares the same underlying value. Reads and writes are serialized by an
/// `RwLock`; concurrent writers resolve as last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct HealthCell {
    inner: Arc<RwLock<HealthState>>,
}

impl HealthCell {
    pub fn new(initial: HealthState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Current state.
    pub fn get(&self) -> HealthState {
        // The guarded value is Copy and always valid, so a poisoned lock is still usable
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Overwrite the state, returning the previous value.
    pub fn set(&self, state: HealthState) -> HealthState {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *guard, state);
        drop(guard);

        if previous != state {
            tracing::info!(from = %previous, to = %state, "Health state changed");
        } else {
            tracing::debug!(state = %state, "Health state unchanged");
        }

        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_is_case_insensitive() {
        assert_eq!(HealthState::parse_admin("healthy"), Some(HealthState::Healthy));
        assert_eq!(HealthState::parse_admin("UNHEALTHY"), Some(HealthState::Unhealthy));
        assert_eq!(HealthState::parse_admin("  Unhealthy "), Some(HealthState::Unhealthy));
    }

    #[test]
    fn test_parse_admin_rejects_other_values() {
        assert_eq!(HealthState::parse_admin("bogus"), None);
        assert_eq!(HealthState::parse_admin(""), None);
        assert_eq!(HealthState::parse_admin("Healthyish"), None);
    }

    #[test]
    fn test_from_start_env() {
        assert_eq!(HealthState::from_start_env(None), HealthState::Healthy);
        assert_eq!(HealthState::from_start_env(Some("unhealthy")), HealthState::Unhealthy);
        assert_eq!(HealthState::from_start_env(Some("Unhealthy")), HealthState::Unhealthy);
        assert_eq!(HealthState::from_start_env(Some("Healthy")), HealthState::Healthy);
        assert_eq!(HealthState::from_start_env(Some("down")), HealthState::Healthy);
        // No trimming at startup
        assert_eq!(HealthState::from_start_env(Some(" Unhealthy")), HealthState::Healthy);
    }

    #[test]
    fn test_display_and_serialize_match() {
        assert_eq!(HealthState::Unhealthy.to_string(), "Unhealthy");
        assert_eq!(
            serde_json::to_string(&HealthState::Healthy).unwrap(),
            "\"Healthy\""
        );
    }

    #[test]
    fn test_cell_set_returns_previous_and_is_shared() {
        let cell = HealthCell::new(HealthState::Healthy);
        let other = cell.clone();

        assert_eq!(cell.set(HealthState::Unhealthy), HealthState::Healthy);
        assert_eq!(other.get(), HealthState::Unhealthy);
        assert_eq!(other.set(HealthState::Unhealthy), HealthState::Unhealthy);
        assert_eq!(cell.get(), HealthState::Unhealthy);
    }

    #[test]
    fn test_cell_concurrent_writers_leave_a_valid_state() {
        let cell = HealthCell::new(HealthState::Healthy);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cell = cell.clone();
                std::thread::spawn(move || {
                    let state = if i % 2 == 0 {
                        HealthState::Healthy
                    } else {
                        HealthState::Unhealthy
                    };
                    for _ in 0..100 {
                        cell.set(state);
                        let _ = cell.get();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(matches!(
            cell.get(),
            HealthState::Healthy | HealthState::Unhealthy
        ));
    }
}
