//! Shared application state for the API server.

use std::time::Instant;

use dockersim::Harness;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the one simulated system every scenario mutates.
    pub harness: Harness,
    /// When the server started, for uptime reporting.
    pub started_at: Instant,
    /// Deployment label reported by `/api/status`.
    pub environment: String,
}

impl AppState {
    pub fn new(harness: Harness, environment: impl Into<String>) -> Self {
        Self {
            harness,
            started_at: Instant::now(),
            environment: environment.into(),
        }
    }

    /// Seconds since startup.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
