//! Simulated delays between scenario steps.
//!
//! Delays only pace the dashboard; nothing depends on wall-clock time having
//! passed. Tests swap in [`NoDelay`] to run whole scenarios instantly.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

/// Waits out a step's simulated delay.
pub trait Pacer: Send + Sync {
    fn pause(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// Real-time pacing via `tokio::time::sleep`, scaled by a constant factor.
#[derive(Debug, Clone, Copy)]
pub struct TokioPacer {
    scale: f64,
}

impl TokioPacer {
    /// `scale` of 1.0 keeps scripted delays as-is; 0.0 disables them.
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Scaled delay, saturating at `Duration::MAX` when the product overflows.
    pub fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.scale).unwrap_or(Duration::MAX)
    }
}

impl Default for TokioPacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Pacer for TokioPacer {
    fn pause(&self, delay: Duration) -> BoxFuture<'static, ()> {
        let scaled = self.scaled(delay);
        if scaled.is_zero() {
            return futures::future::ready(()).boxed();
        }
        tokio::time::sleep(scaled).boxed()
    }
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&self, _delay: Duration) -> BoxFuture<'static, ()> {
        futures::future::ready(()).boxed()
    }
}
