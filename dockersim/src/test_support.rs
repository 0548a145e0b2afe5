//! Test-only helpers for building deterministic harnesses.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::harness::Harness;
use crate::pacing::{NoDelay, Pacer, TokioPacer};

/// Harness with no delays and a seeded random source.
pub fn instant_harness(seed: u64) -> Harness {
    Harness::new(Arc::new(NoDelay), Box::new(StdRng::seed_from_u64(seed)), false)
}

/// Harness sleeping on the tokio clock, for paused-time tests.
pub fn paced_harness(seed: u64, scale: f64) -> Harness {
    Harness::new(
        Arc::new(TokioPacer::new(scale)),
        Box::new(StdRng::seed_from_u64(seed)),
        false,
    )
}

/// Harness paced by `pacer`, for asserting on requested delays.
pub fn recording_harness(seed: u64, pacer: Arc<RecordingPacer>) -> Harness {
    Harness::new(pacer, Box::new(StdRng::seed_from_u64(seed)), false)
}

/// Pacer that records every requested delay and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, delay: Duration) -> BoxFuture<'static, ()> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
        futures::future::ready(()).boxed()
    }
}

/// Pacer that yields to the scheduler on every delay, so concurrent runs interleave.
#[derive(Debug, Default, Clone, Copy)]
pub struct YieldingPacer;

impl Pacer for YieldingPacer {
    fn pause(&self, _delay: Duration) -> BoxFuture<'static, ()> {
        tokio::task::yield_now().boxed()
    }
}

/// Harness that yields at each delay point.
pub fn yielding_harness(seed: u64, serialize_runs: bool) -> Harness {
    Harness::new(
        Arc::new(YieldingPacer),
        Box::new(StdRng::seed_from_u64(seed)),
        serialize_runs,
    )
}
