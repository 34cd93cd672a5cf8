// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Jittered interval scheduling with cooperative cancellation.
//!
//! The wait between cycles is the only place the simulator suspends for
//! long. It races the timer against a [`Shutdown`] signal so a stop request
//! ends the loop without sitting out the remainder of the interval.

use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Default base interval between cycles, in seconds.
pub const DEFAULT_BASE_INTERVAL_SECS: u64 = 30;

/// Default jitter applied around the base interval, in seconds.
pub const DEFAULT_JITTER_SECS: u64 = 10;

/// Draw a wait in whole seconds, uniform over `[base - jitter, base + jitter]`.
///
/// The lower bound saturates at zero when `jitter > base`.
pub fn next_interval<R: Rng>(base: u64, jitter: u64, rng: &mut R) -> u64 {
    let low = base.saturating_sub(jitter);
    let high = base.saturating_add(jitter);
    rng.gen_range(low..=high)
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full interval elapsed.
    Elapsed,
    /// Shutdown was requested before or during the wait.
    Cancelled,
}

/// Computes and sleeps through jittered intervals.
#[derive(Debug, Clone, Copy)]
pub struct IntervalScheduler {
    base_secs: u64,
    jitter_secs: u64,
}

impl IntervalScheduler {
    pub fn new(base_secs: u64, jitter_secs: u64) -> Self {
        Self {
            base_secs,
            jitter_secs,
        }
    }

    pub fn base_secs(&self) -> u64 {
        self.base_secs
    }

    pub fn jitter_secs(&self) -> u64 {
        self.jitter_secs
    }

    /// Next wait in seconds.
    pub fn next_interval<R: Rng>(&self, rng: &mut R) -> u64 {
        next_interval(self.base_secs, self.jitter_secs, rng)
    }

    /// Sleep for `secs` seconds unless `shutdown` fires first.
    ///
    /// A shutdown already requested returns immediately without sleeping.
    pub async fn wait(&self, secs: u64, shutdown: &mut Shutdown) -> WaitOutcome {
        if shutdown.is_requested() {
            return WaitOutcome::Cancelled;
        }

        tokio::select! {
            biased;
            _ = shutdown.requested() => {
                debug!(wait_secs = secs, "wait interrupted by shutdown");
                WaitOutcome::Cancelled
            }
            _ = tokio::time::sleep(Duration::from_secs(secs)) => WaitOutcome::Elapsed,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_INTERVAL_SECS, DEFAULT_JITTER_SECS)
    }
}

/// Create a linked shutdown handle and listener.
pub fn shutdown_channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

/// Requests shutdown of every [`Shutdown`] listener created from it.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal shutdown. The request stays set; listeners that are not
    /// waiting right now observe it at their next wait.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Create an additional listener.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

/// Listener side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is requested.
    ///
    /// If every handle is dropped without signaling, shutdown can no longer
    /// happen and this never resolves.
    pub async fn requested(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
