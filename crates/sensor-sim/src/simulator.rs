// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulation loop controller.
//!
//! ```text
//!            +-----------------------------------------------+
//!            v                                               |
//!   Waiting --(shutdown)--> Stopped                          |
//!      |                                                     |
//!      +--> Dropped ---------------------------> CycleComplete
//!      |                                             ^
//!      +--> Composing -> Encoding -> Delivering -----+
//! ```
//!
//! Every cycle ends in a [`CycleOutcome`]. Failures are logged with the
//! cycle number and the loop moves on; only shutdown ends it. A panic
//! inside a cycle (a misbehaving [`PayloadSink`], for instance) is caught
//! at the cycle boundary and reported as [`CycleOutcome::InternalFailure`].

use crate::delivery::{DeliveryOutcome, PayloadSink};
use crate::loss::LossDecider;
use crate::payload;
use crate::reading::ReadingComposer;
use crate::scheduler::{IntervalScheduler, Shutdown, WaitOutcome};
use crate::SimulatorConfig;
use futures::FutureExt;
use rand::Rng;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

/// How a single cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Payload accepted with 201.
    Delivered,
    /// Transmission skipped by the loss decider.
    Dropped,
    /// Endpoint answered with a status other than 201.
    UnexpectedStatus(u16),
    /// The request did not complete.
    TransportError(String),
    /// The reading could not be encoded.
    EncodeFailed(String),
    /// The cycle panicked; carries the panic message.
    InternalFailure(String),
}

impl From<DeliveryOutcome> for CycleOutcome {
    fn from(outcome: DeliveryOutcome) -> Self {
        match outcome {
            DeliveryOutcome::Success => CycleOutcome::Delivered,
            DeliveryOutcome::UnexpectedStatus(code) => CycleOutcome::UnexpectedStatus(code),
            DeliveryOutcome::TransportError(cause) => CycleOutcome::TransportError(cause),
        }
    }
}

/// Counters accumulated over a simulator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles started (including the one interrupted by shutdown).
    pub cycles: u64,
    pub delivered: u64,
    pub dropped: u64,
    /// Cycles answered with an unexpected status.
    pub warnings: u64,
    /// Cycles ending in a transport or internal failure.
    pub errors: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Delivered => self.delivered += 1,
            CycleOutcome::Dropped => self.dropped += 1,
            CycleOutcome::UnexpectedStatus(_) => self.warnings += 1,
            CycleOutcome::TransportError(_)
            | CycleOutcome::EncodeFailed(_)
            | CycleOutcome::InternalFailure(_) => self.errors += 1,
        }
    }
}

/// One simulated sensor: owns its randomness, schedule and delivery sink.
pub struct Simulator<R, S> {
    composer: ReadingComposer,
    scheduler: IntervalScheduler,
    loss: LossDecider,
    sink: S,
    rng: R,
    cycle: u64,
    summary: RunSummary,
}

impl<R, S> Simulator<R, S>
where
    R: Rng + Send,
    S: PayloadSink,
{
    pub fn new(
        composer: ReadingComposer,
        scheduler: IntervalScheduler,
        loss: LossDecider,
        sink: S,
        rng: R,
    ) -> Self {
        Self {
            composer,
            scheduler,
            loss,
            sink,
            rng,
            cycle: 0,
            summary: RunSummary::default(),
        }
    }

    /// Build a simulator from validated configuration.
    pub fn from_config(config: &SimulatorConfig, sink: S, rng: R) -> Self {
        Self::new(
            ReadingComposer::new(config.sensor_name.as_str(), config.location.as_str()),
            IntervalScheduler::new(config.base_interval_secs, config.jitter_secs),
            LossDecider::new(config.drop_probability),
            sink,
            rng,
        )
    }

    /// Number of the most recently started cycle (0 before the first).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run cycles until `shutdown` is requested.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> RunSummary {
        info!(
            sensor = self.composer.name(),
            location = self.composer.location(),
            "Starting simulation"
        );

        loop {
            self.cycle += 1;
            self.summary.cycles += 1;
            let cycle = self.cycle;
            info!(cycle, "Cycle {} starting...", cycle);

            let wait_secs = self.scheduler.next_interval(&mut self.rng);
            info!(cycle, wait_secs, "Waiting {} seconds...", wait_secs);

            if self.scheduler.wait(wait_secs, &mut shutdown).await == WaitOutcome::Cancelled {
                info!(cycle, "Simulation interrupted");
                break;
            }

            let outcome = match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => CycleOutcome::InternalFailure(panic_message(panic.as_ref())),
            };
            self.summary.record(&outcome);
            log_outcome(cycle, &outcome);
        }

        info!(
            cycles = self.summary.cycles,
            delivered = self.summary.delivered,
            dropped = self.summary.dropped,
            warnings = self.summary.warnings,
            errors = self.summary.errors,
            "Simulation stopped"
        );
        self.summary.clone()
    }

    /// Execute the post-wait part of a cycle: drop decision, compose,
    /// encode, deliver.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if self.loss.should_drop(&mut self.rng) {
            return CycleOutcome::Dropped;
        }

        let composition = self.composer.compose(&mut self.rng);
        debug!(
            cycle = self.cycle,
            field_count = composition.field_count,
            "composed reading"
        );
        info!(cycle = self.cycle, "Generated data: {}", composition.reading);

        let body = match payload::encode(&composition.reading) {
            Ok(body) => body,
            Err(e) => return CycleOutcome::EncodeFailed(e.to_string()),
        };

        self.sink.deliver(body).await.into()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_outcome(cycle: u64, outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Delivered => info!(cycle, "SUCCESS - Data sent to API"),
        CycleOutcome::Dropped => info!(cycle, "PACKET LOSS - Skipping transmission"),
        CycleOutcome::UnexpectedStatus(code) => {
            warn!(cycle, status = code, "WARNING - API returned code: {}", code)
        }
        CycleOutcome::TransportError(cause) => {
            error!(cycle, "ERROR: cycle {} delivery failed: {}", cycle, cause)
        }
        CycleOutcome::EncodeFailed(cause) => {
            error!(cycle, "ERROR: cycle {} could not encode reading: {}", cycle, cause)
        }
        CycleOutcome::InternalFailure(cause) => {
            error!(cycle, "ERROR: cycle {} failed internally: {}", cycle, cause)
        }
    }
}
