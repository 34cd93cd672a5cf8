// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IoT Sensor Simulator
//!
//! Fabricates plausible environmental readings and POSTs them to an
//! ingestion endpoint, behaving like a real sensor on a flaky link:
//!
//! - Irregular timing: ~30s between cycles with ±10s jitter
//! - Partial readings: 1, 2 or 3 of temperature / humidity / pressure
//! - Packet loss: ~10% of cycles skip transmission entirely
//! - Failures are logged and the loop keeps going until shutdown
//!
//! ```text
//! IntervalScheduler --> LossDecider --> ReadingComposer --> payload::encode --> PayloadSink
//!      (wait)            (maybe drop)     (1..=3 fields)        (JSON)           (HTTP POST)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sensor_sim::{shutdown_channel, DeliveryClient, Simulator, SimulatorConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = SimulatorConfig::default();
//! config.validate()?;
//! let client = DeliveryClient::from_config(&config)?;
//! let (handle, shutdown) = shutdown_channel();
//! let mut sim = Simulator::from_config(&config, client, StdRng::from_entropy());
//! let summary = sim.run(shutdown).await;
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod loss;
pub mod payload;
pub mod reading;
pub mod scheduler;
pub mod simulator;

pub use config::{ConfigOverrides, SimulatorConfig};
pub use delivery::{DeliveryClient, DeliveryOutcome, PayloadSink};
pub use error::{ConfigError, SimError};
pub use loss::LossDecider;
pub use reading::{Composition, Field, PartialReading, ReadingComposer};
pub use scheduler::{shutdown_channel, IntervalScheduler, Shutdown, ShutdownHandle, WaitOutcome};
pub use simulator::{CycleOutcome, RunSummary, Simulator};
