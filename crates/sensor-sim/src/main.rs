// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IoT Sensor Simulator CLI
//!
//! Sends fictitious sensor data to an ingestion API until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: http://localhost:8080/api/sensors, ~30s (±10s), 10% loss
//! sensor-sim
//!
//! # Faster cycles against another endpoint
//! sensor-sim --endpoint http://ingest:8080/api/sensors --base-interval 5 --jitter 2
//!
//! # Five independent sensors, reproducible randomness
//! sensor-sim --instances 5 --seed 42
//!
//! # Load settings from a JSON file, override the name
//! sensor-sim --config sim.json --name Greenhouse-1
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sensor_sim::logging::init_tracing;
use sensor_sim::{shutdown_channel, ConfigOverrides, DeliveryClient, Simulator, SimulatorConfig};
use std::path::PathBuf;
use tracing::{error, info, info_span, Instrument};

/// IoT Sensor Simulator - jittered partial readings with packet loss
#[derive(Parser, Debug)]
#[command(name = "sensor-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ingestion endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Sensor name sent with every reading
    #[arg(short, long)]
    name: Option<String>,

    /// Sensor location sent with every reading
    #[arg(short, long)]
    location: Option<String>,

    /// Base interval between cycles in seconds
    #[arg(long)]
    base_interval: Option<u64>,

    /// Maximum deviation from the base interval in seconds
    #[arg(long)]
    jitter: Option<u64>,

    /// Probability [0, 1] that a cycle skips transmission
    #[arg(long)]
    drop_probability: Option<f64>,

    /// Number of independent simulated sensors
    #[arg(long, default_value_t = 1)]
    instances: u32,

    /// Seed for reproducible runs (instance i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Defaults, then the config file, then command-line overrides.
    fn resolve_config(&self) -> Result<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => SimulatorConfig::default(),
        };

        config.apply_overrides(ConfigOverrides {
            endpoint: self.endpoint.clone(),
            sensor_name: self.name.clone(),
            location: self.location.clone(),
            base_interval_secs: self.base_interval,
            jitter_secs: self.jitter,
            drop_probability: self.drop_probability,
        });

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = args.resolve_config()?;
    if args.instances == 0 {
        anyhow::bail!("--instances must be at least 1");
    }

    info!("=== IoT Sensor Simulator ===");
    info!("  API URL:  {}", config.endpoint);
    info!("  Sensor:   {}", config.sensor_name);
    info!("  Location: {}", config.location);
    info!(
        "  Interval: ~{}s (±{}s)",
        config.base_interval_secs, config.jitter_secs
    );
    info!("  Drop:     {:.0}%", config.drop_probability * 100.0);
    if args.instances > 1 {
        info!("  Instances: {}", args.instances);
    }
    info!("Starting simulation...");

    let (handle, shutdown) = shutdown_channel();

    let mut tasks = Vec::with_capacity(args.instances as usize);
    for index in 0..args.instances {
        let mut instance_config = config.clone();
        if args.instances > 1 {
            instance_config.sensor_name = format!("{}-{}", config.sensor_name, index + 1);
        }

        let client =
            DeliveryClient::from_config(&instance_config).context("Failed to create HTTP client")?;

        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(index))),
            None => StdRng::from_entropy(),
        };

        let span = info_span!("sensor", name = %instance_config.sensor_name);
        let mut sim = Simulator::from_config(&instance_config, client, rng);
        let shutdown = shutdown.clone();
        tasks.push(tokio::spawn(
            async move { sim.run(shutdown).await }.instrument(span),
        ));
    }
    drop(shutdown);

    // Handle shutdown signals
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Shutdown signal received, stopping simulation...");
        handle.shutdown();
    });

    // A failed task only takes its own sensor down.
    for task in tasks {
        if let Err(e) = task.await {
            error!("Simulator task failed: {}", e);
        }
    }

    Ok(())
}
