// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulator configuration.

use crate::error::ConfigError;
use crate::loss::DEFAULT_DROP_PROBABILITY;
use crate::scheduler::{DEFAULT_BASE_INTERVAL_SECS, DEFAULT_JITTER_SECS};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Static configuration for one simulated sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Ingestion endpoint receiving the POSTed readings.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sensor name written into every payload.
    #[serde(default = "default_sensor_name")]
    pub sensor_name: String,

    /// Sensor location written into every payload.
    #[serde(default = "default_location")]
    pub location: String,

    /// Mean wait between cycles (seconds)
    #[serde(default = "default_base_interval")]
    pub base_interval_secs: u64,

    /// Maximum deviation from the base interval (seconds)
    #[serde(default = "default_jitter")]
    pub jitter_secs: u64,

    /// Probability in [0, 1] that a cycle skips transmission.
    #[serde(default = "default_drop_probability")]
    pub drop_probability: f64,

    /// TCP connect timeout for delivery (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overall request timeout for delivery (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8080/api/sensors".to_string()
}

fn default_sensor_name() -> String {
    "Sensor-Simulator-Rust".to_string()
}

fn default_location() -> String {
    "Test-Lab".to_string()
}

fn default_base_interval() -> u64 {
    DEFAULT_BASE_INTERVAL_SECS
}

fn default_jitter() -> u64 {
    DEFAULT_JITTER_SECS
}

fn default_drop_probability() -> f64 {
    DEFAULT_DROP_PROBABILITY
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

/// Values given on the command line; each one set replaces the loaded value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
    pub base_interval_secs: Option<u64>,
    pub jitter_secs: Option<u64>,
    pub drop_probability: Option<f64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            sensor_name: default_sensor_name(),
            location: default_location(),
            base_interval_secs: default_base_interval(),
            jitter_secs: default_jitter(),
            drop_probability: default_drop_probability(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layer command-line values over this configuration.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(name) = overrides.sensor_name {
            self.sensor_name = name;
        }
        if let Some(location) = overrides.location {
            self.location = location;
        }
        if let Some(base) = overrides.base_interval_secs {
            self.base_interval_secs = base;
        }
        if let Some(jitter) = overrides.jitter_secs {
            self.jitter_secs = jitter;
        }
        if let Some(p) = overrides.drop_probability {
            self.drop_probability = p;
        }
    }

    /// Parsed endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidValue(format!("endpoint '{}': {}", self.endpoint, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidValue(format!(
                "endpoint scheme must be http or https, got '{}'",
                other
            ))),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        if self.sensor_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("sensor_name cannot be empty".into()));
        }
        if self.location.trim().is_empty() {
            return Err(ConfigError::InvalidValue("location cannot be empty".into()));
        }
        if self.base_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "base_interval_secs cannot be 0".into(),
            ));
        }
        if self.jitter_secs > self.base_interval_secs {
            return Err(ConfigError::InvalidValue(format!(
                "jitter_secs ({}) cannot exceed base_interval_secs ({})",
                self.jitter_secs, self.base_interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.drop_probability) {
            return Err(ConfigError::InvalidValue(format!(
                "drop_probability must be within [0, 1], got {}",
                self.drop_probability
            )));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("timeouts cannot be 0".into()));
        }
        Ok(())
    }
}
