// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the simulator.

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`SimulatorConfig`](crate::SimulatorConfig).
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its accepted range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors raised by the simulator library.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration rejected before the loop could start.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// A reading could not be serialized to the wire format.
    #[error("payload encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A payload could not be parsed back into a reading.
    #[error("payload decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
