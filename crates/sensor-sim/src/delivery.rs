// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP delivery of encoded payloads.
//!
//! Every payload is sent once as a `POST` to the configured endpoint. The
//! ingestion service is expected to answer `201 Created`; anything else is
//! reported, never retried.

use crate::error::{Result, SimError};
use crate::payload::CONTENT_TYPE;
use crate::SimulatorConfig;
use reqwest::header;
use reqwest::{Client, StatusCode, Url};
use std::error::Error as _;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Endpoint answered 201.
    Success,
    /// Endpoint answered with any other status.
    UnexpectedStatus(u16),
    /// The request never completed (refused, timed out, DNS, I/O).
    TransportError(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Success => write!(f, "success"),
            DeliveryOutcome::UnexpectedStatus(code) => write!(f, "unexpected status {}", code),
            DeliveryOutcome::TransportError(cause) => write!(f, "transport error: {}", cause),
        }
    }
}

/// Destination for encoded payloads.
///
/// [`DeliveryClient`] is the HTTP implementation; tests plug in scripted
/// sinks to drive the simulator loop without a network.
pub trait PayloadSink: Send + Sync {
    /// Send one payload and classify the result.
    fn deliver(&self, payload: Vec<u8>) -> impl Future<Output = DeliveryOutcome> + Send;
}

/// HTTP client posting payloads to the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    endpoint: Url,
    client: Client,
}

impl DeliveryClient {
    /// Build a client with bounded connect and request timeouts.
    pub fn new(endpoint: Url, connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(SimError::Client)?;

        Ok(Self { endpoint, client })
    }

    /// Build a client for the configured endpoint and timeouts.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        Self::new(endpoint, config.connect_timeout(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PayloadSink for DeliveryClient {
    async fn deliver(&self, payload: Vec<u8>) -> DeliveryOutcome {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::CREATED => DeliveryOutcome::Success,
            Ok(resp) => DeliveryOutcome::UnexpectedStatus(resp.status().as_u16()),
            Err(e) => DeliveryOutcome::TransportError(describe_transport_error(&e)),
        }
    }
}

/// Flatten a reqwest error and its sources into one line.
fn describe_transport_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "request"
    };

    let mut msg = format!("{}: {}", kind, err);
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
