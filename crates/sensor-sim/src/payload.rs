// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON wire format for partial readings.
//!
//! ```text
//! {"name":"S1","location":"Lab","temperature":22.3}
//! ```
//!
//! `name` and `location` are always written. Environmental fields are
//! written only when present; an absent field is omitted, never `null`.
//! Floats are written in shortest round-trip form, not rounded.

use crate::error::{Result, SimError};
use crate::reading::{Field, PartialReading};
use serde::{Deserialize, Serialize};

/// Content type sent with every payload.
pub const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
struct WireReading<'a> {
    name: &'a str,
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwnedWireReading {
    name: String,
    location: String,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    pressure: Option<f64>,
}

/// Serialize a reading to its JSON payload.
pub fn encode(reading: &PartialReading) -> Result<Vec<u8>> {
    let wire = WireReading {
        name: reading.name(),
        location: reading.location(),
        temperature: reading.temperature(),
        humidity: reading.humidity(),
        pressure: reading.pressure(),
    };
    serde_json::to_vec(&wire).map_err(SimError::Encode)
}

/// Parse a JSON payload back into a reading.
pub fn decode(bytes: &[u8]) -> Result<PartialReading> {
    let wire: OwnedWireReading = serde_json::from_slice(bytes).map_err(SimError::Decode)?;

    let mut reading = PartialReading::new(wire.name, wire.location);
    let values = [wire.temperature, wire.humidity, wire.pressure];
    for (field, value) in Field::ALL.into_iter().zip(values) {
        if let Some(v) = value {
            reading = reading.with(field, v);
        }
    }
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::ReadingComposer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keys(bytes: &[u8]) -> Vec<String> {
        let value: serde_json::Value = serde_json::from_slice(bytes).expect("valid json");
        let mut keys: Vec<String> = value
            .as_object()
            .expect("json object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_single_field_scenario_exact_bytes() {
        let reading = PartialReading::new("S1", "Lab").with(Field::Temperature, 22.3);
        let bytes = encode(&reading).expect("encode");
        assert_eq!(
            std::str::from_utf8(&bytes).expect("utf8"),
            r#"{"name":"S1","location":"Lab","temperature":22.3}"#
        );
    }

    #[test]
    fn test_absent_fields_omitted_not_null() {
        let reading = PartialReading::new("S1", "Lab")
            .with(Field::Humidity, 55.5)
            .with(Field::Pressure, 1001.25);
        let bytes = encode(&reading).expect("encode");

        assert_eq!(keys(&bytes), vec!["humidity", "location", "name", "pressure"]);
        assert!(!String::from_utf8_lossy(&bytes).contains("null"));
    }

    #[test]
    fn test_encoded_keys_match_present_fields() {
        let composer = ReadingComposer::new("S1", "Lab");
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..500 {
            let reading = composer.compose(&mut rng).reading;
            let bytes = encode(&reading).expect("encode");

            let mut expected: Vec<String> = vec!["location".into(), "name".into()];
            expected.extend(reading.present().map(|(f, _)| f.key().to_string()));
            expected.sort();
            assert_eq!(keys(&bytes), expected);
        }
    }

    #[test]
    fn test_decode_restores_values_and_absence() {
        let composer = ReadingComposer::new("Sensor-Simulator-Rust", "Test-Lab");
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..500 {
            let reading = composer.compose(&mut rng).reading;
            let decoded = decode(&encode(&reading).expect("encode")).expect("decode");

            assert_eq!(decoded.name(), reading.name());
            assert_eq!(decoded.location(), reading.location());
            for field in Field::ALL {
                match (reading.get(field), decoded.get(field)) {
                    (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9, "{:?}: {} vs {}", field, a, b),
                    (None, None) => {}
                    other => panic!("presence mismatch for {:?}: {:?}", field, other),
                }
            }
        }
    }

    #[test]
    fn test_full_precision_on_wire() {
        let reading = PartialReading::new("S1", "Lab").with(Field::Pressure, 1012.123456789);
        let text = String::from_utf8(encode(&reading).expect("encode")).expect("utf8");
        assert!(text.contains("1012.123456789"), "{}", text);
    }

    #[test]
    fn test_strings_escaped() {
        let reading = PartialReading::new("S\"1\\", "Lab\nRoom 2").with(Field::Humidity, 40.0);
        let bytes = encode(&reading).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded.name(), "S\"1\\");
        assert_eq!(decoded.location(), "Lab\nRoom 2");
    }

    #[test]
    fn test_decode_rejects_missing_name() {
        let result = decode(br#"{"location":"Lab","temperature":20.0}"#);
        assert!(matches!(result, Err(SimError::Decode(_))));
    }
}
