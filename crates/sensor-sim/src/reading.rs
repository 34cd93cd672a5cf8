// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Partial readings and the composer that fabricates them.
//!
//! A reading always carries the sensor name and location, plus between one
//! and three of the environmental fields. Which fields are present is drawn
//! fresh for every reading:
//!
//! ```text
//! field_count = uniform{1,2,3}
//!   1 -> pick one field, generate it
//!   2 -> pick one field to exclude, generate the other two
//!   3 -> generate all
//! ```

use rand::Rng;
use std::fmt;
use std::ops::Range;

/// One of the three environmental fields a sensor can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Humidity,
    Pressure,
}

impl Field {
    /// All fields, in wire and display order.
    pub const ALL: [Field; 3] = [Field::Temperature, Field::Humidity, Field::Pressure];

    /// Half-open range generated values are drawn from.
    pub fn range(self) -> Range<f64> {
        match self {
            Field::Temperature => 15.0..30.0,
            Field::Humidity => 30.0..80.0,
            Field::Pressure => 980.0..1040.0,
        }
    }

    /// JSON key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Pressure => "pressure",
        }
    }

    /// Label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Field::Temperature => "Temperature",
            Field::Humidity => "Humidity",
            Field::Pressure => "Pressure",
        }
    }

    /// Unit suffix used in log lines.
    pub fn unit(self) -> &'static str {
        match self {
            Field::Temperature => "°C",
            Field::Humidity => "%",
            Field::Pressure => " hPa",
        }
    }
}

/// Draw a single value uniformly from the field's range.
pub fn generate_field<R: Rng>(field: Field, rng: &mut R) -> f64 {
    rng.gen_range(field.range())
}

/// A reading with one to three of its environmental fields populated.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialReading {
    name: String,
    location: String,
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

impl PartialReading {
    /// Create a reading with no environmental fields set.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            temperature: None,
            humidity: None,
            pressure: None,
        }
    }

    /// Set a field, consuming the reading.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        *self.slot(field) = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    pub fn pressure(&self) -> Option<f64> {
        self.pressure
    }

    /// Value of `field`, if present.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::Pressure => self.pressure,
        }
    }

    /// Present fields with their values, in wire order.
    pub fn present(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    /// Number of present environmental fields.
    pub fn field_count(&self) -> usize {
        self.present().count()
    }

    fn slot(&mut self, field: Field) -> &mut Option<f64> {
        match field {
            Field::Temperature => &mut self.temperature,
            Field::Humidity => &mut self.humidity,
            Field::Pressure => &mut self.pressure,
        }
    }
}

/// Human-readable form for logs, rounded to two decimals.
///
/// `Temperature=22.30°C, Pressure=1012.48 hPa`
impl fmt::Display for PartialReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.present().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={:.2}{}", field.label(), value, field.unit())?;
        }
        Ok(())
    }
}

/// A freshly composed reading together with the field count drawn for it.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Number of fields chosen for this reading (1..=3).
    pub field_count: u8,
    pub reading: PartialReading,
}

/// Builds partial readings for one simulated sensor.
#[derive(Debug, Clone)]
pub struct ReadingComposer {
    name: String,
    location: String,
}

impl ReadingComposer {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Compose a new reading with a random subset of fields.
    pub fn compose<R: Rng>(&self, rng: &mut R) -> Composition {
        let field_count: u8 = rng.gen_range(1..=3);
        let mut reading = PartialReading::new(self.name.as_str(), self.location.as_str());

        match field_count {
            1 => {
                let field = Field::ALL[rng.gen_range(0..Field::ALL.len())];
                reading = reading.with(field, generate_field(field, rng));
            }
            2 => {
                let excluded = Field::ALL[rng.gen_range(0..Field::ALL.len())];
                for field in Field::ALL {
                    if field != excluded {
                        reading = reading.with(field, generate_field(field, rng));
                    }
                }
            }
            _ => {
                for field in Field::ALL {
                    reading = reading.with(field, generate_field(field, rng));
                }
            }
        }

        Composition {
            field_count,
            reading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    const SAMPLES: usize = 10_000;

    #[test]
    fn test_field_count_matches_present_fields() {
        let composer = ReadingComposer::new("S1", "Lab");
        let mut rng = StdRng::seed_from_u64(7);
        let mut by_count: HashMap<u8, usize> = HashMap::new();

        for _ in 0..SAMPLES {
            let c = composer.compose(&mut rng);
            assert!((1..=3).contains(&c.field_count));
            assert_eq!(c.reading.field_count(), c.field_count as usize);
            *by_count.entry(c.field_count).or_default() += 1;
        }

        // Each count should land near a third of the samples.
        for count in 1..=3u8 {
            let seen = by_count.get(&count).copied().unwrap_or(0);
            assert!(seen > SAMPLES / 4, "count {} seen {} times", count, seen);
        }
    }

    #[test]
    fn test_generated_values_within_ranges() {
        let composer = ReadingComposer::new("S1", "Lab");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..SAMPLES {
            let reading = composer.compose(&mut rng).reading;
            if let Some(t) = reading.temperature() {
                assert!((15.0..30.0).contains(&t), "temperature {}", t);
            }
            if let Some(h) = reading.humidity() {
                assert!((30.0..80.0).contains(&h), "humidity {}", h);
            }
            if let Some(p) = reading.pressure() {
                assert!((980.0..1040.0).contains(&p), "pressure {}", p);
            }
        }
    }

    #[test]
    fn test_every_single_field_and_exclusion_occurs() {
        let composer = ReadingComposer::new("S1", "Lab");
        let mut rng = StdRng::seed_from_u64(3);
        let mut singles = [0usize; 3];
        let mut excluded = [0usize; 3];

        for _ in 0..SAMPLES {
            let c = composer.compose(&mut rng);
            for (i, field) in Field::ALL.into_iter().enumerate() {
                let present = c.reading.get(field).is_some();
                match c.field_count {
                    1 if present => singles[i] += 1,
                    2 if !present => excluded[i] += 1,
                    _ => {}
                }
            }
        }

        assert!(singles.iter().all(|&n| n > 0), "singles: {:?}", singles);
        assert!(excluded.iter().all(|&n| n > 0), "excluded: {:?}", excluded);
    }

    #[test]
    fn test_composer_keeps_identity() {
        let composer = ReadingComposer::new("Sensor-A", "Greenhouse");
        let mut rng = StdRng::seed_from_u64(1);
        let reading = composer.compose(&mut rng).reading;
        assert_eq!(reading.name(), "Sensor-A");
        assert_eq!(reading.location(), "Greenhouse");
    }

    #[test]
    fn test_display_rounds_and_orders_fields() {
        let reading = PartialReading::new("S1", "Lab")
            .with(Field::Pressure, 1012.456)
            .with(Field::Temperature, 22.3);
        assert_eq!(
            reading.to_string(),
            "Temperature=22.30°C, Pressure=1012.46 hPa"
        );

        let humid = PartialReading::new("S1", "Lab").with(Field::Humidity, 45.0);
        assert_eq!(humid.to_string(), "Humidity=45.00%");
    }
}
