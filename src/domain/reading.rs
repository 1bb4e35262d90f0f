//! Sensor identity
//!
//! This module defines the two sensor kinds and the bounded sensor name.
//! It has no knowledge of how readings are transported.

use core::fmt;

use serde::Serialize;

use crate::protocol::{PRESSURE_PREFIX, TEMPERATURE_PREFIX};

/// Maximum length of a sensor name in bytes
pub const MAX_NAME_LEN: usize = 49;

/// The two kinds of sensor the board reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Float readings, `T:` lines
    Temperature,
    /// Integer readings, `P:` lines
    Pressure,
}

impl SensorKind {
    /// Two-byte line prefix for this kind
    pub const fn prefix(self) -> &'static [u8; 2] {
        match self {
            SensorKind::Temperature => TEMPERATURE_PREFIX,
            SensorKind::Pressure => PRESSURE_PREFIX,
        }
    }

    /// Short tag used in sensor descriptions
    pub const fn tag(self) -> &'static str {
        match self {
            SensorKind::Temperature => "TEMP",
            SensorKind::Pressure => "PRESSURE",
        }
    }

    /// Lowercase name used in reports
    pub const fn as_str(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Pressure => "pressure",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor identifier (e.g. `T-001`, `P-105`)
///
/// Stored inline with a fixed capacity of [`MAX_NAME_LEN`] bytes. Longer
/// input is truncated at the last character that fits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SensorName(heapless::String<MAX_NAME_LEN>);

impl SensorName {
    /// Create a name, truncating to [`MAX_NAME_LEN`] bytes
    pub fn new(name: &str) -> Self {
        let mut inner = heapless::String::new();
        for c in name.chars() {
            if inner.push(c).is_err() {
                break;
            }
        }
        Self(inner)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SensorName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for SensorName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
