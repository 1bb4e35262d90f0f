//! Temperature and pressure sensors
//!
//! Each sensor owns one [`ReadingHistory`] of its value type. The closed
//! set of kinds is modelled as the [`SensorRecord`] enum, which dispatches
//! the [`SensorPort`] capability set by matching on its variant.

use log::{debug, info};

use super::{Aggregate, ReadingHistory, Report, SensorKind, SensorName};
use crate::channel::LineChannel;
use crate::error::ChannelError;
use crate::ports::{ByteSource, ParseOutcome, SensorPort};
use crate::protocol::{parse_c_float, parse_c_int, ReadingValue};

// ============================================================================
// Temperature
// ============================================================================

/// Sensor reporting `T:` lines, stored as `f32`
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureSensor {
    name: SensorName,
    history: ReadingHistory<f32>,
}

impl TemperatureSensor {
    pub fn new(name: impl Into<SensorName>) -> Self {
        Self {
            name: name.into(),
            history: ReadingHistory::new(),
        }
    }

    pub fn sensor_name(&self) -> &SensorName {
        &self.name
    }

    pub fn history(&self) -> &ReadingHistory<f32> {
        &self.history
    }

    /// Append a reading without going through a channel
    pub fn record(&mut self, celsius: f32) {
        self.history.push(celsius);
    }
}

impl SensorPort for TemperatureSensor {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Temperature
    }

    fn reading_count(&self) -> usize {
        self.history.len()
    }

    fn read_one<B: ByteSource>(
        &mut self,
        channel: &mut LineChannel<B>,
    ) -> Result<ParseOutcome, ChannelError> {
        let line = channel.read_prefixed(SensorKind::Temperature.prefix())?;
        let value = parse_c_float(&line.payload);
        self.history.push(value);
        info!("recorded temperature {} on {}", value, self.name);

        Ok(ParseOutcome {
            value: ReadingValue::Temperature(value),
            discarded: line.discarded,
        })
    }

    /// Drop the lowest reading and average the rest
    fn aggregate_and_report(&mut self) -> Report {
        let Some(&first) = self.history.first() else {
            return Report::new(self.name.clone(), self.kind(), Aggregate::NoReadings);
        };

        let mut minimum = first;
        let mut sum = 0.0f64;
        for &value in &self.history {
            if value < minimum {
                minimum = value;
            }
            sum += f64::from(value);
        }
        let count = self.history.len();

        self.history.remove_first(&minimum);
        let remaining_average = if count > 1 {
            (sum - f64::from(minimum)) / (count - 1) as f64
        } else {
            0.0
        };
        debug!(
            "{}: removed minimum {}, {} readings left",
            self.name,
            minimum,
            self.history.len()
        );

        Report::new(
            self.name.clone(),
            self.kind(),
            Aggregate::MinimumRemoved {
                minimum,
                remaining_average,
                remaining: self.history.len(),
            },
        )
    }
}

// ============================================================================
// Pressure
// ============================================================================

/// Sensor reporting `P:` lines, stored as `i32`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PressureSensor {
    name: SensorName,
    history: ReadingHistory<i32>,
}

impl PressureSensor {
    pub fn new(name: impl Into<SensorName>) -> Self {
        Self {
            name: name.into(),
            history: ReadingHistory::new(),
        }
    }

    pub fn sensor_name(&self) -> &SensorName {
        &self.name
    }

    pub fn history(&self) -> &ReadingHistory<i32> {
        &self.history
    }

    /// Append a reading without going through a channel
    pub fn record(&mut self, hpa: i32) {
        self.history.push(hpa);
    }
}

impl SensorPort for PressureSensor {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Pressure
    }

    fn reading_count(&self) -> usize {
        self.history.len()
    }

    fn read_one<B: ByteSource>(
        &mut self,
        channel: &mut LineChannel<B>,
    ) -> Result<ParseOutcome, ChannelError> {
        let line = channel.read_prefixed(SensorKind::Pressure.prefix())?;
        let value = parse_c_int(&line.payload);
        self.history.push(value);
        info!("recorded pressure {} on {}", value, self.name);

        Ok(ParseOutcome {
            value: ReadingValue::Pressure(value),
            discarded: line.discarded,
        })
    }

    /// Mean of every reading; the history is left as is
    fn aggregate_and_report(&mut self) -> Report {
        let count = self.history.len();
        if count == 0 {
            return Report::new(self.name.clone(), self.kind(), Aggregate::NoReadings);
        }

        let sum: i64 = self.history.iter().map(|&v| i64::from(v)).sum();
        let mean = sum as f64 / count as f64;
        debug!("{}: mean {} over {} readings", self.name, mean, count);

        Report::new(self.name.clone(), self.kind(), Aggregate::Mean { mean, count })
    }
}

// ============================================================================
// Tagged union
// ============================================================================

/// A registered sensor of either kind
#[derive(Clone, Debug, PartialEq)]
pub enum SensorRecord {
    Temperature(TemperatureSensor),
    Pressure(PressureSensor),
}

impl SensorRecord {
    /// Create an empty sensor of the given kind
    pub fn new(kind: SensorKind, name: impl Into<SensorName>) -> Self {
        match kind {
            SensorKind::Temperature => SensorRecord::Temperature(TemperatureSensor::new(name)),
            SensorKind::Pressure => SensorRecord::Pressure(PressureSensor::new(name)),
        }
    }

    pub fn sensor_name(&self) -> &SensorName {
        match self {
            SensorRecord::Temperature(s) => s.sensor_name(),
            SensorRecord::Pressure(s) => s.sensor_name(),
        }
    }
}

impl From<TemperatureSensor> for SensorRecord {
    fn from(sensor: TemperatureSensor) -> Self {
        SensorRecord::Temperature(sensor)
    }
}

impl From<PressureSensor> for SensorRecord {
    fn from(sensor: PressureSensor) -> Self {
        SensorRecord::Pressure(sensor)
    }
}

impl SensorPort for SensorRecord {
    fn name(&self) -> &str {
        match self {
            SensorRecord::Temperature(s) => s.name(),
            SensorRecord::Pressure(s) => s.name(),
        }
    }

    fn kind(&self) -> SensorKind {
        match self {
            SensorRecord::Temperature(_) => SensorKind::Temperature,
            SensorRecord::Pressure(_) => SensorKind::Pressure,
        }
    }

    fn reading_count(&self) -> usize {
        match self {
            SensorRecord::Temperature(s) => s.reading_count(),
            SensorRecord::Pressure(s) => s.reading_count(),
        }
    }

    fn read_one<B: ByteSource>(
        &mut self,
        channel: &mut LineChannel<B>,
    ) -> Result<ParseOutcome, ChannelError> {
        match self {
            SensorRecord::Temperature(s) => s.read_one(channel),
            SensorRecord::Pressure(s) => s.read_one(channel),
        }
    }

    fn aggregate_and_report(&mut self) -> Report {
        match self {
            SensorRecord::Temperature(s) => s.aggregate_and_report(),
            SensorRecord::Pressure(s) => s.aggregate_and_report(),
        }
    }
}
