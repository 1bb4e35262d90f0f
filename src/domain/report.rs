//! Aggregation reports

use core::fmt;

use serde::Serialize;

use super::{SensorKind, SensorName};

/// Outcome of one sensor's aggregation
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Aggregate {
    /// The history was empty, nothing was processed
    NoReadings,
    /// Temperature: the lowest reading was dropped from the history
    MinimumRemoved {
        /// The reading that was removed
        minimum: f32,
        /// Mean of the readings left, `0` if none are left
        remaining_average: f64,
        /// Readings left in the history
        remaining: usize,
    },
    /// Pressure: mean of all readings, history untouched
    Mean { mean: f64, count: usize },
}

/// Aggregation result for one sensor
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub sensor: SensorName,
    pub kind: SensorKind,
    #[serde(flatten)]
    pub aggregate: Aggregate,
}

impl Report {
    pub fn new(sensor: SensorName, kind: SensorKind, aggregate: Aggregate) -> Self {
        Self {
            sensor,
            kind,
            aggregate,
        }
    }

    /// Whether the sensor had nothing to process
    pub fn is_empty(&self) -> bool {
        self.aggregate == Aggregate::NoReadings
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}): ", self.sensor, self.kind)?;
        match &self.aggregate {
            Aggregate::NoReadings => write!(f, "no readings to process."),
            Aggregate::MinimumRemoved {
                minimum,
                remaining_average,
                ..
            } => write!(
                f,
                "lowest reading ({}) removed. Remaining average: {}.",
                minimum, remaining_average
            ),
            Aggregate::Mean { mean, count } => {
                write!(f, "average of {} readings: {}.", count, mean)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lines() {
        let empty = Report::new("T-001".into(), SensorKind::Temperature, Aggregate::NoReadings);
        assert_eq!(empty.to_string(), "[T-001] (temperature): no readings to process.");
        assert!(empty.is_empty());

        let min = Report::new(
            "T-001".into(),
            SensorKind::Temperature,
            Aggregate::MinimumRemoved {
                minimum: 19.0,
                remaining_average: 22.25,
                remaining: 2,
            },
        );
        assert_eq!(
            min.to_string(),
            "[T-001] (temperature): lowest reading (19) removed. Remaining average: 22.25."
        );

        let mean = Report::new(
            "P-105".into(),
            SensorKind::Pressure,
            Aggregate::Mean {
                mean: 1010.0,
                count: 3,
            },
        );
        assert_eq!(mean.to_string(), "[P-105] (pressure): average of 3 readings: 1010.");
    }

    #[test]
    fn test_json_shape() {
        let report = Report::new(
            "P-105".into(),
            SensorKind::Pressure,
            Aggregate::Mean {
                mean: 1010.0,
                count: 3,
            },
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sensor"], "P-105");
        assert_eq!(json["kind"], "pressure");
        assert_eq!(json["result"], "mean");
        assert_eq!(json["count"], 3);
        assert_eq!(json["mean"], 1010.0);
    }
}
