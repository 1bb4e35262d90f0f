//! Sensor registry
//!
//! Owns every sensor in the session. Dropping the registry drops each
//! sensor exactly once, and each sensor drops its own history.

use core::slice;

use log::{debug, info};

use super::{Report, SensorRecord};
use crate::ports::SensorPort;

/// Ordered, owning collection of sensors
///
/// Names are not required to be unique; lookups return the first match.
#[derive(Debug)]
pub struct SensorRegistry<S = SensorRecord> {
    sensors: Vec<S>,
}

impl<S> Default for SensorRegistry<S> {
    fn default() -> Self {
        Self {
            sensors: Vec::new(),
        }
    }
}

impl<S: SensorPort> SensorRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a sensor
    pub fn add(&mut self, sensor: S) {
        info!("registered {}", sensor.describe());
        self.sensors.push(sensor);
    }

    /// First sensor called `name`
    pub fn find(&self, name: &str) -> Option<&S> {
        self.sensors.iter().find(|s| s.name() == name)
    }

    /// First sensor called `name`, mutably
    pub fn find_mut(&mut self, name: &str) -> Option<&mut S> {
        self.sensors.iter_mut().find(|s| s.name() == name)
    }

    /// Aggregate every sensor in registration order
    pub fn process_all(&mut self) -> Vec<Report> {
        self.sensors
            .iter_mut()
            .map(|sensor| {
                debug!("processing {}", sensor.describe());
                sensor.aggregate_and_report()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, S> {
        self.sensors.iter()
    }
}
