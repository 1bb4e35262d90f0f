//! Domain layer - pure business logic independent of infrastructure
//!
//! This module contains the core domain entities and services that
//! represent the business logic of the sensor monitor.

pub mod history;
pub mod reading;
pub mod registry;
pub mod report;
pub mod sensor;

pub use history::ReadingHistory;
pub use reading::{SensorKind, SensorName, MAX_NAME_LEN};
pub use registry::SensorRegistry;
pub use report::{Aggregate, Report};
pub use sensor::{PressureSensor, SensorRecord, TemperatureSensor};
