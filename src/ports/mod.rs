//! Ports (interfaces) defining the boundaries of the application
//!
//! Ports are traits that define how the domain interacts with external systems.
//! They allow the domain to remain independent of specific implementations.
//!
//! # Hexagonal Architecture
//!
//! In hexagonal architecture, ports define the "holes" in the hexagon where
//! adapters plug in:
//!
//! - **ByteSource**: Where raw serial bytes come from (serial port, replay, mock)
//! - **SensorPort**: What every sensor kind can do (read, aggregate, describe)

pub mod byte_source;
pub mod sensor;

pub use byte_source::ByteSource;
pub use sensor::{ParseOutcome, SensorPort};
