//! Serial Sensor Monitor Library
//!
//! This library provides a hexagonal architecture for a host-side monitor
//! that records temperature and pressure readings streamed by a board over
//! a serial link.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - ReadingHistory: ordered readings of one sensor               │
//! │  - TemperatureSensor / PressureSensor                           │
//! │  - SensorRegistry: owns every sensor of the session             │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - SensorPort: read, aggregate and describe a sensor            │
//! │  - ByteSource: one byte at a time with timeouts                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - SerialSource: serial port via the serialport crate           │
//! │  - ScriptedSource: in-memory bytes for replay and tests         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`channel::LineChannel`] sits between the ports and the domain and
//! turns bytes into newline-terminated lines. The [`console::Console`]
//! drives everything from a numbered text menu.

// ============================================================================
// Protocol (shared with the board firmware)
// ============================================================================

pub mod protocol;

pub use protocol::{ReadingValue, PRESSURE_PREFIX, TEMPERATURE_PREFIX};

// ============================================================================
// Hexagonal Architecture
// ============================================================================

/// Domain layer - pure business logic
pub mod domain;

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

pub mod channel;
pub mod config;
pub mod console;
pub mod error;

// Re-export key domain types
pub use domain::{
    Aggregate, PressureSensor, ReadingHistory, Report, SensorKind, SensorName, SensorRecord,
    SensorRegistry, TemperatureSensor,
};

// Re-export key port traits
pub use ports::{ByteSource, ParseOutcome, SensorPort};

// Re-export adapters
pub use adapters::{ScriptedSource, SerialSource};

pub use channel::LineChannel;
pub use config::{MonitorConfig, ReadLimits, SerialSettings};
pub use console::{Console, MenuChoice};
pub use error::{ChannelError, MonitorError, MonitorResult};
