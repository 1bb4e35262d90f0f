//! Adapters - concrete implementations of ports
//!
//! Adapters connect the domain to the outside world by implementing
//! the port traits. Each adapter knows how to work with a specific
//! technology or hardware.
//!
//! # Available Adapters
//!
//! - **serial**: host serial port via the `serialport` crate
//! - **scripted**: in-memory byte script (capture replay, tests)

pub mod scripted;
pub mod serial;

pub use scripted::ScriptedSource;
pub use serial::{board_port_index, describe_port, find_board_port, known_vendor, SerialSource};
