//! Error types
//!
//! Two layers: [`ChannelError`] for everything below the line framing
//! (byte sources, retry ceilings) and [`MonitorError`] for the application
//! layer (opening the port, looking up sensors, console I/O).

use std::io;

use thiserror::Error;

/// Result alias for application-level operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Error type for byte source and line channel operations
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying source failed with something other than a timeout
    #[error("serial read failed: {0}")]
    Io(#[from] io::Error),

    /// The source was already closed (or never opened)
    #[error("channel is closed")]
    Closed,

    /// Too many consecutive polls returned no byte
    #[error("no data after {polls} consecutive polls")]
    Idle { polls: u32 },

    /// Too many lines without the expected prefix
    #[error("gave up after discarding {discarded} lines")]
    TooManyDiscarded { discarded: u32 },

    /// The read deadline elapsed before a line was complete
    #[error("read deadline exceeded")]
    DeadlineExceeded,
}

impl ChannelError {
    /// Whether the error came from a configured ceiling rather than the source
    pub fn is_ceiling(&self) -> bool {
        matches!(
            self,
            ChannelError::Idle { .. }
                | ChannelError::TooManyDiscarded { .. }
                | ChannelError::DeadlineExceeded
        )
    }
}

/// Error type for the monitor application
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The serial port could not be opened or configured
    #[error("failed to open serial port {port}: {source}")]
    ChannelOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// No sensor with the given name is registered
    #[error("sensor with ID '{0}' not found")]
    SensorNotFound(String),

    /// Reading from the channel failed
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Console input/output failed
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A report could not be serialized
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_classification() {
        assert!(ChannelError::Idle { polls: 3 }.is_ceiling());
        assert!(ChannelError::TooManyDiscarded { discarded: 1 }.is_ceiling());
        assert!(ChannelError::DeadlineExceeded.is_ceiling());
        assert!(!ChannelError::Closed.is_ceiling());
        assert!(!ChannelError::Io(io::Error::from(io::ErrorKind::BrokenPipe)).is_ceiling());
    }

    #[test]
    fn test_not_found_message() {
        let err = MonitorError::SensorNotFound("T-009".into());
        assert_eq!(err.to_string(), "sensor with ID 'T-009' not found");
    }
}
