//! Runtime configuration
//!
//! Defaults match the Arduino sketch this monitor talks to: 9600 baud,
//! a 0.5 second per-byte timeout and line buffers of 100 bytes.

use std::time::Duration;

/// Port used when nothing is given and auto-detection finds nothing
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default line buffer size (one byte is reserved, so lines hold 99 bytes)
pub const DEFAULT_MAX_LINE_LEN: usize = 100;

/// Retry ceilings for blocking reads
///
/// `None` means unbounded. With every field `None` a read blocks until the
/// expected line shows up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadLimits {
    /// Consecutive empty polls that end one line read; polls that return
    /// a byte reset the count
    pub max_idle_polls: Option<u32>,
    /// Non-matching lines allowed while waiting for a prefix
    pub max_discarded_lines: Option<u32>,
    /// Wall-clock ceiling for one read
    pub deadline: Option<Duration>,
}

impl ReadLimits {
    /// No ceilings at all
    pub const UNBOUNDED: Self = Self {
        max_idle_polls: None,
        max_discarded_lines: None,
        deadline: None,
    };

    pub const fn with_max_idle_polls(mut self, polls: u32) -> Self {
        self.max_idle_polls = Some(polls);
        self
    }

    pub const fn with_max_discarded_lines(mut self, lines: u32) -> Self {
        self.max_discarded_lines = Some(lines);
        self
    }

    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Serial link parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialSettings {
    /// Device path (e.g. `/dev/ttyACM0`, `COM3`)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Timeout for a single one-byte read
    pub byte_timeout: Duration,
}

impl SerialSettings {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            byte_timeout: Duration::from_millis(500),
        }
    }
}

/// Configuration for a monitor session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Explicit port, `None` to auto-detect
    pub port: Option<String>,
    /// Baud rate
    pub baud_rate: u32,
    /// Timeout for a single one-byte read
    pub byte_timeout: Duration,
    /// Pause after opening the port (the board resets when DTR toggles)
    pub settle_delay: Duration,
    /// Line buffer size; lines hold at most `max_line_len - 1` bytes
    pub max_line_len: usize,
    /// Ceilings for blocking reads
    pub limits: ReadLimits,
    /// Print reports as JSON lines
    pub json_reports: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl MonitorConfig {
    /// Config for a live board: block until data arrives
    pub const fn interactive() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            byte_timeout: Duration::from_millis(500),
            settle_delay: Duration::from_secs(2),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            limits: ReadLimits::UNBOUNDED,
            json_reports: false,
        }
    }

    /// Config for replaying a capture: stop as soon as the capture runs dry
    pub const fn replay() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            byte_timeout: Duration::ZERO,
            settle_delay: Duration::ZERO,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            limits: ReadLimits::UNBOUNDED.with_max_idle_polls(1),
            json_reports: false,
        }
    }

    /// Serial settings for the given resolved port
    pub fn serial_settings(&self, port: impl Into<String>) -> SerialSettings {
        SerialSettings {
            port: port.into(),
            baud_rate: self.baud_rate,
            byte_timeout: self.byte_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_interactive() {
        let config = MonitorConfig::default();
        assert_eq!(config, MonitorConfig::interactive());
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.max_line_len, 100);
        assert_eq!(config.limits, ReadLimits::UNBOUNDED);
    }

    #[test]
    fn test_replay_stops_when_idle() {
        let config = MonitorConfig::replay();
        assert_eq!(config.limits.max_idle_polls, Some(1));
        assert_eq!(config.settle_delay, Duration::ZERO);
    }

    #[test]
    fn test_serial_settings_carry_link_parameters() {
        let mut config = MonitorConfig::interactive();
        config.baud_rate = 115_200;
        let settings = config.serial_settings("/dev/ttyACM0");
        assert_eq!(settings.port, "/dev/ttyACM0");
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.byte_timeout, Duration::from_millis(500));
    }
}
