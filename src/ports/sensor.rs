//! Sensor port - the capability set every sensor kind implements
//!
//! The registry and the console talk to sensors only through this trait,
//! so they work the same for temperature and pressure sensors (and for
//! instrumented sensors in tests).

use crate::channel::LineChannel;
use crate::domain::{Report, SensorKind};
use crate::error::ChannelError;
use crate::ports::ByteSource;
use crate::protocol::ReadingValue;

/// Result of a successful [`SensorPort::read_one`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParseOutcome {
    /// Value appended to the history
    pub value: ReadingValue,
    /// Lines thrown away before the matching one
    pub discarded: u32,
}

/// Port implemented by every sensor kind
///
/// # Example Implementation
///
/// ```ignore
/// impl SensorPort for HumiditySensor {
///     fn name(&self) -> &str { self.name.as_str() }
///     fn kind(&self) -> SensorKind { SensorKind::Humidity }
///     fn reading_count(&self) -> usize { self.history.len() }
///
///     fn read_one<B: ByteSource>(
///         &mut self,
///         channel: &mut LineChannel<B>,
///     ) -> Result<ParseOutcome, ChannelError> {
///         let line = channel.read_prefixed(b"H:")?;
///         let value = parse_c_float(&line.payload);
///         self.history.push(value);
///         Ok(ParseOutcome { value: ReadingValue::Humidity(value), discarded: line.discarded })
///     }
///
///     fn aggregate_and_report(&mut self) -> Report { /* ... */ }
/// }
/// ```
pub trait SensorPort {
    /// Sensor identifier, fixed at construction
    fn name(&self) -> &str;

    /// Which kind of sensor this is
    fn kind(&self) -> SensorKind;

    /// Number of readings currently stored
    fn reading_count(&self) -> usize;

    /// Block until a line with this sensor's prefix arrives, then store it
    ///
    /// Lines with any other content are discarded. Only the channel's
    /// configured ceilings (or a failing source) end the wait early.
    fn read_one<B: ByteSource>(
        &mut self,
        channel: &mut LineChannel<B>,
    ) -> Result<ParseOutcome, ChannelError>;

    /// Run this kind's aggregation over the stored readings
    fn aggregate_and_report(&mut self) -> Report;

    /// One-line label, e.g. `Sensor [TEMP] T-001`
    fn describe(&self) -> String {
        format!("Sensor [{}] {}", self.kind().tag(), self.name())
    }
}
