//! Line framing over a byte source
//!
//! [`LineChannel`] assembles newline-delimited lines from a [`ByteSource`]
//! one byte at a time. A per-byte timeout is not an error: the read is
//! retried until a line is complete or one of the configured
//! [`ReadLimits`] fires.
//!
//! Framing rules:
//!
//! - `\r` and `\n` end a line only once at least one other byte has been
//!   collected, so `\r\n` pairs and blank lines are skipped.
//! - A line stops early after `max_len - 1` bytes.

use std::borrow::Cow;
use std::io;
use std::time::Instant;

use log::{debug, trace, warn};

use crate::config::{ReadLimits, DEFAULT_MAX_LINE_LEN};
use crate::error::ChannelError;
use crate::ports::ByteSource;

/// One received line, terminator excluded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the line
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Line as text, invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Payload of the first line that carried the wanted prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixedLine {
    /// Bytes after the prefix
    pub payload: Vec<u8>,
    /// Lines thrown away before this one
    pub discarded: u32,
}

/// Newline-framed reader over a [`ByteSource`]
pub struct LineChannel<B> {
    source: B,
    limits: ReadLimits,
    max_line_len: usize,
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Errors that mean "nothing yet", same as a timeout
fn is_retryable(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

impl<B: ByteSource> LineChannel<B> {
    /// Create a channel with no retry ceilings
    pub fn new(source: B) -> Self {
        Self {
            source,
            limits: ReadLimits::UNBOUNDED,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }

    pub fn with_limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the line buffer size used by [`read_prefixed`](Self::read_prefixed)
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn source(&self) -> &B {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut B {
        &mut self.source
    }

    pub fn is_open(&self) -> bool {
        self.source.is_open()
    }

    /// Close the underlying source
    ///
    /// Returns `true` the first time, `false` on every later call.
    pub fn close(&mut self) -> bool {
        let released = self.source.close();
        if released {
            debug!("channel closed");
        }
        released
    }

    /// Read one line of at most `max_len - 1` bytes
    pub fn read_line(&mut self, max_len: usize) -> Result<Line, ChannelError> {
        let deadline = self.limits.deadline.map(|d| Instant::now() + d);
        self.read_line_until(max_len, deadline)
    }

    /// Read lines until one starts with `prefix`, discarding the rest
    ///
    /// The line buffer is widened when needed so a line can always hold
    /// `prefix` and at least one payload byte.
    pub fn read_prefixed(&mut self, prefix: &[u8]) -> Result<PrefixedLine, ChannelError> {
        let deadline = self.limits.deadline.map(|d| Instant::now() + d);
        let max_len = self.max_line_len.max(prefix.len() + 2);
        let mut discarded = 0u32;

        loop {
            let line = self.read_line_until(max_len, deadline)?;
            if let Some(payload) = line.as_bytes().strip_prefix(prefix) {
                return Ok(PrefixedLine {
                    payload: payload.to_vec(),
                    discarded,
                });
            }

            trace!("discarding line {:?}", line.text());
            discarded += 1;
            if let Some(max) = self.limits.max_discarded_lines {
                if discarded > max {
                    warn!("no matching line after discarding {}", discarded);
                    return Err(ChannelError::TooManyDiscarded { discarded });
                }
            }
        }
    }

    fn read_line_until(
        &mut self,
        max_len: usize,
        deadline: Option<Instant>,
    ) -> Result<Line, ChannelError> {
        if !self.source.is_open() {
            return Err(ChannelError::Closed);
        }

        let capacity = max_len.saturating_sub(1);
        let mut bytes = Vec::with_capacity(capacity);
        let mut idle_polls = 0u32;

        while bytes.len() < capacity {
            let idle = match self.source.read_byte() {
                Ok(Some(byte)) if is_terminator(byte) => {
                    if !bytes.is_empty() {
                        break;
                    }
                    false
                }
                Ok(Some(byte)) => {
                    bytes.push(byte);
                    false
                }
                Ok(None) => true,
                Err(e) if is_retryable(e.kind()) => true,
                Err(e) => return Err(ChannelError::Io(e)),
            };

            if !idle {
                idle_polls = 0;
            } else {
                idle_polls += 1;
                if let Some(max) = self.limits.max_idle_polls {
                    if idle_polls >= max {
                        warn!("serial line idle for {} polls", idle_polls);
                        return Err(ChannelError::Idle { polls: idle_polls });
                    }
                }
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    warn!("read deadline exceeded");
                    return Err(ChannelError::DeadlineExceeded);
                }
            }
        }

        Ok(Line { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedSource;
    use std::time::Duration;

    #[test]
    fn test_crlf_line_is_framed() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"T:19\r\n"));
        let line = channel.read_line(100).unwrap();
        assert_eq!(line.as_bytes(), b"T:19");
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn test_leading_terminators_are_skipped() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"\r\n\n\rP:1013\n"));
        assert_eq!(channel.read_line(100).unwrap().text(), "P:1013");
    }

    #[test]
    fn test_consecutive_lines() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"a\r\nbb\ncc\r"));
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"a");
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"bb");
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"cc");
    }

    #[test]
    fn test_split_reads_match_contiguous() {
        let mut contiguous = LineChannel::new(ScriptedSource::from_bytes(b"T:23.5\n"));

        let split = ScriptedSource::new()
            .then_bytes(b"T")
            .then_timeouts(3)
            .then_bytes(b":2")
            .then_timeouts(1)
            .then_bytes(b"")
            .then_bytes(b"3.5")
            .then_timeouts(2)
            .then_bytes(b"\n");
        let mut split = LineChannel::new(split);

        assert_eq!(contiguous.read_line(100).unwrap(), split.read_line(100).unwrap());
    }

    #[test]
    fn test_line_stops_at_capacity() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"abcdefgh\n"));
        let line = channel.read_line(5).unwrap();
        assert_eq!(line.as_bytes(), b"abcd");
        // The rest of the line is the next read
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"efgh");
    }

    #[test]
    fn test_tiny_buffer_reads_nothing() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"abc\n"));
        assert!(channel.read_line(1).unwrap().is_empty());
        assert!(channel.read_line(0).unwrap().is_empty());
        assert_eq!(channel.source().polls(), 0);
    }

    #[test]
    fn test_timeouts_retried_without_ceiling() {
        let source = ScriptedSource::new().then_timeouts(50).then_bytes(b"ok\n");
        let mut channel = LineChannel::new(source);
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"ok");
    }

    #[test]
    fn test_retryable_errors_count_as_idle() {
        let source = ScriptedSource::new()
            .then_error(io::ErrorKind::Interrupted)
            .then_error(io::ErrorKind::TimedOut)
            .then_bytes(b"x\n");
        let mut channel = LineChannel::new(source);
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"x");
    }

    #[test]
    fn test_hard_error_propagates() {
        let source = ScriptedSource::new()
            .then_bytes(b"T:")
            .then_error(io::ErrorKind::BrokenPipe);
        let mut channel = LineChannel::new(source);
        match channel.read_line(100) {
            Err(ChannelError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_idle_ceiling() {
        let source = ScriptedSource::new().then_bytes(b"T:1").then_timeouts(10);
        let limits = ReadLimits::UNBOUNDED.with_max_idle_polls(4);
        let mut channel = LineChannel::new(source).with_limits(limits);
        assert!(matches!(
            channel.read_line(100),
            Err(ChannelError::Idle { polls: 4 })
        ));
    }

    #[test]
    fn test_zero_idle_ceiling_still_reads_waiting_data() {
        let limits = ReadLimits::UNBOUNDED.with_max_idle_polls(0);
        let mut channel =
            LineChannel::new(ScriptedSource::from_bytes(b"T:19\n")).with_limits(limits);
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"T:19");

        // Once the data runs out the first empty poll gives up
        assert!(matches!(
            channel.read_line(100),
            Err(ChannelError::Idle { polls: 1 })
        ));
    }

    #[test]
    fn test_idle_counter_resets_on_data() {
        let source = ScriptedSource::new()
            .then_timeouts(2)
            .then_bytes(b"a")
            .then_timeouts(2)
            .then_bytes(b"b\n");
        let limits = ReadLimits::UNBOUNDED.with_max_idle_polls(3);
        let mut channel = LineChannel::new(source).with_limits(limits);
        assert_eq!(channel.read_line(100).unwrap().as_bytes(), b"ab");
    }

    #[test]
    fn test_deadline_ceiling() {
        let limits = ReadLimits::UNBOUNDED.with_deadline(Duration::ZERO);
        let mut channel = LineChannel::new(ScriptedSource::new()).with_limits(limits);
        assert!(matches!(
            channel.read_line(100),
            Err(ChannelError::DeadlineExceeded)
        ));
    }

    #[test]
    fn test_read_prefixed_discards_other_lines() {
        let source = ScriptedSource::from_bytes(b"X:junk\nP:1000\nT:23.5\n");
        let mut channel = LineChannel::new(source);
        let found = channel.read_prefixed(b"T:").unwrap();
        assert_eq!(found.payload, b"23.5");
        assert_eq!(found.discarded, 2);
    }

    #[test]
    fn test_read_prefixed_widens_tiny_buffer() {
        let limits = ReadLimits::UNBOUNDED.with_max_discarded_lines(1000);
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"T:19\n"))
            .with_limits(limits)
            .with_max_line_len(1);
        let found = channel.read_prefixed(b"T:").unwrap();
        assert_eq!(found.payload, b"1");
        assert_eq!(found.discarded, 0);
        assert_eq!(channel.source().polls(), 3);
    }

    #[test]
    fn test_discard_ceiling() {
        let source = ScriptedSource::from_bytes(b"a\nb\nc\nT:1\n");
        let limits = ReadLimits::UNBOUNDED.with_max_discarded_lines(2);
        let mut channel = LineChannel::new(source).with_limits(limits);
        assert!(matches!(
            channel.read_prefixed(b"T:"),
            Err(ChannelError::TooManyDiscarded { discarded: 3 })
        ));
    }

    #[test]
    fn test_close_releases_once() {
        let mut channel = LineChannel::new(ScriptedSource::from_bytes(b"T:1\n"));
        assert!(channel.is_open());
        assert!(channel.close());
        assert!(!channel.close());
        assert_eq!(channel.source().close_count(), 1);
        assert!(matches!(channel.read_line(100), Err(ChannelError::Closed)));
    }
}
