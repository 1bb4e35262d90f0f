//! Scripted byte source
//!
//! Implements [`ByteSource`] over an in-memory script of byte chunks,
//! timeouts and I/O failures. Used for replaying captured serial output
//! and as the test double for the line channel.

use std::collections::VecDeque;
use std::io;

use crate::ports::ByteSource;

#[derive(Debug)]
enum Step {
    /// Bytes handed out one per read; an empty chunk is a zero-byte read
    Bytes(VecDeque<u8>),
    /// One read that times out
    Timeout,
    /// One read that fails
    Fail(io::ErrorKind),
}

/// Byte source playing back a fixed script
///
/// Once the script is exhausted every read times out.
#[derive(Debug)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    open: bool,
    polls: usize,
    closes: usize,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    /// Create an empty, open script
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            open: true,
            polls: 0,
            closes: 0,
        }
    }

    /// Create a script that delivers `bytes` contiguously
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new().then_bytes(bytes)
    }

    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.push_bytes(bytes);
        self
    }

    pub fn then_timeouts(mut self, count: usize) -> Self {
        self.steps.extend((0..count).map(|_| Step::Timeout));
        self
    }

    pub fn then_error(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Append bytes to the end of the script
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.steps.push_back(Step::Bytes(bytes.iter().copied().collect()));
    }

    /// Append one protocol line terminated by `\n`
    pub fn push_line(&mut self, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.push_bytes(&bytes);
    }

    /// Number of reads issued so far
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Number of times the source was actually released
    pub fn close_count(&self) -> usize {
        self.closes
    }

    /// Whether every scripted step has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.steps.is_empty()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.open {
            return Err(io::ErrorKind::NotConnected.into());
        }
        self.polls += 1;

        let Some(step) = self.steps.front_mut() else {
            return Ok(None);
        };

        match step {
            Step::Bytes(bytes) => {
                let byte = bytes.pop_front();
                if bytes.is_empty() {
                    self.steps.pop_front();
                }
                Ok(byte)
            }
            Step::Timeout => {
                self.steps.pop_front();
                Ok(None)
            }
            Step::Fail(kind) => {
                let kind = *kind;
                self.steps.pop_front();
                Err(kind.into())
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.closes += 1;
        true
    }
}
