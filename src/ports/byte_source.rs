//! Byte source port - abstraction over the raw serial stream
//!
//! The line channel pulls bytes one at a time through this trait, so it can
//! run against a real serial port, a replayed capture, or a test script.

use std::io;

/// Port for reading single bytes with a per-byte timeout
///
/// # Example Implementation
///
/// ```ignore
/// struct UartSource {
///     port: Box<dyn serialport::SerialPort>,
/// }
///
/// impl ByteSource for UartSource {
///     fn read_byte(&mut self) -> io::Result<Option<u8>> {
///         let mut buf = [0u8; 1];
///         match self.port.read(&mut buf) {
///             Ok(0) => Ok(None),
///             Ok(_) => Ok(Some(buf[0])),
///             Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
///             Err(e) => Err(e),
///         }
///     }
/// }
/// ```
pub trait ByteSource {
    /// Read one byte
    ///
    /// Returns `Ok(None)` when the per-byte timeout elapsed or the read
    /// returned no data. That is not an error; callers retry.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Whether the source is currently open
    fn is_open(&self) -> bool {
        true
    }

    /// Release the underlying resource
    ///
    /// Returns `true` if something was released. Closing an already closed
    /// source is a no-op that returns `false`.
    fn close(&mut self) -> bool {
        false
    }
}

impl<B: ByteSource + ?Sized> ByteSource for &mut B {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) -> bool {
        (**self).close()
    }
}

impl<B: ByteSource + ?Sized> ByteSource for Box<B> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) -> bool {
        (**self).close()
    }
}
