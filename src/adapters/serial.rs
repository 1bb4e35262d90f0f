//! Serial port adapter
//!
//! This adapter implements the ByteSource trait for a host serial port
//! (USB CDC, FTDI, CH340, ...) opened through the `serialport` crate.
//! The link is configured 8N1 without flow control; each read waits at
//! most the configured per-byte timeout.

use std::fmt::Write as _;
use std::io::{self, Read};

use log::{debug, info, warn};
use serialport::{
    DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, SerialPortType, StopBits,
};

use crate::config::SerialSettings;
use crate::error::{MonitorError, MonitorResult};
use crate::ports::ByteSource;

/// USB vendor IDs of boards and USB-serial bridges we auto-detect
const KNOWN_VENDOR_IDS: &[(u16, &str)] = &[
    (0x2341, "Arduino"),
    (0x2a03, "Arduino (.org)"),
    (0x1a86, "QinHeng CH340"),
    (0x0403, "FTDI"),
    (0x10c4, "Silicon Labs CP210x"),
    (0x2e8a, "Raspberry Pi"),
];

/// Name of the vendor if `vid` belongs to a board we recognise
pub fn known_vendor(vid: u16) -> Option<&'static str> {
    KNOWN_VENDOR_IDS
        .iter()
        .find(|(known, _)| *known == vid)
        .map(|(_, name)| *name)
}

/// Index of the first USB port from a known vendor
pub fn board_port_index(ports: &[SerialPortInfo]) -> Option<usize> {
    ports.iter().position(|port| match &port.port_type {
        SerialPortType::UsbPort(info) => known_vendor(info.vid).is_some(),
        _ => false,
    })
}

/// First USB serial port that looks like a microcontroller board
pub fn find_board_port() -> Option<String> {
    let mut ports = serialport::available_ports().ok()?;
    let index = board_port_index(&ports)?;
    let port = ports.swap_remove(index);
    debug!("detected board on {}", port.port_name);
    Some(port.port_name)
}

/// One-line summary of a port for listings
pub fn describe_port(port: &SerialPortInfo) -> String {
    let mut line = port.port_name.clone();
    match &port.port_type {
        SerialPortType::UsbPort(info) => {
            let _ = write!(line, "  usb {:04x}:{:04x}", info.vid, info.pid);
            if let Some(vendor) = known_vendor(info.vid) {
                let _ = write!(line, "  {}", vendor);
            }
            if let Some(product) = &info.product {
                let _ = write!(line, "  \"{}\"", product);
            }
            if let Some(serial) = &info.serial_number {
                let _ = write!(line, "  s/n {}", serial);
            }
        }
        SerialPortType::BluetoothPort => line.push_str("  bluetooth"),
        SerialPortType::PciPort => line.push_str("  pci"),
        SerialPortType::Unknown => line.push_str("  unknown"),
    }
    line
}

/// Serial port byte source
///
/// Starts closed; [`open`](Self::open) acquires the port and
/// [`close`](ByteSource::close) or drop releases it.
pub struct SerialSource {
    settings: SerialSettings,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialSource {
    /// Create an unopened source
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            settings,
            port: None,
        }
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Open and configure the port
    ///
    /// Opening an already open source is a no-op.
    pub fn open(&mut self) -> MonitorResult<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let settings = &self.settings;
        let mut port = serialport::new(&settings.port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.byte_timeout)
            .open()
            .map_err(|source| MonitorError::ChannelOpen {
                port: settings.port.clone(),
                source,
            })?;

        // Some CDC devices wait for DTR; pseudo terminals reject it
        if let Err(e) = port.write_data_terminal_ready(true) {
            warn!("could not set DTR on {}: {}", settings.port, e);
        }

        info!(
            "opened {} at {} baud (byte timeout {:?})",
            settings.port, settings.baud_rate, settings.byte_timeout
        );
        self.port = Some(port);
        Ok(())
    }
}

impl ByteSource for SerialSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;

        let mut buf = [0u8; 1];
        match port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> bool {
        match self.port.take() {
            Some(_) => {
                debug!("closed {}", self.settings.port);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn test_known_vendor_lookup() {
        assert_eq!(known_vendor(0x2341), Some("Arduino"));
        assert_eq!(known_vendor(0x1a86), Some("QinHeng CH340"));
        assert_eq!(known_vendor(0xdead), None);
    }

    fn usb_port(name: &str, vid: u16, product: Option<&str>) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid,
                pid: 0x0043,
                serial_number: None,
                manufacturer: None,
                product: product.map(str::to_string),
            }),
        }
    }

    #[test]
    fn test_board_port_index_skips_unknown_vendors() {
        let ports = vec![
            SerialPortInfo {
                port_name: "/dev/ttyS0".to_string(),
                port_type: SerialPortType::Unknown,
            },
            usb_port("/dev/ttyUSB0", 0xdead, None),
            usb_port("/dev/ttyACM0", 0x2341, Some("Uno")),
            usb_port("/dev/ttyACM1", 0x2341, None),
        ];
        assert_eq!(board_port_index(&ports), Some(2));
        assert_eq!(board_port_index(&ports[..2]), None);
        assert_eq!(board_port_index(&[]), None);
    }

    #[test]
    fn test_describe_port() {
        assert_eq!(
            describe_port(&usb_port("/dev/ttyACM0", 0x2341, Some("Uno"))),
            "/dev/ttyACM0  usb 2341:0043  Arduino  \"Uno\""
        );
        assert_eq!(
            describe_port(&usb_port("/dev/ttyUSB3", 0xdead, None)),
            "/dev/ttyUSB3  usb dead:0043"
        );
        let bluetooth = SerialPortInfo {
            port_name: "/dev/rfcomm0".to_string(),
            port_type: SerialPortType::BluetoothPort,
        };
        assert_eq!(describe_port(&bluetooth), "/dev/rfcomm0  bluetooth");
    }

    #[test]
    fn test_unopened_source_is_closed() {
        let mut source = SerialSource::new(SerialSettings::new("/dev/ttyUSB0"));
        assert!(!source.is_open());
        assert!(!source.close());
        let err = source.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        // Dropping a never-opened source is fine
        drop(source);
    }

    #[test]
    fn test_open_missing_device_fails() {
        let mut source = SerialSource::new(SerialSettings::new("/nonexistent/sensormon-tty"));
        match source.open() {
            Err(MonitorError::ChannelOpen { port, .. }) => {
                assert_eq!(port, "/nonexistent/sensormon-tty");
            }
            other => panic!("expected ChannelOpen, got {:?}", other),
        }
        assert!(!source.is_open());
    }
}
