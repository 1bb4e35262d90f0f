//! Serial Sensor Monitor CLI
//!
//! This binary runs on your PC, talks to a board streaming `T:<float>` and
//! `P:<integer>` lines over a serial link, and provides a numbered menu to
//! register sensors, record readings and process them.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo run --bin sensormon -- --list-ports
//!
//! # Connect to the board (auto-detects Arduino and common USB-serial bridges)
//! cargo run --bin sensormon
//!
//! # Connect to a specific port
//! cargo run --bin sensormon -- --port /dev/ttyACM0
//!
//! # Replay a capture instead of reading a live port
//! cargo run --bin sensormon -- --replay capture.txt
//! ```
//!
//! ## Menu
//!
//! - `1` - Create a temperature sensor
//! - `2` - Create a pressure sensor
//! - `3` - Record one reading for a sensor (blocks on the board)
//! - `4` - Process all sensors
//! - `5` - Exit

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use sensormon::adapters::{
    board_port_index, describe_port, find_board_port, ScriptedSource, SerialSource,
};
use sensormon::config::DEFAULT_PORT;
use sensormon::{ByteSource, Console, LineChannel, MonitorConfig, MonitorResult};

#[derive(Debug, Parser)]
#[command(name = "sensormon", version, about = "Serial temperature and pressure monitor")]
struct Args {
    /// Serial port path (auto-detected when omitted)
    #[arg(long, env = "SENSORMON_PORT")]
    port: Option<String>,

    /// Baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Read board output from a capture file instead of a port
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Timeout for a single one-byte read
    #[arg(long, value_name = "MS")]
    byte_timeout_ms: Option<u64>,

    /// Give up a read after this many consecutive empty polls
    #[arg(long, value_name = "N")]
    max_idle_polls: Option<u32>,

    /// Give up a read after discarding this many unrelated lines
    #[arg(long, value_name = "N")]
    max_discarded: Option<u32>,

    /// Wall-clock ceiling for one reading
    #[arg(long, value_name = "SECS")]
    read_timeout_secs: Option<u64>,

    /// Pause after opening the port
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Print processing reports as JSON lines
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_config(&self) -> MonitorConfig {
        let mut config = if self.replay.is_some() {
            MonitorConfig::replay()
        } else {
            MonitorConfig::interactive()
        };

        config.port = self.port.clone();
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(ms) = self.byte_timeout_ms {
            config.byte_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_ms {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(polls) = self.max_idle_polls {
            config.limits = config.limits.with_max_idle_polls(polls);
        }
        if let Some(lines) = self.max_discarded {
            config.limits = config.limits.with_max_discarded_lines(lines);
        }
        if let Some(secs) = self.read_timeout_secs {
            config.limits = config.limits.with_deadline(Duration::from_secs(secs));
        }
        config.json_reports = self.json;
        config
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("sensormon=info"))
        .init();

    let args = Args::parse();

    if args.list_ports {
        list_ports();
        return Ok(ExitCode::SUCCESS);
    }

    let config = args.to_config();

    if let Some(path) = &args.replay {
        let capture = fs::read(path)?;
        info!("replaying {} bytes from {}", capture.len(), path.display());
        let channel = LineChannel::new(ScriptedSource::from_bytes(&capture));
        run_session(channel, &config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let port_name = config
        .port
        .clone()
        .or_else(find_board_port)
        .unwrap_or_else(|| DEFAULT_PORT.to_string());

    // On Windows, COM ports >= 10 need the \\.\COMxx format
    #[cfg(target_os = "windows")]
    let port_name = if port_name.starts_with("COM") && !port_name.starts_with(r"\\") {
        format!(r"\\.\{}", port_name)
    } else {
        port_name
    };

    println!("Connecting to {}...", port_name);
    let mut source = SerialSource::new(config.serial_settings(&port_name));
    if let Err(e) = source.open() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        eprintln!("Use --list-ports to see available ports");
        eprintln!("Or specify port with --port <PORT>");
        return Ok(ExitCode::from(1));
    }

    if !config.settle_delay.is_zero() {
        println!("Waiting for the board to reset...");
        std::thread::sleep(config.settle_delay);
    }
    println!("Connected!");

    run_session(LineChannel::new(source), &config)?;
    Ok(ExitCode::SUCCESS)
}

/// Drive the console on stdin/stdout until the user exits, then release
/// the channel and every sensor
fn run_session<B: ByteSource>(channel: LineChannel<B>, config: &MonitorConfig) -> MonitorResult<()> {
    let channel = channel
        .with_limits(config.limits)
        .with_max_line_len(config.max_line_len);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console =
        Console::new(stdin.lock(), stdout.lock(), channel).with_json_reports(config.json_reports);
    console.run()?;

    let (registry, mut channel) = console.into_parts();
    channel.close();
    info!("released {} sensors", registry.len());
    Ok(())
}

/// Print every serial port, marking the one auto-detection would pick
fn list_ports() {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            eprintln!("Error listing ports: {}", e);
            return;
        }
    };

    if ports.is_empty() {
        println!("No serial ports found (default would be {}).", DEFAULT_PORT);
        return;
    }

    let detected = board_port_index(&ports);
    println!("Serial ports:");
    for (index, port) in ports.iter().enumerate() {
        let marker = if detected == Some(index) { '*' } else { ' ' };
        println!(" {} {}", marker, describe_port(port));
    }

    match detected {
        Some(_) => println!("(* = used when --port is not given)"),
        None => println!("No known board detected; default is {}.", DEFAULT_PORT),
    }
}
