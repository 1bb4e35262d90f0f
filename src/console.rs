//! Interactive console
//!
//! A numbered text menu driving the registry and the line channel. Input,
//! output and the byte source are all generic so a whole session can be
//! scripted in tests.

use std::io::{self, BufRead, Write};

use log::{debug, error, info, warn};

use crate::channel::LineChannel;
use crate::domain::{SensorKind, SensorName, SensorRecord, SensorRegistry};
use crate::error::{MonitorError, MonitorResult};
use crate::ports::{ByteSource, SensorPort};

/// One entry of the main menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    CreateTemperature,
    CreatePressure,
    RecordReading,
    ProcessAll,
    Exit,
}

impl MenuChoice {
    /// Parse the user's answer to the menu prompt
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(MenuChoice::CreateTemperature),
            2 => Some(MenuChoice::CreatePressure),
            3 => Some(MenuChoice::RecordReading),
            4 => Some(MenuChoice::ProcessAll),
            5 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Menu-driven monitor session
pub struct Console<R, W, B> {
    input: R,
    output: W,
    channel: LineChannel<B>,
    registry: SensorRegistry,
    json_reports: bool,
}

impl<R: BufRead, W: Write, B: ByteSource> Console<R, W, B> {
    pub fn new(input: R, output: W, channel: LineChannel<B>) -> Self {
        Self {
            input,
            output,
            channel,
            registry: SensorRegistry::new(),
            json_reports: false,
        }
    }

    /// Print aggregation reports as JSON lines instead of text
    pub fn with_json_reports(mut self, json_reports: bool) -> Self {
        self.json_reports = json_reports;
        self
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// Hand back the registry and the channel
    pub fn into_parts(self) -> (SensorRegistry, LineChannel<B>) {
        (self.registry, self.channel)
    }

    /// Run the menu loop until the user exits or input ends
    pub fn run(&mut self) -> MonitorResult<()> {
        writeln!(self.output, "\n--- Sensor Monitor ---")?;

        loop {
            self.print_menu()?;
            let Some(answer) = self.read_input()? else {
                debug!("console input closed");
                writeln!(self.output)?;
                break;
            };

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::CreateTemperature) => {
                    self.create_sensor(SensorKind::Temperature)?
                }
                Some(MenuChoice::CreatePressure) => self.create_sensor(SensorKind::Pressure)?,
                Some(MenuChoice::RecordReading) => self.record_reading()?,
                Some(MenuChoice::ProcessAll) => self.process_all()?,
                Some(MenuChoice::Exit) => break,
                None => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }

        writeln!(
            self.output,
            "Closing monitor, releasing {} sensor(s).",
            self.registry.len()
        )?;
        Ok(())
    }

    /// Prompt for a name and register a new sensor of `kind`
    pub fn create_sensor(&mut self, kind: SensorKind) -> MonitorResult<()> {
        let example = match kind {
            SensorKind::Temperature => "T-001",
            SensorKind::Pressure => "P-105",
        };
        write!(self.output, "Enter ID (e.g. {}): ", example)?;
        self.output.flush()?;

        let Some(name) = self.read_input()? else {
            return Ok(());
        };

        let sensor = SensorRecord::new(kind, SensorName::new(&name));
        writeln!(self.output, "{} created.", sensor.describe())?;
        self.registry.add(sensor);
        Ok(())
    }

    /// Prompt for a sensor and block until it gets one reading
    ///
    /// An unknown name or a failed read is reported to the user and the
    /// session carries on.
    pub fn record_reading(&mut self) -> MonitorResult<()> {
        write!(self.output, "Enter ID of the sensor to record: ")?;
        self.output.flush()?;

        let Some(answer) = self.read_input()? else {
            return Ok(());
        };
        // Names are stored truncated, so look them up the same way
        let name = SensorName::new(&answer);

        let Some(sensor) = self.registry.find_mut(name.as_str()) else {
            let err = MonitorError::SensorNotFound(name.to_string());
            warn!("{}", err);
            writeln!(self.output, "Error: {}.", err)?;
            return Ok(());
        };

        writeln!(
            self.output,
            "Waiting for '{}' reading from the board...",
            String::from_utf8_lossy(sensor.kind().prefix())
        )?;
        self.output.flush()?;

        match sensor.read_one(&mut self.channel) {
            Ok(outcome) => {
                writeln!(
                    self.output,
                    "Recorded {} on {}.",
                    outcome.value.encode(),
                    sensor.name()
                )?;
            }
            Err(e) => {
                if e.is_ceiling() {
                    warn!("reading for {} gave up: {}", sensor.name(), e);
                } else {
                    error!("reading for {} failed: {}", sensor.name(), e);
                }
                writeln!(self.output, "Error: {}.", e)?;
            }
        }
        Ok(())
    }

    /// Aggregate every sensor and print the reports
    pub fn process_all(&mut self) -> MonitorResult<()> {
        writeln!(self.output, "\n--- Processing all sensors ---")?;
        if self.registry.is_empty() {
            writeln!(self.output, "(no sensors registered)")?;
            return Ok(());
        }

        let reports = self.registry.process_all();
        info!("processed {} sensors", reports.len());
        for report in &reports {
            if self.json_reports {
                writeln!(self.output, "{}", serde_json::to_string(report)?)?;
            } else {
                writeln!(self.output, "{}", report)?;
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Main Menu ---")?;
        writeln!(self.output, "1: Create sensor (temperature, float)")?;
        writeln!(self.output, "2: Create sensor (pressure, integer)")?;
        writeln!(self.output, "3: Record reading (from the board)")?;
        writeln!(self.output, "4: Process all sensors")?;
        writeln!(self.output, "5: Exit")?;
        write!(self.output, "Select an option: ")?;
        self.output.flush()
    }

    /// Next input line without its terminator, `None` at end of input
    fn read_input(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        Ok(Some(trimmed.to_string()))
    }
}
