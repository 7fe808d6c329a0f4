use std::{io::Write, time::Duration};

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pwm::{self, PwmError, Timing};

/// Hardware output parameters for a transmitter. Not interpreted by the protocol codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// GPIO driving the IR led
    pub pin: u16,
    /// Whether the output signal is active low
    pub inverted: bool,
    /// Whether the carrier frequency is generated by the output
    pub use_modulation: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pin: 0,
            inverted: false,
            use_modulation: true,
        }
    }
}

/// Something that can turn bytes into pulses on the air, and pulses back into bytes.
pub trait PulseEngine {
    type Error: std::error::Error;

    /// Set up the output before anything is sent.
    fn begin(&mut self, output: &OutputConfig) -> Result<(), Self::Error>;

    /// Send `data` once, then `repeat` more times.
    fn transmit(&mut self, data: &[u8], timing: &Timing, repeat: u16) -> Result<(), Self::Error>;

    /// Recover `nbits` of data from a captured list of mark/space durations.
    fn receive(
        &self,
        pulses: &[Duration],
        timing: &Timing,
        nbits: usize,
    ) -> Result<Vec<u8>, Self::Error>;

    /// Timing offset in microseconds needed by this output, if it can measure one.
    fn calibrate(&mut self) -> i8 {
        0
    }
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("the output wasn't set up, call begin() first")]
    NotStarted,

    #[error("pulse error: {0}")]
    PulseError(#[from] PwmError),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("invalid capture: {0}")]
    InvalidCapture(String),
}

/// Parse one line of raw pulses, as written by [`Lines`].
///
/// Plain `+m -s ...` lists are accepted as well as IrTransmogrifier's
/// `Freq=38000Hz[+m -s ...][...]`, of which only the first sequence is kept.
pub fn parse_pulses(line: &str) -> Result<Vec<Duration>, DeviceError> {
    let line = line.trim();
    let raw = match line.strip_prefix("Freq=") {
        Some(rest) => rest
            .split_once('[')
            .and_then(|(_, seq)| seq.split_once(']'))
            .map(|(seq, _)| seq)
            .ok_or_else(|| DeviceError::InvalidCapture(format!("no pulse sequence in {:?}", line)))?,
        None => line,
    };

    let msg = irp::Message::parse(raw).map_err(DeviceError::InvalidCapture)?;
    Ok(msg
        .raw
        .into_iter()
        .map(|d| Duration::from_micros(d.into()))
        .collect())
}

/// Writes every transmitted message as a line of raw pulse durations, e.g.
/// `Freq=38000Hz[+1026 -554 ... -100000]`.
///
/// Unmodulated outputs omit the `Freq=` prefix. There is no polarity in text,
/// so `inverted` has no effect here.
pub struct Lines<W> {
    writer: W,
    output: Option<OutputConfig>,
}

impl<W: Write> Lines<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_pulses(&mut self, frequency: u32, pulses: &[Duration]) -> std::io::Result<()> {
        let modulated = self.output.map_or(true, |o| o.use_modulation);
        if modulated {
            write!(self.writer, "Freq={}Hz[", frequency)?;
        }

        for (i, pulse) in pulses.iter().enumerate() {
            if i > 0 {
                write!(self.writer, " ")?;
            }
            let sign = if i % 2 == 0 { '+' } else { '-' };
            write!(self.writer, "{}{}", sign, pulse.as_micros())?;
        }

        if modulated {
            write!(self.writer, "]")?;
        }
        writeln!(self.writer)
    }
}

impl<W: Write> PulseEngine for Lines<W> {
    type Error = DeviceError;

    fn begin(&mut self, output: &OutputConfig) -> Result<(), Self::Error> {
        self.output = Some(*output);
        Ok(())
    }

    fn transmit(&mut self, data: &[u8], timing: &Timing, repeat: u16) -> Result<(), Self::Error> {
        if self.output.is_none() {
            return Err(DeviceError::NotStarted);
        }

        let pulses = pwm::encode(timing, data);
        for _ in 0..=repeat {
            self.write_pulses(timing.frequency, &pulses)?;
        }
        self.writer.flush()?;

        trace!("sent {} bytes, {} repeats", data.len(), repeat);
        Ok(())
    }

    fn receive(
        &self,
        pulses: &[Duration],
        timing: &Timing,
        nbits: usize,
    ) -> Result<Vec<u8>, Self::Error> {
        Ok(pwm::decode(timing, pulses, nbits)?)
    }
}
