//! Voltas A/C remotes (122LZF 4011252 window units).
pub mod phy;
pub mod state;

use std::{
    fmt,
    ops::{Deref, DerefMut},
    time::Duration,
};

use log::debug;
use strum::{Display, EnumIter, EnumString, FromRepr};
use thiserror::Error;

use crate::{
    common::{AcState, DecodeType, FanSpeed},
    device::{OutputConfig, PulseEngine},
};
pub use phy::{DecodeError, NO_REPEAT, TIMING};
pub use state::{calc_checksum, valid_checksum, State, BITS, STATE_LENGTH};

pub const MIN_TEMP: u8 = 16;
pub const MAX_TEMP: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, FromRepr)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Mode {
    Fan = 0b0001,
    Heat = 0b0010,
    Dry = 0b0100,
    Cool = 0b1000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, FromRepr)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Fan {
    Low = 0b001,
    #[strum(to_string = "Medium", serialize = "med")]
    Med = 0b010,
    High = 0b100,
    Auto = 0b111,
}

/// Outcome of storing an untrusted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated<T> {
    /// The input was stored as given
    Accepted(T),
    /// The input was out of range, this value was stored instead
    Clamped(T),
}

impl<T> Validated<T> {
    pub fn value(self) -> T {
        match self {
            Validated::Accepted(v) | Validated::Clamped(v) => v,
        }
    }

    pub fn was_clamped(&self) -> bool {
        matches!(self, Validated::Clamped(_))
    }
}

impl Mode {
    /// Anything that isn't a known mode becomes `Cool`.
    pub fn validate(raw: u8) -> Validated<Mode> {
        match Mode::from_repr(raw) {
            Some(mode) => Validated::Accepted(mode),
            None => Validated::Clamped(Mode::Cool),
        }
    }
}

impl Fan {
    /// Anything that isn't a known fan speed becomes `Auto`.
    pub fn validate(raw: u8) -> Validated<Fan> {
        match Fan::from_repr(raw) {
            Some(fan) => Validated::Accepted(fan),
            None => Validated::Clamped(Fan::Auto),
        }
    }
}

fn validate_temp(temp: u8) -> Validated<u8> {
    if temp < MIN_TEMP {
        Validated::Clamped(MIN_TEMP)
    } else if temp > MAX_TEMP {
        Validated::Clamped(MAX_TEMP)
    } else {
        Validated::Accepted(temp)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("Mode value wasn't recognized: {0:#x}")]
    ModeOutOfRange(u8),

    #[error("Fan value wasn't recognized: {0:#x}")]
    FanOutOfRange(u8),

    #[error("expected a {expected} byte state, got {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },
}

/// Native fan speed closest to a generic one.
pub fn convert_fan(speed: FanSpeed) -> Fan {
    match speed {
        FanSpeed::Min | FanSpeed::Low => Fan::Low,
        FanSpeed::Medium => Fan::Med,
        FanSpeed::High | FanSpeed::Max => Fan::High,
        _ => Fan::Auto,
    }
}

/// Generic fan speed for a stored native value. Unknown values read as `Auto`.
pub fn to_common_fan_speed(speed: u8) -> FanSpeed {
    match Fan::from_repr(speed) {
        Some(Fan::High) => FanSpeed::Max,
        Some(Fan::Med) => FanSpeed::Medium,
        Some(Fan::Low) => FanSpeed::Min,
        _ => FanSpeed::Auto,
    }
}

/// The settings of a Voltas remote, as they go over the air.
///
/// Bits this type has no accessor for (swing, sleep, timers, ...) are kept
/// as they were given to [`VoltasAc::set_raw`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VoltasAc {
    state: State,
}

impl VoltasAc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(raw: &[u8; STATE_LENGTH]) -> Self {
        let mut ac = Self::new();
        ac.set_raw(raw);
        ac
    }

    pub fn state_reset(&mut self) {
        self.state = State::new();
    }

    /// The message bytes, with the checksum brought up to date.
    pub fn raw(&mut self) -> [u8; STATE_LENGTH] {
        self.checksum();
        self.state.0
    }

    pub fn set_raw(&mut self, raw: &[u8; STATE_LENGTH]) {
        self.state.0 = *raw;
    }

    pub fn set_raw_slice(&mut self, raw: &[u8]) -> Result<(), StateError> {
        let raw: &[u8; STATE_LENGTH] = raw.try_into().map_err(|_| StateError::InvalidLength {
            expected: STATE_LENGTH,
            actual: raw.len(),
        })?;
        self.set_raw(raw);
        Ok(())
    }

    fn checksum(&mut self) {
        self.state.apply_checksum();
    }

    pub fn power(&self) -> bool {
        self.state.power()
    }

    pub fn set_power(&mut self, on: bool) {
        self.state.set_power(on);
    }

    pub fn on(&mut self) {
        self.set_power(true);
    }

    pub fn off(&mut self) {
        self.set_power(false);
    }

    pub fn mode(&self) -> Result<Mode, StateError> {
        let raw = self.mode_raw();
        Mode::from_repr(raw).ok_or(StateError::ModeOutOfRange(raw))
    }

    /// The stored mode bits, whatever they are.
    pub fn mode_raw(&self) -> u8 {
        self.state.mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.set_mode(mode as u8);
    }

    pub fn set_mode_raw(&mut self, raw: u8) -> Validated<Mode> {
        let mode = Mode::validate(raw);
        if mode.was_clamped() {
            debug!("unknown mode {:#x}, using {}", raw, mode.value());
        }
        self.set_mode(mode.value());
        mode
    }

    /// Temperature in Celsius
    pub fn temp(&self) -> u8 {
        self.state.temp() + MIN_TEMP
    }

    pub fn set_temp(&mut self, temp: u8) -> Validated<u8> {
        let validated = validate_temp(temp);
        if validated.was_clamped() {
            debug!("temperature {} out of range, using {}", temp, validated.value());
        }
        self.state.set_temp(validated.value() - MIN_TEMP);
        validated
    }

    pub fn fan(&self) -> Result<Fan, StateError> {
        let raw = self.fan_raw();
        Fan::from_repr(raw).ok_or(StateError::FanOutOfRange(raw))
    }

    /// The stored fan bits, whatever they are.
    pub fn fan_raw(&self) -> u8 {
        self.state.fan_speed()
    }

    pub fn set_fan(&mut self, fan: Fan) {
        self.state.set_fan_speed(fan as u8);
    }

    pub fn set_fan_raw(&mut self, raw: u8) -> Validated<Fan> {
        let fan = Fan::validate(raw);
        if fan.was_clamped() {
            debug!("unknown fan speed {:#x}, using {}", raw, fan.value());
        }
        self.set_fan(fan.value());
        fan
    }

    pub fn turbo(&self) -> bool {
        self.state.turbo()
    }

    pub fn set_turbo(&mut self, on: bool) {
        self.state.set_turbo(on);
    }

    pub fn econo(&self) -> bool {
        self.state.econo()
    }

    pub fn set_econo(&mut self, on: bool) {
        self.state.set_econo(on);
    }

    pub fn wifi(&self) -> bool {
        self.state.wifi()
    }

    pub fn set_wifi(&mut self, on: bool) {
        self.state.set_wifi(on);
    }

    pub fn light(&self) -> bool {
        self.state.light()
    }

    pub fn set_light(&mut self, on: bool) {
        self.state.set_light(on);
    }

    pub fn to_common(&self) -> AcState {
        AcState {
            protocol: DecodeType::Voltas,
            model: None,
            power: self.power(),
            // Native modes aren't mapped yet
            mode: None,
            celsius: true,
            degrees: self.temp() as f32,
            fan_speed: to_common_fan_speed(self.fan_raw()),
            swing_v: None,
            swing_h: None,
            quiet: None,
            turbo: self.turbo(),
            econo: self.econo(),
            light: self.light(),
            filter: None,
            clean: None,
            beep: None,
            sleep: None,
            clock: None,
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}

impl fmt::Display for VoltasAc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Power: {}", on_off(self.power()))?;
        match self.mode() {
            Ok(mode) => write!(f, ", Mode: {} ({})", mode as u8, mode)?,
            Err(_) => write!(f, ", Mode: {} (UNKNOWN)", self.mode_raw())?,
        }
        write!(f, ", Temp: {}C", self.temp())?;
        match self.fan() {
            Ok(fan) => write!(f, ", Fan: {} ({})", fan as u8, fan)?,
            Err(_) => write!(f, ", Fan: {} (UNKNOWN)", self.fan_raw())?,
        }
        write!(f, ", Turbo: {}", on_off(self.turbo()))?;
        write!(f, ", Econo: {}", on_off(self.econo()))?;
        write!(f, ", WiFi: {}", on_off(self.wifi()))?;
        write!(f, ", Light: {}", on_off(self.light()))
    }
}

/// A Voltas remote wired to a pulse engine.
pub struct IrVoltas<E> {
    ac: VoltasAc,
    output: OutputConfig,
    engine: E,
}

impl<E: PulseEngine> IrVoltas<E> {
    pub fn new(output: OutputConfig, engine: E) -> Self {
        Self {
            ac: VoltasAc::new(),
            output,
            engine,
        }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Set up the hardware before sending.
    pub fn begin(&mut self) -> Result<(), E::Error> {
        self.engine.begin(&self.output)
    }

    /// Timing offset in microseconds measured by the engine.
    pub fn calibrate(&mut self) -> i8 {
        self.engine.calibrate()
    }

    /// Send the current state, plus `repeat` copies.
    pub fn send(&mut self, repeat: u16) -> Result<(), E::Error> {
        let raw = self.ac.raw();
        phy::send(&mut self.engine, &raw, repeat)
    }

    /// Replace the state with a strictly decoded capture. Nothing changes on failure.
    pub fn receive(&mut self, pulses: &[Duration]) -> Result<(), DecodeError<E::Error>> {
        let data = phy::decode(&self.engine, pulses, BITS, true)?;
        self.ac.set_raw_slice(&data)?;
        Ok(())
    }
}

impl<E> Deref for IrVoltas<E> {
    type Target = VoltasAc;

    fn deref(&self) -> &VoltasAc {
        &self.ac
    }
}

impl<E> DerefMut for IrVoltas<E> {
    fn deref_mut(&mut self) -> &mut VoltasAc {
        &mut self.ac
    }
}
