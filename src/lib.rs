//! Encoding and decoding of infrared A/C remote messages.
pub mod common;
pub mod device;
pub mod pwm;
pub mod voltas;

pub use device::{parse_pulses, DeviceError, Lines, OutputConfig, PulseEngine};
pub use voltas::{IrVoltas, VoltasAc};
