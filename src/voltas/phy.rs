use std::time::Duration;

use log::debug;
use thiserror::Error;

use super::{
    state::{calc_checksum, valid_checksum, BITS},
    StateError,
};
use crate::{
    device::PulseEngine,
    pwm::{Timing, DEFAULT_MESSAGE_GAP},
};

pub const BIT_MARK: Duration = Duration::from_micros(1026);
pub const ONE_SPACE: Duration = Duration::from_micros(2553);
pub const ZERO_SPACE: Duration = Duration::from_micros(554);
pub const FREQUENCY: u32 = 38_000;

/// Voltas messages have no header, and every bit starts with the same mark.
pub const TIMING: Timing = Timing {
    header_mark: Duration::ZERO,
    header_space: Duration::ZERO,
    one_mark: BIT_MARK,
    one_space: ONE_SPACE,
    zero_mark: BIT_MARK,
    zero_space: ZERO_SPACE,
    footer_mark: BIT_MARK,
    gap: DEFAULT_MESSAGE_GAP,
    frequency: FREQUENCY,
    msb_first: true,
};

pub const NO_REPEAT: u16 = 0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError<E> {
    #[error("expected {expected} bits, got {actual}")]
    BitCount { expected: usize, actual: usize },

    #[error("pulse error: {0}")]
    PulseError(E),

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),
}

/// Send `data` as a Voltas message, plus `repeat` copies.
pub fn send<E: PulseEngine>(engine: &mut E, data: &[u8], repeat: u16) -> Result<(), E::Error> {
    engine.transmit(data, &TIMING, repeat)
}

/// Decode a captured message.
///
/// When `strict` is set, only full 80 bit messages with a valid checksum are accepted.
pub fn decode<E: PulseEngine>(
    engine: &E,
    pulses: &[Duration],
    nbits: usize,
    strict: bool,
) -> Result<Vec<u8>, DecodeError<E::Error>> {
    if strict && nbits != BITS {
        return Err(DecodeError::BitCount {
            expected: BITS,
            actual: nbits,
        });
    }

    let data = engine
        .receive(pulses, &TIMING, nbits)
        .map_err(DecodeError::PulseError)?;

    if strict && !valid_checksum(&data) {
        let err = DecodeError::ChecksumMismatch {
            expected: calc_checksum(&data),
            actual: data.last().copied().unwrap_or_default(),
        };
        debug!("rejecting {}: {}", hex::encode(&data), err);
        return Err(err);
    }

    Ok(data)
}
