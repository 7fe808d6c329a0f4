//! A generic pulse-distance encoder/decoder for byte oriented IR protocols
use std::time::Duration;

use log::debug;
use thiserror::Error;

/// Marks captured by a receiver usually come out longer than sent, and spaces shorter.
pub const MARK_EXCESS: Duration = Duration::from_micros(50);

/// Gap used by most protocols between two messages.
pub const DEFAULT_MESSAGE_GAP: Duration = Duration::from_micros(100_000);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rule {
    pub duration: Duration,
    pub tolerance: Duration,
}

impl Rule {
    pub fn new(duration: Duration) -> Self {
        // Use a 25% tolerance by default
        Self {
            duration,
            tolerance: duration / 4,
        }
    }

    /// Rule for a measured mark. Accepts the nominal length as well as one
    /// stretched by the receiver's mark excess.
    pub fn mark(duration: Duration) -> Self {
        Self {
            duration: duration + MARK_EXCESS,
            tolerance: duration / 4 + MARK_EXCESS,
        }
    }

    /// Rule for a measured space. Accepts the nominal length as well as one
    /// shortened by the receiver's mark excess.
    pub fn space(duration: Duration) -> Self {
        Self {
            duration: duration.saturating_sub(MARK_EXCESS),
            tolerance: duration / 4 + MARK_EXCESS,
        }
    }

    pub fn matches(&self, duration: Duration) -> bool {
        let diff = if duration > self.duration {
            duration - self.duration
        } else {
            self.duration - duration
        };
        diff <= self.tolerance
    }

    pub fn at_least(&self, duration: Duration) -> bool {
        duration + self.tolerance >= self.duration
    }
}

/// Physical rendering of a pulse-distance protocol.
///
/// A zero `header_mark` means the protocol has no header. Bytes are always sent
/// whole; `msb_first` selects the bit order inside each byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Timing {
    pub header_mark: Duration,
    pub header_space: Duration,
    pub one_mark: Duration,
    pub one_space: Duration,
    pub zero_mark: Duration,
    pub zero_space: Duration,
    pub footer_mark: Duration,
    pub gap: Duration,
    /// Carrier frequency in Hz
    pub frequency: u32,
    pub msb_first: bool,
}

impl Timing {
    pub fn has_header(&self) -> bool {
        !self.header_mark.is_zero()
    }

    /// Number of pulses needed to carry `nbits` without the trailing gap, if it fits in a `usize`.
    pub fn pulse_count(&self, nbits: usize) -> Option<usize> {
        let header = if self.has_header() { 2 } else { 0 };
        nbits.checked_mul(2)?.checked_add(header + 1)
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PwmError {
    #[error("bit count {0} is not a whole number of bytes")]
    UnalignedBits(usize),

    #[error("bit count {0} is too large")]
    TooManyBits(usize),

    #[error("truncated message: needed {needed} pulses, got {available}")]
    Truncated { needed: usize, available: usize },

    #[error("invalid header pulse: {0:?}")]
    InvalidHeader(Duration),

    #[error("invalid mark for bit {bit}: {duration:?}")]
    InvalidMark { bit: usize, duration: Duration },

    #[error("invalid space for bit {bit}: {duration:?}")]
    InvalidSpace { bit: usize, duration: Duration },

    #[error("invalid footer mark: {0:?}")]
    InvalidFooter(Duration),

    #[error("message gap too short: {0:?}")]
    GapTooShort(Duration),
}

/// Render `data` as alternating mark/space durations, ending with the footer mark and the gap.
pub fn encode(timing: &Timing, data: &[u8]) -> Vec<Duration> {
    let capacity = timing.pulse_count(data.len() * 8).map_or(0, |n| n + 1);
    let mut pulses = Vec::with_capacity(capacity);

    if timing.has_header() {
        pulses.push(timing.header_mark);
        pulses.push(timing.header_space);
    }

    for &byte in data {
        for i in 0..8 {
            let bit = if timing.msb_first { 7 - i } else { i };
            if byte & (1 << bit) != 0 {
                pulses.push(timing.one_mark);
                pulses.push(timing.one_space);
            } else {
                pulses.push(timing.zero_mark);
                pulses.push(timing.zero_space);
            }
        }
    }

    pulses.push(timing.footer_mark);
    pulses.push(timing.gap);
    pulses
}

/// Reconstruct `nbits` worth of bytes from a captured pulse train.
///
/// The trailing gap only needs to be at least as long as `timing.gap`, and a
/// capture that ends right after the footer mark is accepted as well.
pub fn decode(timing: &Timing, pulses: &[Duration], nbits: usize) -> Result<Vec<u8>, PwmError> {
    if nbits % 8 != 0 {
        return Err(PwmError::UnalignedBits(nbits));
    }

    let needed = timing
        .pulse_count(nbits)
        .ok_or(PwmError::TooManyBits(nbits))?;
    if pulses.len() < needed {
        debug!("capture has {} pulses, {} needed", pulses.len(), needed);
        return Err(PwmError::Truncated {
            needed,
            available: pulses.len(),
        });
    }

    let mut pulses = pulses.iter().copied();
    // Length was checked above, the iterator can't run dry before the gap
    let mut next = || pulses.next().unwrap_or_default();

    if timing.has_header() {
        let mark = next();
        if !Rule::mark(timing.header_mark).matches(mark) {
            return Err(PwmError::InvalidHeader(mark));
        }
        let space = next();
        if !Rule::space(timing.header_space).matches(space) {
            return Err(PwmError::InvalidHeader(space));
        }
    }

    let one = (Rule::mark(timing.one_mark), Rule::space(timing.one_space));
    let zero = (Rule::mark(timing.zero_mark), Rule::space(timing.zero_space));

    let mut data = vec![0u8; nbits / 8];
    for bit in 0..nbits {
        let mark = next();
        let space = next();

        let value = if one.0.matches(mark) && one.1.matches(space) {
            true
        } else if zero.0.matches(mark) && zero.1.matches(space) {
            false
        } else if !one.0.matches(mark) && !zero.0.matches(mark) {
            return Err(PwmError::InvalidMark {
                bit,
                duration: mark,
            });
        } else {
            return Err(PwmError::InvalidSpace {
                bit,
                duration: space,
            });
        };

        if value {
            let shift = if timing.msb_first { 7 - bit % 8 } else { bit % 8 };
            data[bit / 8] |= 1 << shift;
        }
    }

    let footer = next();
    if !Rule::mark(timing.footer_mark).matches(footer) {
        return Err(PwmError::InvalidFooter(footer));
    }

    if let Some(gap) = pulses.next() {
        if !Rule::space(timing.gap).at_least(gap) {
            return Err(PwmError::GapTooShort(gap));
        }
    }

    Ok(data)
}
