use bitfield::bitfield;

pub const STATE_LENGTH: usize = 10;
pub const BITS: usize = STATE_LENGTH * 8;

bitfield! {
    /// Bit layout of a Voltas message. Bit `n` is bit `n % 8` of byte `n / 8`.
    pub struct Protocol([u8]);
    impl Debug;
    u8;
    // Byte 0
    pub swing_h, _ : 0;
    pub unknown0, _ : 7, 1;
    // Byte 1
    pub mode, set_mode : 11, 8;
    pub fan_speed, set_fan_speed : 15, 13;
    // Byte 2
    pub swing_v, _ : 18, 16;
    pub wifi, set_wifi : 19;
    pub turbo, set_turbo : 21;
    pub sleep, _ : 22;
    pub power, set_power : 23;
    // Byte 3
    pub temp, set_temp : 27, 24;
    pub unknown3, _ : 29, 28;
    pub econo, set_econo : 30;
    pub temp_set, _ : 31;
    // Byte 4
    pub off_timer_24h4, _ : 32;
    // Byte 5
    pub off_timer_24h5, _ : 40;
    pub timer_add_12hr, _ : 47;
    // Byte 7
    pub timer_hrs, _ : 63, 60;
    // Byte 8
    pub light, set_light : 69;
    pub off_timer_enable, _ : 70;
    // Byte 9
    pub checksum, set_checksum : 79, 72;
}

pub type State = Protocol<[u8; STATE_LENGTH]>;

impl Clone for State {
    fn clone(&self) -> Self {
        Protocol(self.0)
    }
}

impl Copy for State {}

impl State {
    pub fn new() -> Self {
        Protocol([0; STATE_LENGTH])
    }

    pub fn apply_checksum(&mut self) {
        self.set_checksum(calc_checksum(&self.0));
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Complement of the 8-bit sum of every byte but the last one.
///
/// The last byte of `state` is where the checksum lives. An empty buffer yields 0.
pub fn calc_checksum(state: &[u8]) -> u8 {
    match state.split_last() {
        Some((_, body)) => !body.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)),
        None => 0,
    }
}

/// Whether the last byte of `state` holds its checksum. Empty buffers are valid.
pub fn valid_checksum(state: &[u8]) -> bool {
    match state.last() {
        Some(&checksum) => checksum == calc_checksum(state),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const REAL: [u8; STATE_LENGTH] = hex!("33 84 88 18 3B 3B 3B 11 00 E6");
    const SYNTHETIC: [u8; STATE_LENGTH] = hex!("33 28 88 1A 3B 3B 3B 11 00 40");

    #[test]
    fn test_checksum() {
        assert_eq!(calc_checksum(&REAL), 0xE6);
        assert_eq!(calc_checksum(&SYNTHETIC), 0x40);
        assert!(valid_checksum(&REAL));
        assert!(valid_checksum(&SYNTHETIC));
        assert!(!valid_checksum(&REAL[..STATE_LENGTH - 1]));

        assert_eq!(calc_checksum(&[]), 0);
        assert!(valid_checksum(&[]));
        assert_eq!(calc_checksum(&[0; STATE_LENGTH]), 0xFF);
    }

    #[test]
    fn test_valid_checksum_matches_calc() {
        let mut buf = REAL;
        for checksum in 0..=u8::MAX {
            buf[9] = checksum;
            assert_eq!(valid_checksum(&buf), checksum == calc_checksum(&buf));
        }
        for byte in [0x00, 0x01, 0x7F, 0x80, 0xFF] {
            buf[8] = byte;
            assert_eq!(valid_checksum(&buf), buf[9] == calc_checksum(&buf));
        }
    }

    #[test]
    fn test_apply_checksum() {
        let mut state = Protocol(SYNTHETIC);
        state.0[9] = 0x00;
        state.apply_checksum();
        assert_eq!(state.0, SYNTHETIC);
        assert_eq!(state.checksum(), 0x40);

        // Byte 8 takes part in the checksum
        state.0[8] = 0x20;
        state.apply_checksum();
        assert_eq!(state.checksum(), 0x20);
        assert!(valid_checksum(&state.0));
    }

    #[test]
    fn test_decode() {
        let state = Protocol(REAL);
        assert!(state.swing_h());
        assert_eq!(state.unknown0(), 0b0011001);
        assert_eq!(state.mode(), 0b0100);
        assert_eq!(state.fan_speed(), 0b100);
        assert_eq!(state.swing_v(), 0);
        assert!(state.wifi());
        assert!(!state.turbo());
        assert!(!state.sleep());
        assert!(state.power());
        assert_eq!(state.temp(), 8);
        assert_eq!(state.unknown3(), 0b01);
        assert!(!state.econo());
        assert!(!state.temp_set());
        assert!(state.off_timer_24h4());
        assert!(state.off_timer_24h5());
        assert!(!state.timer_add_12hr());
        assert_eq!(state.timer_hrs(), 1);
        assert!(!state.light());
        assert!(!state.off_timer_enable());
        assert_eq!(state.checksum(), 0xE6);
    }

    #[test]
    fn test_setters_keep_other_bits() {
        let mut state = Protocol([0xFF; STATE_LENGTH]);
        state.set_mode(0);
        assert_eq!(state.0[1], 0xF0);
        state.set_fan_speed(0);
        assert_eq!(state.0[1], 0x10);
        state.set_wifi(false);
        state.set_turbo(false);
        state.set_power(false);
        assert_eq!(state.0[2], 0b0101_0111);
        state.set_temp(0);
        state.set_econo(false);
        assert_eq!(state.0[3], 0b1011_0000);
        state.set_light(false);
        assert_eq!(state.0[8], 0b1101_1111);
        assert_eq!(&state.0[4..8], &[0xFF; 4]);
        assert_eq!(state.0[0], 0xFF);

        let mut state = Protocol([0x00; STATE_LENGTH]);
        state.set_mode(0x0F);
        state.set_fan_speed(0x07);
        state.set_temp(0x0F);
        state.set_light(true);
        assert_eq!(state.0, hex!("00 EF 00 0F 00 00 00 00 20 00"));
    }
}
