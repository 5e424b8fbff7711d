//! The NKRO keyboard report for the fallback output mode.
//!
//! Non-arcade front-ends read the slider as a keyboard: each sensor maps to
//! its own key code, so every sensor can be held independently. The report
//! is a plain bitmap; bit `code % 8` of byte `code / 8 + 1` marks a code
//! pressed, with byte 0 reserved for the modifier range.

/// Size of the NKRO report bitmap in bytes.
pub const NKRO_REPORT_LEN: usize = 32;

/// Key codes emitted for the 32 slider sensors. The indices match the
/// sensor numbers, which are laid out as:
///
/// ```text
///   0 | 2 | 4 | 6 | 8 | 10 | 12 | 14 | 16 | 18 | 20 | 22 | 24 | 26 | 28 | 30
///   1 | 3 | 5 | 7 | 9 | 11 | 13 | 15 | 17 | 19 | 21 | 23 | 25 | 27 | 29 | 31
/// ```
pub const SLIDER_KEY_CODES: [u8; 32] = [
    0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, // A..H
    0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13, // I..P
    0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, // Q..X
    0x1C, 0x1D, 0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23, // Y, Z, 1..6
];

/// Key codes emitted for the 6 air-tower sensors, bottom to top:
/// `\`, `/`, `-`, `,`, `;`, `.`.
pub const AIR_KEY_CODES: [u8; 6] = [0x31, 0x38, 0x2D, 0x36, 0x33, 0x37];

/// First and last key codes of the HID modifier range, which lives in
/// byte 0 of the report.
const MODIFIER_FIRST: u8 = 240;
const MODIFIER_LAST: u8 = 247;

/// A 32-byte NKRO report bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NkroReport {
    bitmap: [u8; NKRO_REPORT_LEN],
}

impl NkroReport {
    /// An empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bitmap: [0; NKRO_REPORT_LEN],
        }
    }

    /// Mark a key code pressed.
    pub fn press(&mut self, key_code: u8) {
        let bit = key_code % 8;
        let byte = (key_code / 8) as usize + 1;

        if (MODIFIER_FIRST..=MODIFIER_LAST).contains(&key_code) {
            self.bitmap[0] |= 1 << bit;
        } else if byte < NKRO_REPORT_LEN {
            self.bitmap[byte] |= 1 << bit;
        }
    }

    /// Press the key codes for every touched slider sensor.
    pub fn set_slider_sensors(&mut self, touched: &[bool; 32]) {
        for (index, &on) in touched.iter().enumerate() {
            if on {
                self.press(SLIDER_KEY_CODES[index]);
            }
        }
    }

    /// Press the key codes for every blocked air sensor.
    pub fn set_air_sensors(&mut self, blocked: &[bool; 6]) {
        for (index, &on) in blocked.iter().enumerate() {
            if on {
                self.press(AIR_KEY_CODES[index]);
            }
        }
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.bitmap = [0; NKRO_REPORT_LEN];
    }

    /// The raw report bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NKRO_REPORT_LEN] {
        &self.bitmap
    }
}

impl Default for NkroReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_placement() {
        let mut report = NkroReport::new();
        // A = 0x04: bit 4 of byte 1.
        report.press(0x04);
        assert_eq!(report.as_bytes()[1], 1 << 4);
        // Period = 0x37: bit 7 of byte 7.
        report.press(0x37);
        assert_eq!(report.as_bytes()[7], 1 << 7);
    }

    #[test]
    fn test_modifier_codes_fold_into_byte_zero() {
        for code in 240..=247u8 {
            let mut report = NkroReport::new();
            report.press(code);
            assert_eq!(report.as_bytes()[0], 1 << (code % 8));
            assert!(report.as_bytes()[1..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_out_of_range_code_ignored() {
        let mut report = NkroReport::new();
        report.press(0xFF);
        assert_eq!(report, NkroReport::new());
    }

    #[test]
    fn test_slider_sensors_press_distinct_codes() {
        let mut report = NkroReport::new();
        report.set_slider_sensors(&[true; 32]);
        let pressed: u32 = report
            .as_bytes()
            .iter()
            .map(|b| b.count_ones())
            .sum();
        assert_eq!(pressed, 32);
    }

    #[test]
    fn test_air_sensors_press_their_codes() {
        let mut report = NkroReport::new();
        report.set_air_sensors(&[true, false, false, false, false, true]);
        let mut expected = NkroReport::new();
        expected.press(0x31);
        expected.press(0x37);
        assert_eq!(report, expected);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut report = NkroReport::new();
        report.set_slider_sensors(&[true; 32]);
        report.clear();
        assert_eq!(report, NkroReport::new());
    }
}
