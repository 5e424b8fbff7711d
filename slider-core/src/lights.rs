//! The in-memory image of the LED chain.
//!
//! The slider has 16 keys lit by two LEDs each, a single-LED divider
//! between every pair of keys, and two air towers of three 3-LED groups.
//! Everything sits on one WS2812B chain, wired slider first, then the
//! right tower, then the left. [`LedImage`] hides the chain indices behind
//! key/divider/tower coordinates; the commit to the physical strip happens
//! elsewhere, gated by the dirty flag.

use crate::touch::KEY_COUNT;

/// Number of dividers between keys.
pub const DIVIDER_COUNT: usize = 15;

/// LED groups per air tower.
pub const TOWER_GROUPS: usize = 3;

/// Total chain length: two LEDs per key, one per divider, nine per tower.
pub const STRIP_LEN: usize = KEY_COUNT * 2 + DIVIDER_COUNT + 2 * 3 * TOWER_GROUPS;

/// First chain index of the right tower; the left tower follows it.
const TOWER_BASE_RIGHT: usize = KEY_COUNT * 2 + DIVIDER_COUNT;
const TOWER_BASE_LEFT: usize = TOWER_BASE_RIGHT + 3 * TOWER_GROUPS;

/// One LED color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const OFF: Self = Self::new(0, 0, 0);

    // Reactive-lighting palette.
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 100, 0);
    pub const PURPLE: Self = Self::new(160, 32, 240);
}

/// The latest requested state of the whole chain.
///
/// Zone setters only touch the image; [`update`](Self::update) marks it for
/// commit and [`take_dirty`](Self::take_dirty) hands the commit decision to
/// whoever owns the physical strip.
pub struct LedImage {
    pixels: [Rgb; STRIP_LEN],
    brightness: u8,
    dirty: bool,
}

impl LedImage {
    /// A dark image at the given brightness, marked dirty so the first
    /// commit paints the chain.
    #[must_use]
    pub const fn new(brightness: u8) -> Self {
        Self {
            pixels: [Rgb::OFF; STRIP_LEN],
            brightness,
            dirty: true,
        }
    }

    /// Fill the whole chain with one color.
    pub fn set_all(&mut self, color: Rgb) {
        self.pixels = [color; STRIP_LEN];
    }

    /// Set both LEDs of a key.
    pub fn set_key(&mut self, key: usize, color: Rgb) {
        if key >= KEY_COUNT {
            return;
        }
        let index = key * 3;
        self.pixels[index] = color;
        self.pixels[index + 1] = color;
    }

    /// Set the divider LED between keys `divider` and `divider + 1`.
    pub fn set_divider(&mut self, divider: usize, color: Rgb) {
        if divider >= DIVIDER_COUNT {
            return;
        }
        self.pixels[divider * 3 + 2] = color;
    }

    /// Set the three LEDs of one tower group, bottom group first.
    ///
    /// Side 0 is the left tower. The chain is wired right tower first, so
    /// the left tower sits at the far end.
    pub fn set_tower(&mut self, side: usize, group: usize, color: Rgb) {
        if side >= 2 || group >= TOWER_GROUPS {
            return;
        }
        let base = if side == 0 { TOWER_BASE_LEFT } else { TOWER_BASE_RIGHT };
        let index = base + group * 3;
        self.pixels[index] = color;
        self.pixels[index + 1] = color;
        self.pixels[index + 2] = color;
    }

    /// Set the global brightness (0..=255), applied at commit time.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Mark the image for commit to the physical chain.
    pub fn update(&mut self) {
        self.dirty = true;
    }

    /// Consume the dirty flag; true means the chain needs a commit.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// The raw pixel data in chain order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb; STRIP_LEN] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_maps_to_two_adjacent_leds() {
        let mut image = LedImage::new(100);
        image.set_key(0, Rgb::BLUE);
        image.set_key(15, Rgb::YELLOW);
        assert_eq!(image.pixels()[0], Rgb::BLUE);
        assert_eq!(image.pixels()[1], Rgb::BLUE);
        assert_eq!(image.pixels()[45], Rgb::YELLOW);
        assert_eq!(image.pixels()[46], Rgb::YELLOW);
    }

    #[test]
    fn test_divider_sits_between_keys() {
        let mut image = LedImage::new(100);
        image.set_divider(0, Rgb::PURPLE);
        image.set_divider(14, Rgb::PURPLE);
        assert_eq!(image.pixels()[2], Rgb::PURPLE);
        assert_eq!(image.pixels()[44], Rgb::PURPLE);
    }

    #[test]
    fn test_tower_chain_is_wired_right_first() {
        let mut image = LedImage::new(100);
        image.set_tower(1, 0, Rgb::BLUE);
        image.set_tower(0, 2, Rgb::YELLOW);
        // Right tower group 0 starts directly after the slider LEDs.
        assert_eq!(image.pixels()[47], Rgb::BLUE);
        assert_eq!(image.pixels()[48], Rgb::BLUE);
        assert_eq!(image.pixels()[49], Rgb::BLUE);
        // Left tower group 2 ends the chain.
        assert_eq!(image.pixels()[62], Rgb::YELLOW);
        assert_eq!(image.pixels()[64], Rgb::YELLOW);
    }

    #[test]
    fn test_out_of_range_zones_ignored() {
        let mut image = LedImage::new(100);
        image.set_key(16, Rgb::BLUE);
        image.set_divider(15, Rgb::BLUE);
        image.set_tower(2, 0, Rgb::BLUE);
        image.set_tower(0, 3, Rgb::BLUE);
        assert!(image.pixels().iter().all(|&px| px == Rgb::OFF));
    }

    #[test]
    fn test_dirty_flag_is_consumed() {
        let mut image = LedImage::new(100);
        assert!(image.take_dirty());
        assert!(!image.take_dirty());
        image.update();
        assert!(image.take_dirty());
        assert!(!image.take_dirty());
    }

    #[test]
    fn test_strip_len() {
        assert_eq!(STRIP_LEN, 65);
    }
}
