//! The slider touch façade over the three MPR121s.
//!
//! Hides the chip boundaries behind the 32-sensor layout: chips are read
//! in slider order and each chip's electrodes are walked from 11 down to
//! its lower bound, which matches how the flex PCB routes the pads. The
//! third chip only drives 8 sensors, so its walk stops at electrode 4.

use defmt::warn;
use embedded_hal::i2c::I2c;

use slider_core::SENSOR_COUNT;

use crate::config::TOUCH_ADDRESSES;
use crate::mpr121::Mpr121;

/// Per-chip lowest electrode in use.
const LOWER_BOUND: [u8; 3] = [0, 0, 4];

/// Scans the touch controllers and keeps the latest result.
pub struct TouchSlider {
    sensors: [Mpr121; 3],
    states: [bool; SENSOR_COUNT],
    readouts: [u16; SENSOR_COUNT],
}

impl TouchSlider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sensors: [
                Mpr121::new(TOUCH_ADDRESSES[0]),
                Mpr121::new(TOUCH_ADDRESSES[1]),
                Mpr121::new(TOUCH_ADDRESSES[2]),
            ],
            states: [false; SENSOR_COUNT],
            readouts: [0; SENSOR_COUNT],
        }
    }

    /// Bring up all three chips. A chip that fails to configure is left
    /// alone and its sensors read as untouched.
    pub fn init<I2C: I2c>(&self, i2c: &mut I2C) {
        for (index, sensor) in self.sensors.iter().enumerate() {
            if sensor.init(i2c).is_err() {
                warn!("touch controller {} failed to configure", index);
            }
        }
    }

    /// Scan the touched state of all 32 sensors.
    pub fn scan_touch_states<I2C: I2c>(&mut self, i2c: &mut I2C) -> &[bool; SENSOR_COUNT] {
        let mut index = 0;
        for (chip, sensor) in self.sensors.iter().enumerate() {
            let touched = sensor.touched_mask(i2c).unwrap_or(0);
            for electrode in (LOWER_BOUND[chip]..=11).rev() {
                self.states[index] = touched & (1 << electrode) != 0;
                index += 1;
            }
        }
        &self.states
    }

    /// Scan the filtered pressure readout of all 32 sensors.
    pub fn scan_touch_readouts<I2C: I2c>(&mut self, i2c: &mut I2C) -> &[u16; SENSOR_COUNT] {
        let mut index = 0;
        for (chip, sensor) in self.sensors.iter().enumerate() {
            let values = sensor.electrode_values(i2c).unwrap_or([0; 12]);
            for electrode in (LOWER_BOUND[chip]..=11).rev() {
                self.readouts[index] = values[electrode as usize];
                index += 1;
            }
        }
        &self.readouts
    }

    /// Whether either sensor of the given key was touched on the last
    /// scan.
    #[must_use]
    pub fn is_key_pressed(&self, key: usize) -> bool {
        self.states[key * 2] | self.states[key * 2 + 1]
    }

    /// The last scanned touched states.
    #[must_use]
    pub fn states(&self) -> &[bool; SENSOR_COUNT] {
        &self.states
    }

    /// The last scanned pressure readouts.
    #[must_use]
    pub fn readouts(&self) -> &[u16; SENSOR_COUNT] {
        &self.readouts
    }
}

impl Default for TouchSlider {
    fn default() -> Self {
        Self::new()
    }
}
