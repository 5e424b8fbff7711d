//! MPR121 capacitive touch controller driver.
//!
//! Minimal blocking driver for the parts of the chip this firmware uses:
//! bring-up into run mode, the touched-status bitmap, and the filtered
//! electrode readouts. The struct only holds the address; the bus is
//! passed per call so three chips can share it.

use embedded_hal::i2c::I2c;

/// Electrodes per chip.
pub const ELECTRODE_COUNT: usize = 12;

// Register map
const TOUCH_STATUS: u8 = 0x00;
const ELECTRODE_FILTERED_DATA: u8 = 0x04;
const MAX_HALF_DELTA_RISING: u8 = 0x2B;
const NOISE_HALF_DELTA_RISING: u8 = 0x2C;
const NOISE_COUNT_LIMIT_RISING: u8 = 0x2D;
const FILTER_DELAY_COUNT_RISING: u8 = 0x2E;
const MAX_HALF_DELTA_FALLING: u8 = 0x2F;
const NOISE_HALF_DELTA_FALLING: u8 = 0x30;
const NOISE_COUNT_LIMIT_FALLING: u8 = 0x31;
const FILTER_DELAY_COUNT_FALLING: u8 = 0x32;
const NOISE_HALF_DELTA_TOUCHED: u8 = 0x33;
const NOISE_COUNT_LIMIT_TOUCHED: u8 = 0x34;
const FILTER_DELAY_COUNT_TOUCHED: u8 = 0x35;
const TOUCH_THRESHOLD: u8 = 0x41;
const RELEASE_THRESHOLD: u8 = 0x42;
const DEBOUNCE: u8 = 0x5B;
const CONFIG1: u8 = 0x5C;
const CONFIG2: u8 = 0x5D;
const ELECTRODE_CONFIG: u8 = 0x5E;
const SOFT_RESET: u8 = 0x80;

/// Touch trip threshold applied to every electrode.
const TOUCH_TRIP: u8 = 15;

/// Release trip threshold applied to every electrode.
const RELEASE_TRIP: u8 = 7;

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mpr121Error<E> {
    /// I²C transfer failed.
    Bus(E),
    /// A register readback did not match the post-reset default; the chip
    /// is left un-initialized.
    ConfigMismatch,
}

impl<E> From<E> for Mpr121Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// One MPR121 on the shared bus.
pub struct Mpr121 {
    address: u8,
}

impl Mpr121 {
    #[must_use]
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Reset the chip and bring it into run mode on all 12 electrodes.
    ///
    /// Thresholds and the baseline filter follow the datasheet's quick
    /// start values; touch/release trip points are 15/7.
    ///
    /// # Errors
    ///
    /// [`Mpr121Error::ConfigMismatch`] if CONFIG2 does not read back at
    /// its post-reset default, in which case the chip is left in stop
    /// mode and its reads will report nothing touched.
    pub fn init<I2C: I2c>(&self, i2c: &mut I2C) -> Result<(), Mpr121Error<I2C::Error>> {
        self.write8(i2c, SOFT_RESET, 0x63)?;

        // Config registers only accept writes in stop mode.
        self.write8(i2c, ELECTRODE_CONFIG, 0x00)?;

        // A soft reset leaves CONFIG2 at 0x24 (CDT=1, SFI=0, ESI=4).
        if self.read8(i2c, CONFIG2)? != 0x24 {
            return Err(Mpr121Error::ConfigMismatch);
        }

        for electrode in 0..ELECTRODE_COUNT as u8 {
            self.set_thresholds(i2c, electrode, TOUCH_TRIP, RELEASE_TRIP)?;
        }

        // Baseline tracking filter.
        self.write8(i2c, MAX_HALF_DELTA_RISING, 0x01)?;
        self.write8(i2c, MAX_HALF_DELTA_FALLING, 0x01)?;
        self.write8(i2c, NOISE_HALF_DELTA_RISING, 0x01)?;
        self.write8(i2c, NOISE_HALF_DELTA_FALLING, 0x05)?;
        self.write8(i2c, NOISE_HALF_DELTA_TOUCHED, 0x00)?;
        self.write8(i2c, NOISE_COUNT_LIMIT_RISING, 0x0E)?;
        self.write8(i2c, NOISE_COUNT_LIMIT_FALLING, 0x01)?;
        self.write8(i2c, NOISE_COUNT_LIMIT_TOUCHED, 0x00)?;
        self.write8(i2c, FILTER_DELAY_COUNT_RISING, 0x00)?;
        self.write8(i2c, FILTER_DELAY_COUNT_FALLING, 0x00)?;
        self.write8(i2c, FILTER_DELAY_COUNT_TOUCHED, 0x00)?;

        // DT=0, DR=0: no debounce, the scan loop is fast enough.
        self.write8(i2c, DEBOUNCE, 0x00)?;
        // FFI=0 (6 samples), CDC=16 uA.
        self.write8(i2c, CONFIG1, 0x10)?;
        // CDT=1 (0.5 us charge), SFI=0 (4 samples), ESI=0 (1 ms period).
        self.write8(i2c, CONFIG2, 0x20)?;

        // CL=10 (baseline tracking on), proximity off, 12 electrodes:
        // enter run mode.
        self.write8(i2c, ELECTRODE_CONFIG, 0x8F)?;

        Ok(())
    }

    /// Set the touch and release trip thresholds for one electrode.
    ///
    /// Threshold registers only accept writes in stop mode; the previous
    /// mode is restored afterwards.
    pub fn set_thresholds<I2C: I2c>(
        &self,
        i2c: &mut I2C,
        electrode: u8,
        touch: u8,
        release: u8,
    ) -> Result<(), I2C::Error> {
        let mode = self.read8(i2c, ELECTRODE_CONFIG)?;
        if mode != 0 {
            self.write8(i2c, ELECTRODE_CONFIG, 0x00)?;
        }

        self.write8(i2c, TOUCH_THRESHOLD + electrode * 2, touch)?;
        self.write8(i2c, RELEASE_THRESHOLD + electrode * 2, release)?;

        if mode != 0 {
            self.write8(i2c, ELECTRODE_CONFIG, mode)?;
        }
        Ok(())
    }

    /// The touched-status bitmap, electrodes 0..11 in the low bits.
    pub fn touched_mask<I2C: I2c>(&self, i2c: &mut I2C) -> Result<u16, I2C::Error> {
        self.read16(i2c, TOUCH_STATUS)
    }

    /// The filtered 10-bit readout of every electrode, in one burst read.
    pub fn electrode_values<I2C: I2c>(
        &self,
        i2c: &mut I2C,
    ) -> Result<[u16; ELECTRODE_COUNT], I2C::Error> {
        let mut raw = [0u8; ELECTRODE_COUNT * 2];
        i2c.write_read(self.address, &[ELECTRODE_FILTERED_DATA], &mut raw)?;

        let mut values = [0u16; ELECTRODE_COUNT];
        for (electrode, value) in values.iter_mut().enumerate() {
            *value = u16::from_le_bytes([raw[electrode * 2], raw[electrode * 2 + 1]]);
        }
        Ok(values)
    }

    fn write8<I2C: I2c>(&self, i2c: &mut I2C, register: u8, value: u8) -> Result<(), I2C::Error> {
        i2c.write(self.address, &[register, value])
    }

    fn read8<I2C: I2c>(&self, i2c: &mut I2C, register: u8) -> Result<u8, I2C::Error> {
        let mut value = [0u8; 1];
        i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }

    fn read16<I2C: I2c>(&self, i2c: &mut I2C, register: u8) -> Result<u16, I2C::Error> {
        let mut value = [0u8; 2];
        i2c.write_read(self.address, &[register], &mut value)?;
        Ok(u16::from_le_bytes(value))
    }
}
