//! Board-level constants: pin assignments, bus addresses, USB identity,
//! cadences.
//!
//! The pin constants are the authoritative wiring table. The entry point
//! claims peripherals by name, so each `p.PIN_n` it takes must match the
//! constant here.

use slider_core::ReportMode;

/// Data pin for the WS2812B chain; the towers hang off the slider's
/// strip.
pub const PIN_RGB_LED: u8 = 2;

/// I²C data pin for the touch controllers.
pub const PIN_SDA: u8 = 4;

/// I²C clock pin for the touch controllers.
pub const PIN_SCL: u8 = 5;

/// Cabinet test button.
pub const PIN_SW_TEST: u8 = 6;

/// Cabinet service button.
pub const PIN_SW_SERVICE: u8 = 7;

/// Function button; held at power-up it selects the keyboard fallback.
pub const PIN_SW_FUNCTION: u8 = 8;

/// Address selects for the air-tower IR multiplexer. Reserved: the IR
/// scanner is an external collaborator this firmware does not drive.
pub const PIN_MUX: [u8; 3] = [16, 17, 18];

/// Multiplexer output carrying the IR sensor readings. Reserved.
pub const PIN_AIR_SENSOR_IN: u8 = 26;

/// I²C clock for the touch controllers.
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Addresses of the three MPR121s, in slider order (left to right).
pub const TOUCH_ADDRESSES: [u8; 3] = [0x5A, 0x5C, 0x5D];

/// USB vendor ID.
pub const USB_VID: u16 = 0x1337;

/// USB product ID: `0x4000 | HID << 2 | CDC << 0` for one HID and three
/// CDC interfaces, so hosts never reuse a driver cached for a different
/// interface mix.
pub const USB_PID: u16 = 0x4000 | (1 << 2) | 3;

/// How sensor values are reported to the arcade host.
pub const REPORT_MODE: ReportMode = ReportMode::Binary;

/// Milliseconds between unprompted slider reports. The cabinet hardware
/// reports roughly every 12 ms; matching or exceeding that rate is fine.
pub const SLIDER_REPORT_DELAY_MS: u64 = 4;

/// In keyboard mode, commit lights every Nth HID frame. HID runs at
/// 1000 Hz, so the lights refresh at 1000 / N Hz.
pub const LIGHTS_UPDATE_DIVISOR: u32 = 4;

/// Milliseconds between throughput log lines.
pub const LOG_INTERVAL_MS: u64 = 1000;

/// Strip brightness at power-up.
pub const DEFAULT_BRIGHTNESS: u8 = 100;
