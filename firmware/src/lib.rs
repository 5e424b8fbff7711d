//! RP2040 firmware for the airslider arcade controller.
//!
//! The controller emulates the cabinet's slider and the two tower LED
//! boards over one USB composite device, with a keyboard fallback for
//! non-arcade front-ends.
//!
//! # Hardware Configuration
//!
//! | Function            | GPIO   | Description                           |
//! |---------------------|--------|---------------------------------------|
//! | RGB data            | 2      | WS2812B chain (slider + towers)       |
//! | I2C0 SDA            | 4      | Touch controllers                     |
//! | I2C0 SCL            | 5      | Touch controllers                     |
//! | Test button         | 6      | Cabinet test switch                   |
//! | Service button      | 7      | Cabinet service switch                |
//! | Function button     | 8      | Held at power-up: keyboard mode       |
//! | IR mux select       | 16..18 | Air sensor multiplexer (reserved)     |
//! | IR sense            | 26     | Air sensor input (reserved)           |
//!
//! Three MPR121 touch controllers share the I²C bus at 0x5A, 0x5C and
//! 0x5D; together they cover the 32 slider sensors.
//!
//! # Architecture
//!
//! Both cores run a dedicated embassy executor:
//!
//! - **Core 1** scans the touch controllers in a tight loop and publishes
//!   the result through [`shared::TOUCH`].
//! - **Core 0** runs the USB device task plus one output task: in arcade
//!   mode it multiplexes the three serial protocol streams and the
//!   auto-report ticker, in keyboard mode it streams NKRO reports and
//!   paces the reactive lighting.
//!
//! The LED image and strip belong to the output task alone; the scan loop
//! only raises the dirty flag.
//!
//! # Modules
//!
//! - [`config`]: board constants (addresses, cadences, USB identity)
//! - [`mpr121`]: MPR121 touch controller driver
//! - [`touch`]: the three-chip slider façade
//! - [`lights`]: WS2812B commit path
//! - [`usb`]: composite device descriptors and class setup
//! - [`shared`]: cross-core state
//!
//! # Features
//!
//! - **`dev-panic`** (default): panic via `panic-probe` (prints over RTT)
//! - **`prod-panic`**: panic via `panic-reset` (silent reset)

#![no_std]

// Ensure exactly one panic handler is selected
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they define conflicting panic handlers");

pub mod config;
pub mod lights;
pub mod mpr121;
pub mod shared;
pub mod touch;
pub mod usb;

pub use lights::LedStrip;
pub use mpr121::Mpr121;
pub use touch::TouchSlider;
