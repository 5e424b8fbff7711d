//! Protocol engines and shared state for the slider controller.
//!
//! This crate holds everything between the wire protocol and the hardware:
//! the slider and LED-board protocol engines, the in-memory LED image, the
//! touch snapshot the engines read, and the NKRO keyboard report used by
//! the fallback output mode. Nothing in here touches a peripheral, so the
//! whole crate runs and tests on the host.
//!
//! # Overview
//!
//! - [`touch`]: the 32-sensor touch snapshot ([`TouchSnapshot`])
//! - [`lights`]: the addressable LED image ([`LedImage`], [`Rgb`])
//! - [`slider`]: the slider protocol engine ([`SliderEngine`])
//! - [`led_board`]: the LED-board protocol engine ([`LedBoardEngine`]),
//!   instantiated once per board
//! - [`keyboard`]: the NKRO report bitmap ([`NkroReport`])
//!
//! # Example
//!
//! ```
//! use slider_core::{LedImage, ReportMode, SliderEngine, TouchSnapshot};
//! use slider_proto::SliderFrame;
//!
//! let mut engine = SliderEngine::new(ReportMode::Binary);
//! let mut lights = LedImage::new(100);
//! let mut touch = TouchSnapshot::empty();
//! touch.touched[0] = true;
//!
//! // A report request answers with 32 sensor bytes, rightmost key first.
//! let request = SliderFrame { command: 0x01, data: &[], checksum: 0xFE };
//! let response = engine
//!     .process_frame(&request, &touch, &mut lights)
//!     .unwrap();
//! assert_eq!(response.data.len(), 32);
//! assert_eq!(response.data[30], 0xFC);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod keyboard;
pub mod led_board;
pub mod lights;
pub mod slider;
pub mod touch;

// Re-export main types at crate root
pub use keyboard::{NkroReport, AIR_KEY_CODES, NKRO_REPORT_LEN, SLIDER_KEY_CODES};
pub use led_board::{LedBoardEngine, LedBoardResponse, BOARD_INFO, MAX_RESPONSE_PAYLOAD};
pub use lights::{LedImage, Rgb, DIVIDER_COUNT, STRIP_LEN, TOWER_GROUPS};
pub use slider::{ReportMode, SliderEngine, SliderResponse, HW_INFO, REPORT_LEN};
pub use touch::{TouchSnapshot, KEY_COUNT, SENSOR_COUNT};
