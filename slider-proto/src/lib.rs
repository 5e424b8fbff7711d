//! Wire protocol for the slider and LED-board serial endpoints.
//!
//! The host addresses the controller through three logical serial streams:
//! one slider device and two LED boards. All three use the same byte-framed
//! transport with in-band escaping; they differ only in their reserved bytes
//! and header layout.
//!
//! # Framing
//!
//! Every frame starts with a sync byte, which is the only byte read raw.
//! Every byte after it passes through the escape filter: the escape byte
//! means "the next byte arrived decremented, add one back". Symmetrically,
//! an outgoing byte equal to the sync or escape value is sent as the escape
//! byte followed by the value minus one.
//!
//! **Slider stream** (sync `0xFF`, escape `0xFD`):
//!
//! ```text
//! FF <command> <length> <data x length> <checksum>
//! ```
//!
//! The checksum is the two's complement of `command + length + sum(data)`,
//! so the logical bytes after the sync sum to zero modulo 256.
//!
//! **LED-board streams** (sync `0xE0`, escape `0xD0`):
//!
//! ```text
//! E0 <dst> <src> <length> <payload x length> <checksum>
//! ```
//!
//! `payload[0]` is the command; the rest is its data. The checksum is the
//! plain sum of all logical bytes after the sync, modulo 256. Addresses are
//! fixed (`1` = host, `2` = board); the parser strips them and the emitter
//! re-synthesizes them.
//!
//! # Overview
//!
//! - [`parser`]: resumable byte-driven frame parsers ([`SliderParser`],
//!   [`LedBoardParser`]); arbitrary stream splits and escape sequences
//!   crossing those splits are handled transparently
//! - [`emitter`]: frame encoders ([`encode_slider_frame`],
//!   [`encode_led_response`]) that apply the escape filter and compute the
//!   checksum as they write
//! - [`frame`]: command enums, frame views and wire constants
//!
//! # Example
//!
//! ```
//! use slider_proto::{encode_slider_frame, SliderCommand, SliderParser};
//!
//! let mut out = [0u8; 8];
//! let len = encode_slider_frame(SliderCommand::HardwareInfo.id(), &[], &mut out).unwrap();
//! assert_eq!(&out[..len], &[0xFF, 0xF0, 0x00, 0x10]);
//!
//! let mut parser = SliderParser::new();
//! let mut parsed = None;
//! for &byte in &out[..len] {
//!     if let Some(frame) = parser.push_byte(byte) {
//!         parsed = Some((frame.command, frame.checksum));
//!     }
//! }
//! assert_eq!(parsed, Some((0xF0, 0x10)));
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

pub mod emitter;
pub mod frame;
pub mod parser;

// Re-export main types at crate root
pub use emitter::{
    encode_led_response, encode_slider_frame, encoded_led_max, encoded_slider_max, EncodeError,
};
pub use frame::{
    LedBoardCommand, LedBoardFrame, SliderCommand, SliderFrame, ADDRESS_BOARD, ADDRESS_HOST,
    LED_ESCAPE, LED_SYNC, MAX_BODY, SLIDER_ESCAPE, SLIDER_SYNC,
};
pub use parser::{FrameParser, LedBoardParser, RawFrame, SliderParser};
