//! USB composite device: NKRO keyboard plus three protocol serial ports.
//!
//! The arcade host talks to CDC interfaces 1, 2 and 3 (slider, LED board
//! 0, LED board 1); the HID interface carries the keyboard fallback. Both
//! are always enumerated so the device never changes identity between
//! modes.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::cdc_acm::{self, CdcAcmClass};
use embassy_usb::class::hid::{self, HidWriter, ReportId, RequestHandler};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config};

use slider_core::NKRO_REPORT_LEN;

use crate::config::{USB_PID, USB_VID};

/// Report ID of the NKRO keyboard report.
pub const HID_REPORT_ID: u8 = 1;

/// Bytes per HID write: the report ID followed by the bitmap.
pub const HID_WRITE_LEN: usize = NKRO_REPORT_LEN + 1;

/// NKRO keyboard report descriptor: one modifier byte, then a 248-bit
/// bitmap covering usages 0..=247, 32 bytes of report in total.
pub const NKRO_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x85, HID_REPORT_ID, //   Report ID (1)
    //
    // --- Modifiers (byte 0) ---
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x08, //   Report Count (8)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Key bitmap (bytes 1..=31) ---
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xF7, //   Usage Maximum (247)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0xF8, //   Report Count (248)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Device-level USB configuration.
#[must_use]
pub fn usb_config() -> Config<'static> {
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("airslider");
    config.product = Some("AIRSLIDER");
    config.serial_number = Some("RP2040");
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    config
}

/// Configure the HID keyboard interface in the USB builder.
///
/// Returns the HID writer for use by the keyboard output path.
pub fn configure_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut hid::State<'d>,
    request_handler: &'d mut NkroRequestHandler,
) -> HidWriter<'d, Driver<'d, USB>, HID_WRITE_LEN> {
    let config = hid::Config {
        report_descriptor: NKRO_REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: 1,
        max_packet_size: 64,
    };

    HidWriter::new(builder, state, config)
}

/// Configure one protocol serial port in the USB builder.
pub fn configure_serial<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut cdc_acm::State<'d>,
) -> CdcAcmClass<'d, Driver<'d, USB>> {
    CdcAcmClass::new(builder, state, 64)
}

/// HID request handler. GET_REPORT and SET_REPORT carry nothing on this
/// device; both are stubbed.
pub struct NkroRequestHandler;

impl RequestHandler for NkroRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}
