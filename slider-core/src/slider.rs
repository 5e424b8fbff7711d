//! The slider protocol engine.
//!
//! Dispatches parsed slider frames, owns the auto-report flag, and builds
//! the report bodies the coordinator sends back. One request yields at most
//! one response; commands without a response stay silent, as do unknown
//! command IDs.

use heapless::Vec;
use slider_proto::{SliderCommand, SliderFrame};

use crate::lights::{LedImage, Rgb};
use crate::touch::{TouchSnapshot, KEY_COUNT};

/// Length of a slider report body: two sensor bytes per key.
pub const REPORT_LEN: usize = KEY_COUNT * 2;

/// Hardware identity payload: model string, revision and unit class, byte
/// for byte what the real board answers.
pub const HW_INFO: [u8; 16] = [
    0x31, 0x35, 0x33, 0x33, 0x30, 0x20, 0x20, 0x20, 0xA0, 0x30, 0x36, 0x37, 0x31, 0x32, 0xFF, 0x90,
];

/// Sensor byte reported for a pressed sensor in binary mode. High enough to
/// register as a press in-game, below the reserved bytes so report bodies
/// need no escaping.
const PRESSED_VALUE: u8 = 0xFC;

/// How report bodies represent a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportMode {
    /// 0xFC when the touch controller reports the sensor touched, 0x00
    /// otherwise. The controllers do their own thresholding, so this is
    /// the mode the firmware ships with.
    #[default]
    Binary,
    /// The filtered 10-bit readout scaled into the report byte range.
    Pressure,
}

/// A response frame to be emitted on the slider stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderResponse {
    pub command: SliderCommand,
    pub data: Vec<u8, REPORT_LEN>,
}

impl SliderResponse {
    /// `REPORT_LEN` bounds every payload this engine produces.
    fn new(command: SliderCommand, payload: &[u8]) -> Self {
        let mut data = Vec::new();
        let _ = data.extend_from_slice(payload);
        Self { command, data }
    }
}

/// State machine for the slider endpoint.
pub struct SliderEngine {
    auto_send_reports: bool,
    mode: ReportMode,
}

impl SliderEngine {
    #[must_use]
    pub const fn new(mode: ReportMode) -> Self {
        Self {
            auto_send_reports: false,
            mode,
        }
    }

    /// Whether the host has asked for unprompted reports.
    #[must_use]
    pub fn auto_send_reports(&self) -> bool {
        self.auto_send_reports
    }

    /// Process one frame from the host.
    ///
    /// Returns the response to emit, if the command has one.
    pub fn process_frame(
        &mut self,
        frame: &SliderFrame<'_>,
        touch: &TouchSnapshot,
        lights: &mut LedImage,
    ) -> Option<SliderResponse> {
        match SliderCommand::from_u8(frame.command)? {
            SliderCommand::Report => Some(self.build_report(touch)),
            SliderCommand::LedReport => {
                self.apply_led_report(frame.data, lights);
                None
            }
            SliderCommand::EnableAutoReport => {
                self.auto_send_reports = true;
                None
            }
            SliderCommand::DisableAutoReport => {
                self.auto_send_reports = false;
                Some(SliderResponse::new(SliderCommand::DisableAutoReport, &[]))
            }
            SliderCommand::Reset => {
                self.auto_send_reports = false;
                Some(SliderResponse::new(SliderCommand::Reset, &[]))
            }
            SliderCommand::HardwareInfo => {
                Some(SliderResponse::new(SliderCommand::HardwareInfo, &HW_INFO))
            }
        }
    }

    /// Build a report of all 32 sensors.
    ///
    /// The host indexes sensors from the physical top-right while this
    /// firmware stores them from the top-left, so the body walks the keys
    /// from 15 down to 0, each key's two sensors in order.
    #[must_use]
    pub fn build_report(&self, touch: &TouchSnapshot) -> SliderResponse {
        let mut data = Vec::new();
        for key in (0..KEY_COUNT).rev() {
            for sensor in [key * 2, key * 2 + 1] {
                let value = match self.mode {
                    ReportMode::Binary => {
                        if touch.touched[sensor] {
                            PRESSED_VALUE
                        } else {
                            0x00
                        }
                    }
                    ReportMode::Pressure => map_pressure(touch.pressures[sensor]),
                };
                let _ = data.push(value);
            }
        }
        SliderResponse {
            command: SliderCommand::Report,
            data,
        }
    }

    /// Apply an LED report: brightness byte, then 31 BGR triples starting
    /// at the right-hand key and alternating key, divider, key, divider.
    fn apply_led_report(&mut self, data: &[u8], lights: &mut LedImage) {
        let Some((&brightness, triples)) = data.split_first() else {
            return;
        };
        lights.set_brightness(brightness);

        for (i, triple) in triples.chunks_exact(3).take(31).enumerate() {
            let color = Rgb::new(triple[1], triple[2], triple[0]);
            if i % 2 == 0 {
                lights.set_key(15 - i / 2, color);
            } else {
                lights.set_divider(14 - i / 2, color);
            }
        }

        lights.update();
    }
}

/// Scale a 10-bit filtered readout into the report byte range, capped at
/// [`PRESSED_VALUE`] by construction.
fn map_pressure(value: u16) -> u8 {
    ((u32::from(value) * u32::from(PRESSED_VALUE)) / 0x400) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(command: u8, data: &[u8]) -> SliderFrame<'_> {
        SliderFrame {
            command,
            data,
            checksum: 0,
        }
    }

    fn engine_and_world() -> (SliderEngine, TouchSnapshot, LedImage) {
        (
            SliderEngine::new(ReportMode::Binary),
            TouchSnapshot::empty(),
            LedImage::new(100),
        )
    }

    #[test]
    fn test_quiet_report_is_all_zero() {
        let (engine, touch, _) = engine_and_world();
        let report = engine.build_report(&touch);
        assert_eq!(report.command, SliderCommand::Report);
        assert_eq!(report.data.len(), 32);
        assert!(report.data.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_report_orders_keys_right_to_left() {
        let (engine, mut touch, _) = engine_and_world();
        // Key 15 (sensors 30, 31) leads the body; key 0 (sensors 0, 1)
        // ends it.
        touch.touched[30] = true;
        touch.touched[1] = true;
        let report = engine.build_report(&touch);
        assert_eq!(report.data[0], 0xFC);
        assert_eq!(report.data[1], 0x00);
        assert_eq!(report.data[30], 0x00);
        assert_eq!(report.data[31], 0xFC);
    }

    #[test]
    fn test_pressure_mode_scales_readouts() {
        let engine = SliderEngine::new(ReportMode::Pressure);
        let mut touch = TouchSnapshot::empty();
        touch.pressures[31] = 1023;
        touch.pressures[30] = 512;
        touch.pressures[0] = 0;
        let report = engine.build_report(&touch);
        assert_eq!(report.data[0], 0x7E);
        assert_eq!(report.data[1], 0xFB);
        assert_eq!(report.data[30], 0x00);
        // No sensor value ever needs escaping.
        assert!(report.data.iter().all(|&b| b < 0xFD));
    }

    #[test]
    fn test_report_request_answers() {
        let (mut engine, touch, mut lights) = engine_and_world();
        let response = engine
            .process_frame(&frame(0x01, &[]), &touch, &mut lights)
            .unwrap();
        assert_eq!(response.command, SliderCommand::Report);
        assert_eq!(response.data.len(), 32);
    }

    #[test]
    fn test_enable_disable_auto_reports() {
        let (mut engine, touch, mut lights) = engine_and_world();
        assert!(!engine.auto_send_reports());

        // Enable is silent.
        let response = engine.process_frame(&frame(0x03, &[]), &touch, &mut lights);
        assert_eq!(response, None);
        assert!(engine.auto_send_reports());

        // Disable ACKs with an empty body.
        let response = engine
            .process_frame(&frame(0x04, &[]), &touch, &mut lights)
            .unwrap();
        assert_eq!(response.command, SliderCommand::DisableAutoReport);
        assert!(response.data.is_empty());
        assert!(!engine.auto_send_reports());
    }

    #[test]
    fn test_reset_clears_auto_flag_and_is_idempotent() {
        let (mut engine, touch, mut lights) = engine_and_world();
        engine.process_frame(&frame(0x03, &[]), &touch, &mut lights);
        assert!(engine.auto_send_reports());

        let first = engine.process_frame(&frame(0x10, &[]), &touch, &mut lights);
        let auto_after_first = engine.auto_send_reports();
        let second = engine.process_frame(&frame(0x10, &[]), &touch, &mut lights);

        assert_eq!(first, second);
        assert!(!auto_after_first);
        assert!(!engine.auto_send_reports());
        assert_eq!(first.unwrap().command, SliderCommand::Reset);
    }

    #[test]
    fn test_hardware_info_payload() {
        let (mut engine, touch, mut lights) = engine_and_world();
        let response = engine
            .process_frame(&frame(0xF0, &[]), &touch, &mut lights)
            .unwrap();
        assert_eq!(response.command, SliderCommand::HardwareInfo);
        assert_eq!(&response.data[..], &HW_INFO);
    }

    #[test]
    fn test_unknown_command_ignored() {
        let (mut engine, touch, mut lights) = engine_and_world();
        assert_eq!(
            engine.process_frame(&frame(0x42, &[]), &touch, &mut lights),
            None
        );
    }

    #[test]
    fn test_led_report_sets_brightness_without_response() {
        let (mut engine, touch, mut lights) = engine_and_world();
        // Drain the power-up dirty flag so the assertion below sees only
        // the report's own commit request.
        lights.take_dirty();

        let mut data = [0u8; 94];
        data[0] = 0x3F;
        let response = engine.process_frame(&frame(0x02, &data), &touch, &mut lights);
        assert_eq!(response, None);
        assert_eq!(lights.brightness(), 0x3F);
        assert!(lights.take_dirty());
    }

    #[test]
    fn test_led_report_triple_placement() {
        let (mut engine, touch, mut lights) = engine_and_world();
        let mut data = [0u8; 94];
        data[0] = 0xFF;
        for i in 0..31 {
            // Stamp each triple with its index: blue = i, red = i + 1,
            // green = i + 2.
            let offset = 1 + i * 3;
            data[offset] = i as u8;
            data[offset + 1] = i as u8 + 1;
            data[offset + 2] = i as u8 + 2;
        }
        engine.process_frame(&frame(0x02, &data), &touch, &mut lights);

        for i in 0..31usize {
            let expected = Rgb::new(i as u8 + 1, i as u8 + 2, i as u8);
            let index = if i % 2 == 0 {
                // Key 15 - i/2 occupies chain LEDs 3k and 3k + 1.
                (15 - i / 2) * 3
            } else {
                (14 - i / 2) * 3 + 2
            };
            assert_eq!(lights.pixels()[index], expected, "triple {i}");
        }
    }

    #[test]
    fn test_led_report_tolerates_short_body() {
        let (mut engine, touch, mut lights) = engine_and_world();
        // Brightness only: applied, no triples to place.
        engine.process_frame(&frame(0x02, &[0x20]), &touch, &mut lights);
        assert_eq!(lights.brightness(), 0x20);
        // Empty body: dropped outright.
        engine.process_frame(&frame(0x02, &[]), &touch, &mut lights);
        assert_eq!(lights.brightness(), 0x20);
    }
}
