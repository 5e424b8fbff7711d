//! The LED-board protocol engine.
//!
//! The controller presents two of the arcade cabinet's LED boards, one per
//! air tower. Each board answers the stock command set with hardcoded
//! identity data and decodes its own 9-byte window of the SET_LED payload
//! into the tower lights. Every response carries the fixed status/report
//! framing; SET_LED responses can be suppressed by the host.

use heapless::Vec;
use slider_proto::{LedBoardCommand, LedBoardFrame};

use crate::lights::{LedImage, Rgb, TOWER_GROUPS};

/// Board identity payload: model string, revision and unit class, byte for
/// byte what the real board answers.
pub const BOARD_INFO: [u8; 16] = [
    0x31, 0x35, 0x30, 0x39, 0x33, 0x2D, 0x30, 0x36, 0x0A, 0x36, 0x37, 0x31, 0x30, 0x20, 0xFF, 0x90,
];

/// Largest payload any response carries (the identity payload).
pub const MAX_RESPONSE_PAYLOAD: usize = BOARD_INFO.len();

/// Where each board's tower triples start inside the SET_LED payload; the
/// bytes before them drive the cabinet billboard, which this controller
/// does not have.
const TOWER_DATA_OFFSET: [usize; 2] = [50 * 3, 60 * 3];

/// A response frame to be emitted on the board's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBoardResponse {
    pub command: LedBoardCommand,
    pub payload: Vec<u8, MAX_RESPONSE_PAYLOAD>,
}

impl LedBoardResponse {
    /// `MAX_RESPONSE_PAYLOAD` bounds every payload this engine produces.
    fn new(command: LedBoardCommand, payload: &[u8]) -> Self {
        let mut data = Vec::new();
        let _ = data.extend_from_slice(payload);
        Self {
            command,
            payload: data,
        }
    }
}

/// State machine for one LED-board endpoint.
pub struct LedBoardEngine {
    side: usize,
    responses_enabled: bool,
}

impl LedBoardEngine {
    /// Create the engine for one board; side 0 is the left tower, 1 the
    /// right.
    #[must_use]
    pub const fn new(side: usize) -> Self {
        Self {
            side,
            responses_enabled: true,
        }
    }

    /// Whether SET_LED commands are currently answered.
    #[must_use]
    pub fn responses_enabled(&self) -> bool {
        self.responses_enabled
    }

    /// Process one frame from the host.
    ///
    /// Returns the response to emit. Only SET_LED responses are subject to
    /// suppression; the tower lights are applied either way. Unknown
    /// commands are ignored.
    pub fn process_frame(
        &mut self,
        frame: &LedBoardFrame<'_>,
        lights: &mut LedImage,
    ) -> Option<LedBoardResponse> {
        let command = LedBoardCommand::from_u8(frame.command)?;
        let response = match command {
            LedBoardCommand::Reset => {
                self.responses_enabled = true;
                LedBoardResponse::new(command, &[])
            }
            LedBoardCommand::SetTimeout => {
                LedBoardResponse::new(command, frame.data.get(..2)?)
            }
            LedBoardCommand::SetDisableResponse => {
                let &disable = frame.data.first()?;
                self.responses_enabled = disable == 0;
                LedBoardResponse::new(command, &[disable])
            }
            LedBoardCommand::SetLed => {
                self.apply_tower_lights(frame.data, lights);
                if !self.responses_enabled {
                    return None;
                }
                LedBoardResponse::new(command, &[])
            }
            LedBoardCommand::BoardInfo => LedBoardResponse::new(command, &BOARD_INFO),
            LedBoardCommand::BoardStatus => LedBoardResponse::new(command, &[0x00; 4]),
            LedBoardCommand::FirmwareSum => LedBoardResponse::new(command, &[0xAD, 0xF7]),
            LedBoardCommand::ProtocolVersion => {
                LedBoardResponse::new(command, &[0x01, 0x01, 0x04])
            }
            LedBoardCommand::BoardSide => LedBoardResponse::new(command, &[self.side as u8]),
        };
        Some(response)
    }

    /// Pull this board's three BGR triples out of the SET_LED payload and
    /// write them to the tower, group 0 at the bottom. Marks the image
    /// for commit; the tower must not wait on slider traffic to refresh.
    fn apply_tower_lights(&self, data: &[u8], lights: &mut LedImage) {
        let offset = TOWER_DATA_OFFSET[self.side];
        let Some(window) = data.get(offset..offset + 3 * TOWER_GROUPS) else {
            return;
        };
        for (group, triple) in window.chunks_exact(3).enumerate() {
            lights.set_tower(self.side, group, Rgb::new(triple[1], triple[2], triple[0]));
        }
        lights.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(command: u8, data: &[u8]) -> LedBoardFrame<'_> {
        LedBoardFrame {
            command,
            data,
            checksum: 0,
        }
    }

    /// A SET_LED payload long enough to cover both boards' windows, with
    /// recognizable triples planted in each.
    fn set_led_payload() -> [u8; 192] {
        let mut data = [0u8; 192];
        for (board, &offset) in TOWER_DATA_OFFSET.iter().enumerate() {
            for group in 0..TOWER_GROUPS {
                let base = offset + group * 3;
                data[base] = 10 * board as u8 + group as u8; // blue
                data[base + 1] = 100 + group as u8; // red
                data[base + 2] = 200 + group as u8; // green
            }
        }
        data
    }

    #[test]
    fn test_board_info_response() {
        let mut board = LedBoardEngine::new(1);
        let mut lights = LedImage::new(100);
        let response = board
            .process_frame(&frame(0xF0, &[]), &mut lights)
            .unwrap();
        assert_eq!(response.command, LedBoardCommand::BoardInfo);
        assert_eq!(&response.payload[..], &BOARD_INFO);
    }

    #[test]
    fn test_status_sum_and_version_responses() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);

        let status = board.process_frame(&frame(0xF1, &[]), &mut lights).unwrap();
        assert_eq!(&status.payload[..], &[0x00, 0x00, 0x00, 0x00]);

        let sum = board.process_frame(&frame(0xF2, &[]), &mut lights).unwrap();
        assert_eq!(&sum.payload[..], &[0xAD, 0xF7]);

        let version = board.process_frame(&frame(0xF3, &[]), &mut lights).unwrap();
        assert_eq!(&version.payload[..], &[0x01, 0x01, 0x04]);
    }

    #[test]
    fn test_board_side_reports_index() {
        let mut lights = LedImage::new(100);
        for side in 0..2 {
            let mut board = LedBoardEngine::new(side);
            let response = board
                .process_frame(&frame(0x27, &[]), &mut lights)
                .unwrap();
            assert_eq!(&response.payload[..], &[side as u8]);
        }
    }

    #[test]
    fn test_set_timeout_echoes_request() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        let response = board
            .process_frame(&frame(0x11, &[0x12, 0x34]), &mut lights)
            .unwrap();
        assert_eq!(response.command, LedBoardCommand::SetTimeout);
        assert_eq!(&response.payload[..], &[0x12, 0x34]);
    }

    #[test]
    fn test_set_led_decodes_own_window() {
        for side in 0..2usize {
            let mut board = LedBoardEngine::new(side);
            let mut lights = LedImage::new(100);
            let data = set_led_payload();
            let response = board.process_frame(&frame(0x82, &data), &mut lights);
            assert!(response.is_some());

            // BGR on the wire becomes RGB in the image; towers sit at
            // chain index 56 (left) / 47 (right).
            let base = if side == 0 { 56 } else { 47 };
            for group in 0..TOWER_GROUPS {
                let expected = Rgb::new(
                    100 + group as u8,
                    200 + group as u8,
                    10 * side as u8 + group as u8,
                );
                assert_eq!(lights.pixels()[base + group * 3], expected);
            }
        }
    }

    #[test]
    fn test_set_led_marks_lights_dirty() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        // Drain the power-up dirty flag so the assertion sees only the
        // frame's own commit request.
        lights.take_dirty();

        let data = set_led_payload();
        board.process_frame(&frame(0x82, &data), &mut lights);
        assert!(lights.take_dirty());

        // Suppressed responses still commit the tower bytes.
        board.process_frame(&frame(0x14, &[0x01]), &mut lights);
        lights.take_dirty();
        assert_eq!(board.process_frame(&frame(0x82, &data), &mut lights), None);
        assert!(lights.take_dirty());
    }

    #[test]
    fn test_set_led_short_payload_skips_towers() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        lights.take_dirty();

        let response = board.process_frame(&frame(0x82, &[0u8; 64]), &mut lights);
        // Still answered; the window is simply out of range and nothing
        // needs a commit.
        assert!(response.is_some());
        assert!(lights.pixels().iter().all(|&px| px == Rgb::OFF));
        assert!(!lights.take_dirty());
    }

    #[test]
    fn test_response_suppression_round_trip() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        let data = set_led_payload();

        // Disabling acknowledges, then SET_LED goes quiet while the tower
        // bytes keep being applied.
        let ack = board
            .process_frame(&frame(0x14, &[0x01]), &mut lights)
            .unwrap();
        assert_eq!(&ack.payload[..], &[0x01]);
        assert!(!board.responses_enabled());

        for _ in 0..3 {
            assert_eq!(board.process_frame(&frame(0x82, &data), &mut lights), None);
        }
        assert_eq!(lights.pixels()[56], Rgb::new(100, 200, 0));

        // Everything else still answers.
        assert!(board.process_frame(&frame(0xF0, &[]), &mut lights).is_some());

        // Reset re-enables responses.
        let reset = board.process_frame(&frame(0x10, &[]), &mut lights).unwrap();
        assert_eq!(reset.command, LedBoardCommand::Reset);
        assert!(board.responses_enabled());
        assert!(board.process_frame(&frame(0x82, &data), &mut lights).is_some());
    }

    #[test]
    fn test_set_disable_response_zero_re_enables() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        board.process_frame(&frame(0x14, &[0x01]), &mut lights);
        assert!(!board.responses_enabled());
        board.process_frame(&frame(0x14, &[0x00]), &mut lights);
        assert!(board.responses_enabled());
    }

    #[test]
    fn test_unknown_command_ignored() {
        let mut board = LedBoardEngine::new(0);
        let mut lights = LedImage::new(100);
        assert_eq!(board.process_frame(&frame(0x83, &[]), &mut lights), None);
    }
}
