//! Command enums, frame views and wire constants.

/// First byte of every packet on the slider stream.
pub const SLIDER_SYNC: u8 = 0xFF;

/// Escape byte for the slider stream.
pub const SLIDER_ESCAPE: u8 = 0xFD;

/// First byte of every packet on the LED-board streams.
pub const LED_SYNC: u8 = 0xE0;

/// Escape byte for the LED-board streams.
pub const LED_ESCAPE: u8 = 0xD0;

/// Fixed address of the host in LED-board frames.
pub const ADDRESS_HOST: u8 = 0x01;

/// Fixed address of the board in LED-board frames.
pub const ADDRESS_BOARD: u8 = 0x02;

/// Maximum body size a parser will accumulate. The length field is a single
/// byte, so no legal frame can exceed this.
pub const MAX_BODY: usize = 256;

/// Slider commands the device implements.
///
/// The real hardware knows more subcommands; a running arcade title only
/// ever exercises these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SliderCommand {
    /// One-off request for a readout of all sensor pressures.
    Report = 0x01,
    /// Host pushes brightness plus key/divider colors.
    LedReport = 0x02,
    /// Start sending slider reports unprompted.
    EnableAutoReport = 0x03,
    /// Stop sending slider reports unprompted.
    DisableAutoReport = 0x04,
    /// Reset the slider.
    Reset = 0x10,
    /// Request the hardware identity of the slider.
    HardwareInfo = 0xF0,
}

impl SliderCommand {
    /// Look up a command by its wire ID.
    #[must_use]
    pub const fn from_u8(id: u8) -> Option<Self> {
        match id {
            0x01 => Some(Self::Report),
            0x02 => Some(Self::LedReport),
            0x03 => Some(Self::EnableAutoReport),
            0x04 => Some(Self::DisableAutoReport),
            0x10 => Some(Self::Reset),
            0xF0 => Some(Self::HardwareInfo),
            _ => None,
        }
    }

    /// The wire ID of this command.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// LED-board commands the device implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedBoardCommand {
    /// Resets the board and re-enables responses.
    Reset = 0x10,
    /// Sets the board timeout; answered by echoing the request bytes.
    SetTimeout = 0x11,
    /// Enables or disables responses to `SetLed`.
    SetDisableResponse = 0x14,
    /// Carries the billboard and tower LED data.
    SetLed = 0x82,
    /// Requests the board identity (model and firmware revision).
    BoardInfo = 0xF0,
    /// Requests the board status.
    BoardStatus = 0xF1,
    /// Requests the firmware checksum.
    FirmwareSum = 0xF2,
    /// Requests the protocol version.
    ProtocolVersion = 0xF3,
    /// Utility command answering which side (0 left, 1 right) this board
    /// serves. Not part of the official protocol.
    BoardSide = 0x27,
}

impl LedBoardCommand {
    /// Look up a command by its wire ID.
    #[must_use]
    pub const fn from_u8(id: u8) -> Option<Self> {
        match id {
            0x10 => Some(Self::Reset),
            0x11 => Some(Self::SetTimeout),
            0x14 => Some(Self::SetDisableResponse),
            0x82 => Some(Self::SetLed),
            0xF0 => Some(Self::BoardInfo),
            0xF1 => Some(Self::BoardStatus),
            0xF2 => Some(Self::FirmwareSum),
            0xF3 => Some(Self::ProtocolVersion),
            0x27 => Some(Self::BoardSide),
            _ => None,
        }
    }

    /// The wire ID of this command.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// A parsed slider frame, borrowed from the parser's accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderFrame<'a> {
    /// The command ID as it arrived; not necessarily a known command.
    pub command: u8,
    /// The frame body.
    pub data: &'a [u8],
    /// The checksum byte as it arrived. Carried for the caller; the wire
    /// peer is trusted, so it is not enforced here.
    pub checksum: u8,
}

/// A parsed LED-board frame, borrowed from the parser's accumulator.
///
/// The two fixed address bytes are stripped during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedBoardFrame<'a> {
    /// The command ID as it arrived; not necessarily a known command.
    pub command: u8,
    /// The data following the command byte.
    pub data: &'a [u8],
    /// The checksum byte as it arrived, unenforced.
    pub checksum: u8,
}
