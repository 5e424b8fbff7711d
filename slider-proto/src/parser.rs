//! Resumable byte-driven frame parsers.
//!
//! One parser instance exists per serial stream. Bytes arrive with no
//! timing guarantees relative to frame boundaries, so each parser is a
//! small state machine that consumes one byte at a time and keeps partial
//! frames across calls. Escape sequences may straddle any split.
//!
//! The three streams share one machine shape and differ only in their
//! reserved bytes and in how many header bytes precede the length field,
//! so the state machine is written once and parameterized.

use crate::frame::{
    LedBoardFrame, SliderFrame, LED_ESCAPE, LED_SYNC, MAX_BODY, SLIDER_ESCAPE, SLIDER_SYNC,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the sync byte; anything else is discarded.
    Idle,
    /// Collecting the fixed header bytes that precede the length.
    Header(usize),
    /// Next byte is the body length.
    Length,
    /// Collecting body bytes until `length` of them have arrived.
    Body,
    /// Next byte is the checksum and completes the frame.
    Checksum,
}

/// A complete frame as delivered by [`FrameParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a, const H: usize> {
    /// The header bytes between the sync and the length field.
    pub header: [u8; H],
    /// The frame body.
    pub body: &'a [u8],
    /// The trailing checksum byte, undecoded and unenforced.
    pub checksum: u8,
}

/// Frame parser for one byte stream.
///
/// `H` is the number of header bytes between the sync byte and the length
/// field: one for the slider stream (the command), two for the LED-board
/// streams (the address pair).
///
/// Feed bytes with [`push_byte`](Self::push_byte); a returned frame borrows
/// the parser's accumulator and must be consumed before the next byte is
/// pushed. After delivering a frame the parser is back in its idle state.
pub struct FrameParser<const H: usize> {
    sync: u8,
    escape: u8,
    phase: Phase,
    header: [u8; H],
    length: usize,
    body: [u8; MAX_BODY],
    received: usize,
    escape_pending: bool,
}

impl<const H: usize> FrameParser<H> {
    /// Create a parser for a stream with the given reserved bytes.
    #[must_use]
    pub const fn new(sync: u8, escape: u8) -> Self {
        Self {
            sync,
            escape,
            phase: Phase::Idle,
            header: [0; H],
            length: 0,
            body: [0; MAX_BODY],
            received: 0,
            escape_pending: false,
        }
    }

    /// Discard any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.escape_pending = false;
        self.received = 0;
    }

    /// Whether a frame is partially received.
    ///
    /// This stays true while the host pauses mid-frame, which the output
    /// side uses to hold back unprompted traffic on the same stream.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Consume one byte from the stream.
    ///
    /// Returns a frame when this byte completes one; the parser is then
    /// fully reset for the next frame.
    pub fn push_byte(&mut self, raw: u8) -> Option<RawFrame<'_, H>> {
        // The sync byte is the only byte read without unescaping. Idle
        // noise that is not the sync byte is dropped.
        if self.phase == Phase::Idle {
            if raw == self.sync {
                self.phase = if H > 0 { Phase::Header(0) } else { Phase::Length };
            }
            return None;
        }

        if raw == self.escape {
            self.escape_pending = true;
            return None;
        }
        let byte = if self.escape_pending {
            self.escape_pending = false;
            raw.wrapping_add(1)
        } else {
            raw
        };

        match self.phase {
            Phase::Idle => None,
            Phase::Header(index) => {
                self.header[index] = byte;
                self.phase = if index + 1 == H {
                    Phase::Length
                } else {
                    Phase::Header(index + 1)
                };
                None
            }
            Phase::Length => {
                self.length = byte as usize;
                self.received = 0;
                self.phase = if byte == 0 { Phase::Checksum } else { Phase::Body };
                None
            }
            Phase::Body => {
                self.body[self.received] = byte;
                self.received += 1;
                if self.received == self.length {
                    self.phase = Phase::Checksum;
                }
                None
            }
            Phase::Checksum => {
                self.phase = Phase::Idle;
                self.received = 0;
                Some(RawFrame {
                    header: self.header,
                    body: &self.body[..self.length],
                    checksum: byte,
                })
            }
        }
    }
}

/// Parser for the slider stream.
///
/// Header layout after the sync byte: `command`, `length`.
pub struct SliderParser {
    inner: FrameParser<1>,
}

impl SliderParser {
    /// Create an idle slider parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: FrameParser::new(SLIDER_SYNC, SLIDER_ESCAPE),
        }
    }

    /// Consume one byte; returns a frame when this byte completes one.
    pub fn push_byte(&mut self, byte: u8) -> Option<SliderFrame<'_>> {
        let raw = self.inner.push_byte(byte)?;
        Some(SliderFrame {
            command: raw.header[0],
            data: raw.body,
            checksum: raw.checksum,
        })
    }

    /// Whether a frame is partially received.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.inner.in_progress()
    }

    /// Discard any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for SliderParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser for one LED-board stream.
///
/// Header layout after the sync byte: `dst`, `src`, `length`; the first
/// body byte is the command. The address pair is fixed on this bus and is
/// stripped here.
pub struct LedBoardParser {
    inner: FrameParser<2>,
}

impl LedBoardParser {
    /// Create an idle LED-board parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: FrameParser::new(LED_SYNC, LED_ESCAPE),
        }
    }

    /// Consume one byte; returns a frame when this byte completes one.
    ///
    /// A frame whose body is empty carries no command byte and cannot
    /// occur on a well-formed stream; it is dropped.
    pub fn push_byte(&mut self, byte: u8) -> Option<LedBoardFrame<'_>> {
        let raw = self.inner.push_byte(byte)?;
        let (&command, data) = raw.body.split_first()?;
        Some(LedBoardFrame {
            command,
            data,
            checksum: raw.checksum,
        })
    }

    /// Whether a frame is partially received.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.inner.in_progress()
    }

    /// Discard any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for LedBoardParser {
    fn default() -> Self {
        Self::new()
    }
}
