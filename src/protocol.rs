//! Decoding of remote commands.
//!
//! Two framings carry the same command set: fixed 7-byte Pelco-D frames and
//! single-token text lines.

mod command;
mod pelco;
mod text;

pub use command::Command;
pub use pelco::{decode_frame, encode_frame, FRAME_LEN, SYNC};
pub use text::{decode_line, LINE_CAPACITY};

use ufmt_macros::uDebug;

/// A complete frame read from a transport.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Frame {
    Binary([u8; FRAME_LEN]),
    Text(heapless::String<LINE_CAPACITY>),
}

/// Decodes a frame of either framing.
pub fn decode(frame: &Frame) -> Result<Command, Error> {
    match frame {
        Frame::Binary(bytes) => decode_frame(bytes),
        Frame::Text(line) => decode_line(line),
    }
}

/// Reasons a frame does not decode to a command.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Fewer than [FRAME_LEN] bytes.
    FrameTooShort,
    /// More than [FRAME_LEN] bytes.
    FrameTooLong,
    /// The frame does not start with [SYNC].
    BadSyncBytes,
    /// A well-formed frame carrying an unmapped command code.
    UnknownCommandCode(u8),
    /// A text line that is not one of the known tokens.
    UnknownToken,
}
impl Error {
    /// Console message for the error.
    pub fn message(&self) -> &'static str {
        match self {
            Error::FrameTooShort => "Frame too short.",
            Error::FrameTooLong => "Frame too long.",
            Error::BadSyncBytes => "Invalid command format.",
            Error::UnknownCommandCode(_) | Error::UnknownToken => {
                "Unknown command."
            }
        }
    }
}
