//! Sources of command frames.

mod assembler;
mod serial;
#[cfg(any(test, feature = "std"))]
mod tcp;

pub use assembler::FrameAssembler;
pub use serial::SerialTransport;
#[cfg(any(test, feature = "std"))]
pub use tcp::TcpTransport;

use ufmt_macros::uDebug;

use crate::protocol::Frame;

/// Non-blocking source of complete frames.
pub trait Transport {
    /// Returns the next complete frame, or `WouldBlock` if none is ready.
    fn poll_frame(&mut self) -> nb::Result<Frame, Error>;

    /// Returns `true` while a peer can send commands.
    fn is_connected(&mut self) -> bool;
}

/// Transport failures. None of them is fatal.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The peer went away.
    Disconnected,
    /// A text line did not fit the line buffer; it is discarded.
    BufferOverflow,
    /// The underlying device reported a read error.
    ReadFailed,
    /// A client could not be accepted or configured; the listener stays up.
    AcceptFailed,
}
impl Error {
    /// Console message for the error.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Disconnected => "Client disconnected.",
            Error::BufferOverflow => "Command line too long.",
            Error::ReadFailed => "Read failed.",
            Error::AcceptFailed => "Accepting client failed.",
        }
    }
}
