use embedded_hal_v0::serial::Read;

use super::{Error, FrameAssembler, Transport};
use crate::{protocol::Frame, Protocol};

/// Frames read from a serial port.
///
/// Polling drains whatever bytes the port has ready and stops at the first
/// complete frame.
pub struct SerialTransport<R> {
    serial: R,
    assembler: FrameAssembler,
}

impl<R: Read<u8>> SerialTransport<R> {
    pub fn new(serial: R, protocol: Protocol) -> Self {
        Self {
            serial,
            assembler: FrameAssembler::new(protocol),
        }
    }
}

impl<R: Read<u8>> Transport for SerialTransport<R> {
    fn poll_frame(&mut self) -> nb::Result<Frame, Error> {
        loop {
            let byte = match self.serial.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(_)) => {
                    self.assembler.reset();
                    return Err(nb::Error::Other(Error::ReadFailed));
                }
            };
            if let Some(result) = self.assembler.push(byte) {
                return result.map_err(nb::Error::Other);
            }
        }
    }

    /// A serial line has no notion of a peer; it is always connected.
    fn is_connected(&mut self) -> bool {
        true
    }
}
