use heapless::{String, Vec};

use super::Error;
use crate::{
    protocol::{Frame, FRAME_LEN, LINE_CAPACITY, SYNC},
    Protocol,
};

/// Accumulates bytes into complete frames.
///
/// Binary frames start at a sync byte and are cut after [FRAME_LEN] bytes.
/// Bytes seen between frames that are not a sync byte are dropped, so the
/// stream realigns after line noise. Text frames end at `\n`;
/// blank lines are skipped, and a line that overflows the buffer is reported
/// once and then discarded up to its newline.
pub struct FrameAssembler {
    protocol: Protocol,
    binary: Vec<u8, FRAME_LEN>,
    line: String<LINE_CAPACITY>,
    discarding: bool,
}

impl FrameAssembler {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            binary: Vec::new(),
            line: String::new(),
            discarding: false,
        }
    }

    /// Forgets any partial frame.
    pub fn reset(&mut self) {
        self.binary.clear();
        self.line.clear();
        self.discarding = false;
    }

    /// Feeds one byte, returning a frame (or an error) when one completes.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, Error>> {
        match self.protocol {
            Protocol::PelcoD => self.push_binary(byte).map(Ok),
            Protocol::Text => self.push_text(byte),
        }
    }

    fn push_binary(&mut self, byte: u8) -> Option<Frame> {
        if self.binary.is_empty() && byte != SYNC[0] {
            return None;
        }
        // Cannot overflow: the buffer is drained as soon as it is full.
        let _ = self.binary.push(byte);
        if self.binary.is_full() {
            let mut frame = [0u8; FRAME_LEN];
            frame.copy_from_slice(&self.binary);
            self.binary.clear();
            Some(Frame::Binary(frame))
        } else {
            None
        }
    }

    fn push_text(&mut self, byte: u8) -> Option<Result<Frame, Error>> {
        if byte == b'\n' {
            let line = core::mem::take(&mut self.line);
            if core::mem::take(&mut self.discarding) || line.trim().is_empty() {
                return None;
            }
            return Some(Ok(Frame::Text(line)));
        }
        if self.discarding {
            return None;
        }
        match self.line.push(byte as char) {
            Ok(()) => None,
            Err(()) => {
                self.line.clear();
                self.discarding = true;
                Some(Err(Error::BufferOverflow))
            }
        }
    }
}
