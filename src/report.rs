//! Console output helpers.

use ufmt::{uDisplay, uWrite, Formatter};

/// Write an info line, expanding its arguments.
macro_rules! info {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "INFO: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}

/// Write a warning line, expanding its arguments.
macro_rules! warn {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "WARN: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}

/// Write an error line, expanding its arguments.
macro_rules! error {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "ERROR: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(nibble: u8) -> char {
    HEX_DIGITS[(nibble & 0x0F) as usize] as char
}

/// Echo of a motion code: four uppercase hex digits and a full stop, eg.
/// `000C.`.
pub struct MotionEcho(pub u8);

impl uDisplay for MotionEcho {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let code = self.0 as u16;
        for shift in [12, 8, 4, 0] {
            f.write_char(hex_digit((code >> shift) as u8))?;
        }
        f.write_char('.')
    }
}

/// Space separated uppercase hex dump, eg. `FF 01 00 02`.
pub struct HexBytes<'a>(pub &'a [u8]);

impl uDisplay for HexBytes<'_> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            f.write_char(hex_digit(byte >> 4))?;
            f.write_char(hex_digit(*byte))?;
        }
        Ok(())
    }
}
