//! Persistence of the angle estimates.

use ufmt_macros::uDebug;

use crate::Axis;

/// Angle in tenths of a degree, as stored.
pub type DeciDegrees = i16;

/// Contents of an erased EEPROM cell pair.
const ERASED: [u8; 2] = [0xFF, 0xFF];

/// Bytes taken by one stored angle.
const SLOT_LEN: u16 = 2;

/// Storage failures.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The layout does not fit the device.
    OutOfRange,
    /// The device rejected the access.
    Io,
}

/// Saves and restores one angle per axis.
pub trait PositionStore {
    fn save(&mut self, axis: Axis, angle: DeciDegrees) -> Result<(), Error>;

    /// Returns `None` if nothing was ever saved for `axis`.
    fn load(&mut self, axis: Axis) -> Result<Option<DeciDegrees>, Error>;
}

/// A store that keeps nothing.
impl PositionStore for () {
    fn save(&mut self, _axis: Axis, _angle: DeciDegrees) -> Result<(), Error> {
        Ok(())
    }

    fn load(&mut self, _axis: Axis) -> Result<Option<DeciDegrees>, Error> {
        Ok(None)
    }
}

/// Byte-addressed non-volatile memory.
pub trait ByteStore {
    /// Size of the device in bytes.
    fn capacity(&self) -> u16;

    fn read(&self, offset: u16, buf: &mut [u8]) -> Result<(), Error>;

    fn write(&mut self, offset: u16, buf: &[u8]) -> Result<(), Error>;
}

/// [PositionStore] over EEPROM-like memory.
///
/// Azimuth lives at `base`, elevation at `base + 2`, each as a big-endian
/// `i16`. An erased pair (`0xFFFF`) reads back as `None`, so an angle of
/// -0.1° cannot be stored.
pub struct EepromPositionStore<B> {
    bytes: B,
    base: u16,
}

impl<B: ByteStore> EepromPositionStore<B> {
    /// Creates a store, checking that both slots fit the device.
    pub fn new(bytes: B, base: u16) -> Result<Self, Error> {
        let end = base
            .checked_add(SLOT_LEN * Axis::ALL.len() as u16)
            .ok_or(Error::OutOfRange)?;
        if end > bytes.capacity() {
            return Err(Error::OutOfRange);
        }
        Ok(Self { bytes, base })
    }

    fn address(&self, axis: Axis) -> u16 {
        self.base + SLOT_LEN * axis.index() as u16
    }

    fn read_slot(&self, axis: Axis) -> Result<[u8; 2], Error> {
        let mut buf = [0u8; 2];
        self.bytes.read(self.address(axis), &mut buf)?;
        Ok(buf)
    }
}

impl<B: ByteStore> PositionStore for EepromPositionStore<B> {
    /// Writes only if the stored value differs, to spare EEPROM cycles.
    fn save(&mut self, axis: Axis, angle: DeciDegrees) -> Result<(), Error> {
        let new = angle.to_be_bytes();
        if self.read_slot(axis)? != new {
            let address = self.address(axis);
            self.bytes.write(address, &new)?;
        }
        Ok(())
    }

    fn load(&mut self, axis: Axis) -> Result<Option<DeciDegrees>, Error> {
        let stored = self.read_slot(axis)?;
        if stored == ERASED {
            Ok(None)
        } else {
            Ok(Some(DeciDegrees::from_be_bytes(stored)))
        }
    }
}
