use rotator::store::{self, ByteStore};

/// The ATmega328P EEPROM as a [ByteStore].
pub struct Eeprom(arduino_hal::Eeprom);

impl Eeprom {
    pub fn new(eeprom: arduino_hal::pac::EEPROM) -> Self {
        Self(arduino_hal::Eeprom::new(eeprom))
    }
}

impl ByteStore for Eeprom {
    fn capacity(&self) -> u16 {
        self.0.capacity()
    }

    fn read(&self, offset: u16, buf: &mut [u8]) -> Result<(), store::Error> {
        self.0.read(offset, buf).map_err(|_| store::Error::OutOfRange)
    }

    fn write(&mut self, offset: u16, buf: &[u8]) -> Result<(), store::Error> {
        self.0.write(offset, buf).map_err(|_| store::Error::OutOfRange)
    }
}
