//! Simulated devices for tests.
//!
//! Every device is a cheap handle onto shared state: clone it, hand one copy
//! to the code under test, and inspect the other.

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{Arc, Mutex},
};

use embedded_hal::{delay::DelayNs, digital, pwm};
use ufmt::uWrite;

use crate::store::{self, ByteStore};

#[derive(Default)]
struct PinRecord {
    high: bool,
    writes: usize,
    rising_edges: usize,
}

/// Output pin that records its level.
#[derive(Clone, Default)]
pub struct TestPin {
    record: Arc<Mutex<PinRecord>>,
}
impl TestPin {
    /// Creates a pin that starts low.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.record.lock().unwrap().high
    }

    /// Number of times the level was set.
    pub fn writes(&self) -> usize {
        self.record.lock().unwrap().writes
    }

    /// Number of low to high transitions.
    pub fn rising_edges(&self) -> usize {
        self.record.lock().unwrap().rising_edges
    }

    fn set(&mut self, high: bool) {
        let mut record = self.record.lock().unwrap();
        if high && !record.high {
            record.rising_edges += 1;
        }
        record.high = high;
        record.writes += 1;
    }
}
impl digital::ErrorType for TestPin {
    type Error = Infallible;
}
impl digital::OutputPin for TestPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// Delay that does not wait, but adds up the time it was asked to wait.
#[derive(Clone, Default)]
pub struct TestDelay {
    elapsed_ns: Arc<Mutex<u64>>,
}
impl TestDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ns(&self) -> u64 {
        *self.elapsed_ns.lock().unwrap()
    }
}
impl DelayNs for TestDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.elapsed_ns.lock().unwrap() += ns as u64;
    }
}

/// PWM channel with an 8-bit duty range that records every duty written.
#[derive(Clone, Default)]
pub struct TestPwm {
    history: Arc<Mutex<Vec<u16>>>,
}
impl TestPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last duty written, or zero.
    pub fn duty(&self) -> u16 {
        self.history.lock().unwrap().last().copied().unwrap_or(0)
    }

    pub fn history(&self) -> Vec<u16> {
        self.history.lock().unwrap().clone()
    }
}
impl pwm::ErrorType for TestPwm {
    type Error = Infallible;
}
impl pwm::SetDutyCycle for TestPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.history.lock().unwrap().push(duty);
        Ok(())
    }
}

#[derive(Default)]
struct SerialRecord {
    incoming: VecDeque<u8>,
    fail_when_drained: bool,
}

/// Serial port fed from the test.
#[derive(Clone, Default)]
pub struct TestSerial {
    record: Arc<Mutex<SerialRecord>>,
}
impl TestSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes to be read.
    pub fn send(&self, bytes: &[u8]) {
        self.record.lock().unwrap().incoming.extend(bytes);
    }

    /// Makes the read after the queued bytes fail once.
    pub fn fail_next_read(&self) {
        self.record.lock().unwrap().fail_when_drained = true;
    }
}
impl embedded_hal_v0::serial::Read<u8> for TestSerial {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        let mut record = self.record.lock().unwrap();
        match record.incoming.pop_front() {
            Some(byte) => Ok(byte),
            None if record.fail_when_drained => {
                record.fail_when_drained = false;
                Err(nb::Error::Other(()))
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

#[derive(Default)]
struct BytesRecord {
    data: Vec<u8>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory EEPROM.
#[derive(Clone, Default)]
pub struct TestBytes {
    record: Arc<Mutex<BytesRecord>>,
}
impl TestBytes {
    /// Creates a device of `capacity` bytes, all `0xFF`.
    pub fn erased(capacity: u16) -> Self {
        let record = BytesRecord {
            data: vec![0xFF; capacity as usize],
            ..Default::default()
        };
        Self {
            record: Arc::new(Mutex::new(record)),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.record.lock().unwrap().data.clone()
    }

    /// Number of write calls that reached the device.
    pub fn writes(&self) -> usize {
        self.record.lock().unwrap().writes
    }

    /// Makes every following write fail.
    pub fn fail_writes(&self) {
        self.record.lock().unwrap().fail_writes = true;
    }
}
impl ByteStore for TestBytes {
    fn capacity(&self) -> u16 {
        self.record.lock().unwrap().data.len() as u16
    }

    fn read(&self, offset: u16, buf: &mut [u8]) -> Result<(), store::Error> {
        let record = self.record.lock().unwrap();
        let start = offset as usize;
        let cells = record
            .data
            .get(start..start + buf.len())
            .ok_or(store::Error::OutOfRange)?;
        buf.copy_from_slice(cells);
        Ok(())
    }

    fn write(&mut self, offset: u16, buf: &[u8]) -> Result<(), store::Error> {
        let mut record = self.record.lock().unwrap();
        if record.fail_writes {
            return Err(store::Error::Io);
        }
        let start = offset as usize;
        record
            .data
            .get_mut(start..start + buf.len())
            .ok_or(store::Error::OutOfRange)?
            .copy_from_slice(buf);
        record.writes += 1;
        Ok(())
    }
}

/// Console that collects everything written to it.
#[derive(Clone, Default)]
pub struct Console {
    text: Arc<Mutex<String>>,
}
impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    /// Removes and returns everything written so far.
    pub fn take_lines(&self) -> Vec<String> {
        let lines = self.lines();
        self.text.lock().unwrap().clear();
        lines
    }
}
impl uWrite for Console {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.text.lock().unwrap().push_str(s);
        Ok(())
    }
}
