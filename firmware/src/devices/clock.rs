use arduino_hal::pac::TC1;

/// Millisecond clock from the free-running 16-bit Timer1.
///
/// The counter is polled rather than driven by interrupts, so `millis` must
/// be called at least once per counter wrap (262 ms).
pub struct Clock {
    tc1: TC1,
    last_count: u16,
    /// Counts not yet folded into `millis`.
    pending: u32,
    millis: u32,
}

impl Clock {
    /// Timer counts per millisecond: 16 MHz with a prescaler of 64.
    const COUNTS_PER_MS: u32 = 250;

    /// Starts Timer1 in normal mode.
    pub fn new(tc1: TC1) -> Self {
        tc1.tccr1a().reset();
        tc1.tccr1b().write(|w| w.cs1().prescale_64());
        let last_count = tc1.tcnt1().read().bits();
        Self {
            tc1,
            last_count,
            pending: 0,
            millis: 0,
        }
    }

    /// Milliseconds since `new`, wrapping at `u32::MAX`.
    pub fn millis(&mut self) -> u32 {
        let count = self.tc1.tcnt1().read().bits();
        self.pending += count.wrapping_sub(self.last_count) as u32;
        self.last_count = count;

        let elapsed = self.pending / Self::COUNTS_PER_MS;
        self.pending %= Self::COUNTS_PER_MS;
        self.millis = self.millis.wrapping_add(elapsed);
        self.millis
    }
}
