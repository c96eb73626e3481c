use ufmt_macros::uDebug;

/// Time in microseconds.
#[derive(Debug, uDebug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MicroSeconds(u32);
impl MicroSeconds {
    /// Creates a new `MicroSeconds`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the value as a `u32`.
    pub fn get_value(&self) -> u32 {
        self.0
    }

    /// Half of this duration, rounded down.
    ///
    /// A step period is split evenly between the high and low half of the
    /// pulse.
    pub fn halved(&self) -> MicroSeconds {
        MicroSeconds(self.0 / 2)
    }
}
