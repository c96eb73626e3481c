use embedded_hal::digital::PinState;
use ufmt_macros::uDebug;

/// Describes the direction in which an axis rotates.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    /// Forward is associated with a "high" direction signal.
    Forward,
    /// Backward is associated with a "low" direction signal.
    Backward,
}
impl Direction {
    /// Returns the level of the direction pin for this direction.
    pub fn pin_state(&self) -> PinState {
        match self {
            Direction::Forward => PinState::High,
            Direction::Backward => PinState::Low,
        }
    }

    /// Returns `1` for forward and `-1` for backward.
    pub fn signum(&self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Name used in status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        }
    }
}
