//! Turning axis intent into motor driver signals.

mod pwm;
mod step_pulse;

pub use pwm::PwmDriver;
pub use step_pulse::StepPulseDriver;

use ufmt_macros::uDebug;

use crate::{AxisState, DriveMode};

/// Pulse strategy for one axis.
///
/// `update` is called whenever the axis intent may have changed; `service`
/// once per pass of the main loop.
pub trait AxisDriver {
    /// The [crate::Speed] this driver acts on.
    fn mode(&self) -> DriveMode;

    /// Brings the direction pin and output in line with `state`.
    fn update(&mut self, state: &AxisState) -> Result<(), Error>;

    /// Does the periodic work of the strategy.
    fn service(&mut self, state: &AxisState) -> Result<(), Error>;
}

/// Driver failures.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A digital output pin could not be set.
    Pin,
    /// The PWM channel rejected a duty cycle.
    Pwm,
}
