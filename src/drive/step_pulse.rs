use embedded_hal::{delay::DelayNs, digital::OutputPin};

use super::{AxisDriver, Error};
use crate::{AxisState, Direction, DriveMode, MicroSeconds};

/// Busy-wait stepper driver.
///
/// While the axis is enabled each `service` call emits one step pulse: high
/// for half the step period, then low for the other half. The call blocks for
/// the whole period.
///
/// # Type Parameters
///
/// - `P`: pulse pin
/// - `D`: direction pin
/// - `T`: delay provider
pub struct StepPulseDriver<P, D, T> {
    /// Pin to use for pulses.
    pin_pulse: P,
    /// Pin to use for direction indication.
    pin_direction: D,
    delay: T,
    /// Stores the current direction.
    direction: Direction,
    /// Delay around direction changes.
    settle: MicroSeconds,
}

impl<P: OutputPin, D: OutputPin, T: DelayNs> StepPulseDriver<P, D, T> {
    /// Creates a new `StepPulseDriver`.
    ///
    /// The pulse pin starts low and the direction pin is set to backward.
    ///
    /// # Parameters
    ///
    /// - `pin_pulse`: Pin to use for pulse signals.
    /// - `pin_direction`: Pin to use for direction signals.
    /// - `delay`: Delay provider for pulse timing.
    /// - `settle`: Delay before and after direction changes.
    pub fn new(
        pin_pulse: P,
        pin_direction: D,
        delay: T,
        settle: MicroSeconds,
    ) -> Result<Self, Error> {
        let direction = Direction::Backward;
        let mut driver = Self {
            pin_pulse,
            pin_direction,
            delay,
            direction,
            settle,
        };

        driver.pin_pulse.set_low().map_err(|_| Error::Pin)?;
        // Ensure that the direction we think we have is really what's set on
        // the pin.
        driver.force_set_direction(direction)?;

        Ok(driver)
    }

    /// Execute a step.
    fn do_step(&mut self, period: MicroSeconds) -> Result<(), Error> {
        let half = period.halved().get_value();
        self.pin_pulse.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(half);
        self.pin_pulse.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(half);
        Ok(())
    }

    /// Set the direction, but only if it needs changing.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Error> {
        if direction != self.direction {
            self.force_set_direction(direction)?;
        }
        Ok(())
    }

    /// Force set the direction, waiting for the driver to settle on both
    /// sides of the edge.
    fn force_set_direction(&mut self, direction: Direction) -> Result<(), Error> {
        self.delay.delay_us(self.settle.get_value());
        self.pin_direction
            .set_state(direction.pin_state())
            .map_err(|_| Error::Pin)?;
        self.direction = direction;
        self.delay.delay_us(self.settle.get_value());
        Ok(())
    }
}

impl<P: OutputPin, D: OutputPin, T: DelayNs> AxisDriver
    for StepPulseDriver<P, D, T>
{
    fn mode(&self) -> DriveMode {
        DriveMode::StepPulse
    }

    fn update(&mut self, state: &AxisState) -> Result<(), Error> {
        self.set_direction(state.direction)?;
        if !state.enabled {
            self.pin_pulse.set_low().map_err(|_| Error::Pin)?;
        }
        Ok(())
    }

    fn service(&mut self, state: &AxisState) -> Result<(), Error> {
        match state.speed.step_period() {
            Some(period) if state.enabled => self.do_step(period),
            _ => Ok(()),
        }
    }
}
