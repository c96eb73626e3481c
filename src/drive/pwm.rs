use embedded_hal::{delay::DelayNs, digital::OutputPin, pwm::SetDutyCycle};

use super::{AxisDriver, Error};
use crate::{AxisState, Direction, DriveMode, MicroSeconds};

/// Denominator of [crate::Speed::Duty].
const DUTY_SCALE: u16 = 255;

/// Hardware PWM stepper driver.
///
/// The timer produces the step carrier, so `service` has nothing to do and
/// the main loop never blocks on pulses. The duty is held while the axis is
/// enabled and dropped to zero while it is idle.
///
/// # Type Parameters
///
/// - `C`: PWM channel driving the pulse input
/// - `D`: direction pin
/// - `T`: delay provider
pub struct PwmDriver<C, D, T> {
    channel: C,
    pin_direction: D,
    delay: T,
    direction: Direction,
    settle: MicroSeconds,
    /// Duty currently applied to the channel.
    duty: u8,
}

impl<C: SetDutyCycle, D: OutputPin, T: DelayNs> PwmDriver<C, D, T> {
    /// Creates a new `PwmDriver` with the output off and the direction set
    /// to backward.
    pub fn new(
        channel: C,
        pin_direction: D,
        delay: T,
        settle: MicroSeconds,
    ) -> Result<Self, Error> {
        let direction = Direction::Backward;
        let mut driver = Self {
            channel,
            pin_direction,
            delay,
            direction,
            settle,
            duty: 0,
        };
        driver
            .channel
            .set_duty_cycle_fully_off()
            .map_err(|_| Error::Pwm)?;
        driver.force_set_direction(direction)?;
        Ok(driver)
    }

    /// Applies a duty out of 255, skipping the write if it is unchanged.
    fn set_duty(&mut self, duty: u8) -> Result<(), Error> {
        if duty != self.duty {
            self.channel
                .set_duty_cycle_fraction(duty as u16, DUTY_SCALE)
                .map_err(|_| Error::Pwm)?;
            self.duty = duty;
        }
        Ok(())
    }

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

impl<C: SetDutyCycle, D: OutputPin, T: DelayNs> AxisDriver
    for PwmDriver<C, D, T>
{
    fn mode(&self) -> DriveMode {
        DriveMode::Pwm
    }

    fn update(&mut self, state: &AxisState) -> Result<(), Error> {
        if state.direction != self.direction {
            // No pulses may reach the driver while the direction flips.
            self.set_duty(0)?;
            self.force_set_direction(state.direction)?;
        }
        let duty = match state.speed.duty() {
            Some(duty) if state.enabled => duty,
            _ => 0,
        };
        self.set_duty(duty)
    }

    fn service(&mut self, _state: &AxisState) -> Result<(), Error> {
        Ok(())
    }
}
