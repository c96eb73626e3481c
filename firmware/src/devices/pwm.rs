use core::convert::Infallible;

use arduino_hal::{
    port::{mode::PwmOutput, Pin},
    simple_pwm::{PwmPinOps, Timer2Pwm},
};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

/// A Timer2 PWM output as an `embedded-hal` [SetDutyCycle] channel.
pub struct PwmChannel<PIN> {
    pin: Pin<PwmOutput<Timer2Pwm>, PIN>,
}

impl<PIN: PwmPinOps<Timer2Pwm, Duty = u8>> PwmChannel<PIN> {
    /// Enables the output with zero duty.
    pub fn new(mut pin: Pin<PwmOutput<Timer2Pwm>, PIN>) -> Self {
        pin.set_duty(0);
        pin.enable();
        Self { pin }
    }
}

impl<PIN: PwmPinOps<Timer2Pwm, Duty = u8>> ErrorType for PwmChannel<PIN> {
    type Error = Infallible;
}

impl<PIN: PwmPinOps<Timer2Pwm, Duty = u8>> SetDutyCycle for PwmChannel<PIN> {
    fn max_duty_cycle(&self) -> u16 {
        self.pin.get_max_duty() as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.pin.set_duty(duty.min(u8::MAX as u16) as u8);
        Ok(())
    }
}
