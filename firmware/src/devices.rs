mod clock;
mod eeprom;
#[cfg(feature = "pwm")]
mod pwm;

pub use clock::Clock;
pub use eeprom::Eeprom;
#[cfg(feature = "pwm")]
pub use pwm::PwmChannel;
