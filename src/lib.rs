#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod report;

mod axis;
mod config;
mod controller;
mod direction;
mod microseconds;
mod millidegrees;
mod rotator;

pub mod drive;
pub mod protocol;
pub mod store;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use axis::{AngleLimits, Axis, AxisMode, AxisState, Speed};
pub use config::{pwm_prescaler, Config, DriveMode, Protocol, PWM_PRESCALERS};
pub use controller::{ControllerState, Outcome, Query};
pub use direction::Direction;
pub use microseconds::MicroSeconds;
pub use millidegrees::MilliDegrees;
pub use report::{HexBytes, MotionEcho};
pub use rotator::Rotator;
