use ufmt_macros::uDebug;

use crate::{AngleLimits, MicroSeconds, MilliDegrees, Speed};

/// Framing of incoming commands.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Protocol {
    /// Fixed 7-byte Pelco-D frames.
    PelcoD,
    /// Newline-terminated text tokens.
    Text,
}

/// Pulse strategy used to drive the motors.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum DriveMode {
    /// Busy-wait step pulses.
    StepPulse,
    /// Hardware PWM carrier.
    Pwm,
}

/// Rotator configuration.
///
/// Built from constants on the board; there is no file to read it from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    pub protocol: Protocol,
    pub drive: DriveMode,
    /// Full step period for [DriveMode::StepPulse].
    pub step_period: MicroSeconds,
    /// Duty (out of 255) for [DriveMode::Pwm].
    pub pwm_duty: u8,
    /// Requested PWM carrier frequency.
    pub pwm_carrier_hz: u32,
    /// Wait before and after changing a direction pin.
    pub direction_settle: MicroSeconds,
    /// Interval between angle ticks.
    pub tick_interval_ms: u32,
    /// Angle advanced per tick by a running axis.
    pub step_per_tick: MilliDegrees,
    pub elevation_min: MilliDegrees,
    pub elevation_max: MilliDegrees,
    /// Interval of the periodic status line; `None` disables it.
    pub status_interval_ms: Option<u32>,
    /// Save the angle estimate when an axis stops.
    pub persist_on_stop: bool,
}

impl Config {
    /// Default configuration.
    pub const fn new() -> Self {
        Self {
            protocol: Protocol::PelcoD,
            drive: DriveMode::StepPulse,
            step_period: MicroSeconds::new(10),
            pwm_duty: 128,
            pwm_carrier_hz: 10_000,
            direction_settle: MicroSeconds::new(10),
            tick_interval_ms: 100,
            step_per_tick: MilliDegrees::new(100),
            elevation_min: MilliDegrees::zero(),
            elevation_max: MilliDegrees::from_degrees(90),
            status_interval_ms: Some(3000),
            persist_on_stop: true,
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_drive(mut self, drive: DriveMode) -> Self {
        self.drive = drive;
        self
    }

    pub fn with_step_period(mut self, step_period: MicroSeconds) -> Self {
        self.step_period = step_period;
        self
    }

    pub fn with_pwm(mut self, duty: u8, carrier_hz: u32) -> Self {
        self.pwm_duty = duty;
        self.pwm_carrier_hz = carrier_hz;
        self
    }

    pub fn with_direction_settle(mut self, settle: MicroSeconds) -> Self {
        self.direction_settle = settle;
        self
    }

    /// Sets the tick interval and the angle advanced per tick.
    ///
    /// A zero interval is raised to 1 ms.
    pub fn with_tick(mut self, interval_ms: u32, step: MilliDegrees) -> Self {
        self.tick_interval_ms = interval_ms.max(1);
        self.step_per_tick = step;
        self
    }

    /// Sets the elevation range. The bounds are swapped if given in reverse.
    pub fn with_elevation_range(
        mut self,
        min: MilliDegrees,
        max: MilliDegrees,
    ) -> Self {
        self.elevation_min = min.min(max);
        self.elevation_max = max.max(min);
        self
    }

    pub fn with_status_interval(mut self, interval_ms: Option<u32>) -> Self {
        self.status_interval_ms = interval_ms.map(|ms| ms.max(1));
        self
    }

    pub fn with_persist_on_stop(mut self, persist: bool) -> Self {
        self.persist_on_stop = persist;
        self
    }

    /// Drive level that matches the configured drive mode.
    pub fn speed(&self) -> Speed {
        match self.drive {
            DriveMode::StepPulse => Speed::StepPeriod(self.step_period),
            DriveMode::Pwm => Speed::Duty(self.pwm_duty),
        }
    }

    /// Angle limits of an axis.
    pub fn azimuth_limits(&self) -> AngleLimits {
        AngleLimits::Wrap
    }

    pub fn elevation_limits(&self) -> AngleLimits {
        AngleLimits::Clamp {
            min: self.elevation_min,
            max: self.elevation_max,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock prescalers of the ATmega328P 8-bit timers.
pub const PWM_PRESCALERS: [u32; 5] = [1, 8, 64, 256, 1024];

/// Picks the timer prescaler whose fast-PWM carrier is nearest `carrier_hz`.
///
/// A fast-PWM carrier on an 8-bit timer runs at `cpu_hz / prescaler / 256`.
pub fn pwm_prescaler(cpu_hz: u32, carrier_hz: u32) -> u32 {
    let mut best = PWM_PRESCALERS[0];
    let mut best_error = u32::MAX;
    for prescaler in PWM_PRESCALERS {
        let error = (cpu_hz / prescaler / 256).abs_diff(carrier_hz);
        if error < best_error {
            best = prescaler;
            best_error = error;
        }
    }
    best
}
