use ufmt_macros::uDebug;

use crate::{Direction, MicroSeconds, MilliDegrees};

/// One of the two rotator axes.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Axis {
    Azimuth,
    Elevation,
}
impl Axis {
    /// Both axes, azimuth first.
    pub const ALL: [Axis; 2] = [Axis::Azimuth, Axis::Elevation];

    /// Short label used on the console.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Azimuth => "AZ",
            Axis::Elevation => "EL",
        }
    }

    /// Index of the axis: 0 for azimuth, 1 for elevation.
    pub fn index(&self) -> usize {
        match self {
            Axis::Azimuth => 0,
            Axis::Elevation => 1,
        }
    }
}

/// Derived motion mode of an axis.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum AxisMode {
    Idle,
    RunningForward,
    RunningBackward,
}

/// Drive level of an axis.
///
/// Which variant an axis carries depends on the pulse strategy it is driven
/// with.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Speed {
    /// Full period of one step pulse, for busy-wait stepping.
    StepPeriod(MicroSeconds),
    /// PWM duty cycle, out of 255.
    Duty(u8),
}
impl Speed {
    /// Step period, if this is a busy-wait speed.
    pub fn step_period(&self) -> Option<MicroSeconds> {
        match self {
            Speed::StepPeriod(period) => Some(*period),
            Speed::Duty(_) => None,
        }
    }

    /// Duty cycle, if this is a PWM speed.
    pub fn duty(&self) -> Option<u8> {
        match self {
            Speed::StepPeriod(_) => None,
            Speed::Duty(duty) => Some(*duty),
        }
    }
}

/// How an angle estimate is kept inside its valid range.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum AngleLimits {
    /// Wrap into `[0, 360)` degrees.
    Wrap,
    /// Clamp into `[min, max]`.
    Clamp { min: MilliDegrees, max: MilliDegrees },
}
impl AngleLimits {
    /// Brings `angle` inside the limits.
    pub fn apply(&self, angle: MilliDegrees) -> MilliDegrees {
        match self {
            AngleLimits::Wrap => angle.normalize(),
            AngleLimits::Clamp { min, max } => angle.max(*min).min(*max),
        }
    }
}

/// Intent and dead-reckoned angle of one axis.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub struct AxisState {
    pub direction: Direction,
    pub enabled: bool,
    pub speed: Speed,
    angle: MilliDegrees,
    limits: AngleLimits,
}
impl AxisState {
    /// Creates an idle axis at angle zero (or the nearest in-range angle).
    pub fn new(speed: Speed, limits: AngleLimits) -> Self {
        Self {
            direction: Direction::Backward,
            enabled: false,
            speed,
            angle: limits.apply(MilliDegrees::zero()),
            limits,
        }
    }

    /// Current angle estimate.
    pub fn angle(&self) -> MilliDegrees {
        self.angle
    }

    /// Replaces the angle estimate, bringing it inside the axis limits.
    pub fn set_angle(&mut self, angle: MilliDegrees) {
        self.angle = self.limits.apply(angle);
    }

    /// Starts running in `direction`.
    pub fn run(&mut self, direction: Direction) {
        self.direction = direction;
        self.enabled = true;
    }

    /// Stops the axis. The direction is left as it was.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// Derived mode.
    pub fn mode(&self) -> AxisMode {
        match (self.enabled, self.direction) {
            (false, _) => AxisMode::Idle,
            (true, Direction::Forward) => AxisMode::RunningForward,
            (true, Direction::Backward) => AxisMode::RunningBackward,
        }
    }

    /// Advances the angle by one tick of `step` if the axis is running.
    pub fn advance(&mut self, step: MilliDegrees) {
        if self.enabled {
            let delta = step.get_value().saturating_mul(self.direction.signum());
            self.set_angle(self.angle + MilliDegrees::new(delta));
        }
    }
}
