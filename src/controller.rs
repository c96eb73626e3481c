use ufmt_macros::uDebug;

use crate::{
    protocol::Command, Axis, AxisState, Config, Direction, MilliDegrees,
};

/// Angle estimates requested by a query.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Query {
    Azimuth,
    Elevation,
    Both,
}
impl Query {
    /// Axes covered by the query.
    pub fn axes(&self) -> &'static [Axis] {
        match self {
            Query::Azimuth => &[Axis::Azimuth],
            Query::Elevation => &[Axis::Elevation],
            Query::Both => &Axis::ALL,
        }
    }
}

/// Result of applying a command.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// Axis intent was updated.
    Applied,
    /// The command repeats the last applied one and was ignored.
    Duplicate,
    /// The angle estimates should be reported.
    Report(Query),
    /// Both angle estimates were reset to zero.
    Zeroed,
}

/// Intent of both axes, plus the memory used to drop repeated commands.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ControllerState {
    axes: [AxisState; 2],
    last_applied: Option<Command>,
    step_per_tick: MilliDegrees,
}

impl ControllerState {
    /// Creates a state with both axes idle at zero.
    pub fn new(config: &Config) -> Self {
        let speed = config.speed();
        Self {
            axes: [
                AxisState::new(speed, config.azimuth_limits()),
                AxisState::new(speed, config.elevation_limits()),
            ],
            last_applied: None,
            step_per_tick: config.step_per_tick,
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        &self.axes[axis.index()]
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        &mut self.axes[axis.index()]
    }

    /// Replaces the angle estimate of `axis`.
    pub fn set_angle(&mut self, axis: Axis, angle: MilliDegrees) {
        self.axis_mut(axis).set_angle(angle);
    }

    /// The last motion command that was applied.
    pub fn last_applied(&self) -> Option<Command> {
        self.last_applied
    }

    /// Applies a command to the axis intent.
    ///
    /// A motion command equal to the last applied one is ignored, except
    /// `Stop`, which is always applied. Queries and `SetZero` are neither
    /// suppressed nor remembered.
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::QueryAz => return Outcome::Report(Query::Azimuth),
            Command::QueryEl => return Outcome::Report(Query::Elevation),
            Command::QueryBoth => return Outcome::Report(Query::Both),
            Command::SetZero => {
                for axis in Axis::ALL {
                    self.set_angle(axis, MilliDegrees::zero());
                }
                return Outcome::Zeroed;
            }
            _ => {}
        }

        if command != Command::Stop && self.last_applied == Some(command) {
            return Outcome::Duplicate;
        }

        match command {
            Command::Stop => {
                self.axis_mut(Axis::Azimuth).stop();
                self.axis_mut(Axis::Elevation).stop();
            }
            Command::StopAz => self.axis_mut(Axis::Azimuth).stop(),
            Command::StopEl => self.axis_mut(Axis::Elevation).stop(),
            Command::RotateAz(direction) => {
                self.axis_mut(Axis::Azimuth).run(direction)
            }
            Command::RotateEl(direction) => {
                self.axis_mut(Axis::Elevation).run(direction)
            }
            Command::RotateBoth { az, el } => {
                self.axis_mut(Axis::Azimuth).run(az);
                self.axis_mut(Axis::Elevation).run(el);
            }
            Command::QueryAz
            | Command::QueryEl
            | Command::QueryBoth
            | Command::SetZero => {}
        }
        self.last_applied = Some(command);
        Outcome::Applied
    }

    /// Advances the angle estimate of every running axis by one tick.
    pub fn tick(&mut self) {
        let step = self.step_per_tick;
        for axis in self.axes.iter_mut() {
            axis.advance(step);
        }
    }

    /// Returns `true` if either axis is running.
    pub fn any_enabled(&self) -> bool {
        self.axes.iter().any(|axis| axis.enabled)
    }

    /// Pelco-D style bitmask of the current motion.
    ///
    /// Azimuth forward `0x02`, backward `0x04`; elevation forward `0x08`,
    /// backward `0x10`. Zero when both axes are idle.
    pub fn motion_code(&self) -> u8 {
        let az = self.axis(Axis::Azimuth);
        let el = self.axis(Axis::Elevation);
        let bits = |state: &AxisState, forward: u8, backward: u8| {
            match (state.enabled, state.direction) {
                (false, _) => 0,
                (true, Direction::Forward) => forward,
                (true, Direction::Backward) => backward,
            }
        };
        bits(az, 0x02, 0x04) | bits(el, 0x08, 0x10)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{direction::test::direction, AxisMode};
    use proptest::prelude::*;
    use Direction::{Backward, Forward};

    fn state() -> ControllerState {
        ControllerState::new(&Config::new())
    }

    fn mode(state: &ControllerState, axis: Axis) -> AxisMode {
        state.axis(axis).mode()
    }

    /// Strategy for generating any [Command].
    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Stop),
            Just(Command::StopAz),
            Just(Command::StopEl),
            direction().prop_map(Command::RotateAz),
            direction().prop_map(Command::RotateEl),
            (direction(), direction())
                .prop_map(|(az, el)| Command::RotateBoth { az, el }),
            Just(Command::QueryAz),
            Just(Command::QueryEl),
            Just(Command::QueryBoth),
            Just(Command::SetZero),
        ]
    }

    #[test]
    fn test_rotate_and_stop() {
        let mut state = state();
        assert_eq!(Outcome::Applied, state.apply(Command::RotateAz(Forward)));
        assert_eq!(AxisMode::RunningForward, mode(&state, Axis::Azimuth));
        assert_eq!(AxisMode::Idle, mode(&state, Axis::Elevation));

        assert_eq!(Outcome::Applied, state.apply(Command::Stop));
        assert_eq!(AxisMode::Idle, mode(&state, Axis::Azimuth));
        assert_eq!(AxisMode::Idle, mode(&state, Axis::Elevation));
    }

    #[test]
    fn test_single_axis_stop() {
        let mut state = state();
        state.apply(Command::RotateBoth {
            az: Backward,
            el: Forward,
        });
        state.apply(Command::StopAz);
        assert_eq!(AxisMode::Idle, mode(&state, Axis::Azimuth));
        assert_eq!(AxisMode::RunningForward, mode(&state, Axis::Elevation));

        state.apply(Command::RotateAz(Backward));
        state.apply(Command::StopEl);
        assert_eq!(AxisMode::RunningBackward, mode(&state, Axis::Azimuth));
        assert_eq!(AxisMode::Idle, mode(&state, Axis::Elevation));
    }

    #[test]
    fn test_duplicate_is_ignored() {
        let mut state = state();
        state.apply(Command::RotateAz(Forward));
        let before = state.clone();
        assert_eq!(Outcome::Duplicate, state.apply(Command::RotateAz(Forward)));
        assert_eq!(before, state);
    }

    #[test]
    fn test_duplicate_after_single_axis_stop() {
        // The remembered command is the stop, so rotating again applies.
        let mut state = state();
        state.apply(Command::RotateAz(Forward));
        state.apply(Command::StopAz);
        assert_eq!(Outcome::Applied, state.apply(Command::RotateAz(Forward)));
        assert!(state.axis(Axis::Azimuth).enabled);
    }

    #[test]
    fn test_repeated_stop_is_applied() {
        let mut state = state();
        assert_eq!(Outcome::Applied, state.apply(Command::Stop));
        assert_eq!(Outcome::Applied, state.apply(Command::Stop));
    }

    #[test]
    fn test_queries_are_not_remembered() {
        let mut state = state();
        state.apply(Command::RotateEl(Forward));
        assert_eq!(
            Outcome::Report(Query::Elevation),
            state.apply(Command::QueryEl)
        );
        assert_eq!(
            Outcome::Report(Query::Both),
            state.apply(Command::QueryBoth)
        );
        assert_eq!(Some(Command::RotateEl(Forward)), state.last_applied());
        assert_eq!(Outcome::Duplicate, state.apply(Command::RotateEl(Forward)));
    }

    #[test]
    fn test_set_zero() {
        let mut state = state();
        state.set_angle(Axis::Azimuth, MilliDegrees::from_degrees(120));
        state.set_angle(Axis::Elevation, MilliDegrees::from_degrees(30));
        state.apply(Command::RotateAz(Forward));
        assert_eq!(Outcome::Zeroed, state.apply(Command::SetZero));
        assert_eq!(MilliDegrees::zero(), state.axis(Axis::Azimuth).angle());
        assert_eq!(MilliDegrees::zero(), state.axis(Axis::Elevation).angle());
        assert!(state.axis(Axis::Azimuth).enabled);
    }

    #[test]
    fn test_tick() {
        let mut state = state();
        state.set_angle(Axis::Elevation, MilliDegrees::from_degrees(45));
        state.apply(Command::RotateBoth {
            az: Forward,
            el: Backward,
        });
        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(
            MilliDegrees::from_degrees(1),
            state.axis(Axis::Azimuth).angle()
        );
        assert_eq!(
            MilliDegrees::from_degrees(44),
            state.axis(Axis::Elevation).angle()
        );
    }

    #[test]
    fn test_azimuth_wraps_through_north() {
        let mut state = state();
        state.set_angle(Axis::Azimuth, MilliDegrees::from_degrees(350));
        state.apply(Command::RotateAz(Forward));
        for _ in 0..200 {
            state.tick();
        }
        assert_eq!(
            MilliDegrees::from_degrees(10),
            state.axis(Axis::Azimuth).angle()
        );
    }

    #[test]
    fn test_motion_code() {
        let mut state = state();
        assert_eq!(0x00, state.motion_code());
        state.apply(Command::RotateAz(Forward));
        assert_eq!(0x02, state.motion_code());
        state.apply(Command::RotateEl(Forward));
        assert_eq!(0x0A, state.motion_code());
        state.apply(Command::RotateBoth {
            az: Backward,
            el: Forward,
        });
        assert_eq!(0x0C, state.motion_code());
        state.apply(Command::StopEl);
        assert_eq!(0x04, state.motion_code());
    }

    proptest! {
        #[test]
        fn test_motion_code_matches_pelco_code(
            az in direction(),
            el in direction()
        ) {
            let command = Command::RotateBoth { az, el };
            let mut state = state();
            state.apply(command);
            assert_eq!(
                Some(command),
                Command::from_pelco_code(state.motion_code())
            );
        }
    }

    proptest! {
        #[test]
        fn test_queries_do_not_mutate(
            commands in proptest::collection::vec(command(), 0..20)
        ) {
            let mut state = state();
            for command in commands {
                state.apply(command);
            }
            state.tick();
            let before = state.clone();
            for query in [Command::QueryAz, Command::QueryEl, Command::QueryBoth] {
                state.apply(query);
                assert_eq!(before, state);
            }
        }
    }

    proptest! {
        #[test]
        fn test_any_enabled_tracks_axes(
            commands in proptest::collection::vec(command(), 0..50)
        ) {
            let mut state = state();
            for command in commands {
                state.apply(command);
                let expected = state.axis(Axis::Azimuth).enabled
                    || state.axis(Axis::Elevation).enabled;
                assert_eq!(expected, state.any_enabled());
                assert_eq!(expected, state.motion_code() != 0);
            }
        }
    }
}
