use embedded_hal::digital::{OutputPin, PinState};
use ufmt::{uWrite, uwriteln};

use crate::{
    controller::{ControllerState, Outcome},
    drive::{self, AxisDriver},
    protocol::{self, Command, Frame},
    report::{HexBytes, MotionEcho},
    store::PositionStore,
    transport::{self, Transport},
    Axis, Config, MilliDegrees,
};

/// The rotator: command intake, motor outputs and angle tracking.
///
/// Everything runs from [Rotator::poll], which the owner calls in a tight
/// loop with the current time.
///
/// # Type Parameters
///
/// - `T`: command transport
/// - `A`: azimuth driver
/// - `E`: elevation driver
/// - `L`: indicator pin, high while any axis runs
/// - `S`: position store
/// - `W`: console for responses and diagnostics
pub struct Rotator<T, A, E, L, S, W> {
    config: Config,
    state: ControllerState,
    transport: T,
    azimuth: A,
    elevation: E,
    indicator: L,
    store: S,
    console: W,
    connected: bool,
    next_tick_ms: Option<u32>,
    next_status_ms: Option<u32>,
}

impl<T, A, E, L, S, W> Rotator<T, A, E, L, S, W>
where
    T: Transport,
    A: AxisDriver,
    E: AxisDriver,
    L: OutputPin,
    S: PositionStore,
    W: uWrite,
{
    /// Creates the rotator, restoring saved angles and idling both axes.
    pub fn new(
        config: Config,
        mut transport: T,
        azimuth: A,
        elevation: E,
        indicator: L,
        store: S,
        console: W,
    ) -> Self {
        let connected = transport.is_connected();
        let mut rotator = Self {
            state: ControllerState::new(&config),
            config,
            transport,
            azimuth,
            elevation,
            indicator,
            store,
            console,
            connected,
            next_tick_ms: None,
            next_status_ms: None,
        };
        rotator.restore_angles();
        rotator.check_drive_modes();
        rotator.sync_outputs();
        info!(&mut rotator.console, "Rotator ready.");
        rotator
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one pass of the main loop.
    ///
    /// Brings the angle estimates up to `now_ms` under the axis intent that
    /// held until then, handles at most one frame, services both drivers and
    /// reports the periodic status.
    pub fn poll(&mut self, now_ms: u32) {
        self.catch_up_ticks(now_ms);
        self.check_link();
        match self.transport.poll_frame() {
            Ok(frame) => self.handle_frame(&frame),
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(transport::Error::Disconnected)) => {
                self.connected = false;
                info!(&mut self.console, "Client disconnected.");
            }
            Err(nb::Error::Other(err)) => {
                error!(&mut self.console, "{}", err.message())
            }
        }
        self.service_drives();
        self.report_status_if_due(now_ms);
    }

    /// Writes the status line.
    pub fn report_status(&mut self) {
        let az = *self.state.axis(Axis::Azimuth);
        let el = *self.state.axis(Axis::Elevation);
        info!(
            &mut self.console,
            "Current Status - AZ Direction: {}, EL Direction: {}, AZ Control: {}, EL Control: {}, AZ={}, EL={}",
            az.direction.name(),
            el.direction.name(),
            on_off(az.enabled),
            on_off(el.enabled),
            az.angle(),
            el.angle()
        );
    }

    fn check_link(&mut self) {
        let connected = self.transport.is_connected();
        if connected && !self.connected {
            info!(&mut self.console, "Client connected.");
        }
        self.connected = connected;
    }

    fn handle_frame(&mut self, frame: &Frame) {
        if let Frame::Binary(bytes) = frame {
            info!(
                &mut self.console,
                "Received command (HEX): {}",
                HexBytes(bytes)
            );
        }
        match protocol::decode(frame) {
            Ok(command) => self.execute(command),
            Err(err) => error!(&mut self.console, "{}", err.message()),
        }
    }

    fn execute(&mut self, command: Command) {
        let was_enabled = Axis::ALL.map(|axis| self.state.axis(axis).enabled);
        match self.state.apply(command) {
            Outcome::Applied => {
                self.sync_outputs();
                if self.config.persist_on_stop {
                    for axis in Axis::ALL {
                        let stopped = was_enabled[axis.index()]
                            && !self.state.axis(axis).enabled;
                        if stopped {
                            self.save_angle(axis);
                        }
                    }
                }
                let echo = MotionEcho(self.state.motion_code());
                let _ = uwriteln!(&mut self.console, "{}", echo);
            }
            Outcome::Duplicate => {}
            Outcome::Report(query) => {
                for axis in query.axes() {
                    self.report_angle(*axis);
                }
            }
            Outcome::Zeroed => {
                for axis in Axis::ALL {
                    self.save_angle(axis);
                }
                let _ = uwriteln!(&mut self.console, "Zero set.");
            }
        }
    }

    fn report_angle(&mut self, axis: Axis) {
        let degrees = self.state.axis(axis).angle().round_degrees();
        let degrees = match axis {
            // 359.5 and up rounds to a full turn, which is 0.
            Axis::Azimuth => degrees % 360,
            Axis::Elevation => degrees,
        };
        let _ = uwriteln!(&mut self.console, "{}={}", axis.label(), degrees);
    }

    /// Pushes the axis intent out to the drivers and the indicator.
    fn sync_outputs(&mut self) {
        let az = self.azimuth.update(self.state.axis(Axis::Azimuth));
        self.check_drive(Axis::Azimuth, az);
        let el = self.elevation.update(self.state.axis(Axis::Elevation));
        self.check_drive(Axis::Elevation, el);

        let level = PinState::from(self.state.any_enabled());
        if self.indicator.set_state(level).is_err() {
            error!(&mut self.console, "Indicator pin failed.");
        }
    }

    fn service_drives(&mut self) {
        let az = self.azimuth.service(self.state.axis(Axis::Azimuth));
        self.check_drive(Axis::Azimuth, az);
        let el = self.elevation.service(self.state.axis(Axis::Elevation));
        self.check_drive(Axis::Elevation, el);
    }

    /// Warns about a driver that cannot act on the configured speed.
    fn check_drive_modes(&mut self) {
        let modes = [
            (Axis::Azimuth, self.azimuth.mode()),
            (Axis::Elevation, self.elevation.mode()),
        ];
        for (axis, mode) in modes {
            if mode != self.config.drive {
                warn!(
                    &mut self.console,
                    "{} driver is {:?} but speed is set for {:?}; axis will not move.",
                    axis.label(),
                    mode,
                    self.config.drive
                );
            }
        }
    }

    fn check_drive(&mut self, axis: Axis, result: Result<(), drive::Error>) {
        if let Err(err) = result {
            error!(&mut self.console, "{} drive fault: {:?}", axis.label(), err);
        }
    }

    /// Applies one tick for every interval elapsed since the last one.
    fn catch_up_ticks(&mut self, now_ms: u32) {
        let interval = self.config.tick_interval_ms.max(1);
        let mut next = *self
            .next_tick_ms
            .get_or_insert(now_ms.wrapping_add(interval));
        while is_due(now_ms, next) {
            self.state.tick();
            next = next.wrapping_add(interval);
        }
        self.next_tick_ms = Some(next);
    }

    fn report_status_if_due(&mut self, now_ms: u32) {
        let Some(interval) = self.config.status_interval_ms else {
            return;
        };
        let deadline = *self
            .next_status_ms
            .get_or_insert(now_ms.wrapping_add(interval));
        if is_due(now_ms, deadline) {
            self.report_status();
            self.next_status_ms = Some(now_ms.wrapping_add(interval));
        }
    }

    fn restore_angles(&mut self) {
        for axis in Axis::ALL {
            match self.store.load(axis) {
                Ok(Some(decidegrees)) => {
                    let angle = MilliDegrees::from_decidegrees(decidegrees);
                    self.state.set_angle(axis, angle);
                    let angle = self.state.axis(axis).angle();
                    info!(
                        &mut self.console,
                        "{} position restored: {}",
                        axis.label(),
                        angle
                    );
                }
                Ok(None) => {}
                Err(err) => warn!(
                    &mut self.console,
                    "{} position not restored: {:?}",
                    axis.label(),
                    err
                ),
            }
        }
    }

    fn save_angle(&mut self, axis: Axis) {
        let angle = self.state.axis(axis).angle().to_decidegrees();
        if let Err(err) = self.store.save(axis, angle) {
            error!(
                &mut self.console,
                "{} position not saved: {:?}",
                axis.label(),
                err
            );
        }
    }
}

/// Wrapping-safe check that `deadline` has been reached.
fn is_due(now_ms: u32, deadline_ms: u32) -> bool {
    now_ms.wrapping_sub(deadline_ms) as i32 >= 0
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}
