//! Rotator served over TCP, with the motor outputs printed to stdout.
//!
//! Usage: `rotator_sim [ADDR] [pelco|text]`, default `0.0.0.0:4001 pelco`.

use std::{
    convert::Infallible,
    env,
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};

use embedded_hal::{delay::DelayNs, digital, pwm};
use rotator::{
    drive::PwmDriver, transport::TcpTransport, Config, DriveMode, Protocol,
    Rotator,
};
use ufmt::uWrite;

/// Console on stdout.
struct Stdout(io::Stdout);

impl uWrite for Stdout {
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.write_all(s.as_bytes())?;
        if s.ends_with('\n') {
            self.0.flush()?;
        }
        Ok(())
    }
}

/// Output pin that prints its level changes.
struct SimPin {
    name: &'static str,
    high: Option<bool>,
}

impl SimPin {
    fn new(name: &'static str) -> Self {
        Self { name, high: None }
    }

    fn set(&mut self, high: bool) {
        if self.high != Some(high) {
            println!("SIM: {} -> {}", self.name, if high { "HIGH" } else { "LOW" });
            self.high = Some(high);
        }
    }
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// 8-bit PWM channel that prints duty changes.
struct SimPwm {
    name: &'static str,
}

impl pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl pwm::SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        println!("SIM: {} duty {}/255", self.name, duty);
        Ok(())
    }
}

/// Delay backed by the thread sleeping.
struct SimDelay;

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

fn parse_protocol(arg: Option<String>) -> io::Result<Protocol> {
    match arg.as_deref() {
        None | Some("pelco") => Ok(Protocol::PelcoD),
        Some("text") => Ok(Protocol::Text),
        Some(other) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unknown protocol `{other}`, expected `pelco` or `text`"),
        )),
    }
}

fn main() -> io::Result<()> {
    let mut args = env::args().skip(1);
    let addr = args
        .next()
        .unwrap_or_else(|| format!("0.0.0.0:{}", TcpTransport::PORT));
    let protocol = parse_protocol(args.next())?;

    let config = Config::new()
        .with_protocol(protocol)
        .with_drive(DriveMode::Pwm);
    let transport = TcpTransport::bind(addr.as_str(), protocol)?;
    println!("SIM: listening on {}", transport.local_addr()?);

    let driver = |pwm: &'static str, dir: &'static str| {
        PwmDriver::new(
            SimPwm { name: pwm },
            SimPin::new(dir),
            SimDelay,
            config.direction_settle,
        )
        .map_err(|e| io::Error::other(format!("{pwm}: {e:?}")))
    };
    let azimuth = driver("AZ pulse", "AZ direction")?;
    let elevation = driver("EL pulse", "EL direction")?;

    let mut rotator = Rotator::new(
        config,
        transport,
        azimuth,
        elevation,
        SimPin::new("indicator"),
        (),
        Stdout(io::stdout()),
    );

    let start = Instant::now();
    loop {
        rotator.poll(start.elapsed().as_millis() as u32);
        thread::sleep(Duration::from_millis(1));
    }
}
