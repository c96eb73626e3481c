use arduino_hal::{
    default_serial, delay_ms, pins,
    prelude::_unwrap_infallible_UnwrapInfallible, Delay, Peripherals,
};
use rotator::{
    store::EepromPositionStore, transport::SerialTransport, Config, DriveMode,
    Protocol, Rotator,
};
use ufmt::{uWrite, uwriteln};

use crate::devices::{Clock, Eeprom};

const BAUD_RATE: u32 = 9600;

/// EEPROM offset of the saved angles.
const STORE_BASE: u16 = 0;

/// Pin assignment (Arduino Uno):
///
/// - D3: azimuth pulse (OC2B)
/// - D4: azimuth direction
/// - D11: elevation pulse (OC2A)
/// - D12: elevation direction
/// - D13: indicator LED
pub fn run() -> ! {
    let dp = Peripherals::take().unwrap();
    let pins = pins!(dp);
    let serial = default_serial!(dp, pins, BAUD_RATE);
    let (reader, mut writer) = serial.split();

    // Announce the rotator!
    delay_ms(100);
    uwriteln!(&mut writer, "ROTATOR").unwrap_infallible();

    let config = config();
    let settle = config.direction_settle;

    #[cfg(not(feature = "pwm"))]
    let drivers = {
        use rotator::drive::StepPulseDriver;
        (
            StepPulseDriver::new(
                pins.d3.into_output(),
                pins.d4.into_output(),
                Delay::new(),
                settle,
            ),
            StepPulseDriver::new(
                pins.d11.into_output(),
                pins.d12.into_output(),
                Delay::new(),
                settle,
            ),
        )
    };

    #[cfg(feature = "pwm")]
    let drivers = {
        use crate::devices::PwmChannel;
        use arduino_hal::simple_pwm::{IntoPwmPin, Prescaler, Timer2Pwm};
        use rotator::{drive::PwmDriver, pwm_prescaler};

        let prescaler = match pwm_prescaler(CPU_HZ, config.pwm_carrier_hz) {
            1 => Prescaler::Direct,
            8 => Prescaler::Prescale8,
            64 => Prescaler::Prescale64,
            256 => Prescaler::Prescale256,
            _ => Prescaler::Prescale1024,
        };
        let timer2 = Timer2Pwm::new(dp.TC2, prescaler);
        (
            PwmDriver::new(
                PwmChannel::new(pins.d3.into_output().into_pwm(&timer2)),
                pins.d4.into_output(),
                Delay::new(),
                settle,
            ),
            PwmDriver::new(
                PwmChannel::new(pins.d11.into_output().into_pwm(&timer2)),
                pins.d12.into_output(),
                Delay::new(),
                settle,
            ),
        )
    };

    let (Ok(azimuth), Ok(elevation)) = drivers else {
        halt(&mut writer, "Motor outputs unavailable.")
    };
    let Ok(store) =
        EepromPositionStore::new(Eeprom::new(dp.EEPROM), STORE_BASE)
    else {
        halt(&mut writer, "EEPROM layout out of range.")
    };

    let mut clock = Clock::new(dp.TC1);
    let mut rotator = Rotator::new(
        config,
        SerialTransport::new(reader, config.protocol),
        azimuth,
        elevation,
        pins.d13.into_output(),
        store,
        writer,
    );

    loop {
        rotator.poll(clock.millis());
    }
}

#[cfg(feature = "pwm")]
const CPU_HZ: u32 = 16_000_000;

/// Builds the configuration selected by the cargo features.
fn config() -> Config {
    let drive = if cfg!(feature = "pwm") {
        DriveMode::Pwm
    } else {
        DriveMode::StepPulse
    };
    let protocol = if cfg!(feature = "text-protocol") {
        Protocol::Text
    } else {
        Protocol::PelcoD
    };
    Config::new().with_drive(drive).with_protocol(protocol)
}

/// Reports a startup failure and stops.
fn halt<W: uWrite>(writer: &mut W, message: &str) -> ! {
    let _ = uwriteln!(writer, "ERROR: {}", message);
    panic!()
}
