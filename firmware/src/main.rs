#![no_std]
#![no_main]

mod devices;
mod machine;

use panic_halt as _;

#[arduino_hal::entry]
fn main() -> ! {
    machine::run()
}
