use ufmt_macros::uDebug;

use crate::Direction;

/// A decoded remote command.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// Stop both axes.
    Stop,
    StopAz,
    StopEl,
    RotateAz(Direction),
    RotateEl(Direction),
    RotateBoth { az: Direction, el: Direction },
    QueryAz,
    QueryEl,
    QueryBoth,
    /// Reset both angle estimates to zero.
    SetZero,
}
impl Command {
    /// Maps a Pelco-D "command 2" byte to a command.
    pub fn from_pelco_code(code: u8) -> Option<Command> {
        use Direction::{Backward, Forward};

        let command = match code {
            0x00 | 0x01 => Command::Stop,
            0x02 => Command::RotateAz(Forward),
            0x04 => Command::RotateAz(Backward),
            0x08 => Command::RotateEl(Forward),
            0x10 => Command::RotateEl(Backward),
            0x0A => Command::RotateBoth {
                az: Forward,
                el: Forward,
            },
            0x0C => Command::RotateBoth {
                az: Backward,
                el: Forward,
            },
            0x12 => Command::RotateBoth {
                az: Forward,
                el: Backward,
            },
            0x14 => Command::RotateBoth {
                az: Backward,
                el: Backward,
            },
            0x51 => Command::QueryAz,
            0x53 => Command::QueryEl,
            _ => return None,
        };
        Some(command)
    }

    /// Returns `true` for commands that only read the angle estimates.
    pub fn is_query(&self) -> bool {
        matches!(self, Command::QueryAz | Command::QueryEl | Command::QueryBoth)
    }
}
