use winnow::{
    combinator::{alt, eof, terminated},
    error::ContextError,
    token::literal,
    Parser,
};

use super::{Command, Error};
use crate::Direction;

/// Longest text line accepted, excluding the newline.
pub const LINE_CAPACITY: usize = 16;

/// Decodes a text command line.
///
/// Surrounding whitespace (including a trailing `\r`) is ignored; the token
/// itself is case sensitive.
pub fn decode_line(line: &str) -> Result<Command, Error> {
    let mut input = line.trim();
    terminated(parse_token, eof)
        .parse_next(&mut input)
        .map_err(|_| Error::UnknownToken)
}

fn parse_token(input: &mut &str) -> Result<Command, ContextError> {
    use Direction::{Backward, Forward};

    // `C2` must be tried before `C`.
    alt((
        token("C2", Command::QueryBoth),
        token("C", Command::QueryAz),
        token("B", Command::QueryEl),
        token("S", Command::Stop),
        token("A", Command::StopAz),
        token("E", Command::StopEl),
        token("R", Command::RotateAz(Forward)),
        token("L", Command::RotateAz(Backward)),
        token("U", Command::RotateEl(Forward)),
        token("D", Command::RotateEl(Backward)),
        token("Z", Command::SetZero),
    ))
    .parse_next(input)
}

/// Parse a literal token standing for `command`.
fn token<'s>(
    text: &'static str,
    command: Command,
) -> impl Parser<&'s str, Command, ContextError> {
    literal(text).value(command)
}
