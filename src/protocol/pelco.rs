use winnow::{
    token::{any, literal, take},
    Parser, Result,
};

use super::{Command, Error};

/// Length of a Pelco-D frame.
pub const FRAME_LEN: usize = 7;

/// Sync byte followed by the camera address.
pub const SYNC: [u8; 2] = [0xFF, 0x01];

/// Decodes a Pelco-D frame.
///
/// Layout: `sync, address, command 1, command 2, data 1, data 2, checksum`.
/// Only "command 2" (offset 3) selects the command; the checksum is not
/// verified.
pub fn decode_frame(bytes: &[u8]) -> core::result::Result<Command, Error> {
    if bytes.len() < FRAME_LEN {
        return Err(Error::FrameTooShort);
    }
    if bytes.len() > FRAME_LEN {
        return Err(Error::FrameTooLong);
    }

    let mut input = bytes;
    let code = parse_frame
        .parse_next(&mut input)
        .map_err(|_| Error::BadSyncBytes)?;
    Command::from_pelco_code(code).ok_or(Error::UnknownCommandCode(code))
}

/// Builds a frame carrying `code`, with a valid checksum.
pub fn encode_frame(code: u8) -> [u8; FRAME_LEN] {
    let mut frame = [SYNC[0], SYNC[1], 0x00, code, 0x00, 0x00, 0x00];
    frame[6] = frame[1..6]
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    frame
}

/// Parses a complete frame, returning its command byte.
fn parse_frame(input: &mut &[u8]) -> Result<u8> {
    literal(SYNC.as_slice()).parse_next(input)?;
    let _command_1 = any.parse_next(input)?;
    let command_2 = any.parse_next(input)?;
    let _data_and_checksum = take(3usize).parse_next(input)?;
    Ok(command_2)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Direction;
    use proptest::prelude::*;

    #[test]
    fn test_rotate_az_forward() {
        let frame = [0xFF, 0x01, 0x00, 0x02, 0x00, 0x00, 0x03];
        assert_eq!(
            Ok(Command::RotateAz(Direction::Forward)),
            decode_frame(&frame)
        );
    }

    #[test]
    fn test_ignores_reserved_bytes() {
        let frame = [0xFF, 0x01, 0x7E, 0x10, 0x3F, 0x3F, 0x00];
        assert_eq!(
            Ok(Command::RotateEl(Direction::Backward)),
            decode_frame(&frame)
        );
    }

    #[test]
    fn test_length() {
        let frame = encode_frame(0x02);
        assert_eq!(Err(Error::FrameTooShort), decode_frame(&frame[..6]));
        assert_eq!(Err(Error::FrameTooShort), decode_frame(&[]));

        let mut long = [0u8; 8];
        long[..7].copy_from_slice(&frame);
        assert_eq!(Err(Error::FrameTooLong), decode_frame(&long));
    }

    #[test]
    fn test_bad_sync() {
        let frame = [0xFE, 0x01, 0x00, 0x02, 0x00, 0x00, 0x03];
        assert_eq!(Err(Error::BadSyncBytes), decode_frame(&frame));
        let frame = [0xFF, 0x02, 0x00, 0x02, 0x00, 0x00, 0x03];
        assert_eq!(Err(Error::BadSyncBytes), decode_frame(&frame));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            Err(Error::UnknownCommandCode(0x20)),
            decode_frame(&encode_frame(0x20))
        );
    }

    #[test]
    fn test_encode_checksum() {
        assert_eq!(
            [0xFF, 0x01, 0x00, 0x0C, 0x00, 0x00, 0x0D],
            encode_frame(0x0C)
        );
    }

    proptest! {
        #[test]
        fn test_any_frame_matches_code_table(
            frame in proptest::array::uniform7(prop::num::u8::ANY)
        ) {
            let result = decode_frame(&frame);
            if frame[..2] != SYNC {
                assert_eq!(Err(Error::BadSyncBytes), result);
            } else {
                match Command::from_pelco_code(frame[3]) {
                    Some(command) => assert_eq!(Ok(command), result),
                    None => assert_eq!(
                        Err(Error::UnknownCommandCode(frame[3])),
                        result
                    ),
                }
            }
        }
    }
}
