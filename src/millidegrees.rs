use core::ops::{Add, Neg, Sub};

use ufmt::{uDisplay, uWrite, Formatter};
use ufmt_macros::uDebug;

/// Underlying type representing the number of millidegrees.
type MilliDegreesRepr = i32;

/// One full turn, in millidegrees.
const FULL_TURN: MilliDegreesRepr = 360_000;

/// Angle in millidegrees.
///
/// Angles are fixed-point so that accumulating many small increments stays
/// exact and the AVR build never needs soft-float.
#[derive(Debug, uDebug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MilliDegrees(MilliDegreesRepr);
impl MilliDegrees {
    /// Creates a new `MilliDegrees`.
    pub const fn new(value: MilliDegreesRepr) -> Self {
        Self(value)
    }

    /// Creates a `MilliDegrees` from whole degrees.
    pub const fn from_degrees(degrees: i32) -> Self {
        Self(degrees * 1000)
    }

    /// Creates a `MilliDegrees` from tenths of a degree.
    pub const fn from_decidegrees(decidegrees: i16) -> Self {
        Self(decidegrees as i32 * 100)
    }

    /// The zero angle.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the value as an `i32`.
    pub fn get_value(&self) -> MilliDegreesRepr {
        self.0
    }

    /// Normalize a `MilliDegrees` value to the range `[0, 359999]`.
    ///
    /// This corresponds to the range 0 degrees (inclusive) to 360 degrees
    /// (exclusive). Negative angles wrap around from the top.
    pub fn normalize(&self) -> MilliDegrees {
        MilliDegrees::new(self.0.rem_euclid(FULL_TURN))
    }

    /// Rounds to the nearest whole degree, halves away from zero.
    pub fn round_degrees(&self) -> i32 {
        round_div(self.0, 1000)
    }

    /// Rounds to the nearest tenth of a degree, saturating at the `i16`
    /// range.
    pub fn to_decidegrees(&self) -> i16 {
        let tenths = round_div(self.0, 100);
        tenths.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}

/// Integer division rounding halves away from zero.
fn round_div(value: i32, divisor: i32) -> i32 {
    let half = divisor / 2;
    if value >= 0 {
        value.saturating_add(half) / divisor
    } else {
        value.saturating_sub(half) / divisor
    }
}

impl Add for MilliDegrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        MilliDegrees::new(self.get_value().saturating_add(rhs.get_value()))
    }
}

impl Sub for MilliDegrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        MilliDegrees::new(self.get_value().saturating_sub(rhs.get_value()))
    }
}

impl Neg for MilliDegrees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        MilliDegrees::new(self.get_value().saturating_neg())
    }
}

impl uDisplay for MilliDegrees {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        udisplay_millis(self.get_value(), f)
    }
}

/// Writes a millis value as a decimal with three fractional digits.
fn udisplay_millis<W>(value: i32, f: &mut Formatter<W>) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    if value < 0 {
        f.write_char('-')?;
    }

    let v = value.unsigned_abs();
    let int_part = v / 1000;
    let frc_part = v % 1000;

    int_part.fmt(f)?;
    f.write_char('.')?;
    if frc_part < 10 {
        f.write_str("00")?;
    } else if frc_part < 100 {
        f.write_char('0')?;
    }
    frc_part.fmt(f)
}
