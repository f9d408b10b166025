//! Offset expressions.
//!
//! An [`Offset`] is a magnitude plus a [`Direction`]. Two textual notations
//! are accepted and both converge on the same type:
//!
//! | Notation | Advance (earlier) | Delay (later) |
//! |----------|-------------------|---------------|
//! | [`SignNotation::Symbolic`] | `-HH:MM:SS,mmm` | `+HH:MM:SS,mmm` |
//! | [`SignNotation::Directional`] | `AHH:MM:SS,mmm` | `DHH:MM:SS,mmm` |
//!
//! The short form `SS,mmm` is accepted in place of `HH:MM:SS,mmm`, and a
//! missing sign means delay.
//!
//! # Example
//!
//! ```
//! use subshift::{Direction, Offset};
//!
//! let advance: Offset = "A00:00:02,500".parse()?;
//! assert_eq!(advance.direction, Direction::Advance);
//! assert_eq!(advance.as_millis(), -2_500);
//! assert_eq!(advance, "-02,500".parse::<Offset>()?);
//! # Ok::<(), subshift::ShiftError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ShiftError;
use crate::timestamp::{Timestamp, parse_field, weighted_millis};

/// Which way an offset moves timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Show subtitles earlier (subtract).
    Advance,
    /// Show subtitles later (add).
    #[default]
    Delay,
}

/// The sign convention an offset expression is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignNotation {
    /// `+` delays, `-` advances.
    Symbolic,
    /// `D` delays, `A` advances.
    Directional,
}

impl SignNotation {
    fn direction_of(self, sign: char) -> Option<Direction> {
        match (self, sign) {
            (SignNotation::Symbolic, '-') | (SignNotation::Directional, 'A') => {
                Some(Direction::Advance)
            }
            (SignNotation::Symbolic, '+') | (SignNotation::Directional, 'D') => {
                Some(Direction::Delay)
            }
            _ => None,
        }
    }

    fn detect(expression: &str) -> Option<SignNotation> {
        match expression.chars().next()? {
            '+' | '-' => Some(SignNotation::Symbolic),
            'A' | 'D' => Some(SignNotation::Directional),
            _ => None,
        }
    }
}

/// A uniform shift applied to every timestamp in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    /// How far to move.
    pub magnitude: Duration,
    /// Which way to move.
    pub direction: Direction,
}

impl Offset {
    /// Build an offset from a signed millisecond count.
    pub fn from_millis(millis: i64) -> Self {
        let direction = if millis < 0 {
            Direction::Advance
        } else {
            Direction::Delay
        };
        Offset {
            magnitude: Duration::from_millis(millis.unsigned_abs()),
            direction,
        }
    }

    /// Signed milliseconds: negative for advance, positive for delay.
    ///
    /// Parsing guarantees the magnitude fits in an `i64`; offsets built
    /// directly from a larger [`Duration`] saturate.
    pub fn as_millis(&self) -> i64 {
        let magnitude = i64::try_from(self.magnitude.as_millis()).unwrap_or(i64::MAX);
        match self.direction {
            Direction::Advance => -magnitude,
            Direction::Delay => magnitude,
        }
    }

    /// The same magnitude in the opposite direction.
    pub fn inverse(&self) -> Self {
        let direction = match self.direction {
            Direction::Advance => Direction::Delay,
            Direction::Delay => Direction::Advance,
        };
        Offset {
            magnitude: self.magnitude,
            direction,
        }
    }

    /// Parse `[+|-]HH:MM:SS,mmm` or `[+|-]SS,mmm`.
    pub fn parse_symbolic(expression: &str) -> Result<Self, ShiftError> {
        parse_with(expression, SignNotation::Symbolic)
    }

    /// Parse `[A|D]HH:MM:SS,mmm` or `[A|D]SS,mmm`.
    pub fn parse_directional(expression: &str) -> Result<Self, ShiftError> {
        parse_with(expression, SignNotation::Directional)
    }
}

impl FromStr for Offset {
    type Err = ShiftError;

    /// Accepts either notation, chosen by the leading sign character.
    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let notation = SignNotation::detect(expression.trim()).unwrap_or(SignNotation::Symbolic);
        parse_with(expression, notation)
    }
}

impl Display for Offset {
    /// Symbolic notation, e.g. `-00:00:02,500`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let sign = match self.direction {
            Direction::Advance => '-',
            Direction::Delay => '+',
        };
        let millis = u64::try_from(self.magnitude.as_millis()).unwrap_or(u64::MAX);
        write!(f, "{sign}{}", Timestamp::from_millis(millis))
    }
}

fn parse_with(expression: &str, notation: SignNotation) -> Result<Offset, ShiftError> {
    let trimmed = expression.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return Err(ShiftError::invalid_offset(expression, "offset cannot be empty"));
    };

    let (direction, body) = if first.is_ascii_digit() {
        (Direction::Delay, trimmed)
    } else {
        let direction = notation.direction_of(first).ok_or_else(|| {
            ShiftError::invalid_offset(expression, format!("unexpected sign '{first}'"))
        })?;
        (direction, chars.as_str())
    };

    let millis = parse_magnitude(body)
        .map_err(|reason| ShiftError::invalid_offset(expression, reason))?;
    if i64::try_from(millis).is_err() {
        return Err(ShiftError::invalid_offset(expression, "offset is too large"));
    }

    Ok(Offset {
        magnitude: Duration::from_millis(millis),
        direction,
    })
}

/// `HH:MM:SS,mmm` or `SS,mmm` to milliseconds.
fn parse_magnitude(body: &str) -> Result<u64, String> {
    let (clock, millis) = body
        .split_once(',')
        .ok_or("expected HH:MM:SS,mmm or SS,mmm")?;

    let fields: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match fields[..] {
        [seconds] => (0, 0, parse_field(seconds)?),
        [hours, minutes, seconds] => (
            parse_field(hours)?,
            parse_field(minutes)?,
            parse_field(seconds)?,
        ),
        _ => {
            return Err(format!(
                "expected HH:MM:SS,mmm or SS,mmm, found {} clock fields",
                fields.len()
            ));
        }
    };

    weighted_millis(hours, minutes, seconds, parse_field(millis)?)
        .ok_or_else(|| "offset is too large".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn full_form() {
        let offset: Offset = "+01:02:03,004".parse().unwrap();
        assert_eq!(offset.direction, Direction::Delay);
        assert_eq!(offset.as_millis(), 3_723_004);
    }

    #[test]
    fn short_form() {
        assert_eq!("-05,250".parse::<Offset>().unwrap().as_millis(), -5_250);
        assert_eq!("D90,1500".parse::<Offset>().unwrap().as_millis(), 91_500);
    }

    #[test]
    fn unsigned_means_delay() {
        let offset: Offset = "00:00:05,000".parse().unwrap();
        assert_eq!(offset.direction, Direction::Delay);
        assert_eq!(offset.as_millis(), 5_000);
    }

    #[test]
    fn notations_agree() {
        for magnitude in ["00:00:05,000", "12,345", "02:00:00,001"] {
            assert_eq!(
                Offset::parse_symbolic(&format!("+{magnitude}")).unwrap(),
                Offset::parse_directional(&format!("D{magnitude}")).unwrap(),
            );
            assert_eq!(
                Offset::parse_symbolic(&format!("-{magnitude}")).unwrap(),
                Offset::parse_directional(&format!("A{magnitude}")).unwrap(),
            );
        }
    }

    #[test]
    fn advance_is_negative_delay() {
        let delay: Offset = "+00:00:05,000".parse().unwrap();
        let advance: Offset = "A00:00:05,000".parse().unwrap();
        assert_eq!(delay.as_millis(), -advance.as_millis());
        assert_eq!(delay.inverse(), advance);
    }

    #[test]
    fn front_ends_reject_foreign_signs() {
        assert!(Offset::parse_symbolic("A00:00:01,000").is_err());
        assert!(Offset::parse_directional("-00:00:01,000").is_err());
    }

    #[test]
    fn rejects_malformed() {
        for expression in [
            "",
            "   ",
            "xx:yy:zz",
            "+",
            "00:00:05",
            "5",
            "00:05,000",
            "00:00:00:05,000",
            "+00:00:0x,000",
            "+-00:00:05,000",
            "a00:00:05,000",
            "00:00:05,",
            "+00:00:05,000ms",
        ] {
            let error = expression.parse::<Offset>().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Format, "{expression:?}");
        }
    }

    #[test]
    fn rejects_overflow() {
        let error = "+99999999999999:00:00,000".parse::<Offset>().unwrap_err();
        assert!(error.to_string().contains("too large"), "{error}");
    }

    #[test]
    fn from_millis_round_trips() {
        assert_eq!(Offset::from_millis(-2_500).as_millis(), -2_500);
        assert_eq!(Offset::from_millis(0).direction, Direction::Delay);
    }

    #[test]
    fn display_is_symbolic() {
        let offset: Offset = "A00:00:02,500".parse().unwrap();
        assert_eq!(offset.to_string(), "-00:00:02,500");
        assert_eq!(offset.to_string().parse::<Offset>().unwrap(), offset);
    }
}
