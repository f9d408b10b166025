//! Subtitle timestamps and time ranges.
//!
//! A [`Timestamp`] is a non-negative count of milliseconds since the start of
//! the media. It decodes from and encodes to the SubRip `HH:MM:SS,mmm` form.
//! A [`TimeRange`] is the start/end pair found on a subtitle's timing line.
//!
//! # Example
//!
//! ```
//! use subshift::{Offset, Timestamp};
//!
//! let timestamp: Timestamp = "00:01:02,500".parse()?;
//! assert_eq!(timestamp.as_millis(), 62_500);
//!
//! let offset: Offset = "-01,000".parse()?;
//! let (shifted, clamped) = timestamp.shift(offset);
//! assert_eq!(shifted.to_string(), "00:01:01,500");
//! assert!(!clamped);
//! # Ok::<(), subshift::ShiftError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::ShiftError;
use crate::offset::Offset;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// The token separating start and end on a timing line.
pub const ARROW: &str = " --> ";

/// An absolute point in subtitle time, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// `00:00:00,000`.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create a timestamp from a millisecond count.
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since the start of the media.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Apply a signed offset.
    ///
    /// Returns the shifted timestamp and whether it had to be clamped. A
    /// result that would fall before the start of the media is floored at
    /// [`Timestamp::ZERO`] rather than wrapping.
    pub fn shift(self, offset: Offset) -> (Timestamp, bool) {
        let shifted = i128::from(self.0) + i128::from(offset.as_millis());
        if shifted < 0 {
            (Timestamp::ZERO, true)
        } else {
            (Timestamp(u64::try_from(shifted).unwrap_or(u64::MAX)), false)
        }
    }
}

impl FromStr for Timestamp {
    type Err = ShiftError;

    /// Decode `HH:MM:SS,mmm`. Field widths are not enforced, field counts are.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (clock, millis) = input
            .split_once(',')
            .ok_or_else(|| ShiftError::invalid_timestamp(input, "expected HH:MM:SS,mmm"))?;

        let fields: Vec<&str> = clock.split(':').collect();
        let [hours, minutes, seconds] = fields[..] else {
            return Err(ShiftError::invalid_timestamp(
                input,
                format!("expected 3 clock fields, found {}", fields.len()),
            ));
        };

        let parse = |text: &str| {
            parse_field(text).map_err(|reason| ShiftError::invalid_timestamp(input, reason))
        };

        let total = weighted_millis(
            parse(hours)?,
            parse(minutes)?,
            parse(seconds)?,
            parse(millis)?,
        )
        .ok_or_else(|| ShiftError::invalid_timestamp(input, "value is too large"))?;

        Ok(Timestamp(total))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let hours = self.0 / MILLIS_PER_HOUR;
        let minutes = (self.0 / MILLIS_PER_MINUTE) % 60;
        let seconds = (self.0 / MILLIS_PER_SECOND) % 60;
        let millis = self.0 % MILLIS_PER_SECOND;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
    }
}

/// The display window of one subtitle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// When the entry appears.
    pub start: Timestamp,
    /// When the entry disappears.
    pub end: Timestamp,
}

impl TimeRange {
    /// Shift both ends by the same offset.
    ///
    /// Returns the shifted range and how many of its two timestamps were
    /// clamped at zero.
    pub fn shift(self, offset: Offset) -> (TimeRange, usize) {
        let (start, start_clamped) = self.start.shift(offset);
        let (end, end_clamped) = self.end.shift(offset);
        let clamped = usize::from(start_clamped) + usize::from(end_clamped);
        (TimeRange { start, end }, clamped)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{ARROW}{}", self.start, self.end)
    }
}

/// A timing line split into its parts, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimingLine<'a> {
    pub start: &'a str,
    pub end: &'a str,
    /// Anything after the second timestamp, such as SRT position hints.
    pub trailing: &'a str,
}

impl TimingLine<'_> {
    /// Decode both timestamps.
    pub fn decode(&self) -> Result<TimeRange, ShiftError> {
        Ok(TimeRange {
            start: self.start.parse()?,
            end: self.end.parse()?,
        })
    }
}

/// Recognise a line of the form `HH:MM:SS,mmm --> HH:MM:SS,mmm[trailing]`.
///
/// `line` must not include its terminator. Returns `None` for every other
/// line; those are passed through untouched by the transformer.
pub(crate) fn match_timing_line(line: &str) -> Option<TimingLine<'_>> {
    let start_length = timestamp_length(line)?;
    let rest = line[start_length..].strip_prefix(ARROW)?;
    let end_length = timestamp_length(rest)?;
    Some(TimingLine {
        start: &line[..start_length],
        end: &rest[..end_length],
        trailing: &rest[end_length..],
    })
}

/// Length of the timestamp at the start of `s`, if there is one.
///
/// Hours take two or more digits so timestamps past 99 hours still match.
fn timestamp_length(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    let hours = b.iter().take_while(|c| c.is_ascii_digit()).count();
    if hours < 2 {
        return None;
    }

    let rest = &b[hours..];
    if rest.len() < 10 {
        return None;
    }

    let mut valid = rest[0] == b':';
    valid &= rest[1].is_ascii_digit();
    valid &= rest[2].is_ascii_digit();
    valid &= rest[3] == b':';
    valid &= rest[4].is_ascii_digit();
    valid &= rest[5].is_ascii_digit();
    valid &= rest[6] == b',';
    valid &= rest[7].is_ascii_digit();
    valid &= rest[8].is_ascii_digit();
    valid &= rest[9].is_ascii_digit();

    valid.then_some(hours + 10)
}

/// Parse one clock field: a non-empty run of ASCII digits.
pub(crate) fn parse_field(text: &str) -> Result<u64, String> {
    if text.is_empty() {
        return Err("empty field".to_string());
    }
    if !text.bytes().all(|c| c.is_ascii_digit()) {
        return Err(format!("field '{text}' is not a non-negative integer"));
    }
    text.parse::<u64>()
        .map_err(|_| format!("field '{text}' is too large"))
}

/// `((hours * 60 + minutes) * 60 + seconds) * 1000 + millis`, or `None` on overflow.
pub(crate) fn weighted_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(MILLIS_PER_SECOND)?
        .checked_add(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decode_weighted_sum() {
        let timestamp: Timestamp = "01:02:03,004".parse().unwrap();
        assert_eq!(timestamp.as_millis(), 3_723_004);
    }

    #[test]
    fn encode_zero_pads() {
        assert_eq!(Timestamp::ZERO.to_string(), "00:00:00,000");
        assert_eq!(Timestamp::from_millis(62_005).to_string(), "00:01:02,005");
    }

    #[test]
    fn encode_does_not_wrap_hours() {
        let timestamp = Timestamp::from_millis(125 * MILLIS_PER_HOUR + 1);
        assert_eq!(timestamp.to_string(), "125:00:00,001");
    }

    #[test]
    fn round_trip_millis() {
        for millis in [0, 1, 999, 1_000, 59_999, 60_000, 3_599_999, 3_600_000, 86_399_999] {
            let text = Timestamp::from_millis(millis).to_string();
            assert_eq!(text.parse::<Timestamp>().unwrap().as_millis(), millis, "{text}");
        }
    }

    #[test]
    fn round_trip_text() {
        for text in ["00:00:00,000", "00:00:52,119", "01:59:59,999", "23:00:01,010"] {
            assert_eq!(text.parse::<Timestamp>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn decode_rejects_malformed() {
        for text in ["", "00:00:00", "00:00,000", "00:00:00:00,000", "aa:00:00,000", "00:00:00,", "00:-1:00,000"] {
            let error = text.parse::<Timestamp>().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Format, "{text}");
        }
    }

    #[test]
    fn decode_rejects_overflow() {
        let error = "99999999999999999:00:00,000".parse::<Timestamp>().unwrap_err();
        assert!(error.to_string().contains("too large"), "{error}");
    }

    #[test]
    fn shift_clamps_at_zero() {
        let offset: Offset = "A00:00:02,500".parse().unwrap();
        let (shifted, clamped) = Timestamp::from_millis(1_000).shift(offset);
        assert_eq!(shifted, Timestamp::ZERO);
        assert!(clamped);

        let (shifted, clamped) = Timestamp::from_millis(3_000).shift(offset);
        assert_eq!(shifted.as_millis(), 500);
        assert!(!clamped);
    }

    #[test]
    fn range_shift_counts_clamps() {
        let range = TimeRange {
            start: Timestamp::from_millis(1_000),
            end: Timestamp::from_millis(3_000),
        };
        let (shifted, clamped) = range.shift("-00:00:02,500".parse().unwrap());
        assert_eq!(shifted.to_string(), "00:00:00,000 --> 00:00:00,500");
        assert_eq!(clamped, 1);
    }

    #[test]
    fn matches_timing_line() {
        let line = match_timing_line("00:00:10,000 --> 00:00:12,000").unwrap();
        assert_eq!(line.start, "00:00:10,000");
        assert_eq!(line.end, "00:00:12,000");
        assert_eq!(line.trailing, "");
    }

    #[test]
    fn keeps_trailing_annotation() {
        let line = match_timing_line("00:00:10,000 --> 00:00:12,000 X1:40 X2:600").unwrap();
        assert_eq!(line.trailing, " X1:40 X2:600");
    }

    #[test]
    fn matches_long_hours() {
        let line = match_timing_line("100:00:00,000 --> 100:00:01,000").unwrap();
        assert_eq!(line.start, "100:00:00,000");
    }

    #[test]
    fn ignores_other_lines() {
        for line in [
            "",
            "1",
            "Hello, world!",
            "00:00:10,000",
            "00:00:10,000 -> 00:00:12,000",
            "0:00:10,000 --> 00:00:12,000",
            "00:00:10.000 --> 00:00:12.000",
            " 00:00:10,000 --> 00:00:12,000",
            "00:00:10,00 --> 00:00:12,000",
        ] {
            assert!(match_timing_line(line).is_none(), "{line:?}");
        }
    }
}
