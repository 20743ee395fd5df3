//! Bracketed trace timestamps.
//!
//! Trace lines carry timestamps of the form `[9/12/25, 13:25:29:271 CDT]`.
//! The trailing zone abbreviation is discarded rather than applied, so every
//! value is a naive local time. Timestamps are only ever compared within a
//! single log, which keeps that sound.

use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

/// Calendar portion of a timestamp, without the fractional-second field.
const DATE_TIME_FORMAT: &str = "%m/%d/%y, %H:%M:%S";

/// Maximum digits accepted in the fractional-second field (microseconds).
const MAX_FRACTION_DIGITS: usize = 6;

/// A timestamp token that does not conform to `[M/D/YY, HH:MM:SS:mmm ZZZ]`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampFormatError {
    /// No whitespace-separated zone abbreviation after the time.
    #[error("timestamp `{token}` has no timezone suffix")]
    MissingZone { token: String },

    /// The fractional-second field is missing, empty, too long or not numeric.
    #[error("timestamp `{token}` has an invalid fractional-second field")]
    InvalidFraction { token: String },

    /// The date or time-of-day fields could not be parsed.
    #[error("timestamp `{token}` does not match M/D/YY, HH:MM:SS:mmm")]
    Calendar {
        token: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses a trace timestamp token into a naive point in time.
///
/// The enclosing brackets are optional. The zone abbreviation is required
/// but ignored.
pub fn parse_timestamp(token: &str) -> Result<NaiveDateTime, TimestampFormatError> {
    let inner = token.trim().trim_start_matches('[').trim_end_matches(']');

    let Some((stamp, _zone)) = inner.trim_end().rsplit_once(char::is_whitespace) else {
        return Err(TimestampFormatError::MissingZone {
            token: token.to_string(),
        });
    };

    let invalid_fraction = || TimestampFormatError::InvalidFraction {
        token: token.to_string(),
    };

    let (calendar, fraction) = stamp.trim_end().rsplit_once(':').ok_or_else(invalid_fraction)?;
    let micros = parse_fraction(fraction).ok_or_else(invalid_fraction)?;

    let base = NaiveDateTime::parse_from_str(calendar, DATE_TIME_FORMAT).map_err(|source| {
        TimestampFormatError::Calendar {
            token: token.to_string(),
            source,
        }
    })?;

    Ok(base + TimeDelta::microseconds(micros))
}

/// Reads 1-6 fraction digits as microseconds, right-padding short values
/// (`"271"` is 271 ms, `"5"` is 500 ms).
fn parse_fraction(digits: &str) -> Option<i64> {
    if digits.is_empty()
        || digits.len() > MAX_FRACTION_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    let missing = MAX_FRACTION_DIGITS - digits.len();
    Some(value * 10_i64.pow(u32::try_from(missing).ok()?))
}

/// Signed difference `later - earlier` in fractional seconds.
#[allow(clippy::cast_precision_loss)]
pub fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later - earlier;
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |us| us as f64 / 1_000_000.0,
    )
}
