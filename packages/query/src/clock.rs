//! Calendar convention for time-window bucketing.
//!
//! "Today" depends on where the dashboard's users are, not on where the
//! server happens to run. A [`DashboardClock`] carries an explicit UTC
//! offset and is the only place "now" and calendar dates are computed.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset as _, Utc};
use thiserror::Error;

/// Errors from configuring a [`DashboardClock`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    /// The UTC offset string could not be parsed or is out of range.
    #[error("invalid UTC offset '{value}': expected 'UTC', 'Z', or '+HH:MM'/'-HH:MM'")]
    InvalidOffset {
        /// The rejected value.
        value: String,
    },
}

/// Supplies "now" and maps instants to calendar dates at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardClock {
    offset: FixedOffset,
    pinned_now: Option<DateTime<Utc>>,
}

impl Default for DashboardClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl DashboardClock {
    /// A clock on UTC calendar dates using the system time.
    #[must_use]
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// A clock on the given offset's calendar dates using the system time.
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            pinned_now: None,
        }
    }

    /// A clock whose "now" never moves. Used for reproducible summaries and
    /// tests.
    #[must_use]
    pub const fn pinned(offset: FixedOffset, now: DateTime<Utc>) -> Self {
        Self {
            offset,
            pinned_now: Some(now),
        }
    }

    /// Builds a clock from a textual offset such as `+05:30`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidOffset`] if `value` is not a valid
    /// offset.
    pub fn from_offset_str(value: &str) -> Result<Self, ClockError> {
        parse_offset(value).map(Self::new)
    }

    /// The configured offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    /// The calendar date `at` falls on at the configured offset.
    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

/// Parses `UTC`, `Z`, `+HH`, `+HH:MM`, or `+HHMM` (and the `-` forms) into a
/// [`FixedOffset`].
///
/// # Errors
///
/// Returns [`ClockError::InvalidOffset`] on malformed or out-of-range input.
pub fn parse_offset(value: &str) -> Result<FixedOffset, ClockError> {
    let invalid = || ClockError::InvalidOffset {
        value: value.to_owned(),
    };
    let trimmed = value.trim();

    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at_checked(2).ok_or_else(invalid)?,
        None => (rest, "0"),
    };
    let is_field = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !is_field(hours) || !is_field(minutes) {
        return Err(invalid());
    }

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("+05:30").unwrap(), ist());
        assert_eq!(parse_offset("+0530").unwrap(), ist());
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("-03").unwrap().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn rejects_bad_offsets() {
        for bad in ["", "05:30", "+5:75", "+24:00", "Asia/Kolkata", "+:30", "++5", "+1\u{20ac}"] {
            assert!(parse_offset(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn local_date_uses_configured_offset() {
        let instant = Utc.with_ymd_and_hms(2018, 8, 16, 19, 0, 0).unwrap();

        let utc = DashboardClock::utc();
        assert_eq!(
            utc.local_date(instant),
            NaiveDate::from_ymd_opt(2018, 8, 16).unwrap()
        );

        let kerala = DashboardClock::new(ist());
        assert_eq!(
            kerala.local_date(instant),
            NaiveDate::from_ymd_opt(2018, 8, 17).unwrap()
        );
    }

    #[test]
    fn pinned_clock_does_not_move() {
        let now = Utc.with_ymd_and_hms(2018, 8, 17, 6, 0, 0).unwrap();
        let clock = DashboardClock::pinned(ist(), now);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.now(), now);
    }
}
