// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility-local time.
//!
//! Every "today" and "minute of day" question is answered in the facility
//! timezone, converting the instant exactly once. Roster and shift dates
//! are plain calendar dates and are compared against the result directly.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime};

/// An instant expressed as a facility-local calendar date and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalInstant {
    pub date: Date,
    /// Minutes since local midnight, `0..1440`.
    pub minute_of_day: u16,
}

/// The facility timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityClock {
    tz: Tz,
}

impl Default for FacilityClock {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl FacilityClock {
    /// Creates a clock for an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimezone` if the name is unknown.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.tz.name()
    }

    /// Converts `instant` into facility-local date and minute of day.
    ///
    /// # Errors
    ///
    /// Returns `DateArithmeticOverflow` if the instant cannot be represented.
    pub fn local(&self, instant: OffsetDateTime) -> Result<LocalInstant, DomainError> {
        let overflow = || DomainError::DateArithmeticOverflow {
            operation: format!("converting {instant} to {}", self.tz.name()),
        };
        let utc: DateTime<Utc> =
            DateTime::from_timestamp(instant.unix_timestamp(), 0).ok_or_else(overflow)?;
        let local = utc.with_timezone(&self.tz);

        let month: Month = u8::try_from(local.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(overflow)?;
        let day: u8 = u8::try_from(local.day()).map_err(|_| overflow())?;
        let date: Date =
            Date::from_calendar_date(local.year(), month, day).map_err(|_| overflow())?;

        let hour: u16 = u16::try_from(local.hour()).map_err(|_| overflow())?;
        let minute: u16 = u16::try_from(local.minute()).map_err(|_| overflow())?;
        Ok(LocalInstant {
            date,
            minute_of_day: hour * 60 + minute,
        })
    }

    /// Facility-local "now".
    ///
    /// # Errors
    ///
    /// See [`FacilityClock::local`].
    pub fn now(&self) -> Result<LocalInstant, DomainError> {
        self.local(OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_utc_clock_keeps_the_instant() {
        let clock: FacilityClock = FacilityClock::default();
        let local: LocalInstant = clock.local(datetime!(2026-03-04 10:00 UTC)).unwrap();
        assert_eq!(local.date, date!(2026 - 03 - 04));
        assert_eq!(local.minute_of_day, 600);
    }

    #[test]
    fn test_local_date_rolls_over_before_utc() {
        let clock: FacilityClock = FacilityClock::new("Asia/Kolkata").unwrap();
        let local: LocalInstant = clock.local(datetime!(2026-03-04 20:00 UTC)).unwrap();
        assert_eq!(local.date, date!(2026 - 03 - 05));
        assert_eq!(local.minute_of_day, 90);
    }

    #[test]
    fn test_local_date_lags_utc_in_the_west() {
        let clock: FacilityClock = FacilityClock::new("America/New_York").unwrap();
        let local: LocalInstant = clock.local(datetime!(2026-01-10 02:30 UTC)).unwrap();
        assert_eq!(local.date, date!(2026 - 01 - 09));
        assert_eq!(local.minute_of_day, 21 * 60 + 30);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert_eq!(
            FacilityClock::new("Mars/Olympus"),
            Err(DomainError::InvalidTimezone(String::from("Mars/Olympus")))
        );
    }
}
