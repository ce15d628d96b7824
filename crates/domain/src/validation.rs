// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const CALENDAR_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Validates a required free-text field and returns it trimmed.
///
/// # Arguments
///
/// * `field` - The field name reported back on failure
/// * `value` - The raw input
///
/// # Errors
///
/// Returns `MissingField` if the value is empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Shift and roster dates are plain calendar days with no time or offset
/// component, so the same string always names the same day regardless of
/// where it is parsed.
///
/// # Errors
///
/// Returns `DateParseError` if the string is not a valid calendar date.
pub fn parse_calendar_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), CALENDAR_DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `DateParseError` if the date cannot be rendered, which only
/// happens for years outside the four-digit range.
pub fn format_calendar_date(date: Date) -> Result<String, DomainError> {
    date.format(CALENDAR_DATE)
        .map_err(|e| DomainError::DateParseError {
            date_string: date.to_string(),
            error: e.to_string(),
        })
}
