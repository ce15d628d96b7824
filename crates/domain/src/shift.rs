// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift calendar.
//!
//! The closed set of shift codes a roster may assign, and for each code
//! either an active window expressed in minutes of the day or nothing at
//! all for the non-working markers (week off, leave, holiday).
//!
//! ## Invariants
//!
//! - Shift codes round-trip exactly as written (`G-Shift`, `WO`, ...)
//! - Windows are inclusive at both ends: an engineer is on duty at the
//!   exact start minute and at the exact end minute
//! - Non-working codes are never on duty and never count as working today

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named shift code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    /// General shift, 09:30-17:45.
    #[serde(rename = "G-Shift")]
    GShift,
    /// Morning shift, 06:00-14:00.
    #[serde(rename = "A-Shift")]
    AShift,
    /// Afternoon shift, 14:00-22:00.
    #[serde(rename = "B-Shift")]
    BShift,
    /// NRMT site shift, 08:00-16:45.
    #[serde(rename = "NRMT")]
    Nrmt,
    /// Township shift, 09:30-17:45.
    #[serde(rename = "Township")]
    Township,
    /// Week off.
    #[serde(rename = "WO")]
    WeekOff,
    /// Leave.
    #[serde(rename = "LV")]
    Leave,
    /// Holiday.
    #[serde(rename = "H")]
    Holiday,
}

/// An active window within a single day, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftWindow {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl ShiftWindow {
    const fn new(start_hour: u16, start_min: u16, end_hour: u16, end_min: u16) -> Self {
        Self {
            start_minute: start_hour * 60 + start_min,
            end_minute: end_hour * 60 + end_min,
        }
    }

    /// Returns true if `minute` lies within the window, inclusive at both ends.
    #[must_use]
    pub const fn contains(&self, minute: u16) -> bool {
        self.start_minute <= minute && minute <= self.end_minute
    }
}

/// A row of the shift calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDefinition {
    pub shift_type: ShiftType,
    pub label: &'static str,
    /// `None` for non-working markers.
    pub window: Option<ShiftWindow>,
}

/// The static shift calendar, one row per shift code.
pub const SHIFT_CALENDAR: [ShiftDefinition; 8] = [
    ShiftDefinition {
        shift_type: ShiftType::GShift,
        label: "General Shift",
        window: Some(ShiftWindow::new(9, 30, 17, 45)),
    },
    ShiftDefinition {
        shift_type: ShiftType::AShift,
        label: "Morning Shift",
        window: Some(ShiftWindow::new(6, 0, 14, 0)),
    },
    ShiftDefinition {
        shift_type: ShiftType::BShift,
        label: "Afternoon Shift",
        window: Some(ShiftWindow::new(14, 0, 22, 0)),
    },
    ShiftDefinition {
        shift_type: ShiftType::Nrmt,
        label: "NRMT Shift",
        window: Some(ShiftWindow::new(8, 0, 16, 45)),
    },
    ShiftDefinition {
        shift_type: ShiftType::Township,
        label: "Township Shift",
        window: Some(ShiftWindow::new(9, 30, 17, 45)),
    },
    ShiftDefinition {
        shift_type: ShiftType::WeekOff,
        label: "Week Off",
        window: None,
    },
    ShiftDefinition {
        shift_type: ShiftType::Leave,
        label: "Leave",
        window: None,
    },
    ShiftDefinition {
        shift_type: ShiftType::Holiday,
        label: "Holiday",
        window: None,
    },
];

/// Result of evaluating a shift at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftStatus {
    pub is_on_duty: bool,
    pub is_working_today: bool,
}

impl ShiftType {
    /// Every shift code, in calendar order.
    pub const ALL: [Self; 8] = [
        Self::GShift,
        Self::AShift,
        Self::BShift,
        Self::Nrmt,
        Self::Township,
        Self::WeekOff,
        Self::Leave,
        Self::Holiday,
    ];

    /// Returns the shift code exactly as it is stored and displayed.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GShift => "G-Shift",
            Self::AShift => "A-Shift",
            Self::BShift => "B-Shift",
            Self::Nrmt => "NRMT",
            Self::Township => "Township",
            Self::WeekOff => "WO",
            Self::Leave => "LV",
            Self::Holiday => "H",
        }
    }

    /// Returns this code's row in the shift calendar.
    #[must_use]
    pub const fn definition(&self) -> &'static ShiftDefinition {
        &SHIFT_CALENDAR[*self as usize]
    }

    /// Returns the active window, or `None` for non-working markers.
    #[must_use]
    pub const fn window(&self) -> Option<ShiftWindow> {
        self.definition().window
    }

    /// Returns true for codes with an active window.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        self.window().is_some()
    }

    /// Returns true if the shift is active at `minute_of_day`.
    #[must_use]
    pub const fn is_active_at(&self, minute_of_day: u16) -> bool {
        match self.window() {
            Some(window) => window.contains(minute_of_day),
            None => false,
        }
    }

    /// Evaluates the shift at `minute_of_day`.
    #[must_use]
    pub const fn status_at(&self, minute_of_day: u16) -> ShiftStatus {
        match self.window() {
            Some(window) => ShiftStatus {
                is_on_duty: window.contains(minute_of_day),
                is_working_today: true,
            },
            None => ShiftStatus {
                is_on_duty: false,
                is_working_today: false,
            },
        }
    }

    /// The shift a freshly generated roster assigns on `weekday`.
    ///
    /// Weekdays default to the general shift, weekends to week off.
    #[must_use]
    pub const fn default_for(weekday: time::Weekday) -> Self {
        match weekday {
            time::Weekday::Saturday | time::Weekday::Sunday => Self::WeekOff,
            _ => Self::GShift,
        }
    }
}

impl FromStr for ShiftType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shift| shift.as_str() == s)
            .ok_or_else(|| DomainError::InvalidShiftType(s.to_string()))
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
