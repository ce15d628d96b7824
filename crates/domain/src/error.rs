// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::roster::{EntryId, RosterId, RosterStatus};
use crate::ticket::{TicketCode, TicketId};
use crate::types::UserId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field is missing or blank.
    MissingField {
        /// The field name as seen by callers.
        field: &'static str,
    },
    /// A field is present but malformed.
    InvalidField {
        /// The field name as seen by callers.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Call type is not one of the known categories.
    InvalidCallType(String),
    /// Severity is not one of the known levels.
    InvalidSeverity(String),
    /// Ticket status is not one of the lifecycle states.
    InvalidTicketStatus(String),
    /// Shift code is not part of the shift calendar.
    InvalidShiftType(String),
    /// Roster status is not one of draft, published, archived.
    InvalidRosterStatus(String),
    /// Role is not one of admin, engineer, user.
    InvalidRole(String),
    /// Department is not recognized.
    InvalidDepartment(String),
    /// Roster week end is not after its start.
    InvalidWeekRange {
        /// The requested start date.
        start: time::Date,
        /// The requested end date.
        end: time::Date,
    },
    /// A shift date falls outside the roster week.
    ShiftDateOutsideWeek {
        /// The offending date.
        date: time::Date,
        /// First day of the week.
        start: time::Date,
        /// Last day of the week.
        end: time::Date,
    },
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// A calendar date string could not be parsed.
    DateParseError {
        /// The input string.
        date_string: String,
        /// The parser's message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Positional engineer address is past the end of the roster.
    EngineerIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of engineers on the roster.
        len: usize,
    },
    /// No roster entry carries the given identifier.
    RosterEntryNotFound(EntryId),
    /// The engineer account is disabled.
    EngineerInactive(UserId),
    /// The account does not hold the engineer role.
    NotAnEngineer(UserId),
    /// Another published roster already covers part of the range.
    OverlappingPublishedRoster {
        /// The published roster in the way.
        conflicting_roster: RosterId,
        /// Its first day.
        start: time::Date,
        /// Its last day.
        end: time::Date,
    },
    /// The roster status change is not permitted.
    InvalidRosterTransition {
        /// Current status.
        from: RosterStatus,
        /// Requested status.
        to: RosterStatus,
    },
    /// A ticket cannot be resolved before any work has been logged.
    ResolveWithoutWorkLog(TicketCode),
    /// A reassignment request is already awaiting a decision.
    ReassignmentAlreadyPending(TicketCode),
    /// There is no reassignment request awaiting a decision.
    NoPendingReassignment(TicketCode),
    /// The reassignment candidate already owns the ticket.
    ReassignToCurrentAssignee(UserId),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "Field '{field}' is required"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::InvalidCallType(value) => write!(
                f,
                "Invalid call type '{value}': expected hardware, software, network, access or other"
            ),
            Self::InvalidSeverity(value) => write!(
                f,
                "Invalid severity '{value}': expected low, medium, high or critical"
            ),
            Self::InvalidTicketStatus(value) => write!(
                f,
                "Invalid ticket status '{value}': expected open, assigned, in-progress or resolved"
            ),
            Self::InvalidShiftType(value) => write!(f, "Unknown shift code '{value}'"),
            Self::InvalidRosterStatus(value) => write!(
                f,
                "Invalid roster status '{value}': expected draft, published or archived"
            ),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidDepartment(value) => write!(f, "Invalid department: {value}"),
            Self::InvalidWeekRange { start, end } => write!(
                f,
                "Week end date {end} must be after week start date {start}"
            ),
            Self::ShiftDateOutsideWeek { date, start, end } => write!(
                f,
                "Shift date {date} is outside the roster week {start}..{end}"
            ),
            Self::InvalidTimezone(name) => write!(f, "Invalid timezone: {name}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow in {operation}")
            }
            Self::EngineerIndexOutOfRange { index, len } => write!(
                f,
                "Engineer index {index} is out of range for a roster of {len} engineers"
            ),
            Self::RosterEntryNotFound(entry) => write!(f, "Roster entry {entry} not found"),
            Self::EngineerInactive(id) => write!(f, "Engineer {id} is inactive"),
            Self::NotAnEngineer(id) => write!(f, "User {id} is not an engineer"),
            Self::OverlappingPublishedRoster {
                conflicting_roster,
                start,
                end,
            } => write!(
                f,
                "Published roster {conflicting_roster} already covers {start}..{end}"
            ),
            Self::InvalidRosterTransition { from, to } => {
                write!(f, "Cannot move a roster from {from} to {to}")
            }
            Self::ResolveWithoutWorkLog(code) => write!(
                f,
                "Ticket {code} cannot be resolved before an action log has been added"
            ),
            Self::ReassignmentAlreadyPending(code) => write!(
                f,
                "Ticket {code} already has a pending reassignment request"
            ),
            Self::NoPendingReassignment(code) => {
                write!(f, "Ticket {code} has no pending reassignment request")
            }
            Self::ReassignToCurrentAssignee(id) => {
                write!(f, "Engineer {id} is already assigned to this ticket")
            }
        }
    }
}

impl std::error::Error for DomainError {}
