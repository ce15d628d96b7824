// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod clock;
mod error;
mod roster;
mod shift;
mod ticket;
mod types;
mod validation;
mod visibility;

#[cfg(test)]
mod tests;

pub use availability::{
    AvailabilityRank, AvailabilityReport, EngineerAvailability, resolve_availability,
};
pub use clock::{FacilityClock, LocalInstant};
pub use error::DomainError;
pub use roster::{
    DutyRoster, EngineerSlot, EntryId, RosterEngineer, RosterEngineerInput, RosterId,
    RosterParts, RosterStatus, RosterWindow, ShiftAssignment, WeekRange, default_shift_pattern,
    ensure_no_published_overlap,
};
pub use shift::{SHIFT_CALENDAR, ShiftDefinition, ShiftStatus, ShiftType, ShiftWindow};
pub use ticket::{
    ActionLogEntry, CallType, LogOrigin, ReassignRequest, Reassignment, ReassignmentStatus,
    Severity, Ticket, TicketCode, TicketDetails, TicketId, TicketParts, TicketStatus,
};
pub use types::{Actor, Department, Role, UserAccount, UserId};
pub use validation::{format_calendar_date, parse_calendar_date, require_text};
pub use visibility::can_view;
