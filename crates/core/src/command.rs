// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::{
    DomainError, EngineerSlot, RosterEngineerInput, Severity, ShiftType, Ticket, TicketStatus,
    UserId,
};
use std::str::FromStr;
use time::Date;

/// An admin's decision on a pending reassignment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReassignDecision {
    Approve,
    Reject,
}

impl ReassignDecision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for ReassignDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidField {
                field: "action",
                reason: format!("expected approve or reject, got '{s}'"),
            }),
        }
    }
}

/// A change to an existing ticket, as data only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCommand {
    /// Assign the ticket to an engineer.
    Assign {
        /// The engineer to assign.
        engineer: UserId,
        /// Optional severity override.
        severity: Option<Severity>,
    },
    /// Set the status directly.
    UpdateStatus {
        /// The new status.
        status: TicketStatus,
    },
    /// Shortcut for `UpdateStatus { status: Resolved }`.
    Resolve,
    /// Record work done on the ticket.
    AddActionLog {
        /// What was done.
        action: String,
        /// Optional free-text details.
        details: Option<String>,
    },
    /// Ask an admin to hand the ticket to another engineer.
    RequestReassign {
        /// The proposed engineer.
        candidate: UserId,
        /// Why the ticket should move.
        reason: String,
    },
    /// Decide the pending reassignment request.
    HandleReassign {
        /// Approve or reject.
        decision: ReassignDecision,
    },
}

impl TicketCommand {
    /// Short operation name used in logs and authorization messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign ticket",
            Self::UpdateStatus { .. } => "update ticket status",
            Self::Resolve => "resolve ticket",
            Self::AddActionLog { .. } => "add action log",
            Self::RequestReassign { .. } => "request reassignment",
            Self::HandleReassign { .. } => "handle reassignment",
        }
    }

    /// Users the command needs resolved before it can be applied to
    /// `ticket`.
    #[must_use]
    pub fn referenced_users(&self, ticket: &Ticket) -> Vec<UserId> {
        match self {
            Self::Assign { engineer, .. } => vec![*engineer],
            Self::RequestReassign { candidate, .. } => vec![*candidate],
            Self::HandleReassign {
                decision: ReassignDecision::Approve,
            } => ticket
                .reassignment()
                .request()
                .map(|r| r.requested_to)
                .into_iter()
                .collect(),
            Self::UpdateStatus { .. }
            | Self::Resolve
            | Self::AddActionLog { .. }
            | Self::HandleReassign {
                decision: ReassignDecision::Reject,
            } => Vec::new(),
        }
    }
}

/// A change to an existing roster, as data only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCommand {
    /// Set one engineer's shift on one date.
    SetShift {
        /// The engineer entry.
        slot: EngineerSlot,
        /// The calendar date.
        date: Date,
        /// The shift code.
        shift_type: ShiftType,
    },
    /// Append an engineer entry.
    AddEngineer {
        /// The new entry.
        engineer: RosterEngineerInput,
    },
    /// Remove an engineer entry.
    RemoveEngineer {
        /// The entry to remove.
        slot: EngineerSlot,
    },
    /// Move a draft to published.
    Publish,
    /// Retire the roster.
    Archive,
}

impl RosterCommand {
    /// Short operation name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetShift { .. } => "update engineer shift",
            Self::AddEngineer { .. } => "add roster engineer",
            Self::RemoveEngineer { .. } => "remove roster engineer",
            Self::Publish => "publish roster",
            Self::Archive => "archive roster",
        }
    }
}
