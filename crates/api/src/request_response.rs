// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw strings and ids exactly as a client sends them;
//! the handlers parse them into domain types. Responses are flattened
//! views of the stored records.

use helpdesk_domain::{
    ActionLogEntry, AvailabilityReport, DutyRoster, EngineerAvailability, ReassignRequest,
    RosterEngineer, ShiftAssignment, Ticket, UserAccount,
};
use helpdesk_notify::Recipient;
use helpdesk_persistence::StoredNotification;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Tickets
// ============================================================================

/// API request to raise a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    /// The affected asset tag.
    pub asset_id: String,
    /// hardware, software, network, access or other.
    pub call_type: String,
    /// What is wrong.
    pub problem_description: String,
    /// Where the asset is.
    pub location: String,
    /// Optional initial severity; medium when omitted.
    #[serde(default)]
    pub severity: Option<String>,
}

/// API request to assign a ticket to an engineer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    /// The engineer to assign.
    pub engineer_id: i64,
    /// Optional severity override.
    #[serde(default)]
    pub severity: Option<String>,
}

/// API request to set a ticket's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTicketStatusRequest {
    /// open, assigned, in-progress or resolved.
    pub status: String,
}

/// API request to record work on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddActionLogRequest {
    /// What was done.
    pub action: String,
    /// Optional free-text details.
    #[serde(default)]
    pub details: Option<String>,
}

/// API request asking for a ticket to move to another engineer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReassignRequest {
    /// The proposed engineer.
    pub candidate_engineer_id: i64,
    /// Why the ticket should move.
    pub reason: String,
}

/// API request deciding a pending reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleReassignRequest {
    /// approve or reject.
    pub action: String,
}

/// Filter for listing tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsRequest {
    /// Only tickets in this status.
    #[serde(default)]
    pub status: Option<String>,
}

/// One action log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogResponse {
    pub action: String,
    pub details: Option<String>,
    pub performed_by: i64,
    /// lifecycle or work.
    pub origin: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<&ActionLogEntry> for ActionLogResponse {
    fn from(entry: &ActionLogEntry) -> Self {
        Self {
            action: entry.action.clone(),
            details: entry.details.clone(),
            performed_by: entry.performed_by.value(),
            origin: entry.origin.as_str().to_string(),
            timestamp: entry.timestamp,
        }
    }
}

/// The ticket's reassignment request, pending or decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignRequestResponse {
    /// pending, approved or rejected.
    pub status: String,
    pub requested_by: i64,
    pub requested_to: i64,
    pub reason: String,
    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,
    pub decided_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub decided_at: Option<OffsetDateTime>,
}

impl ReassignRequestResponse {
    fn new(status: &str, request: &ReassignRequest) -> Self {
        Self {
            status: status.to_string(),
            requested_by: request.requested_by.value(),
            requested_to: request.requested_to.value(),
            reason: request.reason.clone(),
            requested_at: request.requested_at,
            decided_by: request.decided_by.map(|id| id.value()),
            decided_at: request.decided_at,
        }
    }
}

/// API view of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    /// The canonical numeric identifier.
    pub ticket_id: i64,
    /// The human-readable code, e.g. `TKT-0001`.
    pub ticket_code: String,
    pub asset_id: String,
    pub call_type: String,
    pub problem_description: String,
    pub location: String,
    pub raised_by: i64,
    pub status: String,
    pub severity: String,
    pub assigned_to: Option<i64>,
    pub action_logs: Vec<ActionLogResponse>,
    pub reassign_request: Option<ReassignRequestResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
    pub version: i64,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        let reassign_request: Option<ReassignRequestResponse> = ticket
            .reassignment()
            .status()
            .zip(ticket.reassignment().request())
            .map(|(status, request)| ReassignRequestResponse::new(status.as_str(), request));
        Self {
            ticket_id: ticket.id().value(),
            ticket_code: ticket.code().as_str().to_string(),
            asset_id: ticket.details().asset_id.clone(),
            call_type: ticket.details().call_type.as_str().to_string(),
            problem_description: ticket.details().problem_description.clone(),
            location: ticket.details().location.clone(),
            raised_by: ticket.raised_by().value(),
            status: ticket.status().as_str().to_string(),
            severity: ticket.severity().as_str().to_string(),
            assigned_to: ticket.assigned_to().map(|id| id.value()),
            action_logs: ticket
                .action_logs()
                .iter()
                .map(ActionLogResponse::from)
                .collect(),
            reassign_request,
            created_at: ticket.created_at(),
            updated_at: ticket.updated_at(),
            resolved_at: ticket.resolved_at(),
            version: ticket.version(),
        }
    }
}

/// The outcome of a ticket write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketWriteResponse {
    pub ticket: TicketResponse,
    /// How many notifications were delivered.
    pub notifications_sent: usize,
    /// A success message.
    pub message: String,
}

/// API response for listing tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketResponse>,
}

// ============================================================================
// Rosters
// ============================================================================

/// One shift in a roster request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// The shift code, e.g. `G-Shift` or `WO`.
    pub shift_type: String,
}

/// One engineer entry in a roster request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEngineerRequest {
    /// The registered account, if this is not a manual entry.
    #[serde(default)]
    pub engineer_ref: Option<i64>,
    pub engineer_name: String,
    #[serde(default)]
    pub job_role: String,
    /// ITFM or Software Development.
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_no: String,
    #[serde(default)]
    pub shifts: Vec<ShiftRequest>,
}

/// API request to create a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRosterRequest {
    pub week_start_date: String,
    pub week_end_date: String,
    /// draft (default) or published.
    #[serde(default)]
    pub status: Option<String>,
    /// Explicit entries; omitted to pre-populate from active engineers.
    #[serde(default)]
    pub engineers: Option<Vec<RosterEngineerRequest>>,
}

/// API request to copy a roster to a new week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRosterRequest {
    pub new_start_date: String,
}

/// API request to set one engineer's shift on one date.
///
/// Exactly one of `engineer_index` and `entry_id` addresses the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEngineerShiftRequest {
    #[serde(default)]
    pub engineer_index: Option<usize>,
    #[serde(default)]
    pub entry_id: Option<u32>,
    pub date: String,
    pub shift_type: String,
}

/// API request to remove an engineer entry.
///
/// Exactly one of `engineer_index` and `entry_id` addresses the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveEngineerRequest {
    #[serde(default)]
    pub engineer_index: Option<usize>,
    #[serde(default)]
    pub entry_id: Option<u32>,
}

/// Filter for listing rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRostersRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftResponse {
    pub date: String,
    pub shift_type: String,
}

impl From<&ShiftAssignment> for ShiftResponse {
    fn from(shift: &ShiftAssignment) -> Self {
        Self {
            date: shift.date.to_string(),
            shift_type: shift.shift_type.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEngineerResponse {
    /// Stable identifier within the roster.
    pub entry_id: u32,
    pub engineer_ref: Option<i64>,
    pub engineer_name: String,
    pub job_role: String,
    pub department: Option<String>,
    pub location: String,
    pub contact_no: String,
    pub shifts: Vec<ShiftResponse>,
}

impl From<&RosterEngineer> for RosterEngineerResponse {
    fn from(engineer: &RosterEngineer) -> Self {
        Self {
            entry_id: engineer.entry_id.value(),
            engineer_ref: engineer.engineer_ref.map(|id| id.value()),
            engineer_name: engineer.engineer_name.clone(),
            job_role: engineer.job_role.clone(),
            department: engineer.department.map(|d| d.as_str().to_string()),
            location: engineer.location.clone(),
            contact_no: engineer.contact_no.clone(),
            shifts: engineer.shifts.iter().map(ShiftResponse::from).collect(),
        }
    }
}

/// API view of a duty roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterResponse {
    /// The canonical numeric identifier; absent only for unsaved rosters.
    pub roster_id: Option<i64>,
    pub week_start_date: String,
    pub week_end_date: String,
    pub status: String,
    pub engineers: Vec<RosterEngineerResponse>,
    pub created_by: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub version: i64,
}

impl From<&DutyRoster> for RosterResponse {
    fn from(roster: &DutyRoster) -> Self {
        Self {
            roster_id: roster.id().map(|id| id.value()),
            week_start_date: roster.week().start().to_string(),
            week_end_date: roster.week().end().to_string(),
            status: roster.status().as_str().to_string(),
            engineers: roster
                .engineers()
                .iter()
                .map(RosterEngineerResponse::from)
                .collect(),
            created_by: roster.created_by().value(),
            created_at: roster.created_at(),
            updated_at: roster.updated_at(),
            version: roster.version(),
        }
    }
}

/// The outcome of a roster edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterWriteResponse {
    pub roster: RosterResponse,
    /// What changed.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRostersResponse {
    pub rosters: Vec<RosterResponse>,
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineerAvailabilityResponse {
    pub engineer: UserResponse,
    /// Today's shift code, if the engineer has one.
    pub shift_type: Option<String>,
    pub is_on_duty: bool,
    pub is_working_today: bool,
    pub in_roster: bool,
}

impl From<&EngineerAvailability> for EngineerAvailabilityResponse {
    fn from(availability: &EngineerAvailability) -> Self {
        Self {
            engineer: UserResponse::from(&availability.engineer),
            shift_type: availability.shift_type.map(|s| s.as_str().to_string()),
            is_on_duty: availability.is_on_duty,
            is_working_today: availability.is_working_today,
            in_roster: availability.in_roster,
        }
    }
}

/// Engineers ranked by current availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether a published roster covers today.
    pub has_roster: bool,
    pub roster_id: Option<i64>,
    /// Facility-local date the availability was evaluated for.
    pub date: String,
    /// Facility-local minute of day, 0 to 1439.
    pub minute_of_day: u16,
    /// The facility timezone.
    pub timezone: String,
    /// On duty first, then working today, then the rest.
    pub engineers: Vec<EngineerAvailabilityResponse>,
}

impl AvailabilityResponse {
    #[must_use]
    pub fn new(report: &AvailabilityReport, timezone: &str) -> Self {
        Self {
            has_roster: report.has_roster,
            roster_id: report.roster_id.map(|id| id.value()),
            date: report.date.to_string(),
            minute_of_day: report.minute_of_day,
            timezone: timezone.to_string(),
            engineers: report
                .engineers
                .iter()
                .map(EngineerAvailabilityResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// API request to create a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    /// admin, engineer or user.
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_no: Option<String>,
}

/// API request to activate or deactivate an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetUserActiveRequest {
    pub is_active: bool,
}

/// Filter for listing engineers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEngineersRequest {
    /// Only active engineers; defaults to true.
    #[serde(default)]
    pub active_only: Option<bool>,
}

/// API view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub department: Option<String>,
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub contact_no: Option<String>,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.user_id.value(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.as_str().to_string(),
            is_active: account.is_active,
            department: account.department.map(|d| d.as_str().to_string()),
            job_role: account.job_role.clone(),
            location: account.location.clone(),
            contact_no: account.contact_no.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub ticket_id: i64,
    pub ticket_code: String,
    /// Set for targeted notifications.
    pub recipient_user_id: Option<i64>,
    /// Set for role broadcasts.
    pub recipient_role: Option<String>,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&StoredNotification> for NotificationResponse {
    fn from(stored: &StoredNotification) -> Self {
        let (recipient_user_id, recipient_role): (Option<i64>, Option<String>) =
            match stored.notification.recipient {
                Recipient::User(id) => (Some(id.value()), None),
                Recipient::Role(role) => (None, Some(role.as_str().to_string())),
            };
        Self {
            notification_id: stored.notification_id,
            kind: stored.notification.kind.as_str().to_string(),
            title: stored.notification.title.clone(),
            message: stored.notification.message.clone(),
            ticket_id: stored.notification.ticket_id.value(),
            ticket_code: stored.notification.ticket_code.as_str().to_string(),
            recipient_user_id,
            recipient_role,
            is_read: stored.is_read,
            created_at: stored.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    /// How many of `notifications` are unread.
    pub unread: usize,
}
