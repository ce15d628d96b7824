// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversion into domain values.
//!
//! Timestamps are stored as RFC 3339 text in UTC. Calendar dates use
//! `YYYY-MM-DD`, which also sorts correctly as text. Roster engineers are
//! stored as one JSON document per roster.

use std::str::FromStr;

use diesel::prelude::*;
use helpdesk_domain::{
    ActionLogEntry, CallType, Department, DutyRoster, EntryId, LogOrigin, ReassignRequest,
    Reassignment, ReassignmentStatus, Role, RosterEngineer, RosterId, RosterParts, RosterStatus,
    Severity, ShiftAssignment, ShiftType, Ticket, TicketCode, TicketDetails, TicketId,
    TicketParts, TicketStatus, UserAccount, UserId, WeekRange, format_calendar_date,
    parse_calendar_date,
};
use helpdesk_notify::{Notification, NotificationKind, Recipient};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{duty_rosters, notifications, ticket_action_logs, tickets, users};
use crate::error::PersistenceError;

/// Formats an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented in RFC 3339.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn parse_timestamp(
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| PersistenceError::CorruptRow {
        table,
        column,
        value: value.to_string(),
    })
}

fn parse_column<T: FromStr>(
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<T, PersistenceError> {
    value.parse::<T>().map_err(|_| PersistenceError::CorruptRow {
        table,
        column,
        value: value.to_string(),
    })
}

/// A stored user row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: i32,
    pub department: Option<String>,
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub contact_no: Option<String>,
    pub created_at: String,
}

impl UserRow {
    /// Converts the row into an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the role or department is not recognized.
    pub fn into_account(self) -> Result<UserAccount, PersistenceError> {
        let department: Option<Department> = self
            .department
            .as_deref()
            .map(|d| parse_column::<Department>("users", "department", d))
            .transpose()?;
        Ok(UserAccount {
            user_id: UserId::new(self.user_id),
            name: self.name,
            email: self.email,
            role: parse_column::<Role>("users", "role", &self.role)?,
            is_active: self.is_active != 0,
            department,
            job_role: self.job_role,
            location: self.location,
            contact_no: self.contact_no,
        })
    }
}

/// A stored ticket row, without its action log.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub ticket_code: String,
    pub asset_id: String,
    pub call_type: String,
    pub problem_description: String,
    pub location: String,
    pub raised_by: i64,
    pub status: String,
    pub severity: String,
    pub assigned_to: Option<i64>,
    pub reassign_status: Option<String>,
    pub reassign_requested_by: Option<i64>,
    pub reassign_requested_to: Option<i64>,
    pub reassign_reason: Option<String>,
    pub reassign_requested_at: Option<String>,
    pub reassign_decided_by: Option<i64>,
    pub reassign_decided_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
    pub version: i64,
}

/// A stored action-log row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = ticket_action_logs)]
pub struct ActionLogRow {
    pub log_id: i64,
    pub ticket_id: i64,
    pub position: i64,
    pub action: String,
    pub details: Option<String>,
    pub performed_by: i64,
    pub origin: String,
    pub logged_at: String,
}

impl ActionLogRow {
    fn into_entry(self) -> Result<ActionLogEntry, PersistenceError> {
        Ok(ActionLogEntry {
            action: self.action,
            details: self.details,
            performed_by: UserId::new(self.performed_by),
            origin: parse_column::<LogOrigin>("ticket_action_logs", "origin", &self.origin)?,
            timestamp: parse_timestamp("ticket_action_logs", "logged_at", &self.logged_at)?,
        })
    }
}

impl TicketRow {
    fn reassignment(&self) -> Result<Reassignment, PersistenceError> {
        let (Some(status), Some(requested_by), Some(requested_to), Some(requested_at)) = (
            self.reassign_status.as_deref(),
            self.reassign_requested_by,
            self.reassign_requested_to,
            self.reassign_requested_at.as_deref(),
        ) else {
            return Ok(Reassignment::None);
        };
        let status: ReassignmentStatus =
            parse_column::<ReassignmentStatus>("tickets", "reassign_status", status)?;
        let decided_at: Option<OffsetDateTime> = self
            .reassign_decided_at
            .as_deref()
            .map(|t| parse_timestamp("tickets", "reassign_decided_at", t))
            .transpose()?;
        let request: ReassignRequest = ReassignRequest {
            requested_by: UserId::new(requested_by),
            requested_to: UserId::new(requested_to),
            reason: self.reassign_reason.clone().unwrap_or_default(),
            requested_at: parse_timestamp("tickets", "reassign_requested_at", requested_at)?,
            decided_by: self.reassign_decided_by.map(UserId::new),
            decided_at,
        };
        Ok(Reassignment::from_parts(Some(status), Some(request)))
    }

    /// Rebuilds the ticket from its row and its log rows in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if any column holds an unrecognized value.
    pub fn into_ticket(self, logs: Vec<ActionLogRow>) -> Result<Ticket, PersistenceError> {
        let reassignment: Reassignment = self.reassignment()?;
        let action_logs: Vec<ActionLogEntry> = logs
            .into_iter()
            .map(ActionLogRow::into_entry)
            .collect::<Result<_, _>>()?;
        let resolved_at: Option<OffsetDateTime> = self
            .resolved_at
            .as_deref()
            .map(|t| parse_timestamp("tickets", "resolved_at", t))
            .transpose()?;
        let details: TicketDetails = TicketDetails {
            asset_id: self.asset_id,
            call_type: parse_column::<CallType>("tickets", "call_type", &self.call_type)?,
            problem_description: self.problem_description,
            location: self.location,
        };
        Ok(Ticket::restore(TicketParts {
            id: TicketId::new(self.ticket_id),
            code: TicketCode::new(self.ticket_code),
            details,
            raised_by: UserId::new(self.raised_by),
            status: parse_column::<TicketStatus>("tickets", "status", &self.status)?,
            severity: parse_column::<Severity>("tickets", "severity", &self.severity)?,
            assigned_to: self.assigned_to.map(UserId::new),
            action_logs,
            reassignment,
            created_at: parse_timestamp("tickets", "created_at", &self.created_at)?,
            updated_at: parse_timestamp("tickets", "updated_at", &self.updated_at)?,
            resolved_at,
            version: self.version,
        }))
    }
}

/// Serializable representation of a shift on a stored roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftData {
    pub date: String,
    pub shift_type: String,
}

/// Serializable representation of a roster engineer entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEngineerData {
    pub entry_id: u32,
    pub engineer_ref: Option<i64>,
    pub engineer_name: String,
    pub job_role: String,
    pub department: Option<String>,
    pub location: String,
    pub contact_no: String,
    pub shifts: Vec<ShiftData>,
}

impl RosterEngineerData {
    /// Builds the stored form of an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a shift date cannot be formatted.
    pub fn from_engineer(engineer: &RosterEngineer) -> Result<Self, PersistenceError> {
        let shifts: Vec<ShiftData> = engineer
            .shifts
            .iter()
            .map(|s| -> Result<ShiftData, PersistenceError> {
                Ok(ShiftData {
                    date: format_calendar_date(s.date)?,
                    shift_type: s.shift_type.as_str().to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            entry_id: engineer.entry_id.value(),
            engineer_ref: engineer.engineer_ref.map(|u| u.value()),
            engineer_name: engineer.engineer_name.clone(),
            job_role: engineer.job_role.clone(),
            department: engineer.department.map(|d| d.as_str().to_string()),
            location: engineer.location.clone(),
            contact_no: engineer.contact_no.clone(),
            shifts,
        })
    }

    fn into_engineer(self) -> Result<RosterEngineer, PersistenceError> {
        let mut shifts: Vec<ShiftAssignment> = self
            .shifts
            .into_iter()
            .map(|s| -> Result<ShiftAssignment, PersistenceError> {
                Ok(ShiftAssignment {
                    date: parse_calendar_date(&s.date)?,
                    shift_type: parse_column::<ShiftType>(
                        "duty_rosters",
                        "engineers_json",
                        &s.shift_type,
                    )?,
                })
            })
            .collect::<Result<_, _>>()?;
        shifts.sort_by_key(|s| s.date);
        let department: Option<Department> = self
            .department
            .as_deref()
            .map(|d| parse_column::<Department>("duty_rosters", "engineers_json", d))
            .transpose()?;
        Ok(RosterEngineer {
            entry_id: EntryId::new(self.entry_id),
            engineer_ref: self.engineer_ref.map(UserId::new),
            engineer_name: self.engineer_name,
            job_role: self.job_role,
            department,
            location: self.location,
            contact_no: self.contact_no,
            shifts,
        })
    }
}

/// Serializes the engineer list of a roster.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn engineers_to_json(engineers: &[RosterEngineer]) -> Result<String, PersistenceError> {
    let data: Vec<RosterEngineerData> = engineers
        .iter()
        .map(RosterEngineerData::from_engineer)
        .collect::<Result<_, _>>()?;
    Ok(serde_json::to_string(&data)?)
}

/// A stored roster row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = duty_rosters)]
pub struct RosterRow {
    pub roster_id: i64,
    pub week_start: String,
    pub week_end: String,
    pub status: String,
    pub engineers_json: String,
    pub next_entry_id: i64,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

impl RosterRow {
    /// Returns the stored week of this row.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the range is empty.
    pub fn week(&self) -> Result<WeekRange, PersistenceError> {
        Ok(WeekRange::new(
            parse_calendar_date(&self.week_start)?,
            parse_calendar_date(&self.week_end)?,
        )?)
    }

    /// Rebuilds the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if any column holds an unrecognized value.
    pub fn into_roster(self) -> Result<DutyRoster, PersistenceError> {
        let week: WeekRange = self.week()?;
        let data: Vec<RosterEngineerData> = serde_json::from_str(&self.engineers_json)?;
        let engineers: Vec<RosterEngineer> = data
            .into_iter()
            .map(RosterEngineerData::into_engineer)
            .collect::<Result<_, _>>()?;
        let next_entry_id: u32 =
            self.next_entry_id
                .to_u32()
                .ok_or_else(|| PersistenceError::CorruptRow {
                    table: "duty_rosters",
                    column: "next_entry_id",
                    value: self.next_entry_id.to_string(),
                })?;
        Ok(DutyRoster::restore(RosterParts {
            id: Some(RosterId::new(self.roster_id)),
            week,
            status: parse_column::<RosterStatus>("duty_rosters", "status", &self.status)?,
            engineers,
            next_entry_id,
            created_by: UserId::new(self.created_by),
            created_at: parse_timestamp("duty_rosters", "created_at", &self.created_at)?,
            updated_at: parse_timestamp("duty_rosters", "updated_at", &self.updated_at)?,
            version: self.version,
        }))
    }
}

/// A notification as stored for a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNotification {
    pub notification_id: i64,
    pub notification: Notification,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

/// A stored notification row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = notifications)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub ticket_id: i64,
    pub ticket_code: String,
    pub recipient_user_id: Option<i64>,
    pub recipient_role: Option<String>,
    pub is_read: i32,
    pub created_at: String,
}

impl NotificationRow {
    /// Rebuilds the stored notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind or recipient are not recognized.
    pub fn into_stored(self) -> Result<StoredNotification, PersistenceError> {
        let recipient: Recipient = match (self.recipient_user_id, self.recipient_role.as_deref()) {
            (Some(user), None) => Recipient::User(UserId::new(user)),
            (None, Some(role)) => {
                Recipient::Role(parse_column::<Role>("notifications", "recipient_role", role)?)
            }
            _ => {
                return Err(PersistenceError::CorruptRow {
                    table: "notifications",
                    column: "recipient_user_id",
                    value: format!("{:?}/{:?}", self.recipient_user_id, self.recipient_role),
                });
            }
        };
        let notification: Notification = Notification::new(
            parse_column::<NotificationKind>("notifications", "kind", &self.kind)?,
            TicketId::new(self.ticket_id),
            TicketCode::new(self.ticket_code),
            recipient,
            self.title,
            self.message,
        );
        Ok(StoredNotification {
            notification_id: self.notification_id,
            notification,
            is_read: self.is_read != 0,
            created_at: parse_timestamp("notifications", "created_at", &self.created_at)?,
        })
    }
}

/// Input for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<Department>,
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub contact_no: Option<String>,
}
