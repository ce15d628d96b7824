// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk::{TicketCommand, TicketTransition, apply_ticket, open_ticket};
use helpdesk_domain::{
    ActionLogEntry, Actor, ReassignRequest, Severity, Ticket, TicketCode, TicketDetails, TicketId,
    UserAccount,
};
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::format_timestamp;
use crate::diesel_schema::{ticket_action_logs, ticket_sequence, tickets};
use crate::error::PersistenceError;
use crate::queries;

/// Reserves the next ticket number.
///
/// The increment and the read happen under the caller's write lock, so
/// two creates can never observe the same value.
fn reserve_sequence(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    diesel::update(ticket_sequence::table)
        .set(ticket_sequence::last_value.eq(ticket_sequence::last_value + 1))
        .execute(conn)?;
    let next: i64 = ticket_sequence::table
        .select(ticket_sequence::last_value)
        .first(conn)?;
    Ok(next)
}

fn optional_timestamp(
    instant: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    instant.map(format_timestamp).transpose()
}

fn append_logs(
    conn: &mut SqliteConnection,
    ticket_id: TicketId,
    logs: &[ActionLogEntry],
    first_position: usize,
) -> Result<(), PersistenceError> {
    for (offset, entry) in logs.iter().enumerate() {
        let position: i64 = (first_position + offset).to_i64().ok_or_else(|| {
            PersistenceError::QueryFailed(format!("Log position overflow on ticket {ticket_id}"))
        })?;
        diesel::insert_into(ticket_action_logs::table)
            .values((
                ticket_action_logs::ticket_id.eq(ticket_id.value()),
                ticket_action_logs::position.eq(position),
                ticket_action_logs::action.eq(&entry.action),
                ticket_action_logs::details.eq(entry.details.as_deref()),
                ticket_action_logs::performed_by.eq(entry.performed_by.value()),
                ticket_action_logs::origin.eq(entry.origin.as_str()),
                ticket_action_logs::logged_at.eq(format_timestamp(entry.timestamp)?),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Flattened reassignment columns.
struct ReassignColumns {
    status: Option<&'static str>,
    requested_by: Option<i64>,
    requested_to: Option<i64>,
    reason: Option<String>,
    requested_at: Option<String>,
    decided_by: Option<i64>,
    decided_at: Option<String>,
}

impl ReassignColumns {
    fn from_ticket(ticket: &Ticket) -> Result<Self, PersistenceError> {
        let request: Option<&ReassignRequest> = ticket.reassignment().request();
        Ok(Self {
            status: ticket.reassignment().status().map(|s| s.as_str()),
            requested_by: request.map(|r| r.requested_by.value()),
            requested_to: request.map(|r| r.requested_to.value()),
            reason: request.map(|r| r.reason.clone()),
            requested_at: optional_timestamp(request.map(|r| r.requested_at))?,
            decided_by: request.and_then(|r| r.decided_by).map(|id| id.value()),
            decided_at: optional_timestamp(request.and_then(|r| r.decided_at))?,
        })
    }
}

/// Creates a ticket with a freshly reserved number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `details` - Validated problem details
/// * `severity` - Optional initial severity
/// * `raised_by` - The user raising the ticket
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if the raiser does not exist or the insert fails.
pub fn create_ticket(
    conn: &mut SqliteConnection,
    details: TicketDetails,
    severity: Option<Severity>,
    raised_by: &Actor,
    now: OffsetDateTime,
) -> Result<TicketTransition, PersistenceError> {
    conn.immediate_transaction(|conn| {
        queries::users::get_user(conn, raised_by.user_id)?;

        let sequence: i64 = reserve_sequence(conn)?;
        let transition: TicketTransition = open_ticket(
            TicketId::new(sequence),
            TicketCode::from_sequence(sequence),
            details,
            severity,
            raised_by,
            now,
        );
        let ticket: &Ticket = &transition.ticket;

        diesel::insert_into(tickets::table)
            .values((
                tickets::ticket_id.eq(ticket.id().value()),
                tickets::ticket_code.eq(ticket.code().as_str()),
                tickets::asset_id.eq(&ticket.details().asset_id),
                tickets::call_type.eq(ticket.details().call_type.as_str()),
                tickets::problem_description.eq(&ticket.details().problem_description),
                tickets::location.eq(&ticket.details().location),
                tickets::raised_by.eq(ticket.raised_by().value()),
                tickets::status.eq(ticket.status().as_str()),
                tickets::severity.eq(ticket.severity().as_str()),
                tickets::assigned_to.eq(ticket.assigned_to().map(|id| id.value())),
                tickets::created_at.eq(format_timestamp(ticket.created_at())?),
                tickets::updated_at.eq(format_timestamp(ticket.updated_at())?),
                tickets::resolved_at.eq(optional_timestamp(ticket.resolved_at())?),
                tickets::version.eq(0_i64),
            ))
            .execute(conn)?;
        append_logs(conn, ticket.id(), ticket.action_logs(), 0)?;

        info!(
            ticket_id = ticket.id().value(),
            ticket_code = %ticket.code(),
            raised_by = raised_by.user_id.value(),
            "Created ticket"
        );

        let stored: Ticket = queries::tickets::get_ticket(conn, ticket.id())?;
        Ok(TicketTransition {
            ticket: stored,
            notifications: transition.notifications,
        })
    })
}

/// Applies `command` to a stored ticket.
///
/// The accounts the command references are loaded inside the transaction
/// and handed to the transition as its user directory.
///
/// # Errors
///
/// Returns `TicketNotFound` if the ticket does not exist, `Rejected` if the
/// transition refuses the command, or `ConcurrentModification` if the row
/// changed underneath the write.
pub fn mutate_ticket(
    conn: &mut SqliteConnection,
    ticket_id: TicketId,
    command: TicketCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TicketTransition, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let current: Ticket = queries::tickets::get_ticket(conn, ticket_id)?;
        let directory: Vec<UserAccount> =
            queries::users::load_users(conn, &command.referenced_users(&current))?;
        let action: &'static str = command.name();
        debug!(
            ticket_id = ticket_id.value(),
            action,
            actor = actor.user_id.value(),
            "Applying ticket command"
        );

        let transition: TicketTransition =
            apply_ticket(&current, command, directory.as_slice(), actor, now)?;
        let next: &Ticket = &transition.ticket;
        let reassign: ReassignColumns = ReassignColumns::from_ticket(next)?;

        let rows: usize = diesel::update(tickets::table)
            .filter(tickets::ticket_id.eq(ticket_id.value()))
            .filter(tickets::version.eq(current.version()))
            .set((
                tickets::status.eq(next.status().as_str()),
                tickets::severity.eq(next.severity().as_str()),
                tickets::assigned_to.eq(next.assigned_to().map(|id| id.value())),
                tickets::reassign_status.eq(reassign.status),
                tickets::reassign_requested_by.eq(reassign.requested_by),
                tickets::reassign_requested_to.eq(reassign.requested_to),
                tickets::reassign_reason.eq(reassign.reason),
                tickets::reassign_requested_at.eq(reassign.requested_at),
                tickets::reassign_decided_by.eq(reassign.decided_by),
                tickets::reassign_decided_at.eq(reassign.decided_at),
                tickets::updated_at.eq(format_timestamp(next.updated_at())?),
                tickets::resolved_at.eq(optional_timestamp(next.resolved_at())?),
                tickets::version.eq(current.version() + 1),
            ))
            .execute(conn)?;

        if rows == 0 {
            return Err(PersistenceError::ConcurrentModification {
                resource: "Ticket",
                id: ticket_id.value(),
            });
        }

        let existing: usize = current.action_logs().len();
        let appended: &[ActionLogEntry] = next.action_logs().get(existing..).unwrap_or(&[]);
        append_logs(conn, ticket_id, appended, existing)?;

        info!(
            ticket_id = ticket_id.value(),
            ticket_code = %next.code(),
            action,
            status = %next.status(),
            "Updated ticket"
        );

        let stored: Ticket = queries::tickets::get_ticket(conn, ticket_id)?;
        Ok(TicketTransition {
            ticket: stored,
            notifications: transition.notifications,
        })
    })
}
