// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{Ticket, TicketId, TicketStatus};
use tracing::debug;

use crate::data_models::{ActionLogRow, TicketRow};
use crate::diesel_schema::{ticket_action_logs, tickets};
use crate::error::PersistenceError;

/// Loads a ticket with its full action log.
///
/// # Errors
///
/// Returns `TicketNotFound` if no such ticket exists.
pub fn get_ticket(
    conn: &mut SqliteConnection,
    ticket_id: TicketId,
) -> Result<Ticket, PersistenceError> {
    debug!(ticket_id = ticket_id.value(), "Loading ticket");

    let row: TicketRow = tickets::table
        .filter(tickets::ticket_id.eq(ticket_id.value()))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::TicketNotFound(ticket_id.value()))?;

    let logs: Vec<ActionLogRow> = ticket_action_logs::table
        .filter(ticket_action_logs::ticket_id.eq(ticket_id.value()))
        .order(ticket_action_logs::position.asc())
        .select(ActionLogRow::as_select())
        .load(conn)?;

    row.into_ticket(logs)
}

/// Lists tickets, newest first, optionally filtered by status.
///
/// Visibility is not applied here.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_tickets(
    conn: &mut SqliteConnection,
    status: Option<TicketStatus>,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut query = tickets::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(tickets::status.eq(status.as_str()));
    }
    let rows: Vec<TicketRow> = query
        .order(tickets::ticket_id.desc())
        .select(TicketRow::as_select())
        .load(conn)?;

    let ids: Vec<i64> = rows.iter().map(|r| r.ticket_id).collect();
    let mut logs_by_ticket: BTreeMap<i64, Vec<ActionLogRow>> = BTreeMap::new();
    for log in ticket_action_logs::table
        .filter(ticket_action_logs::ticket_id.eq_any(ids))
        .order((
            ticket_action_logs::ticket_id.asc(),
            ticket_action_logs::position.asc(),
        ))
        .select(ActionLogRow::as_select())
        .load(conn)?
    {
        logs_by_ticket.entry(log.ticket_id).or_default().push(log);
    }

    debug!(count = rows.len(), "Loaded tickets");

    rows.into_iter()
        .map(|row| {
            let logs: Vec<ActionLogRow> =
                logs_by_ticket.remove(&row.ticket_id).unwrap_or_default();
            row.into_ticket(logs)
        })
        .collect()
}
