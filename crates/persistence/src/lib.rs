// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the IT facilities helpdesk.
//!
//! Users, tickets with their action logs, duty rosters and stored
//! notifications live in a single `SQLite` database accessed through Diesel.
//! Migrations are embedded and run on open.
//!
//! ## Write model
//!
//! Every ticket and roster mutation runs as one `BEGIN IMMEDIATE`
//! transaction. The write lock is taken before the current record is
//! loaded, the pure transition from the `helpdesk` crate runs against that
//! record, and the result is written back guarded by an optimistic
//! `version` column. Because the lock is held from the first read, the
//! published-roster overlap check always sees every roster committed by a
//! competing writer, and two creates can never reserve the same ticket
//! number.
//!
//! Notifications are not written by the mutation itself. Callers hand the
//! notifications a transition emitted to [`helpdesk_notify::dispatch`]
//! after the mutation has committed, with [`Persistence`] as the sink.
//!
//! ## Testing
//!
//! - In-memory databases use shared-cache URIs named from an atomic counter
//! - One file-backed test races two connections publishing overlapping rosters

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
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use helpdesk::{RosterCommand, RosterTransition, TicketCommand, TicketTransition, select_current};
use helpdesk_domain::{
    Actor, DutyRoster, RosterEngineerInput, RosterId, RosterStatus, Role, Severity, Ticket,
    TicketDetails, TicketId, TicketStatus, UserAccount, UserId, WeekRange, can_view,
};
use helpdesk_notify::{Notification, NotificationSink, NotifyError};
use time::{Date, OffsetDateTime};

pub use data_models::{NewUser, StoredNotification};
pub use error::PersistenceError;

/// Global counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database handle for the helpdesk.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:helpdesk_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// WAL mode is enabled so readers do not block the single writer.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is already registered.
    pub fn create_user(
        &mut self,
        user: &NewUser,
        now: OffsetDateTime,
    ) -> Result<UserAccount, PersistenceError> {
        mutations::users::create_user(&mut self.conn, user, now)
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no such user exists.
    pub fn get_user(&mut self, user_id: UserId) -> Result<UserAccount, PersistenceError> {
        queries::users::get_user(&mut self.conn, user_id)
    }

    /// Lists every user ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserAccount>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Lists engineers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_engineers(
        &mut self,
        active_only: bool,
    ) -> Result<Vec<UserAccount>, PersistenceError> {
        queries::users::list_engineers(&mut self.conn, active_only)
    }

    /// Activates or deactivates a user.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no such user exists.
    pub fn set_user_active(
        &mut self,
        user_id: UserId,
        is_active: bool,
    ) -> Result<UserAccount, PersistenceError> {
        mutations::users::set_user_active(&mut self.conn, user_id, is_active)
    }

    /// Counts registered users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_users(&mut self) -> Result<usize, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Creates a ticket raised by `raised_by`.
    ///
    /// The returned notifications have not been delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the raiser is unknown or the write fails.
    pub fn create_ticket(
        &mut self,
        details: TicketDetails,
        severity: Option<Severity>,
        raised_by: &Actor,
        now: OffsetDateTime,
    ) -> Result<TicketTransition, PersistenceError> {
        mutations::tickets::create_ticket(&mut self.conn, details, severity, raised_by, now)
    }

    /// Applies a lifecycle command to a stored ticket.
    ///
    /// The returned notifications have not been delivered.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, `Rejected` or `ConcurrentModification`.
    pub fn mutate_ticket(
        &mut self,
        ticket_id: TicketId,
        command: TicketCommand,
        actor: &Actor,
        now: OffsetDateTime,
    ) -> Result<TicketTransition, PersistenceError> {
        mutations::tickets::mutate_ticket(&mut self.conn, ticket_id, command, actor, now)
    }

    /// Loads a ticket regardless of who is asking.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if no such ticket exists.
    pub fn get_ticket(&mut self, ticket_id: TicketId) -> Result<Ticket, PersistenceError> {
        queries::tickets::get_ticket(&mut self.conn, ticket_id)
    }

    /// Loads a ticket the actor is allowed to see.
    ///
    /// A ticket the actor cannot view is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket does not exist or is hidden.
    pub fn get_visible_ticket(
        &mut self,
        actor: &Actor,
        ticket_id: TicketId,
    ) -> Result<Ticket, PersistenceError> {
        let ticket: Ticket = self.get_ticket(ticket_id)?;
        if can_view(actor, &ticket) {
            Ok(ticket)
        } else {
            Err(PersistenceError::TicketNotFound(ticket_id.value()))
        }
    }

    /// Lists the tickets the actor may see, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_visible_tickets(
        &mut self,
        actor: &Actor,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, PersistenceError> {
        Ok(queries::tickets::list_tickets(&mut self.conn, status)?
            .into_iter()
            .filter(|ticket| can_view(actor, ticket))
            .collect())
    }

    // ========================================================================
    // Rosters
    // ========================================================================

    /// Creates a roster, pre-populating it when `engineers` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the actor is not an admin, an entry is invalid
    /// or a published roster overlaps `week`.
    pub fn create_roster(
        &mut self,
        week: WeekRange,
        status: RosterStatus,
        engineers: Option<Vec<RosterEngineerInput>>,
        actor: &Actor,
        now: OffsetDateTime,
    ) -> Result<DutyRoster, PersistenceError> {
        mutations::rosters::create(&mut self.conn, week, status, engineers, actor, now)
    }

    /// Applies an edit or status change to a stored roster.
    ///
    /// # Errors
    ///
    /// Returns `RosterNotFound`, `Rejected` or `ConcurrentModification`.
    pub fn mutate_roster(
        &mut self,
        roster_id: RosterId,
        command: RosterCommand,
        actor: &Actor,
        now: OffsetDateTime,
    ) -> Result<RosterTransition, PersistenceError> {
        mutations::rosters::mutate(&mut self.conn, roster_id, command, actor, now)
    }

    /// Copies a roster to a new week as a draft.
    ///
    /// # Errors
    ///
    /// Returns `RosterNotFound` if the source does not exist.
    pub fn clone_roster(
        &mut self,
        source_id: RosterId,
        new_start: Date,
        actor: &Actor,
        now: OffsetDateTime,
    ) -> Result<DutyRoster, PersistenceError> {
        mutations::rosters::clone_to_week(&mut self.conn, source_id, new_start, actor, now)
    }

    /// Loads a roster.
    ///
    /// # Errors
    ///
    /// Returns `RosterNotFound` if no such roster exists.
    pub fn get_roster(&mut self, roster_id: RosterId) -> Result<DutyRoster, PersistenceError> {
        queries::rosters::get_roster(&mut self.conn, roster_id)
    }

    /// Lists rosters, newest week first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_rosters(
        &mut self,
        status: Option<RosterStatus>,
    ) -> Result<Vec<DutyRoster>, PersistenceError> {
        queries::rosters::list_rosters(&mut self.conn, status)
    }

    /// Returns the published roster covering `today`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_current_roster(
        &mut self,
        today: Date,
    ) -> Result<Option<DutyRoster>, PersistenceError> {
        let covering: Vec<DutyRoster> =
            queries::rosters::published_covering(&mut self.conn, today)?;
        Ok(select_current(&covering, today).cloned())
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Lists notifications for a user, including broadcasts to their role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_notifications(
        &mut self,
        user: UserId,
        role: Role,
    ) -> Result<Vec<StoredNotification>, PersistenceError> {
        queries::notifications::list_for_recipient(&mut self.conn, user, role)
    }

    /// Marks a notification read.
    ///
    /// # Errors
    ///
    /// Returns `NotificationNotFound` if the notification does not exist or
    /// is not addressed to the caller.
    pub fn mark_notification_read(
        &mut self,
        notification_id: i64,
        user: UserId,
        role: Role,
    ) -> Result<StoredNotification, PersistenceError> {
        mutations::notifications::mark_read(&mut self.conn, notification_id, user, role)
    }
}

impl NotificationSink for Persistence {
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        mutations::notifications::insert_notification(
            &mut self.conn,
            notification,
            OffsetDateTime::now_utc(),
        )
        .map_err(|e| NotifyError::Storage(e.to_string()))
    }
}
