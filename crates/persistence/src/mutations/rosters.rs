// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk::{RosterCommand, RosterTransition, apply_roster, clone_roster, create_roster};
use helpdesk_domain::{
    Actor, DutyRoster, RosterEngineerInput, RosterId, RosterStatus, RosterWindow, UserAccount,
    WeekRange, format_calendar_date,
};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{engineers_to_json, format_timestamp};
use crate::diesel_schema::duty_rosters;
use crate::error::PersistenceError;
use crate::queries;

fn insert_roster(
    conn: &mut SqliteConnection,
    roster: &DutyRoster,
) -> Result<RosterId, PersistenceError> {
    diesel::insert_into(duty_rosters::table)
        .values((
            duty_rosters::week_start.eq(format_calendar_date(roster.week().start())?),
            duty_rosters::week_end.eq(format_calendar_date(roster.week().end())?),
            duty_rosters::status.eq(roster.status().as_str()),
            duty_rosters::engineers_json.eq(engineers_to_json(roster.engineers())?),
            duty_rosters::next_entry_id.eq(i64::from(roster.next_entry_id())),
            duty_rosters::created_by.eq(roster.created_by().value()),
            duty_rosters::created_at.eq(format_timestamp(roster.created_at())?),
            duty_rosters::updated_at.eq(format_timestamp(roster.updated_at())?),
            duty_rosters::version.eq(0_i64),
        ))
        .execute(conn)?;
    Ok(RosterId::new(get_last_insert_rowid(conn)?))
}

/// Creates a roster.
///
/// With `engineers` omitted the roster is pre-populated from the active
/// registered engineers. A published roster is checked against every
/// published roster visible once the write lock is held.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `week` - The validated date range
/// * `status` - Draft or published
/// * `engineers` - Explicit entries, or `None` to pre-populate
/// * `actor` - The admin creating the roster
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns `Rejected` if the actor is not an admin, an entry is invalid or
/// a published roster overlaps `week`.
pub fn create(
    conn: &mut SqliteConnection,
    week: WeekRange,
    status: RosterStatus,
    engineers: Option<Vec<RosterEngineerInput>>,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<DutyRoster, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let registered: Vec<UserAccount> = if engineers.is_none() {
            queries::users::list_engineers(conn, true)?
        } else {
            Vec::new()
        };
        let published: Vec<RosterWindow> = queries::rosters::published_windows(conn)?;

        let roster: DutyRoster =
            create_roster(week, status, engineers, &registered, &published, actor, now)?;
        let roster_id: RosterId = insert_roster(conn, &roster)?;

        info!(
            roster_id = roster_id.value(),
            start = %week.start(),
            end = %week.end(),
            status = %status,
            engineers = roster.engineers().len(),
            "Created roster"
        );

        queries::rosters::get_roster(conn, roster_id)
    })
}

/// Applies `command` to a stored roster.
///
/// # Errors
///
/// Returns `RosterNotFound` if the roster does not exist, `Rejected` if the
/// transition refuses the command, or `ConcurrentModification` if the row
/// changed underneath the write.
pub fn mutate(
    conn: &mut SqliteConnection,
    roster_id: RosterId,
    command: RosterCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<RosterTransition, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let current: DutyRoster = queries::rosters::get_roster(conn, roster_id)?;
        let published: Vec<RosterWindow> = queries::rosters::published_windows(conn)?;
        let action: &'static str = command.name();
        debug!(roster_id = roster_id.value(), action, "Applying roster command");

        let transition: RosterTransition =
            apply_roster(&current, command, &published, actor, now)?;
        let next: &DutyRoster = &transition.roster;

        let rows: usize = diesel::update(duty_rosters::table)
            .filter(duty_rosters::roster_id.eq(roster_id.value()))
            .filter(duty_rosters::version.eq(current.version()))
            .set((
                duty_rosters::status.eq(next.status().as_str()),
                duty_rosters::engineers_json.eq(engineers_to_json(next.engineers())?),
                duty_rosters::next_entry_id.eq(i64::from(next.next_entry_id())),
                duty_rosters::updated_at.eq(format_timestamp(next.updated_at())?),
                duty_rosters::version.eq(current.version() + 1),
            ))
            .execute(conn)?;

        if rows == 0 {
            return Err(PersistenceError::ConcurrentModification {
                resource: "Roster",
                id: roster_id.value(),
            });
        }

        info!(
            roster_id = roster_id.value(),
            action,
            summary = %transition.summary,
            "Updated roster"
        );

        Ok(RosterTransition {
            roster: queries::rosters::get_roster(conn, roster_id)?,
            summary: transition.summary,
        })
    })
}

/// Copies a roster to the week starting on `new_start` as a new draft.
///
/// # Errors
///
/// Returns `RosterNotFound` if the source does not exist, or `Rejected` if
/// the actor is not an admin.
pub fn clone_to_week(
    conn: &mut SqliteConnection,
    source_id: RosterId,
    new_start: Date,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<DutyRoster, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let source: DutyRoster = queries::rosters::get_roster(conn, source_id)?;
        let copy: DutyRoster = clone_roster(&source, new_start, actor, now)?;
        let roster_id: RosterId = insert_roster(conn, &copy)?;

        info!(
            source_id = source_id.value(),
            roster_id = roster_id.value(),
            start = %copy.week().start(),
            "Cloned roster"
        );

        queries::rosters::get_roster(conn, roster_id)
    })
}
