// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{
    DutyRoster, RosterId, RosterStatus, RosterWindow, WeekRange, format_calendar_date,
};
use time::Date;
use tracing::debug;

use crate::data_models::RosterRow;
use crate::diesel_schema::duty_rosters;
use crate::error::PersistenceError;

/// Loads a roster.
///
/// # Errors
///
/// Returns `RosterNotFound` if no such roster exists.
pub fn get_roster(
    conn: &mut SqliteConnection,
    roster_id: RosterId,
) -> Result<DutyRoster, PersistenceError> {
    debug!(roster_id = roster_id.value(), "Loading roster");

    duty_rosters::table
        .filter(duty_rosters::roster_id.eq(roster_id.value()))
        .select(RosterRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::RosterNotFound(roster_id.value()))?
        .into_roster()
}

/// Lists rosters by week start, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_rosters(
    conn: &mut SqliteConnection,
    status: Option<RosterStatus>,
) -> Result<Vec<DutyRoster>, PersistenceError> {
    let mut query = duty_rosters::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(duty_rosters::status.eq(status.as_str()));
    }
    query
        .order((duty_rosters::week_start.desc(), duty_rosters::roster_id.desc()))
        .select(RosterRow::as_select())
        .load(conn)?
        .into_iter()
        .map(RosterRow::into_roster)
        .collect()
}

/// Returns the date range of every published roster.
///
/// Called inside each roster write transaction so the overlap check sees
/// every published roster committed before the write lock was taken.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn published_windows(
    conn: &mut SqliteConnection,
) -> Result<Vec<RosterWindow>, PersistenceError> {
    let rows: Vec<RosterRow> = duty_rosters::table
        .filter(duty_rosters::status.eq(RosterStatus::Published.as_str()))
        .select(RosterRow::as_select())
        .load(conn)?;
    rows.iter()
        .map(|row| -> Result<RosterWindow, PersistenceError> {
            let week: WeekRange = row.week()?;
            Ok(RosterWindow {
                roster_id: RosterId::new(row.roster_id),
                week,
            })
        })
        .collect()
}

/// Loads the published rosters whose week contains `today`.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn published_covering(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<Vec<DutyRoster>, PersistenceError> {
    let day: String = format_calendar_date(today)?;
    duty_rosters::table
        .filter(duty_rosters::status.eq(RosterStatus::Published.as_str()))
        .filter(duty_rosters::week_start.le(&day))
        .filter(duty_rosters::week_end.ge(&day))
        .select(RosterRow::as_select())
        .load(conn)?
        .into_iter()
        .map(RosterRow::into_roster)
        .collect()
}
