// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{Role, UserAccount, UserId};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Retrieves a user by id.
///
/// # Errors
///
/// Returns `UserNotFound` if no such user exists.
pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<UserAccount, PersistenceError> {
    debug!(user_id = user_id.value(), "Looking up user");

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id.value()))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.ok_or(PersistenceError::UserNotFound(user_id.value()))?
        .into_account()
}

/// Retrieves a user by email, compared case-insensitively.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserAccount>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();
    users::table
        .filter(users::email.eq(&normalized))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserRow::into_account)
        .transpose()
}

/// Loads every listed user that exists.
///
/// Unknown ids are skipped; callers resolve them through a directory.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_users(
    conn: &mut SqliteConnection,
    ids: &[UserId],
) -> Result<Vec<UserAccount>, PersistenceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<i64> = ids.iter().map(UserId::value).collect();
    users::table
        .filter(users::user_id.eq_any(raw))
        .select(UserRow::as_select())
        .load(conn)?
        .into_iter()
        .map(UserRow::into_account)
        .collect()
}

/// Lists every user ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserAccount>, PersistenceError> {
    users::table
        .order((users::name.asc(), users::user_id.asc()))
        .select(UserRow::as_select())
        .load(conn)?
        .into_iter()
        .map(UserRow::into_account)
        .collect()
}

/// Lists engineers ordered by name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `active_only` - Skip deactivated engineers
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_engineers(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<UserAccount>, PersistenceError> {
    let mut query = users::table
        .filter(users::role.eq(Role::Engineer.as_str()))
        .into_boxed();
    if active_only {
        query = query.filter(users::is_active.eq(1));
    }
    query
        .order((users::name.asc(), users::user_id.asc()))
        .select(UserRow::as_select())
        .load(conn)?
        .into_iter()
        .map(UserRow::into_account)
        .collect()
}

/// Counts registered users.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let count: i64 = users::table.count().get_result(conn)?;
    count
        .to_usize()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("Invalid user count {count}")))
}
