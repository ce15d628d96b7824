// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{UserAccount, UserId};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewUser, format_timestamp};
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries;

/// Registers a new user.
///
/// Emails are stored lowercased and must be unique.
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is taken, or an error if the
/// insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    user: &NewUser,
    now: OffsetDateTime,
) -> Result<UserAccount, PersistenceError> {
    let email: String = user.email.trim().to_lowercase();
    let created_at: String = format_timestamp(now)?;

    conn.immediate_transaction(|conn| {
        if queries::users::find_user_by_email(conn, &email)?.is_some() {
            return Err(PersistenceError::DuplicateEmail(email.clone()));
        }

        diesel::insert_into(users::table)
            .values((
                users::name.eq(user.name.trim()),
                users::email.eq(&email),
                users::role.eq(user.role.as_str()),
                users::is_active.eq(1),
                users::department.eq(user.department.map(|d| d.as_str())),
                users::job_role.eq(user.job_role.as_deref()),
                users::location.eq(user.location.as_deref()),
                users::contact_no.eq(user.contact_no.as_deref()),
                users::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let user_id: i64 = get_last_insert_rowid(conn)?;
        info!(user_id, role = %user.role, "Created user");
        queries::users::get_user(conn, UserId::new(user_id))
    })
}

/// Activates or deactivates a user.
///
/// # Errors
///
/// Returns `UserNotFound` if no such user exists.
pub fn set_user_active(
    conn: &mut SqliteConnection,
    user_id: UserId,
    is_active: bool,
) -> Result<UserAccount, PersistenceError> {
    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id.value()))
        .set(users::is_active.eq(i32::from(is_active)))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::UserNotFound(user_id.value()));
    }

    info!(user_id = user_id.value(), is_active, "Updated user activation");
    queries::users::get_user(conn, user_id)
}
