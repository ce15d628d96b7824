// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{Role, UserId};

use crate::data_models::{NotificationRow, StoredNotification};
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Lists notifications addressed to `user` directly or to `role`, newest
/// first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_for_recipient(
    conn: &mut SqliteConnection,
    user: UserId,
    role: Role,
) -> Result<Vec<StoredNotification>, PersistenceError> {
    notifications::table
        .filter(
            notifications::recipient_user_id
                .eq(user.value())
                .or(notifications::recipient_role.eq(role.as_str())),
        )
        .order((
            notifications::created_at.desc(),
            notifications::notification_id.desc(),
        ))
        .select(NotificationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(NotificationRow::into_stored)
        .collect()
}

/// Loads a single notification.
///
/// # Errors
///
/// Returns `NotificationNotFound` if no such notification exists.
pub fn get_notification(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<StoredNotification, PersistenceError> {
    notifications::table
        .filter(notifications::notification_id.eq(notification_id))
        .select(NotificationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::NotificationNotFound(notification_id))?
        .into_stored()
}
