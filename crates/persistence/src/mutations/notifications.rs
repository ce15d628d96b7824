// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::{Role, UserId};
use helpdesk_notify::{Notification, Recipient};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{StoredNotification, format_timestamp};
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;
use crate::queries;

/// Stores a notification for its recipient.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    notification: &Notification,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let (user, role): (Option<i64>, Option<&'static str>) = match notification.recipient {
        Recipient::User(id) => (Some(id.value()), None),
        Recipient::Role(role) => (None, Some(role.as_str())),
    };

    diesel::insert_into(notifications::table)
        .values((
            notifications::kind.eq(notification.kind.as_str()),
            notifications::title.eq(&notification.title),
            notifications::message.eq(&notification.message),
            notifications::ticket_id.eq(notification.ticket_id.value()),
            notifications::ticket_code.eq(notification.ticket_code.as_str()),
            notifications::recipient_user_id.eq(user),
            notifications::recipient_role.eq(role),
            notifications::is_read.eq(0),
            notifications::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    debug!(
        kind = %notification.kind,
        recipient = %notification.recipient,
        "Stored notification"
    );
    Ok(())
}

/// Marks a notification read on behalf of one of its recipients.
///
/// A notification the caller does not receive is reported as not found.
///
/// # Errors
///
/// Returns `NotificationNotFound` if the notification does not exist or is
/// not addressed to `user` or `role`.
pub fn mark_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
    user: UserId,
    role: Role,
) -> Result<StoredNotification, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let stored: StoredNotification =
            queries::notifications::get_notification(conn, notification_id)?;
        if !stored.notification.recipient.reaches(user, role) {
            return Err(PersistenceError::NotificationNotFound(notification_id));
        }

        diesel::update(notifications::table)
            .filter(notifications::notification_id.eq(notification_id))
            .set(notifications::is_read.eq(1))
            .execute(conn)?;

        queries::notifications::get_notification(conn, notification_id)
    })
}
