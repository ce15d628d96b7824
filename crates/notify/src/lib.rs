// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Notification events emitted by the ticket lifecycle.
//!
//! The lifecycle produces [`Notification`] values; a [`NotificationSink`]
//! stores or forwards them. Delivery is fire-and-forget: [`dispatch`] logs
//! and swallows sink failures so that a committed ticket change is never
//! reported as failed because a notification could not be written.

use helpdesk_domain::{Role, TicketCode, TicketId, UserId};
use std::str::FromStr;

/// Who a notification is addressed to.
///
/// A notification targets exactly one user or broadcasts to everyone
/// holding a role, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    User(UserId),
    Role(Role),
}

impl Recipient {
    /// Returns true if `user` holding `role` receives this notification.
    #[must_use]
    pub fn reaches(&self, user: UserId, role: Role) -> bool {
        match self {
            Self::User(id) => *id == user,
            Self::Role(r) => *r == role,
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user {id}"),
            Self::Role(role) => write!(f, "role {role}"),
        }
    }
}

/// The lifecycle event behind a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    TicketCreated,
    TicketAssigned,
    StatusChanged,
    ReassignRequested,
    ReassignApproved,
    ReassignRejected,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket_created",
            Self::TicketAssigned => "ticket_assigned",
            Self::StatusChanged => "status_changed",
            Self::ReassignRequested => "reassign_requested",
            Self::ReassignApproved => "reassign_approved",
            Self::ReassignRejected => "reassign_rejected",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket_created" => Ok(Self::TicketCreated),
            "ticket_assigned" => Ok(Self::TicketAssigned),
            "status_changed" => Ok(Self::StatusChanged),
            "reassign_requested" => Ok(Self::ReassignRequested),
            "reassign_approved" => Ok(Self::ReassignApproved),
            "reassign_rejected" => Ok(Self::ReassignRejected),
            _ => Err(NotifyError::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An addressed notification about a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub ticket_id: TicketId,
    pub ticket_code: TicketCode,
    pub recipient: Recipient,
}

impl Notification {
    /// Creates a new notification.
    ///
    /// # Arguments
    ///
    /// * `kind` - The lifecycle event
    /// * `ticket_id` - Storage id of the ticket
    /// * `ticket_code` - Human-readable ticket code
    /// * `recipient` - The addressed user or role
    /// * `title` - Short headline
    /// * `message` - Body text
    #[must_use]
    pub const fn new(
        kind: NotificationKind,
        ticket_id: TicketId,
        ticket_code: TicketCode,
        recipient: Recipient,
        title: String,
        message: String,
    ) -> Self {
        Self {
            kind,
            title,
            message,
            ticket_id,
            ticket_code,
            recipient,
        }
    }
}

/// Errors a sink may report.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The backing store refused or failed the write.
    #[error("notification storage failed: {0}")]
    Storage(String),
    /// A stored kind string is not recognized.
    #[error("unknown notification kind '{0}'")]
    UnknownKind(String),
}

/// Receives notifications after the ticket change that produced them has
/// been committed.
pub trait NotificationSink {
    /// Stores or forwards a single notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Delivers every notification, logging and swallowing failures.
///
/// Returns the number delivered successfully.
pub fn dispatch<S>(sink: &mut S, notifications: &[Notification]) -> usize
where
    S: NotificationSink + ?Sized,
{
    let mut delivered: usize = 0;
    for notification in notifications {
        match sink.deliver(notification) {
            Ok(()) => {
                delivered += 1;
                tracing::debug!(
                    kind = %notification.kind,
                    ticket = %notification.ticket_code,
                    recipient = %notification.recipient,
                    "Notification delivered"
                );
            }
            Err(e) => {
                tracing::warn!(
                    kind = %notification.kind,
                    ticket = %notification.ticket_code,
                    recipient = %notification.recipient,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }
    delivered
}

/// A sink that keeps notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub delivered: Vec<Notification>,
    /// When set, every delivery fails with this message.
    pub fail_with: Option<String>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        if let Some(reason) = &self.fail_with {
            return Err(NotifyError::Storage(reason.clone()));
        }
        self.delivered.push(notification.clone());
        Ok(())
    }
}
