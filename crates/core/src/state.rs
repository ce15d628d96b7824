// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::{DutyRoster, Ticket, UserAccount, UserId};
use helpdesk_notify::Notification;

/// Resolves user references named by a command.
pub trait UserDirectory {
    /// Returns the account for `id`, if known.
    fn find(&self, id: UserId) -> Option<&UserAccount>;
}

impl UserDirectory for [UserAccount] {
    fn find(&self, id: UserId) -> Option<&UserAccount> {
        self.iter().find(|u| u.user_id == id)
    }
}

impl UserDirectory for Vec<UserAccount> {
    fn find(&self, id: UserId) -> Option<&UserAccount> {
        self.as_slice().find(id)
    }
}

/// The result of a successful ticket transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. Notifications are delivered only after the new ticket has
/// been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTransition {
    /// The ticket after the transition.
    pub ticket: Ticket,
    /// Notifications the transition emits.
    pub notifications: Vec<Notification>,
}

/// The result of a successful roster transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTransition {
    /// The roster after the transition.
    pub roster: DutyRoster,
    /// Human-readable summary of what changed.
    pub summary: String,
}
