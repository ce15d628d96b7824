// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ticket::Ticket;
use crate::types::{Actor, Role};

/// Returns true if `actor` may see `ticket`.
///
/// Admins see every ticket, engineers the tickets assigned to them, and
/// users the tickets they raised. Every read path filters through here.
#[must_use]
pub fn can_view(actor: &Actor, ticket: &Ticket) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Engineer => ticket.is_assigned_to(actor.user_id),
        Role::User => ticket.raised_by() == actor.user_id,
    }
}
