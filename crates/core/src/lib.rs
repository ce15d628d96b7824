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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Ticket lifecycle and duty roster transitions.
//!
//! Every function here is pure: it takes the current record and a command,
//! checks authorization and preconditions, and returns the new record
//! together with anything it emits. Storage and delivery happen elsewhere.

mod apply;
mod command;
mod error;
mod roster;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply_ticket, open_ticket};
pub use command::{ReassignDecision, RosterCommand, TicketCommand};
pub use error::CoreError;
pub use roster::{apply_roster, clone_roster, create_roster, prepopulate, select_current};
pub use state::{RosterTransition, TicketTransition, UserDirectory};
