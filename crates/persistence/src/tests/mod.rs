// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod ticket_tests;

use crate::{NewUser, Persistence};
use helpdesk_domain::{Actor, Department, Role, TicketDetails, UserAccount};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-04 10:00 UTC)
}

pub fn new_user(name: &str, email: &str, role: Role) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        role,
        department: (role == Role::Engineer).then_some(Department::Itfm),
        job_role: None,
        location: None,
        contact_no: None,
    }
}

/// Accounts every test database starts with.
pub struct Seeded {
    pub admin: Actor,
    pub arun: UserAccount,
    pub meena: UserAccount,
    pub riya: UserAccount,
}

pub fn seed(persistence: &mut Persistence) -> Seeded {
    let admin: UserAccount = persistence
        .create_user(&new_user("Admin", "admin@example.com", Role::Admin), now())
        .unwrap();
    let arun: UserAccount = persistence
        .create_user(&new_user("Arun", "arun@example.com", Role::Engineer), now())
        .unwrap();
    let meena: UserAccount = persistence
        .create_user(&new_user("Meena", "meena@example.com", Role::Engineer), now())
        .unwrap();
    let riya: UserAccount = persistence
        .create_user(&new_user("Riya", "riya@example.com", Role::User), now())
        .unwrap();
    Seeded {
        admin: admin.to_actor(),
        arun,
        meena,
        riya,
    }
}

pub fn sample_details() -> TicketDetails {
    TicketDetails::new("PRN-204", "hardware", "Printer jams on tray 2", "Block B").unwrap()
}
