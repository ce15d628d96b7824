// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod availability_tests;
mod roster_tests;

use crate::{Actor, Department, Role, UserAccount, UserId};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-04 10:00 UTC)
}

pub fn account(id: i64, name: &str, role: Role) -> UserAccount {
    UserAccount {
        user_id: UserId::new(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role,
        is_active: true,
        department: Some(Department::Itfm),
        job_role: Some(String::from("Field Engineer")),
        location: Some(String::from("Block A")),
        contact_no: Some(String::from("555-0100")),
    }
}

pub fn engineer(id: i64, name: &str) -> UserAccount {
    account(id, name, Role::Engineer)
}

pub fn admin() -> Actor {
    account(1, "Admin", Role::Admin).to_actor()
}

pub fn requester() -> Actor {
    account(2, "Riya User", Role::User).to_actor()
}
