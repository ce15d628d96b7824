// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{TicketTransition, open_ticket};
use helpdesk_domain::{
    Actor, Department, Role, Ticket, TicketCode, TicketDetails, TicketId, UserAccount, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-04 10:00 UTC)
}

pub fn create_account(id: i64, name: &str, role: Role) -> UserAccount {
    UserAccount {
        user_id: UserId::new(id),
        name: name.to_string(),
        email: format!("user{id}@example.com"),
        role,
        is_active: true,
        department: Some(Department::Itfm),
        job_role: Some(String::from("Field Engineer")),
        location: Some(String::from("Block A")),
        contact_no: None,
    }
}

pub fn create_test_admin() -> Actor {
    create_account(1, "Admin", Role::Admin).to_actor()
}

pub fn create_test_user() -> Actor {
    create_account(2, "Riya", Role::User).to_actor()
}

/// Two active engineers and one inactive engineer.
pub fn create_test_directory() -> Vec<UserAccount> {
    let mut inactive: UserAccount = create_account(12, "Joseph", Role::Engineer);
    inactive.is_active = false;
    vec![
        create_account(10, "Arun", Role::Engineer),
        create_account(11, "Meena", Role::Engineer),
        inactive,
        create_account(2, "Riya", Role::User),
    ]
}

pub fn engineer_actor(directory: &[UserAccount], id: i64) -> Actor {
    directory
        .iter()
        .find(|u| u.user_id == UserId::new(id))
        .unwrap()
        .to_actor()
}

pub fn create_test_ticket() -> Ticket {
    let details: TicketDetails =
        TicketDetails::new("PC-042", "network", "No network on desk 12", "Block A").unwrap();
    let transition: TicketTransition = open_ticket(
        TicketId::new(1),
        TicketCode::from_sequence(1),
        details,
        None,
        &create_test_user(),
        now(),
    );
    transition.ticket
}
