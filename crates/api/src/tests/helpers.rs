// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use helpdesk_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AssignTicketRequest, AuthenticatedActor, AuthenticationService, CreateTicketRequest,
    CreateUserRequest, UserResponse, assign_ticket, bootstrap_admin, create_ticket, create_user,
};

/// Wednesday 2026-03-04, 10:00 UTC.
pub fn now() -> OffsetDateTime {
    datetime!(2026-03-04 10:00 UTC)
}

/// A database with one admin, two engineers and one plain user.
pub struct Fixture {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub arun: AuthenticatedActor,
    pub meena: AuthenticatedActor,
    pub riya: AuthenticatedActor,
}

impl Fixture {
    pub fn actor(&mut self, user_id: i64) -> AuthenticatedActor {
        AuthenticationService::authenticate(&mut self.persistence, user_id).unwrap()
    }
}

pub fn user_request(name: &str, email: &str, role: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        department: (role == "engineer").then(|| String::from("ITFM")),
        job_role: None,
        location: None,
        contact_no: None,
    }
}

pub fn fixture() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let admin: UserResponse =
        bootstrap_admin(&mut persistence, "Admin", "admin@example.com", now())
            .unwrap()
            .unwrap();
    let admin: AuthenticatedActor =
        AuthenticationService::authenticate(&mut persistence, admin.user_id).unwrap();

    let mut register = |name: &str, email: &str, role: &str| -> AuthenticatedActor {
        let created: UserResponse =
            create_user(&mut persistence, user_request(name, email, role), &admin, now())
                .unwrap();
        AuthenticationService::authenticate(&mut persistence, created.user_id).unwrap()
    };
    let arun: AuthenticatedActor = register("Arun", "arun@example.com", "engineer");
    let meena: AuthenticatedActor = register("Meena", "meena@example.com", "engineer");
    let riya: AuthenticatedActor = register("Riya", "riya@example.com", "user");

    Fixture {
        persistence,
        admin,
        arun,
        meena,
        riya,
    }
}

pub fn ticket_request() -> CreateTicketRequest {
    CreateTicketRequest {
        asset_id: String::from("PRN-204"),
        call_type: String::from("hardware"),
        problem_description: String::from("Printer jams on tray 2"),
        location: String::from("Block B"),
        severity: None,
    }
}

/// Raises a ticket as Riya and assigns it to Arun.
pub fn raise_and_assign(fx: &mut Fixture) -> i64 {
    let ticket_id: i64 = create_ticket(&mut fx.persistence, &ticket_request(), &fx.riya, now())
        .unwrap()
        .ticket
        .ticket_id;
    assign_ticket(
        &mut fx.persistence,
        ticket_id,
        &AssignTicketRequest {
            engineer_id: fx.arun.user_id().value(),
            severity: None,
        },
        &fx.admin,
        now(),
    )
    .unwrap();
    ticket_id
}
