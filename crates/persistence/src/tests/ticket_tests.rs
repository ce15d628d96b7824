// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Seeded, now, sample_details, seed};
use crate::{Persistence, PersistenceError};
use helpdesk::{CoreError, ReassignDecision, TicketCommand, TicketTransition};
use helpdesk_domain::{
    Actor, DomainError, LogOrigin, ReassignmentStatus, Severity, Ticket, TicketId, TicketStatus,
};

fn open(persistence: &mut Persistence, seeded: &Seeded) -> Ticket {
    persistence
        .create_ticket(sample_details(), None, &seeded.riya.to_actor(), now())
        .unwrap()
        .ticket
}

fn assign(persistence: &mut Persistence, seeded: &Seeded, ticket: &Ticket) -> Ticket {
    persistence
        .mutate_ticket(
            ticket.id(),
            TicketCommand::Assign {
                engineer: seeded.arun.user_id,
                severity: Some(Severity::High),
            },
            &seeded.admin,
            now(),
        )
        .unwrap()
        .ticket
}

#[test]
fn test_ticket_codes_are_sequential() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let first: Ticket = open(&mut persistence, &seeded);
    let second: Ticket = open(&mut persistence, &seeded);
    assert_eq!(first.code().as_str(), "TKT-0001");
    assert_eq!(second.code().as_str(), "TKT-0002");
    assert_eq!(first.severity(), Severity::Medium);
    assert_eq!(first.action_logs().len(), 1);
    assert_eq!(first.action_logs()[0].origin, LogOrigin::Lifecycle);
}

#[test]
fn test_create_returns_undelivered_admin_notification() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let created: TicketTransition = persistence
        .create_ticket(sample_details(), None, &seeded.riya.to_actor(), now())
        .unwrap();
    assert_eq!(created.notifications.len(), 1);
    let stored = persistence
        .list_notifications(seeded.admin.user_id, seeded.admin.role)
        .unwrap();
    assert!(stored.is_empty());
}

#[test]
fn test_lifecycle_round_trips_through_storage() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let ticket: Ticket = open(&mut persistence, &seeded);
    let assigned: Ticket = assign(&mut persistence, &seeded, &ticket);
    assert_eq!(assigned.status(), TicketStatus::Assigned);
    assert_eq!(assigned.version(), 1);

    let engineer: Actor = seeded.arun.to_actor();
    persistence
        .mutate_ticket(
            ticket.id(),
            TicketCommand::AddActionLog {
                action: String::from("Cleared paper path"),
                details: Some(String::from("Replaced roller")),
            },
            &engineer,
            now(),
        )
        .unwrap();
    let resolved: Ticket = persistence
        .mutate_ticket(ticket.id(), TicketCommand::Resolve, &engineer, now())
        .unwrap()
        .ticket;

    let reloaded: Ticket = persistence.get_ticket(ticket.id()).unwrap();
    assert_eq!(reloaded, resolved);
    assert_eq!(reloaded.status(), TicketStatus::Resolved);
    assert_eq!(reloaded.resolved_at(), Some(now()));
    assert_eq!(reloaded.severity(), Severity::High);
    assert!(reloaded.has_work_log());
    assert_eq!(reloaded.version(), 3);
}

#[test]
fn test_rejected_resolve_leaves_no_trace() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let ticket: Ticket = open(&mut persistence, &seeded);
    let assigned: Ticket = assign(&mut persistence, &seeded, &ticket);

    let result = persistence.mutate_ticket(
        ticket.id(),
        TicketCommand::UpdateStatus {
            status: TicketStatus::Resolved,
        },
        &seeded.arun.to_actor(),
        now(),
    );
    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::ResolveWithoutWorkLog(assigned.code().clone())
        )))
    );
    assert_eq!(persistence.get_ticket(ticket.id()).unwrap(), assigned);
}

#[test]
fn test_reassignment_persists_request_and_decision() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let ticket: Ticket = open(&mut persistence, &seeded);
    assign(&mut persistence, &seeded, &ticket);

    let requested: Ticket = persistence
        .mutate_ticket(
            ticket.id(),
            TicketCommand::RequestReassign {
                candidate: seeded.meena.user_id,
                reason: String::from("On leave tomorrow"),
            },
            &seeded.arun.to_actor(),
            now(),
        )
        .unwrap()
        .ticket;
    assert!(requested.reassignment().is_pending());
    assert_eq!(
        persistence.get_ticket(ticket.id()).unwrap().reassignment(),
        requested.reassignment()
    );

    let approved: Ticket = persistence
        .mutate_ticket(
            ticket.id(),
            TicketCommand::HandleReassign {
                decision: ReassignDecision::Approve,
            },
            &seeded.admin,
            now(),
        )
        .unwrap()
        .ticket;
    assert_eq!(approved.assigned_to(), Some(seeded.meena.user_id));
    assert_eq!(
        approved.reassignment().status(),
        Some(ReassignmentStatus::Approved)
    );
    let request = approved.reassignment().request().unwrap();
    assert_eq!(request.decided_by, Some(seeded.admin.user_id));
    assert_eq!(request.reason, "On leave tomorrow");
}

#[test]
fn test_assign_to_deactivated_engineer_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let ticket: Ticket = open(&mut persistence, &seeded);
    persistence
        .set_user_active(seeded.arun.user_id, false)
        .unwrap();

    let result = persistence.mutate_ticket(
        ticket.id(),
        TicketCommand::Assign {
            engineer: seeded.arun.user_id,
            severity: None,
        },
        &seeded.admin,
        now(),
    );
    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::EngineerInactive(seeded.arun.user_id)
        )))
    );
}

#[test]
fn test_visibility_filters_reads() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let first: Ticket = open(&mut persistence, &seeded);
    open(&mut persistence, &seeded);
    assign(&mut persistence, &seeded, &first);

    let admin_view: Vec<Ticket> = persistence
        .list_visible_tickets(&seeded.admin, None)
        .unwrap();
    assert_eq!(admin_view.len(), 2);

    let arun_view: Vec<Ticket> = persistence
        .list_visible_tickets(&seeded.arun.to_actor(), None)
        .unwrap();
    assert_eq!(arun_view.len(), 1);
    assert_eq!(arun_view[0].id(), first.id());

    let meena: Actor = seeded.meena.to_actor();
    assert!(persistence.list_visible_tickets(&meena, None).unwrap().is_empty());
    assert_eq!(
        persistence.get_visible_ticket(&meena, first.id()),
        Err(PersistenceError::TicketNotFound(first.id().value()))
    );

    let open_only: Vec<Ticket> = persistence
        .list_visible_tickets(&seeded.riya.to_actor(), Some(TicketStatus::Open))
        .unwrap();
    assert_eq!(open_only.len(), 1);
}

#[test]
fn test_mutating_missing_ticket_reports_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded: Seeded = seed(&mut persistence);
    let result =
        persistence.mutate_ticket(TicketId::new(77), TicketCommand::Resolve, &seeded.admin, now());
    assert_eq!(result, Err(PersistenceError::TicketNotFound(77)));
}
