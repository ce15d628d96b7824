// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lifecycle through the API boundary.

use crate::{
    AddActionLogRequest, ApiError, AssignTicketRequest, CreateTicketRequest,
    HandleReassignRequest, ListNotificationsResponse, ListTicketsRequest, ListTicketsResponse,
    RequestReassignRequest, SetUserActiveRequest, TicketResponse, TicketWriteResponse,
    UpdateTicketStatusRequest, add_action_log, assign_ticket, create_ticket, get_ticket,
    handle_reassign_request, list_notifications, list_tickets, mark_notification_read,
    request_reassign, resolve_ticket, set_user_active, update_ticket_status,
};

use super::helpers::{Fixture, fixture, now, raise_and_assign, ticket_request};

fn log_work(fx: &mut Fixture, ticket_id: i64, action: &str) -> TicketWriteResponse {
    let arun = fx.arun.clone();
    add_action_log(
        &mut fx.persistence,
        ticket_id,
        AddActionLogRequest {
            action: action.to_string(),
            details: None,
        },
        &arun,
        now(),
    )
    .unwrap()
}

fn ask_to_move(fx: &mut Fixture, ticket_id: i64) -> Result<TicketWriteResponse, ApiError> {
    let arun = fx.arun.clone();
    request_reassign(
        &mut fx.persistence,
        ticket_id,
        RequestReassignRequest {
            candidate_engineer_id: fx.meena.user_id().value(),
            reason: String::from("Meena is on site"),
        },
        &arun,
        now(),
    )
}

fn decide(fx: &mut Fixture, ticket_id: i64, action: &str) -> Result<TicketWriteResponse, ApiError> {
    let admin = fx.admin.clone();
    handle_reassign_request(
        &mut fx.persistence,
        ticket_id,
        &HandleReassignRequest {
            action: action.to_string(),
        },
        &admin,
        now(),
    )
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_create_ticket_defaults_and_notifies_admins() {
    let mut fx: Fixture = fixture();
    let created: TicketWriteResponse =
        create_ticket(&mut fx.persistence, &ticket_request(), &fx.riya, now()).unwrap();

    assert_eq!(created.ticket.ticket_code, "TKT-0001");
    assert_eq!(created.ticket.status, "open");
    assert_eq!(created.ticket.severity, "medium");
    assert_eq!(created.ticket.raised_by, fx.riya.user_id().value());
    assert_eq!(created.ticket.action_logs.len(), 1);
    assert_eq!(created.notifications_sent, 1);

    let inbox: ListNotificationsResponse =
        list_notifications(&mut fx.persistence, &fx.admin).unwrap();
    assert_eq!(inbox.unread, 1);
    assert_eq!(inbox.notifications[0].kind, "ticket_created");
    assert_eq!(inbox.notifications[0].recipient_role.as_deref(), Some("admin"));
}

#[test]
fn test_create_ticket_rejects_blank_and_unknown_fields() {
    let mut fx: Fixture = fixture();

    let blank: CreateTicketRequest = CreateTicketRequest {
        asset_id: String::from("   "),
        ..ticket_request()
    };
    let err: ApiError = create_ticket(&mut fx.persistence, &blank, &fx.riya, now()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "asset_id"));

    let unknown: CreateTicketRequest = CreateTicketRequest {
        call_type: String::from("plumbing"),
        ..ticket_request()
    };
    let err: ApiError =
        create_ticket(&mut fx.persistence, &unknown, &fx.riya, now()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "call_type"));

    let severity: CreateTicketRequest = CreateTicketRequest {
        severity: Some(String::from("urgent")),
        ..ticket_request()
    };
    let err: ApiError =
        create_ticket(&mut fx.persistence, &severity, &fx.riya, now()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "severity"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_assign_log_resolve_end_to_end() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);

    let ticket: TicketResponse = get_ticket(&mut fx.persistence, ticket_id, &fx.arun).unwrap();
    assert_eq!(ticket.status, "assigned");
    assert_eq!(ticket.assigned_to, Some(fx.arun.user_id().value()));

    log_work(&mut fx, ticket_id, "Diagnosed issue");
    let resolved: TicketWriteResponse = update_ticket_status(
        &mut fx.persistence,
        ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("resolved"),
        },
        &fx.arun,
        now(),
    )
    .unwrap();
    assert_eq!(resolved.ticket.status, "resolved");
    assert!(resolved.ticket.resolved_at.is_some());
}

#[test]
fn test_resolve_without_action_log_is_rejected() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);

    let err: ApiError =
        resolve_ticket(&mut fx.persistence, ticket_id, &fx.arun, now()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "resolve_requires_action_log"
    ));

    let ticket: TicketResponse = get_ticket(&mut fx.persistence, ticket_id, &fx.admin).unwrap();
    assert_eq!(ticket.status, "assigned");
    assert!(ticket.resolved_at.is_none());
}

#[test]
fn test_identical_action_logs_are_both_kept() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);
    let before: usize = get_ticket(&mut fx.persistence, ticket_id, &fx.admin)
        .unwrap()
        .action_logs
        .len();

    log_work(&mut fx, ticket_id, "Replaced toner");
    let after: TicketWriteResponse = log_work(&mut fx, ticket_id, "Replaced toner");

    assert_eq!(after.ticket.action_logs.len(), before + 2);
    let tail: Vec<&str> = after.ticket.action_logs[before..]
        .iter()
        .map(|log| log.action.as_str())
        .collect();
    assert_eq!(tail, vec!["Replaced toner", "Replaced toner"]);
    assert!(after.ticket.action_logs[before..]
        .iter()
        .all(|log| log.origin == "work"));
}

#[test]
fn test_unknown_status_is_invalid_input() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);

    let err: ApiError = update_ticket_status(
        &mut fx.persistence,
        ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("closed"),
        },
        &fx.admin,
        now(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "status"));
}

#[test]
fn test_assign_requires_known_active_engineer() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = create_ticket(&mut fx.persistence, &ticket_request(), &fx.riya, now())
        .unwrap()
        .ticket
        .ticket_id;

    let err: ApiError = assign_ticket(
        &mut fx.persistence,
        ticket_id,
        &AssignTicketRequest {
            engineer_id: 404,
            severity: None,
        },
        &fx.admin,
        now(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    set_user_active(
        &mut fx.persistence,
        fx.meena.user_id().value(),
        &SetUserActiveRequest { is_active: false },
        &fx.admin,
    )
    .unwrap();
    let err: ApiError = assign_ticket(
        &mut fx.persistence,
        ticket_id,
        &AssignTicketRequest {
            engineer_id: fx.meena.user_id().value(),
            severity: Some(String::from("high")),
        },
        &fx.admin,
        now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "active_engineer"
    ));
}

#[test]
fn test_missing_ticket_is_not_found() {
    let mut fx: Fixture = fixture();
    let err: ApiError = resolve_ticket(&mut fx.persistence, 77, &fx.admin, now()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Ticket"
    ));
}

// ============================================================================
// Reassignment
// ============================================================================

#[test]
fn test_reassignment_approve_moves_ticket() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);

    let pending: TicketWriteResponse = ask_to_move(&mut fx, ticket_id).unwrap();
    assert_eq!(
        pending.ticket.reassign_request.as_ref().unwrap().status,
        "pending"
    );

    let approved: TicketWriteResponse = decide(&mut fx, ticket_id, "approve").unwrap();
    assert_eq!(approved.ticket.assigned_to, Some(fx.meena.user_id().value()));
    let request = approved.ticket.reassign_request.unwrap();
    assert_eq!(request.status, "approved");
    assert_eq!(request.decided_by, Some(fx.admin.user_id().value()));
    assert_eq!(approved.notifications_sent, 2);
}

#[test]
fn test_reassignment_reject_keeps_assignee() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);
    ask_to_move(&mut fx, ticket_id).unwrap();

    let rejected: TicketWriteResponse = decide(&mut fx, ticket_id, "reject").unwrap();
    assert_eq!(rejected.ticket.assigned_to, Some(fx.arun.user_id().value()));
    assert_eq!(rejected.ticket.reassign_request.unwrap().status, "rejected");
    assert_eq!(rejected.notifications_sent, 1);

    // A decided request frees the slot for a new one.
    assert!(ask_to_move(&mut fx, ticket_id).is_ok());
}

#[test]
fn test_reassignment_conflicts() {
    let mut fx: Fixture = fixture();
    let ticket_id: i64 = raise_and_assign(&mut fx);

    let err: ApiError = decide(&mut fx, ticket_id, "approve").unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "pending_reassignment_required"
    ));

    ask_to_move(&mut fx, ticket_id).unwrap();
    let err: ApiError = ask_to_move(&mut fx, ticket_id).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "single_pending_reassignment"
    ));

    let err: ApiError = decide(&mut fx, ticket_id, "maybe").unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "action"));
}

// ============================================================================
// Visibility and notifications
// ============================================================================

#[test]
fn test_ticket_visibility_by_role() {
    let mut fx: Fixture = fixture();
    let assigned: i64 = raise_and_assign(&mut fx);
    let unassigned: i64 = create_ticket(&mut fx.persistence, &ticket_request(), &fx.riya, now())
        .unwrap()
        .ticket
        .ticket_id;

    let all: ListTicketsResponse =
        list_tickets(&mut fx.persistence, &ListTicketsRequest::default(), &fx.admin).unwrap();
    assert_eq!(all.tickets.len(), 2);

    let arun: ListTicketsResponse =
        list_tickets(&mut fx.persistence, &ListTicketsRequest::default(), &fx.arun).unwrap();
    let ids: Vec<i64> = arun.tickets.iter().map(|t| t.ticket_id).collect();
    assert_eq!(ids, vec![assigned]);

    let err: ApiError = get_ticket(&mut fx.persistence, unassigned, &fx.meena).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    let open: ListTicketsResponse = list_tickets(
        &mut fx.persistence,
        &ListTicketsRequest {
            status: Some(String::from("open")),
        },
        &fx.riya,
    )
    .unwrap();
    assert_eq!(open.tickets.len(), 1);
    assert_eq!(open.tickets[0].ticket_id, unassigned);
}

#[test]
fn test_mark_notification_read() {
    let mut fx: Fixture = fixture();
    raise_and_assign(&mut fx);

    let inbox: ListNotificationsResponse =
        list_notifications(&mut fx.persistence, &fx.arun).unwrap();
    assert_eq!(inbox.unread, 1);
    let id: i64 = inbox.notifications[0].notification_id;

    let err: ApiError = mark_notification_read(&mut fx.persistence, id, &fx.meena).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    assert!(mark_notification_read(&mut fx.persistence, id, &fx.arun)
        .unwrap()
        .is_read);
    assert_eq!(
        list_notifications(&mut fx.persistence, &fx.arun)
            .unwrap()
            .unread,
        0
    );
}

#[test]
fn test_requests_accept_omitted_optional_fields() {
    let request: CreateTicketRequest = serde_json::from_str(
        r#"{"asset_id":"PRN-204","call_type":"hardware","problem_description":"Jammed","location":"Block B"}"#,
    )
    .unwrap();
    assert_eq!(request.severity, None);

    let roster: crate::CreateRosterRequest = serde_json::from_str(
        r#"{"week_start_date":"2026-03-02","week_end_date":"2026-03-08"}"#,
    )
    .unwrap();
    assert!(roster.status.is_none());
    assert!(roster.engineers.is_none());
}
