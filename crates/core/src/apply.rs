// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{ReassignDecision, TicketCommand};
use crate::error::CoreError;
use crate::state::{TicketTransition, UserDirectory};
use helpdesk_domain::{
    Actor, DomainError, ReassignRequest, Role, Severity, Ticket, TicketCode, TicketDetails, TicketId,
    TicketStatus, UserAccount, UserId,
};
use helpdesk_notify::{Notification, NotificationKind, Recipient};
use time::OffsetDateTime;

fn notify(
    ticket: &Ticket,
    kind: NotificationKind,
    recipient: Recipient,
    title: &str,
    message: String,
) -> Notification {
    Notification::new(
        kind,
        ticket.id(),
        ticket.code().clone(),
        recipient,
        title.to_string(),
        message,
    )
}

pub(crate) fn ensure_admin(actor: &Actor, action: &'static str) -> Result<(), CoreError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Unauthorized {
            action,
            reason: String::from("admin role required"),
        })
    }
}

fn ensure_admin_or_assignee(
    actor: &Actor,
    ticket: &Ticket,
    action: &'static str,
) -> Result<(), CoreError> {
    if actor.is_admin() || ticket.is_assigned_to(actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Unauthorized {
            action,
            reason: format!("only an admin or the assigned engineer may {action}"),
        })
    }
}

fn ensure_assignee(actor: &Actor, ticket: &Ticket, action: &'static str) -> Result<(), CoreError> {
    if ticket.is_assigned_to(actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Unauthorized {
            action,
            reason: String::from("only the assigned engineer may request reassignment"),
        })
    }
}

fn lookup<D>(directory: &D, id: UserId) -> Result<&UserAccount, CoreError>
where
    D: UserDirectory + ?Sized,
{
    directory.find(id).ok_or(CoreError::UnknownUser(id))
}

/// Opens a new ticket.
///
/// The ticket starts `open` with severity defaulting to medium, and every
/// admin is notified.
///
/// # Arguments
///
/// * `id` - The reserved storage id
/// * `code` - The reserved ticket code
/// * `details` - Validated problem details
/// * `severity` - Optional initial severity
/// * `raised_by` - The user raising the ticket
/// * `now` - The creation instant
#[must_use]
pub fn open_ticket(
    id: TicketId,
    code: TicketCode,
    details: TicketDetails,
    severity: Option<Severity>,
    raised_by: &Actor,
    now: OffsetDateTime,
) -> TicketTransition {
    let ticket: Ticket = Ticket::open(id, code, details, severity, raised_by, now);
    let notification: Notification = notify(
        &ticket,
        NotificationKind::TicketCreated,
        Recipient::Role(Role::Admin),
        "New ticket raised",
        format!(
            "{} raised {} ({}): {}",
            raised_by.name,
            ticket.code(),
            ticket.details().call_type,
            ticket.details().problem_description
        ),
    );
    TicketTransition {
        ticket,
        notifications: vec![notification],
    }
}

/// Applies a command to a ticket, producing the new ticket and the
/// notifications it emits.
///
/// # Arguments
///
/// * `ticket` - The current ticket (immutable)
/// * `command` - The change to apply
/// * `directory` - Accounts for every user the command references
/// * `actor` - The user performing the change
/// * `now` - The instant of the change
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not permitted to perform the command on this ticket
/// - A referenced user is unknown, inactive, or not an engineer
/// - The command violates a ticket rule (resolution guard, pending request)
pub fn apply_ticket<D>(
    ticket: &Ticket,
    command: TicketCommand,
    directory: &D,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TicketTransition, CoreError>
where
    D: UserDirectory + ?Sized,
{
    let action: &'static str = command.name();
    let mut next: Ticket = ticket.clone();

    let notifications: Vec<Notification> = match command {
        TicketCommand::Assign { engineer, severity } => {
            ensure_admin(actor, action)?;
            let engineer: &UserAccount = lookup(directory, engineer)?;
            next.assign(engineer, severity, actor, now)?;
            vec![
                notify(
                    &next,
                    NotificationKind::TicketAssigned,
                    Recipient::User(engineer.user_id),
                    "Ticket assigned to you",
                    format!(
                        "{} assigned {} to you with {} severity",
                        actor.name,
                        next.code(),
                        next.severity()
                    ),
                ),
                notify(
                    &next,
                    NotificationKind::TicketAssigned,
                    Recipient::User(next.raised_by()),
                    "Your ticket has been assigned",
                    format!("{} is now handled by {}", next.code(), engineer.name),
                ),
            ]
        }
        TicketCommand::UpdateStatus { status } => {
            ensure_admin_or_assignee(actor, ticket, action)?;
            next.set_status(status, actor, now)?;
            vec![status_changed(&next, actor)]
        }
        TicketCommand::Resolve => {
            ensure_admin_or_assignee(actor, ticket, action)?;
            next.set_status(TicketStatus::Resolved, actor, now)?;
            vec![status_changed(&next, actor)]
        }
        TicketCommand::AddActionLog { action: text, details } => {
            ensure_admin_or_assignee(actor, ticket, action)?;
            next.add_work_log(&text, details.as_deref(), actor, now)?;
            Vec::new()
        }
        TicketCommand::RequestReassign { candidate, reason } => {
            ensure_assignee(actor, ticket, action)?;
            let candidate: &UserAccount = lookup(directory, candidate)?;
            next.request_reassignment(candidate, &reason, actor, now)?;
            vec![notify(
                &next,
                NotificationKind::ReassignRequested,
                Recipient::Role(Role::Admin),
                "Reassignment requested",
                format!(
                    "{} asked to move {} to {}: {}",
                    actor.name,
                    next.code(),
                    candidate.name,
                    reason.trim()
                ),
            )]
        }
        TicketCommand::HandleReassign {
            decision: ReassignDecision::Approve,
        } => {
            ensure_admin(actor, action)?;
            let candidate_id: UserId = ticket
                .reassignment()
                .request()
                .filter(|_| ticket.reassignment().is_pending())
                .map(|r| r.requested_to)
                .ok_or_else(|| DomainError::NoPendingReassignment(ticket.code().clone()))?;
            let candidate: &UserAccount = lookup(directory, candidate_id)?;
            let (_, previous): (ReassignRequest, Option<UserId>) =
                next.approve_reassignment(candidate, actor, now)?;
            let mut out: Vec<Notification> = vec![notify(
                &next,
                NotificationKind::ReassignApproved,
                Recipient::User(candidate.user_id),
                "Ticket reassigned to you",
                format!("{} moved {} to you", actor.name, next.code()),
            )];
            if let Some(previous) = previous.filter(|p| *p != candidate.user_id) {
                out.push(notify(
                    &next,
                    NotificationKind::ReassignApproved,
                    Recipient::User(previous),
                    "Reassignment approved",
                    format!(
                        "Your request to move {} to {} was approved",
                        next.code(),
                        candidate.name
                    ),
                ));
            }
            out
        }
        TicketCommand::HandleReassign {
            decision: ReassignDecision::Reject,
        } => {
            ensure_admin(actor, action)?;
            let request: ReassignRequest = next.reject_reassignment(actor, now)?;
            vec![notify(
                &next,
                NotificationKind::ReassignRejected,
                Recipient::User(request.requested_by),
                "Reassignment rejected",
                format!(
                    "{} rejected your request to move {}; it stays with you",
                    actor.name,
                    next.code()
                ),
            )]
        }
    };

    Ok(TicketTransition {
        ticket: next,
        notifications,
    })
}

fn status_changed(ticket: &Ticket, actor: &Actor) -> Notification {
    notify(
        ticket,
        NotificationKind::StatusChanged,
        Recipient::User(ticket.raised_by()),
        "Ticket status updated",
        format!(
            "{} moved {} to {}",
            actor.name,
            ticket.code(),
            ticket.status()
        ),
    )
}
