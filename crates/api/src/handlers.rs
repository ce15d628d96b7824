// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions, one per logical operation.
//!
//! Every handler follows the same sequence: role gate, parse the request
//! into domain types, run the transition through persistence, then
//! deliver any notifications it produced. Delivery happens after the
//! write has committed and never fails the operation.

use std::str::FromStr;

use helpdesk::{ReassignDecision, RosterCommand, RosterTransition, TicketCommand, TicketTransition};
use helpdesk_domain::{
    AvailabilityReport, Department, DomainError, DutyRoster, EngineerSlot, EntryId, FacilityClock,
    LocalInstant, Role, RosterEngineerInput, RosterId, RosterStatus, Severity, ShiftAssignment,
    ShiftType, Ticket, TicketDetails, TicketId, TicketStatus, UserAccount, UserId, WeekRange,
    parse_calendar_date, require_text, resolve_availability,
};
use helpdesk_notify::dispatch;
use helpdesk_persistence::{NewUser, Persistence, StoredNotification};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AddActionLogRequest, AssignTicketRequest, AvailabilityResponse, CloneRosterRequest,
    CreateRosterRequest, CreateTicketRequest, CreateUserRequest, HandleReassignRequest,
    ListEngineersRequest, ListNotificationsResponse, ListRostersRequest, ListRostersResponse,
    ListTicketsRequest, ListTicketsResponse, ListUsersResponse, NotificationResponse,
    RemoveEngineerRequest, RequestReassignRequest, RosterEngineerRequest, RosterResponse,
    RosterWriteResponse, SetUserActiveRequest, ShiftRequest, TicketResponse, TicketWriteResponse,
    UpdateEngineerShiftRequest, UpdateTicketStatusRequest, UserResponse,
};

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_field<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value.trim().parse().map_err(translate_domain_error)
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_field)
        .transpose()
}

fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_calendar_date(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolves the two ways of addressing a roster entry.
fn engineer_slot(index: Option<usize>, entry_id: Option<u32>) -> Result<EngineerSlot, ApiError> {
    match (index, entry_id) {
        (Some(index), None) => Ok(EngineerSlot::Index(index)),
        (None, Some(entry)) => Ok(EngineerSlot::Entry(EntryId::new(entry))),
        (Some(_), Some(_)) => Err(ApiError::InvalidInput {
            field: String::from("engineer_index"),
            message: String::from("Provide engineer_index or entry_id, not both"),
        }),
        (None, None) => Err(ApiError::InvalidInput {
            field: String::from("engineer_index"),
            message: String::from("Either engineer_index or entry_id is required"),
        }),
    }
}

fn shift_assignment(shift: &ShiftRequest) -> Result<ShiftAssignment, ApiError> {
    Ok(ShiftAssignment {
        date: parse_date("date", &shift.date)?,
        shift_type: parse_field::<ShiftType>(&shift.shift_type)?,
    })
}

fn engineer_input(request: RosterEngineerRequest) -> Result<RosterEngineerInput, ApiError> {
    let shifts: Vec<ShiftAssignment> = request
        .shifts
        .iter()
        .map(shift_assignment)
        .collect::<Result<_, _>>()?;
    Ok(RosterEngineerInput {
        engineer_ref: request.engineer_ref.map(UserId::new),
        engineer_name: request.engineer_name,
        job_role: request.job_role,
        department: parse_optional::<Department>(request.department.as_deref())?,
        location: request.location,
        contact_no: request.contact_no,
        shifts,
    })
}

/// Logs a refused operation and passes the error through.
fn rejected(action: &'static str, actor: &AuthenticatedActor, err: ApiError) -> ApiError {
    warn!(
        action,
        user_id = actor.user_id().value(),
        error = %err,
        "Operation rejected"
    );
    err
}

// ============================================================================
// Tickets
// ============================================================================

fn finish_ticket(
    persistence: &mut Persistence,
    transition: TicketTransition,
    message: String,
) -> TicketWriteResponse {
    let notifications_sent: usize = dispatch(persistence, &transition.notifications);
    TicketWriteResponse {
        ticket: TicketResponse::from(&transition.ticket),
        notifications_sent,
        message,
    }
}

fn run_ticket_command(
    persistence: &mut Persistence,
    ticket_id: i64,
    command: TicketCommand,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    let action: &'static str = command.name();
    let transition: TicketTransition = persistence
        .mutate_ticket(TicketId::new(ticket_id), command, &actor.to_actor(), now)
        .map_err(|e| rejected(action, actor, ApiError::from(e)))?;
    let message: String = format!("Applied {action} to {}", transition.ticket.code());
    Ok(finish_ticket(persistence, transition, message))
}

/// Raises a new ticket on behalf of the authenticated actor.
///
/// Any authenticated user may raise a ticket. Admins are notified.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The ticket details
/// * `actor` - The authenticated actor raising the ticket
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if:
/// - A required field is blank
/// - The call type or severity is unknown
/// - The write fails
pub fn create_ticket(
    persistence: &mut Persistence,
    request: &CreateTicketRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    let details: TicketDetails = TicketDetails::new(
        &request.asset_id,
        &request.call_type,
        &request.problem_description,
        &request.location,
    )
    .map_err(|e| rejected("create ticket", actor, translate_domain_error(e)))?;
    let severity: Option<Severity> = parse_optional(request.severity.as_deref())?;

    let transition: TicketTransition = persistence
        .create_ticket(details, severity, &actor.to_actor(), now)
        .map_err(|e| rejected("create ticket", actor, ApiError::from(e)))?;
    let message: String = format!("Created ticket {}", transition.ticket.code());
    Ok(finish_ticket(persistence, transition, message))
}

/// Assigns a ticket to an engineer.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the ticket or engineer
/// does not exist, or the engineer is inactive.
pub fn assign_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: &AssignTicketRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    AuthorizationService::authorize_assign_ticket(actor)
        .map_err(|e| rejected("assign ticket", actor, e.into()))?;
    let command: TicketCommand = TicketCommand::Assign {
        engineer: UserId::new(request.engineer_id),
        severity: parse_optional(request.severity.as_deref())?,
    };
    run_ticket_command(persistence, ticket_id, command, actor, now)
}

/// Sets a ticket's status directly.
///
/// # Errors
///
/// Returns an error if the actor is neither an Admin nor the assigned
/// engineer, the status is unknown, or the ticket is being resolved
/// without an action log.
pub fn update_ticket_status(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: &UpdateTicketStatusRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    let status: TicketStatus = parse_field(&request.status)?;
    run_ticket_command(
        persistence,
        ticket_id,
        TicketCommand::UpdateStatus { status },
        actor,
        now,
    )
}

/// Resolves a ticket.
///
/// # Errors
///
/// Returns an error under the same conditions as [`update_ticket_status`].
pub fn resolve_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    run_ticket_command(persistence, ticket_id, TicketCommand::Resolve, actor, now)
}

/// Appends a work entry to a ticket's action log.
///
/// # Errors
///
/// Returns an error if the actor is neither an Admin nor the assigned
/// engineer, or the action text is blank.
pub fn add_action_log(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: AddActionLogRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    let command: TicketCommand = TicketCommand::AddActionLog {
        action: request.action,
        details: optional_text(request.details),
    };
    run_ticket_command(persistence, ticket_id, command, actor, now)
}

/// Asks an admin to move a ticket to another engineer.
///
/// # Errors
///
/// Returns an error if the actor is not the assigned engineer, the
/// candidate is not an active engineer, the reason is blank, or a request
/// is already pending.
pub fn request_reassign(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: RequestReassignRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    let command: TicketCommand = TicketCommand::RequestReassign {
        candidate: UserId::new(request.candidate_engineer_id),
        reason: request.reason,
    };
    run_ticket_command(persistence, ticket_id, command, actor, now)
}

/// Approves or rejects the pending reassignment request.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the action is neither
/// approve nor reject, or no request is pending.
pub fn handle_reassign_request(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: &HandleReassignRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketWriteResponse, ApiError> {
    AuthorizationService::authorize_handle_reassignment(actor)
        .map_err(|e| rejected("handle reassignment", actor, e.into()))?;
    let decision: ReassignDecision = parse_field(&request.action)?;
    run_ticket_command(
        persistence,
        ticket_id,
        TicketCommand::HandleReassign { decision },
        actor,
        now,
    )
}

/// Loads one ticket the actor is allowed to see.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the ticket does not exist or is not
/// visible to the actor.
pub fn get_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TicketResponse, ApiError> {
    let ticket: Ticket =
        persistence.get_visible_ticket(&actor.to_actor(), TicketId::new(ticket_id))?;
    debug!(ticket_id, user_id = actor.user_id().value(), "Loaded ticket");
    Ok(TicketResponse::from(&ticket))
}

/// Lists the tickets the actor is allowed to see, newest first.
///
/// # Errors
///
/// Returns an error if the status filter is unknown or the read fails.
pub fn list_tickets(
    persistence: &mut Persistence,
    request: &ListTicketsRequest,
    actor: &AuthenticatedActor,
) -> Result<ListTicketsResponse, ApiError> {
    let status: Option<TicketStatus> = parse_optional(request.status.as_deref())?;
    let tickets: Vec<Ticket> = persistence.list_visible_tickets(&actor.to_actor(), status)?;
    debug!(
        user_id = actor.user_id().value(),
        count = tickets.len(),
        "Listed tickets"
    );
    Ok(ListTicketsResponse {
        tickets: tickets.iter().map(TicketResponse::from).collect(),
    })
}

// ============================================================================
// Rosters
// ============================================================================

fn run_roster_command(
    persistence: &mut Persistence,
    roster_id: i64,
    command: RosterCommand,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    let action: &'static str = command.name();
    AuthorizationService::authorize_manage_rosters(actor)
        .map_err(|e| rejected(action, actor, e.into()))?;
    let transition: RosterTransition = persistence
        .mutate_roster(RosterId::new(roster_id), command, &actor.to_actor(), now)
        .map_err(|e| rejected(action, actor, ApiError::from(e)))?;
    Ok(RosterWriteResponse {
        roster: RosterResponse::from(&transition.roster),
        message: transition.summary,
    })
}

/// Creates a duty roster.
///
/// With `engineers` omitted the roster is pre-populated from the active
/// engineers using the default weekly pattern.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - A date, status, department or shift code is malformed
/// - The week end is not after the week start
/// - A shift date falls outside the week
/// - The roster is published and overlaps another published roster
pub fn create_roster(
    persistence: &mut Persistence,
    request: CreateRosterRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterResponse, ApiError> {
    AuthorizationService::authorize_manage_rosters(actor)
        .map_err(|e| rejected("create roster", actor, e.into()))?;

    let start: Date = parse_date("week_start_date", &request.week_start_date)?;
    let end: Date = parse_date("week_end_date", &request.week_end_date)?;
    let week: WeekRange = WeekRange::new(start, end).map_err(translate_domain_error)?;
    let status: RosterStatus =
        parse_optional(request.status.as_deref())?.unwrap_or(RosterStatus::Draft);
    let engineers: Option<Vec<RosterEngineerInput>> = request
        .engineers
        .map(|entries| {
            entries
                .into_iter()
                .map(engineer_input)
                .collect::<Result<Vec<_>, ApiError>>()
        })
        .transpose()?;

    let roster: DutyRoster = persistence
        .create_roster(week, status, engineers, &actor.to_actor(), now)
        .map_err(|e| rejected("create roster", actor, ApiError::from(e)))?;
    Ok(RosterResponse::from(&roster))
}

/// Publishes a draft roster.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the roster is not a
/// draft, or another published roster overlaps its week.
pub fn publish_roster(
    persistence: &mut Persistence,
    roster_id: i64,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    run_roster_command(persistence, roster_id, RosterCommand::Publish, actor, now)
}

/// Archives a roster.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the roster is already
/// archived.
pub fn archive_roster(
    persistence: &mut Persistence,
    roster_id: i64,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    run_roster_command(persistence, roster_id, RosterCommand::Archive, actor, now)
}

/// Copies a roster to a new week as a draft.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the date is malformed,
/// or the source roster does not exist.
pub fn clone_roster(
    persistence: &mut Persistence,
    source_roster_id: i64,
    request: &CloneRosterRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterResponse, ApiError> {
    AuthorizationService::authorize_manage_rosters(actor)
        .map_err(|e| rejected("clone roster", actor, e.into()))?;
    let new_start: Date = parse_date("new_start_date", &request.new_start_date)?;
    let roster: DutyRoster = persistence
        .clone_roster(
            RosterId::new(source_roster_id),
            new_start,
            &actor.to_actor(),
            now,
        )
        .map_err(|e| rejected("clone roster", actor, ApiError::from(e)))?;
    Ok(RosterResponse::from(&roster))
}

/// Sets one engineer's shift on one date, replacing any existing entry.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the entry does not
/// exist, the shift code is unknown, or the date is outside the week.
pub fn update_engineer_shift(
    persistence: &mut Persistence,
    roster_id: i64,
    request: &UpdateEngineerShiftRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    let command: RosterCommand = RosterCommand::SetShift {
        slot: engineer_slot(request.engineer_index, request.entry_id)?,
        date: parse_date("date", &request.date)?,
        shift_type: parse_field(&request.shift_type)?,
    };
    run_roster_command(persistence, roster_id, command, actor, now)
}

/// Appends an engineer entry to a roster.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the entry is invalid.
pub fn add_engineer(
    persistence: &mut Persistence,
    roster_id: i64,
    request: RosterEngineerRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    let command: RosterCommand = RosterCommand::AddEngineer {
        engineer: engineer_input(request)?,
    };
    run_roster_command(persistence, roster_id, command, actor, now)
}

/// Removes an engineer entry from a roster.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the entry does not
/// exist.
pub fn remove_engineer(
    persistence: &mut Persistence,
    roster_id: i64,
    request: &RemoveEngineerRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<RosterWriteResponse, ApiError> {
    let command: RosterCommand = RosterCommand::RemoveEngineer {
        slot: engineer_slot(request.engineer_index, request.entry_id)?,
    };
    run_roster_command(persistence, roster_id, command, actor, now)
}

/// Loads one roster.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the roster does not exist.
pub fn get_roster(
    persistence: &mut Persistence,
    roster_id: i64,
    actor: &AuthenticatedActor,
) -> Result<RosterResponse, ApiError> {
    let roster: DutyRoster = persistence.get_roster(RosterId::new(roster_id))?;
    debug!(roster_id, user_id = actor.user_id().value(), "Loaded roster");
    Ok(RosterResponse::from(&roster))
}

/// Lists rosters, most recent week first.
///
/// # Errors
///
/// Returns an error if the status filter is unknown or the read fails.
pub fn list_rosters(
    persistence: &mut Persistence,
    request: &ListRostersRequest,
    actor: &AuthenticatedActor,
) -> Result<ListRostersResponse, ApiError> {
    let status: Option<RosterStatus> = parse_optional(request.status.as_deref())?;
    let rosters: Vec<DutyRoster> = persistence.list_rosters(status)?;
    debug!(
        user_id = actor.user_id().value(),
        count = rosters.len(),
        "Listed rosters"
    );
    Ok(ListRostersResponse {
        rosters: rosters.iter().map(RosterResponse::from).collect(),
    })
}

/// Loads the published roster covering the facility's current date.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no published roster covers today.
pub fn get_current_roster(
    persistence: &mut Persistence,
    clock: &FacilityClock,
    now: OffsetDateTime,
    actor: &AuthenticatedActor,
) -> Result<RosterResponse, ApiError> {
    let local: LocalInstant = clock.local(now).map_err(translate_domain_error)?;
    let roster: DutyRoster =
        persistence
            .find_current_roster(local.date)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Roster"),
                message: format!("No published roster covers {}", local.date),
            })?;
    debug!(
        user_id = actor.user_id().value(),
        date = %local.date,
        "Loaded current roster"
    );
    Ok(RosterResponse::from(&roster))
}

// ============================================================================
// Availability
// ============================================================================

/// Ranks the active engineers by availability at `now`.
///
/// With no published roster covering today every engineer is reported as
/// not in roster and `has_roster` is false.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or a read fails.
pub fn get_engineers_with_availability(
    persistence: &mut Persistence,
    clock: &FacilityClock,
    now: OffsetDateTime,
    actor: &AuthenticatedActor,
) -> Result<AvailabilityResponse, ApiError> {
    AuthorizationService::authorize_view_availability(actor)
        .map_err(|e| rejected("view availability", actor, e.into()))?;

    let local: LocalInstant = clock.local(now).map_err(translate_domain_error)?;
    let engineers: Vec<UserAccount> = persistence.list_engineers(true)?;
    let roster: Option<DutyRoster> = persistence.find_current_roster(local.date)?;
    let report: AvailabilityReport = resolve_availability(engineers, roster.as_ref(), local);

    debug!(
        date = %report.date,
        minute_of_day = report.minute_of_day,
        has_roster = report.has_roster,
        engineers = report.engineers.len(),
        "Resolved availability"
    );
    Ok(AvailabilityResponse::new(&report, clock.timezone_name()))
}

// ============================================================================
// Users
// ============================================================================

fn new_user(request: CreateUserRequest) -> Result<NewUser, ApiError> {
    let name: String = require_text("name", &request.name).map_err(translate_domain_error)?;
    let email: String = require_text("email", &request.email).map_err(translate_domain_error)?;
    if !email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{email}' is not an email address"),
        });
    }
    Ok(NewUser {
        name,
        email,
        role: parse_field(&request.role)?,
        department: parse_optional(request.department.as_deref())?,
        job_role: optional_text(request.job_role),
        location: optional_text(request.location),
        contact_no: optional_text(request.contact_no),
    })
}

/// Creates a user account.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, a field is invalid, or
/// the email is already registered.
pub fn create_user(
    persistence: &mut Persistence,
    request: CreateUserRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<UserResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)
        .map_err(|e| rejected("create user", actor, e.into()))?;
    let user: NewUser = new_user(request)?;
    let account: UserAccount = persistence
        .create_user(&user, now)
        .map_err(|e| rejected("create user", actor, ApiError::from(e)))?;
    info!(
        user_id = account.user_id.value(),
        role = %account.role,
        created_by = actor.user_id().value(),
        "Created user"
    );
    Ok(UserResponse::from(&account))
}

/// Lists every user account by name.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the read fails.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)
        .map_err(|e| rejected("list users", actor, e.into()))?;
    let users: Vec<UserAccount> = persistence.list_users()?;
    Ok(ListUsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
    })
}

/// Activates or deactivates an account.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the account does not
/// exist, or the admin tries to deactivate their own account.
pub fn set_user_active(
    persistence: &mut Persistence,
    user_id: i64,
    request: &SetUserActiveRequest,
    actor: &AuthenticatedActor,
) -> Result<UserResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)
        .map_err(|e| rejected("set user active", actor, e.into()))?;
    if !request.is_active && actor.user_id().value() == user_id {
        return Err(rejected(
            "set user active",
            actor,
            ApiError::DomainRuleViolation {
                rule: String::from("no_self_deactivation"),
                message: String::from("An admin cannot deactivate their own account"),
            },
        ));
    }
    let account: UserAccount =
        persistence.set_user_active(UserId::new(user_id), request.is_active)?;
    info!(
        user_id,
        is_active = account.is_active,
        changed_by = actor.user_id().value(),
        "Changed user activation"
    );
    Ok(UserResponse::from(&account))
}

/// Lists engineer accounts, active ones only unless asked otherwise.
///
/// # Errors
///
/// Returns an error if the actor is a plain user or the read fails.
pub fn list_engineers(
    persistence: &mut Persistence,
    request: &ListEngineersRequest,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_list_engineers(actor)
        .map_err(|e| rejected("list engineers", actor, e.into()))?;
    let engineers: Vec<UserAccount> =
        persistence.list_engineers(request.active_only.unwrap_or(true))?;
    Ok(ListUsersResponse {
        users: engineers.iter().map(UserResponse::from).collect(),
    })
}

/// Creates the first admin account when there are no users at all.
///
/// Returns the created account, or `None` if users already exist.
///
/// # Errors
///
/// Returns an error if the name or email is invalid or the write fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    name: &str,
    email: &str,
    now: OffsetDateTime,
) -> Result<Option<UserResponse>, ApiError> {
    if persistence.count_users()? > 0 {
        return Ok(None);
    }
    let user: NewUser = new_user(CreateUserRequest {
        name: name.to_string(),
        email: email.to_string(),
        role: Role::Admin.as_str().to_string(),
        department: None,
        job_role: None,
        location: None,
        contact_no: None,
    })?;
    let account: UserAccount = persistence.create_user(&user, now)?;
    info!(
        user_id = account.user_id.value(),
        email = %account.email,
        "Created bootstrap admin"
    );
    Ok(Some(UserResponse::from(&account)))
}

// ============================================================================
// Notifications
// ============================================================================

/// Lists the actor's notifications, newest first.
///
/// Includes those addressed to the actor and those broadcast to their role.
///
/// # Errors
///
/// Returns an error if the read fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListNotificationsResponse, ApiError> {
    let stored: Vec<StoredNotification> =
        persistence.list_notifications(actor.user_id(), actor.role())?;
    let unread: usize = stored.iter().filter(|n| !n.is_read).count();
    Ok(ListNotificationsResponse {
        notifications: stored.iter().map(NotificationResponse::from).collect(),
        unread,
    })
}

/// Marks one of the actor's notifications read.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the notification does not exist or is
/// not addressed to the actor.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    notification_id: i64,
    actor: &AuthenticatedActor,
) -> Result<NotificationResponse, ApiError> {
    let stored: StoredNotification =
        persistence.mark_notification_read(notification_id, actor.user_id(), actor.role())?;
    Ok(NotificationResponse::from(&stored))
}
