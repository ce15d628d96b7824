// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the helpdesk.
//!
//! This crate turns client requests into core commands and stored records
//! into response DTOs. It owns the role gates, the request parsing and the
//! translation of every lower-layer error into [`ApiError`]. It knows
//! nothing about HTTP; the server crate maps [`ApiError`] to status codes.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    add_action_log, add_engineer, archive_roster, assign_ticket, bootstrap_admin, clone_roster,
    create_roster, create_ticket, create_user, get_current_roster,
    get_engineers_with_availability, get_roster, get_ticket, handle_reassign_request,
    list_engineers, list_notifications, list_rosters, list_tickets, list_users,
    mark_notification_read, publish_roster, remove_engineer, request_reassign, resolve_ticket,
    set_user_active, update_engineer_shift, update_ticket_status,
};
pub use request_response::{
    ActionLogResponse, AddActionLogRequest, AssignTicketRequest, AvailabilityResponse,
    CloneRosterRequest, CreateRosterRequest, CreateTicketRequest, CreateUserRequest,
    EngineerAvailabilityResponse, HandleReassignRequest, ListEngineersRequest,
    ListNotificationsResponse, ListRostersRequest, ListRostersResponse, ListTicketsRequest,
    ListTicketsResponse, ListUsersResponse, NotificationResponse, ReassignRequestResponse,
    RemoveEngineerRequest, RequestReassignRequest, RosterEngineerRequest,
    RosterEngineerResponse, RosterResponse, RosterWriteResponse, SetUserActiveRequest,
    ShiftRequest, ShiftResponse, TicketResponse, TicketWriteResponse, UpdateEngineerShiftRequest,
    UpdateTicketStatusRequest, UserResponse,
};
