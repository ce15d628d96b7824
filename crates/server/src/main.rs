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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use helpdesk_api::{
    AddActionLogRequest, ApiError, AssignTicketRequest, AvailabilityResponse, CloneRosterRequest,
    CreateRosterRequest, CreateTicketRequest, CreateUserRequest, HandleReassignRequest,
    ListEngineersRequest, ListNotificationsResponse, ListRostersRequest, ListRostersResponse,
    ListTicketsRequest, ListTicketsResponse, ListUsersResponse, NotificationResponse,
    RemoveEngineerRequest, RequestReassignRequest, RosterEngineerRequest, RosterResponse,
    RosterWriteResponse, SetUserActiveRequest, TicketResponse, TicketWriteResponse,
    UpdateEngineerShiftRequest, UpdateTicketStatusRequest, UserResponse, add_action_log,
    add_engineer, archive_roster, assign_ticket, bootstrap_admin, clone_roster, create_roster,
    create_ticket, create_user, get_current_roster, get_engineers_with_availability, get_roster,
    get_ticket, handle_reassign_request, list_engineers, list_notifications, list_rosters,
    list_tickets, list_users, mark_notification_read, publish_roster, remove_engineer,
    request_reassign, resolve_ticket, set_user_active, update_engineer_shift,
    update_ticket_status,
};
use helpdesk_domain::{DomainError, FacilityClock};
use helpdesk_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::session::SessionActor;

/// Helpdesk Server - HTTP server for the IT facilities helpdesk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone of the facility, used for "today" and shift windows
    #[arg(short, long, default_value = "UTC")]
    timezone: String,

    /// Name of the admin account seeded into an empty database
    #[arg(long, default_value = "Administrator")]
    admin_name: String,

    /// Email of the admin account seeded into an empty database
    #[arg(long, default_value = "admin@localhost")]
    admin_email: String,
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("invalid facility timezone '{name}'")]
    InvalidTimezone {
        name: String,
        #[source]
        source: DomainError,
    },
    #[error("invalid bind address '{address}'")]
    InvalidBindAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl Args {
    fn facility_clock(&self) -> Result<FacilityClock, ConfigError> {
        FacilityClock::new(&self.timezone).map_err(|source| ConfigError::InvalidTimezone {
            name: self.timezone.clone(),
            source,
        })
    }

    fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address: String = format!("{}:{}", self.bind, self.port);
        address
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddress { address, source })
    }
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; each request holds it for
/// the duration of one handler call.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    /// Facility clock used to evaluate "today".
    clock: FacilityClock,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: UserResponse =
        create_user(&mut persistence, req, &actor, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_users(&mut persistence, &actor)?))
}

/// Handler for POST `/users/{user_id}/active`.
async fn handle_set_user_active(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(user_id): Path<i64>,
    Json(req): Json<SetUserActiveRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(set_user_active(&mut persistence, user_id, &req, &actor)?))
}

/// Handler for GET `/engineers`.
async fn handle_list_engineers(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(req): Query<ListEngineersRequest>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_engineers(&mut persistence, &req, &actor)?))
}

// ============================================================================
// Tickets
// ============================================================================

/// Handler for POST `/tickets`.
async fn handle_create_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketWriteResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse =
        create_ticket(&mut persistence, &req, &actor, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/tickets`.
async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(req): Query<ListTicketsRequest>,
) -> Result<Json<ListTicketsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_tickets(&mut persistence, &req, &actor)?))
}

/// Handler for GET `/tickets/{ticket_id}`.
async fn handle_get_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
) -> Result<Json<TicketResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_ticket(&mut persistence, ticket_id, &actor)?))
}

/// Handler for POST `/tickets/{ticket_id}/assign`.
async fn handle_assign_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
    Json(req): Json<AssignTicketRequest>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse = assign_ticket(
        &mut persistence,
        ticket_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/status`.
async fn handle_update_ticket_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse = update_ticket_status(
        &mut persistence,
        ticket_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/resolve`.
async fn handle_resolve_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse =
        resolve_ticket(&mut persistence, ticket_id, &actor, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/logs`.
async fn handle_add_action_log(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
    Json(req): Json<AddActionLogRequest>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse = add_action_log(
        &mut persistence,
        ticket_id,
        req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/reassign`.
async fn handle_request_reassign(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
    Json(req): Json<RequestReassignRequest>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse = request_reassign(
        &mut persistence,
        ticket_id,
        req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/reassign/decision`.
async fn handle_decide_reassign(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ticket_id): Path<i64>,
    Json(req): Json<HandleReassignRequest>,
) -> Result<Json<TicketWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TicketWriteResponse = handle_reassign_request(
        &mut persistence,
        ticket_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

// ============================================================================
// Rosters
// ============================================================================

/// Handler for POST `/rosters`.
async fn handle_create_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateRosterRequest>,
) -> Result<(StatusCode, Json<RosterResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterResponse =
        create_roster(&mut persistence, req, &actor, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/rosters`.
async fn handle_list_rosters(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(req): Query<ListRostersRequest>,
) -> Result<Json<ListRostersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_rosters(&mut persistence, &req, &actor)?))
}

/// Handler for GET `/rosters/current`.
async fn handle_get_current_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<RosterResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterResponse = get_current_roster(
        &mut persistence,
        &app_state.clock,
        OffsetDateTime::now_utc(),
        &actor,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/rosters/{roster_id}`.
async fn handle_get_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
) -> Result<Json<RosterResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_roster(&mut persistence, roster_id, &actor)?))
}

/// Handler for POST `/rosters/{roster_id}/publish`.
async fn handle_publish_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
) -> Result<Json<RosterWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterWriteResponse =
        publish_roster(&mut persistence, roster_id, &actor, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/rosters/{roster_id}/archive`.
async fn handle_archive_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
) -> Result<Json<RosterWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterWriteResponse =
        archive_roster(&mut persistence, roster_id, &actor, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/rosters/{roster_id}/clone`.
async fn handle_clone_roster(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
    Json(req): Json<CloneRosterRequest>,
) -> Result<(StatusCode, Json<RosterResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterResponse = clone_roster(
        &mut persistence,
        roster_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/rosters/{roster_id}/shifts`.
async fn handle_update_engineer_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
    Json(req): Json<UpdateEngineerShiftRequest>,
) -> Result<Json<RosterWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterWriteResponse = update_engineer_shift(
        &mut persistence,
        roster_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/rosters/{roster_id}/engineers`.
async fn handle_add_engineer(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
    Json(req): Json<RosterEngineerRequest>,
) -> Result<Json<RosterWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterWriteResponse = add_engineer(
        &mut persistence,
        roster_id,
        req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/rosters/{roster_id}/engineers/remove`.
async fn handle_remove_engineer(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(roster_id): Path<i64>,
    Json(req): Json<RemoveEngineerRequest>,
) -> Result<Json<RosterWriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RosterWriteResponse = remove_engineer(
        &mut persistence,
        roster_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

// ============================================================================
// Availability and notifications
// ============================================================================

/// Handler for GET `/availability`.
async fn handle_get_availability(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse = get_engineers_with_availability(
        &mut persistence,
        &app_state.clock,
        OffsetDateTime::now_utc(),
        &actor,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/notifications`.
async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListNotificationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_notifications(&mut persistence, &actor)?))
}

/// Handler for POST `/notifications/{notification_id}/read`.
async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(mark_notification_read(
        &mut persistence,
        notification_id,
        &actor,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users", post(handle_create_user).get(handle_list_users))
        .route("/users/{user_id}/active", post(handle_set_user_active))
        .route("/engineers", get(handle_list_engineers))
        .route("/tickets", post(handle_create_ticket).get(handle_list_tickets))
        .route("/tickets/{ticket_id}", get(handle_get_ticket))
        .route("/tickets/{ticket_id}/assign", post(handle_assign_ticket))
        .route("/tickets/{ticket_id}/status", post(handle_update_ticket_status))
        .route("/tickets/{ticket_id}/resolve", post(handle_resolve_ticket))
        .route("/tickets/{ticket_id}/logs", post(handle_add_action_log))
        .route("/tickets/{ticket_id}/reassign", post(handle_request_reassign))
        .route(
            "/tickets/{ticket_id}/reassign/decision",
            post(handle_decide_reassign),
        )
        .route("/rosters", post(handle_create_roster).get(handle_list_rosters))
        .route("/rosters/current", get(handle_get_current_roster))
        .route("/rosters/{roster_id}", get(handle_get_roster))
        .route("/rosters/{roster_id}/publish", post(handle_publish_roster))
        .route("/rosters/{roster_id}/archive", post(handle_archive_roster))
        .route("/rosters/{roster_id}/clone", post(handle_clone_roster))
        .route("/rosters/{roster_id}/shifts", post(handle_update_engineer_shift))
        .route("/rosters/{roster_id}/engineers", post(handle_add_engineer))
        .route(
            "/rosters/{roster_id}/engineers/remove",
            post(handle_remove_engineer),
        )
        .route("/availability", get(handle_get_availability))
        .route("/notifications", get(handle_list_notifications))
        .route(
            "/notifications/{notification_id}/read",
            post(handle_mark_notification_read),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing helpdesk server");

    let clock: FacilityClock = args.facility_clock()?;
    let addr: SocketAddr = args.socket_addr()?;

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    match bootstrap_admin(
        &mut persistence,
        &args.admin_name,
        &args.admin_email,
        OffsetDateTime::now_utc(),
    )? {
        Some(admin) => warn!(
            user_id = admin.user_id,
            email = %admin.email,
            "Seeded admin account into empty database"
        ),
        None => info!("Existing users found, skipping admin seed"),
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock,
    };
    let app: Router = build_router(app_state);

    info!(
        timezone = clock.timezone_name(),
        "Server listening on {}", addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
