// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for the server.
//!
//! Identity is asserted by the fronting gateway through the `X-User-Id`
//! header. The extractor resolves it to an active account before any
//! handler runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use helpdesk_api::{AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor for the authenticated actor.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionActor(actor): SessionActor,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - the header is missing
/// - the header is not a numeric id
/// - the user does not exist or is deactivated
pub struct SessionActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw: &str = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing {USER_ID_HEADER} header");
                SessionError::MissingUserHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid {USER_ID_HEADER} header encoding");
                SessionError::InvalidUserHeader
            })?;

        let user_id: i64 = raw.trim().parse().map_err(|_| {
            warn!(value = raw, "{USER_ID_HEADER} is not a numeric id");
            SessionError::InvalidUserHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(&mut persistence, user_id)
                .map_err(|e| SessionError::AuthenticationFailed(e.to_string()))?;

        debug!(user_id, role = %actor.role(), "Actor authenticated");
        Ok(Self(actor))
    }
}

/// Actor extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// The identity header is missing.
    MissingUserHeader,
    /// The identity header is not a user id.
    InvalidUserHeader,
    /// The user could not be authenticated.
    AuthenticationFailed(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingUserHeader => format!("Missing {USER_ID_HEADER} header"),
            Self::InvalidUserHeader => {
                format!("Invalid {USER_ID_HEADER} header. Expected a numeric user id")
            }
            Self::AuthenticationFailed(reason) => reason,
        };
        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
