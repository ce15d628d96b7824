// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Sessions and credentials live outside this crate. The caller supplies
//! a user id it has already vouched for; authentication resolves it to an
//! active account and authorization gates operations by role. Checks that
//! depend on the record being touched (the assigned engineer, the ticket
//! raiser) are made by the core transition functions.

use helpdesk_domain::{Actor, Role, UserAccount, UserId};
use helpdesk_persistence::{Persistence, PersistenceError};
use tracing::{debug, warn};

use crate::error::AuthError;

/// An authenticated actor backed by a stored, active account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account the actor authenticated as.
    pub account: UserAccount,
}

impl AuthenticatedActor {
    /// Wraps an account that has already been verified.
    #[must_use]
    pub const fn new(account: UserAccount) -> Self {
        Self { account }
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.account.user_id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.account.role
    }

    /// The actor as seen by the core transition functions.
    #[must_use]
    pub fn to_actor(&self) -> Actor {
        self.account.to_actor()
    }
}

/// Resolves caller-supplied user ids to authenticated actors.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates `user_id` against the stored accounts.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `user_id` - The id the caller claims to act as
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the account does not exist or has
    /// been deactivated.
    pub fn authenticate(
        persistence: &mut Persistence,
        user_id: i64,
    ) -> Result<AuthenticatedActor, AuthError> {
        let account: UserAccount = match persistence.get_user(UserId::new(user_id)) {
            Ok(account) => account,
            Err(PersistenceError::UserNotFound(_)) => {
                warn!(user_id, "Authentication failed: unknown user");
                return Err(AuthError::AuthenticationFailed {
                    reason: format!("unknown user {user_id}"),
                });
            }
            Err(e) => {
                return Err(AuthError::AuthenticationFailed {
                    reason: format!("could not load user {user_id}: {e}"),
                });
            }
        };

        if !account.is_active {
            warn!(user_id, "Authentication failed: account deactivated");
            return Err(AuthError::AuthenticationFailed {
                reason: format!("user {user_id} is deactivated"),
            });
        }

        debug!(user_id, role = %account.role, "Authenticated");
        Ok(AuthenticatedActor::new(account))
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has permission
/// to perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role() {
            Role::Admin => Ok(()),
            Role::Engineer | Role::User => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor is authorized to create and manage user accounts.
    ///
    /// Only Admin actors may manage users.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_users(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_users")
    }

    /// Checks if an actor is authorized to list engineer accounts.
    ///
    /// Admins pick assignees from this list and engineers pick
    /// reassignment candidates from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither an Admin nor an Engineer.
    pub fn authorize_list_engineers(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role() {
            Role::Admin | Role::Engineer => Ok(()),
            Role::User => Err(AuthError::Unauthorized {
                action: String::from("list_engineers"),
                required_role: String::from("Admin or Engineer"),
            }),
        }
    }

    /// Checks if an actor is authorized to assign a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_assign_ticket(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "assign_ticket")
    }

    /// Checks if an actor is authorized to decide a reassignment request.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_handle_reassignment(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "handle_reassign_request")
    }

    /// Checks if an actor is authorized to create or edit duty rosters.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_rosters(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_rosters")
    }

    /// Checks if an actor is authorized to view engineer availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_availability(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "view_availability")
    }
}
