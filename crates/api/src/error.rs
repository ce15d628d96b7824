// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use helpdesk::CoreError;
use helpdesk_domain::DomainError;
use helpdesk_persistence::PersistenceError;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor was refused.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized to {action}: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                reason: format!("{required_role} role required"),
            },
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

fn conflict(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::MissingField { field } => invalid(field, message),
        DomainError::InvalidField { field, reason } => invalid(field, reason),
        DomainError::InvalidCallType(_) => invalid("call_type", message),
        DomainError::InvalidSeverity(_) => invalid("severity", message),
        DomainError::InvalidTicketStatus(_) | DomainError::InvalidRosterStatus(_) => {
            invalid("status", message)
        }
        DomainError::InvalidShiftType(_) => invalid("shift_type", message),
        DomainError::InvalidRole(_) => invalid("role", message),
        DomainError::InvalidDepartment(_) => invalid("department", message),
        DomainError::InvalidWeekRange { .. } => invalid("week_end_date", message),
        DomainError::ShiftDateOutsideWeek { .. }
        | DomainError::DateParseError { .. }
        | DomainError::DateArithmeticOverflow { .. } => invalid("date", message),
        DomainError::InvalidTimezone(_) => invalid("timezone", message),
        DomainError::EngineerIndexOutOfRange { .. } | DomainError::RosterEntryNotFound(_) => {
            not_found("Roster engineer", message)
        }
        DomainError::EngineerInactive(_) | DomainError::NotAnEngineer(_) => {
            conflict("active_engineer", message)
        }
        DomainError::OverlappingPublishedRoster { .. } => {
            conflict("single_published_roster", message)
        }
        DomainError::InvalidRosterTransition { .. } => {
            conflict("roster_status_transition", message)
        }
        DomainError::ResolveWithoutWorkLog(_) => conflict("resolve_requires_action_log", message),
        DomainError::ReassignmentAlreadyPending(_) => {
            conflict("single_pending_reassignment", message)
        }
        DomainError::NoPendingReassignment(_) => {
            conflict("pending_reassignment_required", message)
        }
        DomainError::ReassignToCurrentAssignee(_) => {
            conflict("distinct_reassignment_candidate", message)
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Unauthorized { action, reason } => ApiError::Unauthorized {
            action: action.to_string(),
            reason,
        },
        CoreError::UnknownUser(id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {id} does not exist"),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Rejected(core_err) => translate_core_error(core_err),
            PersistenceError::TicketNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Ticket"),
                message: format!("Ticket {id} does not exist"),
            },
            PersistenceError::RosterNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Roster"),
                message: format!("Roster {id} does not exist"),
            },
            PersistenceError::UserNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("User {id} does not exist"),
            },
            PersistenceError::NotificationNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Notification"),
                message: format!("Notification {id} does not exist"),
            },
            PersistenceError::DuplicateEmail(_) => Self::DomainRuleViolation {
                rule: String::from("unique_email"),
                message: err.to_string(),
            },
            PersistenceError::ConcurrentModification { .. } => Self::DomainRuleViolation {
                rule: String::from("concurrent_modification"),
                message: err.to_string(),
            },
            other => {
                error!(error = %other, "Persistence failure");
                Self::Internal {
                    message: other.to_string(),
                }
            }
        }
    }
}
