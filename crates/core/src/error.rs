// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::{DomainError, UserId};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The actor may not perform this operation on this record.
    Unauthorized {
        /// The attempted action.
        action: &'static str,
        /// Why the actor was refused.
        reason: String,
    },
    /// A command names a user the directory does not hold.
    UnknownUser(UserId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Unauthorized { action, reason } => {
                write!(f, "Not authorized to {action}: {reason}")
            }
            Self::UnknownUser(id) => write!(f, "User {id} not found"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
