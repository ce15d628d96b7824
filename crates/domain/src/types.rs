// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canonical numeric identifier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a persisted user identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a registered user holds.
///
/// Roles drive both authorization and ticket visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Assigns tickets, adjudicates reassignment, maintains rosters.
    Admin,
    /// Works tickets assigned to them and appears on duty rosters.
    Engineer,
    /// Raises tickets.
    User,
}

impl Role {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Engineer => "engineer",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "engineer" => Ok(Self::Engineer),
            "user" => Ok(Self::User),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Department an engineer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// IT facilities management.
    #[serde(rename = "ITFM")]
    Itfm,
    /// Software development.
    #[serde(rename = "Software Development")]
    SoftwareDevelopment,
}

impl Department {
    /// Returns the display and storage form of the department.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Itfm => "ITFM",
            Self::SoftwareDevelopment => "Software Development",
        }
    }
}

impl FromStr for Department {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ITFM" => Ok(Self::Itfm),
            "Software Development" => Ok(Self::SoftwareDevelopment),
            _ => Err(DomainError::InvalidDepartment(s.to_string())),
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered account.
///
/// Engineers carry the roster-facing profile fields (department, job role,
/// location, contact number); they are optional for other roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub department: Option<Department>,
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub contact_no: Option<String>,
}

impl UserAccount {
    /// Returns true if this account can take ticket work right now.
    #[must_use]
    pub const fn is_active_engineer(&self) -> bool {
        self.is_active && matches!(self.role, Role::Engineer)
    }

    /// Confirms this account is an active engineer.
    ///
    /// # Errors
    ///
    /// Returns `NotAnEngineer` for non-engineer roles and
    /// `EngineerInactive` for disabled engineers.
    pub fn ensure_active_engineer(&self) -> Result<(), DomainError> {
        if !matches!(self.role, Role::Engineer) {
            return Err(DomainError::NotAnEngineer(self.user_id));
        }
        if !self.is_active {
            return Err(DomainError::EngineerInactive(self.user_id));
        }
        Ok(())
    }

    /// Builds the actor view of this account.
    #[must_use]
    pub fn to_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role, self.name.clone())
    }
}

/// The identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    /// Display name, used in action-log text and notification messages.
    pub name: String,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role, name: String) -> Self {
        Self {
            user_id,
            role,
            name,
        }
    }

    /// Returns true if the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
