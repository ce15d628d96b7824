// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk::CoreError;
use helpdesk_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored column could not be decoded into a domain value.
    CorruptRow {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    /// The requested ticket was not found.
    TicketNotFound(i64),
    /// The requested roster was not found.
    RosterNotFound(i64),
    /// The requested user was not found.
    UserNotFound(i64),
    /// The requested notification was not found.
    NotificationNotFound(i64),
    /// Another account already uses this email address.
    DuplicateEmail(String),
    /// The row changed between load and write.
    ConcurrentModification { resource: &'static str, id: i64 },
    /// The transition was rejected by the lifecycle rules.
    Rejected(CoreError),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CorruptRow {
                table,
                column,
                value,
            } => write!(f, "Stored value '{value}' in {table}.{column} is invalid"),
            Self::TicketNotFound(id) => write!(f, "Ticket {id} not found"),
            Self::RosterNotFound(id) => write!(f, "Roster {id} not found"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::NotificationNotFound(id) => write!(f, "Notification {id} not found"),
            Self::DuplicateEmail(email) => {
                write!(f, "A user with email '{email}' already exists")
            }
            Self::ConcurrentModification { resource, id } => {
                write!(f, "{resource} {id} was modified concurrently; retry")
            }
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Rejected(CoreError::DomainViolation(err))
    }
}
