// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket records and the rules that hold for every ticket.
//!
//! ## Invariants
//!
//! - `resolved_at` is set exactly while the status is `resolved`
//! - A ticket reaches `resolved` only after at least one work entry has been
//!   logged against it
//! - The action log only grows; entries are never reordered or removed
//! - At most one reassignment request is pending at a time
//! - `raised_by` never changes after creation

use crate::error::DomainError;
use crate::types::{Actor, UserAccount, UserId};
use crate::validation::require_text;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Storage identifier of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(i64);

impl TicketId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable ticket code, e.g. `TKT-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketCode(String);

impl TicketCode {
    /// Builds the code for the `n`th ticket ever created.
    #[must_use]
    pub fn from_sequence(n: i64) -> Self {
        Self(format!("TKT-{n:04}"))
    }

    /// Wraps a persisted code.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a reported problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Hardware,
    Software,
    Network,
    Access,
    Other,
}

impl CallType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hardware => "hardware",
            Self::Software => "software",
            Self::Network => "network",
            Self::Access => "access",
            Self::Other => "other",
        }
    }
}

impl FromStr for CallType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hardware" => Ok(Self::Hardware),
            "software" => Ok(Self::Software),
            "network" => Ok(Self::Network),
            "access" => Ok(Self::Access),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidCallType(s.to_string())),
        }
    }
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ticket severity. New tickets default to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a ticket.
///
/// The generic status update may move a ticket to any state; only the
/// resolution guard constrains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    Assigned,
    InProgress,
    Resolved,
}

impl TicketStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who wrote an action-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    /// Recorded automatically by a lifecycle operation.
    Lifecycle,
    /// Recorded explicitly by an engineer or admin working the ticket.
    Work,
}

impl LogOrigin {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::Work => "work",
        }
    }
}

impl FromStr for LogOrigin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lifecycle" => Ok(Self::Lifecycle),
            "work" => Ok(Self::Work),
            _ => Err(DomainError::InvalidField {
                field: "origin",
                reason: format!("unknown action log origin '{s}'"),
            }),
        }
    }
}

/// One entry of a ticket's action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    pub action: String,
    pub details: Option<String>,
    pub performed_by: UserId,
    pub origin: LogOrigin,
    pub timestamp: OffsetDateTime,
}

/// Decision state of a reassignment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReassignmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReassignmentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ReassignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidField {
                field: "reassign_status",
                reason: format!("unknown reassignment status '{s}'"),
            }),
        }
    }
}

/// The body of a reassignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignRequest {
    pub requested_by: UserId,
    pub requested_to: UserId,
    pub reason: String,
    pub requested_at: OffsetDateTime,
    /// Admin who decided the request; `None` while pending.
    pub decided_by: Option<UserId>,
    pub decided_at: Option<OffsetDateTime>,
}

/// The single reassignment slot of a ticket.
///
/// A decided request stays in the slot until a new request replaces it or
/// an explicit assignment clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reassignment {
    #[default]
    None,
    Pending(ReassignRequest),
    Approved(ReassignRequest),
    Rejected(ReassignRequest),
}

impl Reassignment {
    /// Rebuilds the slot from a stored status and body.
    #[must_use]
    pub fn from_parts(status: Option<ReassignmentStatus>, request: Option<ReassignRequest>) -> Self {
        match (status, request) {
            (Some(ReassignmentStatus::Pending), Some(r)) => Self::Pending(r),
            (Some(ReassignmentStatus::Approved), Some(r)) => Self::Approved(r),
            (Some(ReassignmentStatus::Rejected), Some(r)) => Self::Rejected(r),
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<ReassignmentStatus> {
        match self {
            Self::None => None,
            Self::Pending(_) => Some(ReassignmentStatus::Pending),
            Self::Approved(_) => Some(ReassignmentStatus::Approved),
            Self::Rejected(_) => Some(ReassignmentStatus::Rejected),
        }
    }

    #[must_use]
    pub const fn request(&self) -> Option<&ReassignRequest> {
        match self {
            Self::None => None,
            Self::Pending(r) | Self::Approved(r) | Self::Rejected(r) => Some(r),
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Validated fields describing the reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub asset_id: String,
    pub call_type: CallType,
    pub problem_description: String,
    pub location: String,
}

impl TicketDetails {
    /// Validates raw ticket input.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for any blank required field and
    /// `InvalidCallType` for an unknown category.
    pub fn new(
        asset_id: &str,
        call_type: &str,
        problem_description: &str,
        location: &str,
    ) -> Result<Self, DomainError> {
        let asset_id: String = require_text("asset_id", asset_id)?;
        let call_type: CallType = require_text("call_type", call_type)?.parse()?;
        let problem_description: String =
            require_text("problem_description", problem_description)?;
        let location: String = require_text("location", location)?;
        Ok(Self {
            asset_id,
            call_type,
            problem_description,
            location,
        })
    }
}

/// Every stored field of a ticket, used to rebuild one from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketParts {
    pub id: TicketId,
    pub code: TicketCode,
    pub details: TicketDetails,
    pub raised_by: UserId,
    pub status: TicketStatus,
    pub severity: Severity,
    pub assigned_to: Option<UserId>,
    pub action_logs: Vec<ActionLogEntry>,
    pub reassignment: Reassignment,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
    pub version: i64,
}

/// A helpdesk ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    code: TicketCode,
    details: TicketDetails,
    raised_by: UserId,
    status: TicketStatus,
    severity: Severity,
    assigned_to: Option<UserId>,
    action_logs: Vec<ActionLogEntry>,
    reassignment: Reassignment,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    resolved_at: Option<OffsetDateTime>,
    version: i64,
}

impl Ticket {
    /// Opens a new ticket raised by `raised_by`.
    ///
    /// The ticket starts `open`, unassigned, with a single lifecycle log
    /// entry recording its creation.
    #[must_use]
    pub fn open(
        id: TicketId,
        code: TicketCode,
        details: TicketDetails,
        severity: Option<Severity>,
        raised_by: &Actor,
        now: OffsetDateTime,
    ) -> Self {
        let created: ActionLogEntry = ActionLogEntry {
            action: String::from("Ticket created"),
            details: Some(format!("Raised by {}", raised_by.name)),
            performed_by: raised_by.user_id,
            origin: LogOrigin::Lifecycle,
            timestamp: now,
        };
        Self {
            id,
            code,
            details,
            raised_by: raised_by.user_id,
            status: TicketStatus::Open,
            severity: severity.unwrap_or_default(),
            assigned_to: None,
            action_logs: vec![created],
            reassignment: Reassignment::None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            version: 0,
        }
    }

    /// Rebuilds a ticket from stored parts.
    #[must_use]
    pub fn restore(parts: TicketParts) -> Self {
        Self {
            id: parts.id,
            code: parts.code,
            details: parts.details,
            raised_by: parts.raised_by,
            status: parts.status,
            severity: parts.severity,
            assigned_to: parts.assigned_to,
            action_logs: parts.action_logs,
            reassignment: parts.reassignment,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            resolved_at: parts.resolved_at,
            version: parts.version,
        }
    }

    /// Splits the ticket into its stored parts.
    #[must_use]
    pub fn into_parts(self) -> TicketParts {
        TicketParts {
            id: self.id,
            code: self.code,
            details: self.details,
            raised_by: self.raised_by,
            status: self.status,
            severity: self.severity,
            assigned_to: self.assigned_to,
            action_logs: self.action_logs,
            reassignment: self.reassignment,
            created_at: self.created_at,
            updated_at: self.updated_at,
            resolved_at: self.resolved_at,
            version: self.version,
        }
    }

    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    #[must_use]
    pub const fn code(&self) -> &TicketCode {
        &self.code
    }

    #[must_use]
    pub const fn details(&self) -> &TicketDetails {
        &self.details
    }

    #[must_use]
    pub const fn raised_by(&self) -> UserId {
        self.raised_by
    }

    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    #[must_use]
    pub fn action_logs(&self) -> &[ActionLogEntry] {
        &self.action_logs
    }

    #[must_use]
    pub const fn reassignment(&self) -> &Reassignment {
        &self.reassignment
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    #[must_use]
    pub const fn resolved_at(&self) -> Option<OffsetDateTime> {
        self.resolved_at
    }

    /// Optimistic concurrency version as last loaded from storage.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Returns true if `user` is the engineer currently assigned.
    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_to == Some(user)
    }

    /// Returns true if at least one work entry has been logged.
    #[must_use]
    pub fn has_work_log(&self) -> bool {
        self.action_logs
            .iter()
            .any(|entry| entry.origin == LogOrigin::Work)
    }

    fn push_log(
        &mut self,
        origin: LogOrigin,
        action: String,
        details: Option<String>,
        by: &Actor,
        now: OffsetDateTime,
    ) {
        self.action_logs.push(ActionLogEntry {
            action,
            details,
            performed_by: by.user_id,
            origin,
            timestamp: now,
        });
        self.updated_at = now;
    }

    /// Assigns the ticket to `engineer`, optionally overriding severity.
    ///
    /// Any reassignment request in the slot is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if `engineer` is not an active engineer.
    pub fn assign(
        &mut self,
        engineer: &UserAccount,
        severity: Option<Severity>,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        engineer.ensure_active_engineer()?;
        self.assigned_to = Some(engineer.user_id);
        self.status = TicketStatus::Assigned;
        self.resolved_at = None;
        if let Some(severity) = severity {
            self.severity = severity;
        }
        self.reassignment = Reassignment::None;
        self.push_log(
            LogOrigin::Lifecycle,
            format!("Assigned to {}", engineer.name),
            Some(format!("Severity: {}", self.severity)),
            by,
            now,
        );
        Ok(())
    }

    /// Moves the ticket to `status`.
    ///
    /// Entering `resolved` stamps `resolved_at`; leaving it clears the stamp.
    ///
    /// # Errors
    ///
    /// Returns `ResolveWithoutWorkLog` when resolving a ticket that has no
    /// work entries; the ticket is left untouched.
    pub fn set_status(
        &mut self,
        status: TicketStatus,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if status == TicketStatus::Resolved && !self.has_work_log() {
            return Err(DomainError::ResolveWithoutWorkLog(self.code.clone()));
        }
        let previous: TicketStatus = self.status;
        self.status = status;
        self.resolved_at = if status == TicketStatus::Resolved {
            Some(now)
        } else {
            None
        };
        self.push_log(
            LogOrigin::Lifecycle,
            format!("Status changed to {status}"),
            Some(format!("Previous status: {previous}")),
            by,
            now,
        );
        Ok(())
    }

    /// Appends a work entry. Identical entries are kept as separate records.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `action` is blank.
    pub fn add_work_log(
        &mut self,
        action: &str,
        details: Option<&str>,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let action: String = require_text("action", action)?;
        let details: Option<String> = details
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        self.push_log(LogOrigin::Work, action, details, by, now);
        Ok(())
    }

    /// Files a reassignment request from the current assignee.
    ///
    /// # Errors
    ///
    /// Returns an error if a request is already pending, if the reason is
    /// blank, if the candidate is not an active engineer, or if the
    /// candidate already owns the ticket.
    pub fn request_reassignment(
        &mut self,
        candidate: &UserAccount,
        reason: &str,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if self.reassignment.is_pending() {
            return Err(DomainError::ReassignmentAlreadyPending(self.code.clone()));
        }
        let reason: String = require_text("reason", reason)?;
        candidate.ensure_active_engineer()?;
        if self.is_assigned_to(candidate.user_id) {
            return Err(DomainError::ReassignToCurrentAssignee(candidate.user_id));
        }
        self.reassignment = Reassignment::Pending(ReassignRequest {
            requested_by: by.user_id,
            requested_to: candidate.user_id,
            reason: reason.clone(),
            requested_at: now,
            decided_by: None,
            decided_at: None,
        });
        self.push_log(
            LogOrigin::Lifecycle,
            format!("Reassignment to {} requested", candidate.name),
            Some(reason),
            by,
            now,
        );
        Ok(())
    }

    fn take_pending(&mut self) -> Result<ReassignRequest, DomainError> {
        match std::mem::take(&mut self.reassignment) {
            Reassignment::Pending(request) => Ok(request),
            other => {
                self.reassignment = other;
                Err(DomainError::NoPendingReassignment(self.code.clone()))
            }
        }
    }

    /// Approves the pending request and hands the ticket to the candidate.
    ///
    /// `candidate` must be the account named by the pending request.
    /// Returns the request as decided, together with the previous assignee.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingReassignment` if nothing is pending, or an error if
    /// the candidate is no longer an active engineer.
    pub fn approve_reassignment(
        &mut self,
        candidate: &UserAccount,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<(ReassignRequest, Option<UserId>), DomainError> {
        let pending: &ReassignRequest = match &self.reassignment {
            Reassignment::Pending(request) => request,
            _ => return Err(DomainError::NoPendingReassignment(self.code.clone())),
        };
        if pending.requested_to != candidate.user_id {
            return Err(DomainError::InvalidField {
                field: "requested_to",
                reason: format!(
                    "pending request names engineer {}, not {}",
                    pending.requested_to, candidate.user_id
                ),
            });
        }
        candidate.ensure_active_engineer()?;

        let mut request: ReassignRequest = self.take_pending()?;
        request.decided_by = Some(by.user_id);
        request.decided_at = Some(now);
        let previous: Option<UserId> = self.assigned_to.replace(candidate.user_id);
        self.reassignment = Reassignment::Approved(request.clone());
        self.push_log(
            LogOrigin::Lifecycle,
            format!("Reassignment approved, ticket moved to {}", candidate.name),
            Some(request.reason.clone()),
            by,
            now,
        );
        Ok((request, previous))
    }

    /// Rejects the pending request. Assignment is unchanged.
    ///
    /// Returns the request as decided.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingReassignment` if nothing is pending.
    pub fn reject_reassignment(
        &mut self,
        by: &Actor,
        now: OffsetDateTime,
    ) -> Result<ReassignRequest, DomainError> {
        let mut request: ReassignRequest = self.take_pending()?;
        request.decided_by = Some(by.user_id);
        request.decided_at = Some(now);
        self.reassignment = Reassignment::Rejected(request.clone());
        self.push_log(
            LogOrigin::Lifecycle,
            String::from("Reassignment request rejected"),
            Some(request.reason.clone()),
            by,
            now,
        );
        Ok(request)
    }
}
