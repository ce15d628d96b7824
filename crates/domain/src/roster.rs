// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duty rosters.
//!
//! A roster covers a week of calendar dates and lists, in display order,
//! the engineers on it together with one shift code per date.
//!
//! ## Invariants
//!
//! - `week.end > week.start`
//! - Every shift date lies within the roster week
//! - Each engineer has at most one shift per date
//! - Entry identifiers are unique within a roster and never reused
//! - No two published rosters cover a common date (checked against the
//!   store by [`ensure_no_published_overlap`])

use crate::error::DomainError;
use crate::shift::ShiftType;
use crate::types::{Department, UserAccount, UserId};
use crate::validation::require_text;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime};

/// Storage identifier of a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RosterId(i64);

impl RosterId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RosterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of an engineer entry within one roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRange {
    start: Date,
    end: Date,
}

impl WeekRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeekRange` unless `end` is strictly after `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidWeekRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns true if `date` is within the range, inclusive.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the two ranges share at least one date.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.start <= self.end && other.end >= self.start
    }

    /// Number of days from `start` to `end`.
    #[must_use]
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Every date of the range in order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        std::iter::successors(Some(self.start), |d| d.next_day()).take_while(|d| *d <= self.end)
    }

    /// Returns true if `date` is within the range.
    ///
    /// # Errors
    ///
    /// Returns `ShiftDateOutsideWeek` otherwise.
    pub fn ensure_contains(&self, date: Date) -> Result<(), DomainError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(DomainError::ShiftDateOutsideWeek {
                date,
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// Publication state of a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterStatus {
    Draft,
    Published,
    Archived,
}

impl RosterStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Returns true if a roster may move from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published | Self::Archived) | (Self::Published, Self::Archived)
        )
    }
}

impl FromStr for RosterStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidRosterStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RosterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One shift code on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub date: Date,
    pub shift_type: ShiftType,
}

/// An engineer entry as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEngineerInput {
    /// Registered engineer, or `None` for a manual entry.
    pub engineer_ref: Option<UserId>,
    pub engineer_name: String,
    pub job_role: String,
    pub department: Option<Department>,
    pub location: String,
    pub contact_no: String,
    pub shifts: Vec<ShiftAssignment>,
}

impl RosterEngineerInput {
    /// Builds an entry for a registered engineer with the given shifts.
    #[must_use]
    pub fn from_account(account: &UserAccount, shifts: Vec<ShiftAssignment>) -> Self {
        Self {
            engineer_ref: Some(account.user_id),
            engineer_name: account.name.clone(),
            job_role: account.job_role.clone().unwrap_or_default(),
            department: account.department,
            location: account.location.clone().unwrap_or_default(),
            contact_no: account.contact_no.clone().unwrap_or_default(),
            shifts,
        }
    }
}

/// An engineer entry on a stored roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEngineer {
    pub entry_id: EntryId,
    pub engineer_ref: Option<UserId>,
    pub engineer_name: String,
    pub job_role: String,
    pub department: Option<Department>,
    pub location: String,
    pub contact_no: String,
    /// Ordered by date, one per date.
    pub shifts: Vec<ShiftAssignment>,
}

impl RosterEngineer {
    /// Returns the shift for `date`, if one is set.
    #[must_use]
    pub fn shift_on(&self, date: Date) -> Option<ShiftType> {
        self.shifts
            .iter()
            .find(|s| s.date == date)
            .map(|s| s.shift_type)
    }

    /// Replaces the shift for `date`, or inserts it in date order.
    fn set_shift(&mut self, date: Date, shift_type: ShiftType) {
        match self.shifts.binary_search_by_key(&date, |s| s.date) {
            Ok(pos) => self.shifts[pos].shift_type = shift_type,
            Err(pos) => self.shifts.insert(pos, ShiftAssignment { date, shift_type }),
        }
    }

    /// Returns true if this entry stands for `account`.
    ///
    /// Registered entries match by reference; manual entries match by
    /// name, ignoring case.
    #[must_use]
    pub fn represents(&self, account: &UserAccount) -> bool {
        self.engineer_ref.map_or_else(
            || self.engineer_name.trim().to_lowercase() == account.name.trim().to_lowercase(),
            |id| id == account.user_id,
        )
    }
}

/// Addresses one engineer entry on a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineerSlot {
    /// Position in display order.
    Index(usize),
    /// Stable entry identifier.
    Entry(EntryId),
}

/// The part of a roster needed for overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterWindow {
    pub roster_id: RosterId,
    pub week: WeekRange,
}

/// Every stored field of a roster, used to rebuild one from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterParts {
    pub id: Option<RosterId>,
    pub week: WeekRange,
    pub status: RosterStatus,
    pub engineers: Vec<RosterEngineer>,
    pub next_entry_id: u32,
    pub created_by: UserId,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i64,
}

/// A weekly duty roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyRoster {
    id: Option<RosterId>,
    week: WeekRange,
    status: RosterStatus,
    engineers: Vec<RosterEngineer>,
    next_entry_id: u32,
    created_by: UserId,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    version: i64,
}

/// Builds the default shift pattern for a week.
///
/// Monday to Friday get the general shift, Saturday and Sunday week off.
#[must_use]
pub fn default_shift_pattern(week: &WeekRange) -> Vec<ShiftAssignment> {
    week.dates()
        .map(|date| ShiftAssignment {
            date,
            shift_type: ShiftType::default_for(date.weekday()),
        })
        .collect()
}

/// Checks a candidate range against the published rosters.
///
/// `exclude` names the roster being published, so that it does not
/// conflict with itself.
///
/// # Errors
///
/// Returns `OverlappingPublishedRoster` naming the first conflict found.
pub fn ensure_no_published_overlap<'a>(
    candidate: &WeekRange,
    exclude: Option<RosterId>,
    published: impl IntoIterator<Item = &'a RosterWindow>,
) -> Result<(), DomainError> {
    for window in published {
        if Some(window.roster_id) == exclude {
            continue;
        }
        if window.week.overlaps(candidate) {
            return Err(DomainError::OverlappingPublishedRoster {
                conflicting_roster: window.roster_id,
                start: window.week.start(),
                end: window.week.end(),
            });
        }
    }
    Ok(())
}

impl DutyRoster {
    /// Creates an unsaved roster.
    ///
    /// # Errors
    ///
    /// Returns an error if `status` is `archived`, if an engineer name is
    /// blank, or if any shift date lies outside `week`.
    pub fn new(
        week: WeekRange,
        status: RosterStatus,
        engineers: Vec<RosterEngineerInput>,
        created_by: UserId,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if status == RosterStatus::Archived {
            return Err(DomainError::InvalidRosterTransition {
                from: RosterStatus::Draft,
                to: status,
            });
        }
        let mut roster: Self = Self {
            id: None,
            week,
            status,
            engineers: Vec::with_capacity(engineers.len()),
            next_entry_id: 1,
            created_by,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        for input in engineers {
            roster.push_engineer(input)?;
        }
        Ok(roster)
    }

    /// Rebuilds a roster from stored parts.
    #[must_use]
    pub fn restore(parts: RosterParts) -> Self {
        Self {
            id: parts.id,
            week: parts.week,
            status: parts.status,
            engineers: parts.engineers,
            next_entry_id: parts.next_entry_id,
            created_by: parts.created_by,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            version: parts.version,
        }
    }

    /// Splits the roster into its stored parts.
    #[must_use]
    pub fn into_parts(self) -> RosterParts {
        RosterParts {
            id: self.id,
            week: self.week,
            status: self.status,
            engineers: self.engineers,
            next_entry_id: self.next_entry_id,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }

    /// Returns a copy of this roster carrying its storage id.
    #[must_use]
    pub fn with_id(mut self, id: RosterId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn id(&self) -> Option<RosterId> {
        self.id
    }

    #[must_use]
    pub const fn week(&self) -> &WeekRange {
        &self.week
    }

    #[must_use]
    pub const fn status(&self) -> RosterStatus {
        self.status
    }

    #[must_use]
    pub fn engineers(&self) -> &[RosterEngineer] {
        &self.engineers
    }

    #[must_use]
    pub const fn next_entry_id(&self) -> u32 {
        self.next_entry_id
    }

    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
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
    pub const fn version(&self) -> i64 {
        self.version
    }

    fn push_engineer(&mut self, input: RosterEngineerInput) -> Result<EntryId, DomainError> {
        let engineer_name: String = require_text("engineer_name", &input.engineer_name)?;
        let entry_id: EntryId = EntryId::new(self.next_entry_id);
        let mut entry: RosterEngineer = RosterEngineer {
            entry_id,
            engineer_ref: input.engineer_ref,
            engineer_name,
            job_role: input.job_role.trim().to_string(),
            department: input.department,
            location: input.location.trim().to_string(),
            contact_no: input.contact_no.trim().to_string(),
            shifts: Vec::with_capacity(input.shifts.len()),
        };
        for shift in input.shifts {
            self.week.ensure_contains(shift.date)?;
            entry.set_shift(shift.date, shift.shift_type);
        }
        self.engineers.push(entry);
        self.next_entry_id = self
            .next_entry_id
            .checked_add(1)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("roster entry id allocation"),
            })?;
        Ok(entry_id)
    }

    fn position(&self, slot: EngineerSlot) -> Result<usize, DomainError> {
        match slot {
            EngineerSlot::Index(index) if index < self.engineers.len() => Ok(index),
            EngineerSlot::Index(index) => Err(DomainError::EngineerIndexOutOfRange {
                index,
                len: self.engineers.len(),
            }),
            EngineerSlot::Entry(entry_id) => self
                .engineers
                .iter()
                .position(|e| e.entry_id == entry_id)
                .ok_or(DomainError::RosterEntryNotFound(entry_id)),
        }
    }

    /// Returns the engineer entry at `slot`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown slot.
    pub fn engineer(&self, slot: EngineerSlot) -> Result<&RosterEngineer, DomainError> {
        let pos: usize = self.position(slot)?;
        Ok(&self.engineers[pos])
    }

    /// Sets one engineer's shift on `date`, replacing any existing entry
    /// for that date.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown slot and
    /// `ShiftDateOutsideWeek` for a date outside the roster week.
    pub fn set_shift(
        &mut self,
        slot: EngineerSlot,
        date: Date,
        shift_type: ShiftType,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let pos: usize = self.position(slot)?;
        self.week.ensure_contains(date)?;
        self.engineers[pos].set_shift(date, shift_type);
        self.updated_at = now;
        Ok(())
    }

    /// Appends an engineer entry and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or a shift date lies outside
    /// the roster week.
    pub fn add_engineer(
        &mut self,
        input: RosterEngineerInput,
        now: OffsetDateTime,
    ) -> Result<EntryId, DomainError> {
        let entry_id: EntryId = self.push_engineer(input)?;
        self.updated_at = now;
        Ok(entry_id)
    }

    /// Removes and returns the engineer entry at `slot`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown slot.
    pub fn remove_engineer(
        &mut self,
        slot: EngineerSlot,
        now: OffsetDateTime,
    ) -> Result<RosterEngineer, DomainError> {
        let pos: usize = self.position(slot)?;
        self.updated_at = now;
        Ok(self.engineers.remove(pos))
    }

    /// Moves the roster to `target`.
    ///
    /// Publishing additionally requires the caller to have checked the
    /// overlap rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRosterTransition` for a disallowed change.
    pub fn transition(
        &mut self,
        target: RosterStatus,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidRosterTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Copies this roster to a week starting on `new_start`.
    ///
    /// Each shift keeps its own offset from the week start. The copy is an
    /// unsaved draft with the same entry identifiers.
    ///
    /// # Errors
    ///
    /// Returns `DateArithmeticOverflow` if a shifted date is out of range.
    pub fn clone_to(
        &self,
        new_start: Date,
        created_by: UserId,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let shift_date = |date: Date| -> Result<Date, DomainError> {
            new_start
                .checked_add(date - self.week.start)
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("shifting {date} to week of {new_start}"),
                })
        };
        let week: WeekRange = WeekRange::new(new_start, shift_date(self.week.end)?)?;
        let engineers: Vec<RosterEngineer> = self
            .engineers
            .iter()
            .map(|engineer| {
                let shifts: Vec<ShiftAssignment> = engineer
                    .shifts
                    .iter()
                    .map(|s| {
                        Ok(ShiftAssignment {
                            date: shift_date(s.date)?,
                            shift_type: s.shift_type,
                        })
                    })
                    .collect::<Result<_, DomainError>>()?;
                Ok(RosterEngineer {
                    shifts,
                    ..engineer.clone()
                })
            })
            .collect::<Result<_, DomainError>>()?;
        Ok(Self {
            id: None,
            week,
            status: RosterStatus::Draft,
            engineers,
            next_entry_id: self.next_entry_id,
            created_by,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// The window used for overlap checks, once the roster is stored.
    #[must_use]
    pub fn window(&self) -> Option<RosterWindow> {
        self.id.map(|roster_id| RosterWindow {
            roster_id,
            week: self.week,
        })
    }

    /// Returns the entry standing for `account`, if any.
    #[must_use]
    pub fn entry_for(&self, account: &UserAccount) -> Option<&RosterEngineer> {
        self.engineers
            .iter()
            .find(|e| e.engineer_ref == Some(account.user_id))
            .or_else(|| {
                self.engineers
                    .iter()
                    .filter(|e| e.engineer_ref.is_none())
                    .find(|e| e.represents(account))
            })
    }
}
