// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engineer availability.
//!
//! Combines the current roster, the shift calendar and a facility-local
//! instant into a ranked list: on duty first, then working later or earlier
//! today, then everyone else. Within a bucket engineers are ordered by name.

use crate::clock::LocalInstant;
use crate::roster::{DutyRoster, RosterId};
use crate::shift::{ShiftStatus, ShiftType};
use crate::types::UserAccount;
use feruca::Collator;
use std::cmp::Ordering;
use time::Date;

/// Sort bucket of an engineer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AvailabilityRank {
    OnDuty,
    WorkingToday,
    Off,
}

/// Availability of one engineer at the evaluation instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineerAvailability {
    pub engineer: UserAccount,
    /// Today's shift code, if the roster has one for this engineer.
    pub shift_type: Option<ShiftType>,
    pub is_on_duty: bool,
    pub is_working_today: bool,
    /// False when the engineer has no roster entry with a shift for today.
    pub in_roster: bool,
}

impl EngineerAvailability {
    fn not_in_roster(engineer: UserAccount) -> Self {
        Self {
            engineer,
            shift_type: None,
            is_on_duty: false,
            is_working_today: false,
            in_roster: false,
        }
    }

    #[must_use]
    pub const fn rank(&self) -> AvailabilityRank {
        if self.is_on_duty {
            AvailabilityRank::OnDuty
        } else if self.is_working_today {
            AvailabilityRank::WorkingToday
        } else {
            AvailabilityRank::Off
        }
    }
}

/// Ranked availability for every engineer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityReport {
    /// False when no published roster covers the evaluation date.
    pub has_roster: bool,
    pub roster_id: Option<RosterId>,
    pub date: Date,
    pub minute_of_day: u16,
    pub engineers: Vec<EngineerAvailability>,
}

/// Root-locale Unicode collation, falling back to code point order so that
/// names the collator treats as equal still sort deterministically.
fn compare_names(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

/// Resolves availability for `engineers` at `now`.
///
/// `roster` is the published roster covering `now.date`, if there is one.
#[must_use]
pub fn resolve_availability(
    engineers: Vec<UserAccount>,
    roster: Option<&DutyRoster>,
    now: LocalInstant,
) -> AvailabilityReport {
    let mut resolved: Vec<EngineerAvailability> = engineers
        .into_iter()
        .map(|engineer| {
            let shift: Option<ShiftType> = roster
                .and_then(|r| r.entry_for(&engineer))
                .and_then(|entry| entry.shift_on(now.date));
            match shift {
                Some(shift_type) => {
                    let status: ShiftStatus = shift_type.status_at(now.minute_of_day);
                    EngineerAvailability {
                        engineer,
                        shift_type: Some(shift_type),
                        is_on_duty: status.is_on_duty,
                        is_working_today: status.is_working_today,
                        in_roster: true,
                    }
                }
                None => EngineerAvailability::not_in_roster(engineer),
            }
        })
        .collect();

    let mut collator: Collator = Collator::default();
    resolved.sort_by(|a, b| {
        a.rank()
            .cmp(&b.rank())
            .then_with(|| compare_names(&mut collator, &a.engineer.name, &b.engineer.name))
    });

    AvailabilityReport {
        has_roster: roster.is_some(),
        roster_id: roster.and_then(DutyRoster::id),
        date: now.date,
        minute_of_day: now.minute_of_day,
        engineers: resolved,
    }
}
