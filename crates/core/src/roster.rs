// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::ensure_admin;
use crate::command::RosterCommand;
use crate::error::CoreError;
use crate::state::RosterTransition;
use helpdesk_domain::{
    Actor, DutyRoster, EntryId, RosterEngineer, RosterEngineerInput, RosterStatus, RosterWindow,
    UserAccount, WeekRange, default_shift_pattern, ensure_no_published_overlap,
};
use time::{Date, OffsetDateTime};

/// Builds roster entries for every active registered engineer using the
/// default shift pattern.
#[must_use]
pub fn prepopulate(week: &WeekRange, registered: &[UserAccount]) -> Vec<RosterEngineerInput> {
    registered
        .iter()
        .filter(|account| account.is_active_engineer())
        .map(|account| RosterEngineerInput::from_account(account, default_shift_pattern(week)))
        .collect()
}

/// Creates a new roster.
///
/// When `engineers` is `None` the roster is pre-populated from
/// `registered`.
///
/// # Arguments
///
/// * `week` - The validated date range
/// * `status` - Draft or published
/// * `engineers` - Explicit entries, or `None` to pre-populate
/// * `registered` - Registered engineer accounts
/// * `published` - Every published roster currently stored
/// * `actor` - The admin creating the roster
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - `status` is archived, or an entry is invalid
/// - `status` is published and a published roster overlaps `week`
pub fn create_roster(
    week: WeekRange,
    status: RosterStatus,
    engineers: Option<Vec<RosterEngineerInput>>,
    registered: &[UserAccount],
    published: &[RosterWindow],
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<DutyRoster, CoreError> {
    ensure_admin(actor, "create roster")?;
    let engineers: Vec<RosterEngineerInput> =
        engineers.unwrap_or_else(|| prepopulate(&week, registered));
    let roster: DutyRoster = DutyRoster::new(week, status, engineers, actor.user_id, now)?;
    if status == RosterStatus::Published {
        ensure_no_published_overlap(&week, None, published)?;
    }
    Ok(roster)
}

/// Applies a command to a roster.
///
/// # Arguments
///
/// * `roster` - The current roster (immutable)
/// * `command` - The change to apply
/// * `published` - Every published roster currently stored
/// * `actor` - The admin making the change
/// * `now` - The instant of the change
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The slot does not exist or a date lies outside the week
/// - The status change is not permitted
/// - Publishing would overlap another published roster
pub fn apply_roster(
    roster: &DutyRoster,
    command: RosterCommand,
    published: &[RosterWindow],
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<RosterTransition, CoreError> {
    ensure_admin(actor, command.name())?;
    let mut next: DutyRoster = roster.clone();

    let summary: String = match command {
        RosterCommand::SetShift {
            slot,
            date,
            shift_type,
        } => {
            next.set_shift(slot, date, shift_type, now)?;
            let entry: &RosterEngineer = next.engineer(slot)?;
            format!("Set {} to {shift_type} on {date}", entry.engineer_name)
        }
        RosterCommand::AddEngineer { engineer } => {
            let name: String = engineer.engineer_name.trim().to_string();
            let entry_id: EntryId = next.add_engineer(engineer, now)?;
            format!("Added {name} as entry {entry_id}")
        }
        RosterCommand::RemoveEngineer { slot } => {
            let removed: RosterEngineer = next.remove_engineer(slot, now)?;
            format!(
                "Removed {} (entry {})",
                removed.engineer_name, removed.entry_id
            )
        }
        RosterCommand::Publish => {
            next.transition(RosterStatus::Published, now)?;
            ensure_no_published_overlap(next.week(), next.id(), published)?;
            String::from("Published")
        }
        RosterCommand::Archive => {
            next.transition(RosterStatus::Archived, now)?;
            String::from("Archived")
        }
    };

    Ok(RosterTransition {
        roster: next,
        summary,
    })
}

/// Copies `source` to the week starting on `new_start` as a new draft.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the shifted dates
/// overflow.
pub fn clone_roster(
    source: &DutyRoster,
    new_start: Date,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<DutyRoster, CoreError> {
    ensure_admin(actor, "clone roster")?;
    Ok(source.clone_to(new_start, actor.user_id, now)?)
}

/// Picks the published roster covering `today`.
///
/// If several published rosters cover the date the latest-starting one
/// wins.
#[must_use]
pub fn select_current(rosters: &[DutyRoster], today: Date) -> Option<&DutyRoster> {
    rosters
        .iter()
        .filter(|r| r.status() == RosterStatus::Published && r.week().contains(today))
        .max_by_key(|r| r.week().start())
}
