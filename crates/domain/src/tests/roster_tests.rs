// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{engineer, now};
use crate::{
    DomainError, DutyRoster, EngineerSlot, EntryId, RosterEngineerInput, RosterId,
    RosterStatus, RosterWindow, ShiftAssignment, ShiftType, UserId, WeekRange,
    default_shift_pattern, ensure_no_published_overlap,
};
use time::macros::date;

fn week() -> WeekRange {
    WeekRange::new(date!(2026 - 03 - 02), date!(2026 - 03 - 08)).unwrap()
}

fn manual(name: &str, shifts: Vec<ShiftAssignment>) -> RosterEngineerInput {
    RosterEngineerInput {
        engineer_ref: None,
        engineer_name: name.to_string(),
        job_role: String::from("Technician"),
        department: None,
        location: String::from("Block B"),
        contact_no: String::from("555-0199"),
        shifts,
    }
}

fn draft_with(names: &[&str]) -> DutyRoster {
    let w: WeekRange = week();
    let engineers: Vec<RosterEngineerInput> = names
        .iter()
        .map(|n| manual(n, default_shift_pattern(&w)))
        .collect();
    DutyRoster::new(w, RosterStatus::Draft, engineers, UserId::new(1), now()).unwrap()
}

#[test]
fn test_week_range_requires_end_after_start() {
    let day = date!(2026 - 03 - 02);
    assert_eq!(
        WeekRange::new(day, day),
        Err(DomainError::InvalidWeekRange {
            start: day,
            end: day
        })
    );
    assert!(WeekRange::new(date!(2026 - 03 - 08), day).is_err());
}

#[test]
fn test_overlap_is_inclusive() {
    let a: WeekRange = week();
    let touching: WeekRange =
        WeekRange::new(date!(2026 - 03 - 08), date!(2026 - 03 - 14)).unwrap();
    let after: WeekRange = WeekRange::new(date!(2026 - 03 - 09), date!(2026 - 03 - 15)).unwrap();
    assert!(a.overlaps(&touching));
    assert!(touching.overlaps(&a));
    assert!(!a.overlaps(&after));
}

#[test]
fn test_default_pattern_weekdays_and_weekend() {
    let pattern: Vec<ShiftAssignment> = default_shift_pattern(&week());
    assert_eq!(pattern.len(), 7);
    // 2026-03-02 is a Monday
    for shift in &pattern[..5] {
        assert_eq!(shift.shift_type, ShiftType::GShift);
    }
    assert_eq!(pattern[5].shift_type, ShiftType::WeekOff);
    assert_eq!(pattern[6].shift_type, ShiftType::WeekOff);
}

#[test]
fn test_create_rejects_archived_status() {
    let result = DutyRoster::new(
        week(),
        RosterStatus::Archived,
        Vec::new(),
        UserId::new(1),
        now(),
    );
    assert!(matches!(
        result,
        Err(DomainError::InvalidRosterTransition { .. })
    ));
}

#[test]
fn test_create_rejects_shift_outside_week() {
    let outside = ShiftAssignment {
        date: date!(2026 - 03 - 09),
        shift_type: ShiftType::AShift,
    };
    let result = DutyRoster::new(
        week(),
        RosterStatus::Draft,
        vec![manual("Arun", vec![outside])],
        UserId::new(1),
        now(),
    );
    assert!(matches!(
        result,
        Err(DomainError::ShiftDateOutsideWeek { .. })
    ));
}

#[test]
fn test_entry_ids_are_unique_and_not_reused() {
    let mut roster: DutyRoster = draft_with(&["Arun", "Meena"]);
    assert_eq!(roster.engineers()[0].entry_id, EntryId::new(1));
    assert_eq!(roster.engineers()[1].entry_id, EntryId::new(2));

    roster
        .remove_engineer(EngineerSlot::Entry(EntryId::new(2)), now())
        .unwrap();
    let added: EntryId = roster
        .add_engineer(manual("Joseph", Vec::new()), now())
        .unwrap();
    assert_eq!(added, EntryId::new(3));
}

#[test]
fn test_set_shift_replaces_existing_date() {
    let mut roster: DutyRoster = draft_with(&["Arun"]);
    let day = date!(2026 - 03 - 04);
    roster
        .set_shift(EngineerSlot::Index(0), day, ShiftType::BShift, now())
        .unwrap();
    let entry = roster.engineer(EngineerSlot::Index(0)).unwrap();
    assert_eq!(entry.shifts.len(), 7);
    assert_eq!(entry.shift_on(day), Some(ShiftType::BShift));
}

#[test]
fn test_set_shift_appends_missing_date_in_order() {
    let mut roster: DutyRoster = DutyRoster::new(
        week(),
        RosterStatus::Draft,
        vec![manual("Arun", Vec::new())],
        UserId::new(1),
        now(),
    )
    .unwrap();
    roster
        .set_shift(EngineerSlot::Index(0), date!(2026 - 03 - 05), ShiftType::Nrmt, now())
        .unwrap();
    roster
        .set_shift(EngineerSlot::Index(0), date!(2026 - 03 - 03), ShiftType::Leave, now())
        .unwrap();
    let entry = roster.engineer(EngineerSlot::Index(0)).unwrap();
    let dates: Vec<_> = entry.shifts.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date!(2026 - 03 - 03), date!(2026 - 03 - 05)]);
}

#[test]
fn test_out_of_range_slots_are_not_found() {
    let mut roster: DutyRoster = draft_with(&["Arun"]);
    assert_eq!(
        roster.remove_engineer(EngineerSlot::Index(1), now()),
        Err(DomainError::EngineerIndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        roster.set_shift(
            EngineerSlot::Entry(EntryId::new(9)),
            date!(2026 - 03 - 04),
            ShiftType::GShift,
            now()
        ),
        Err(DomainError::RosterEntryNotFound(EntryId::new(9)))
    );
    assert_eq!(roster.engineers().len(), 1);
}

#[test]
fn test_status_transitions() {
    let mut roster: DutyRoster = draft_with(&[]);
    roster.transition(RosterStatus::Published, now()).unwrap();
    assert_eq!(
        roster.transition(RosterStatus::Draft, now()),
        Err(DomainError::InvalidRosterTransition {
            from: RosterStatus::Published,
            to: RosterStatus::Draft
        })
    );
    roster.transition(RosterStatus::Archived, now()).unwrap();
    assert!(roster.transition(RosterStatus::Published, now()).is_err());
}

#[test]
fn test_clone_preserves_each_shift_offset() {
    let w: WeekRange = week();
    // Irregular source: only a few days populated.
    let shifts = vec![
        ShiftAssignment {
            date: date!(2026 - 03 - 02),
            shift_type: ShiftType::AShift,
        },
        ShiftAssignment {
            date: date!(2026 - 03 - 05),
            shift_type: ShiftType::Township,
        },
        ShiftAssignment {
            date: date!(2026 - 03 - 08),
            shift_type: ShiftType::Holiday,
        },
    ];
    let mut source: DutyRoster = DutyRoster::new(
        w,
        RosterStatus::Draft,
        vec![manual("Arun", shifts)],
        UserId::new(1),
        now(),
    )
    .unwrap()
    .with_id(RosterId::new(7));
    source.transition(RosterStatus::Published, now()).unwrap();

    let new_start = date!(2026 - 03 - 16);
    let copy: DutyRoster = source.clone_to(new_start, UserId::new(2), now()).unwrap();

    assert_eq!(copy.id(), None);
    assert_eq!(copy.status(), RosterStatus::Draft);
    assert_eq!(copy.week().start(), new_start);
    assert_eq!(copy.week().end(), date!(2026 - 03 - 22));
    assert_eq!(copy.created_by(), UserId::new(2));

    let original = &source.engineers()[0].shifts;
    let cloned = &copy.engineers()[0].shifts;
    assert_eq!(original.len(), cloned.len());
    for (a, b) in original.iter().zip(cloned) {
        assert_eq!(a.date - source.week().start(), b.date - copy.week().start());
        assert_eq!(a.shift_type, b.shift_type);
    }
}

#[test]
fn test_published_overlap_check_excludes_self() {
    let windows = [
        RosterWindow {
            roster_id: RosterId::new(1),
            week: week(),
        },
        RosterWindow {
            roster_id: RosterId::new(2),
            week: WeekRange::new(date!(2026 - 03 - 16), date!(2026 - 03 - 22)).unwrap(),
        },
    ];
    let candidate: WeekRange =
        WeekRange::new(date!(2026 - 03 - 05), date!(2026 - 03 - 11)).unwrap();

    assert_eq!(
        ensure_no_published_overlap(&candidate, None, &windows),
        Err(DomainError::OverlappingPublishedRoster {
            conflicting_roster: RosterId::new(1),
            start: date!(2026 - 03 - 02),
            end: date!(2026 - 03 - 08)
        })
    );
    assert!(ensure_no_published_overlap(&week(), Some(RosterId::new(1)), &windows).is_ok());
}

#[test]
fn test_entry_for_matches_reference_then_name() {
    let registered = engineer(10, "Arun Kumar");
    let manual_match = engineer(11, "Meena Iyer");
    let w: WeekRange = week();
    let roster: DutyRoster = DutyRoster::new(
        w,
        RosterStatus::Draft,
        vec![
            RosterEngineerInput::from_account(&registered, default_shift_pattern(&w)),
            manual("meena iyer", default_shift_pattern(&w)),
        ],
        UserId::new(1),
        now(),
    )
    .unwrap();

    assert_eq!(
        roster.entry_for(&registered).unwrap().entry_id,
        EntryId::new(1)
    );
    assert_eq!(
        roster.entry_for(&manual_match).unwrap().entry_id,
        EntryId::new(2)
    );
    assert!(roster.entry_for(&engineer(12, "Nobody")).is_none());
}
