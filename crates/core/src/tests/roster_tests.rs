// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_admin, create_test_directory, engineer_actor, now};
use crate::{
    CoreError, RosterCommand, apply_roster, clone_roster, create_roster, prepopulate,
    select_current,
};
use helpdesk_domain::{
    DomainError, DutyRoster, EngineerSlot, EntryId, RosterId, RosterStatus, RosterWindow,
    ShiftType, WeekRange,
};
use time::macros::date;

fn week(start: time::Date, end: time::Date) -> WeekRange {
    WeekRange::new(start, end).unwrap()
}

fn march_week() -> WeekRange {
    week(date!(2026 - 03 - 02), date!(2026 - 03 - 08))
}

fn stored(roster: DutyRoster, id: i64) -> DutyRoster {
    roster.with_id(RosterId::new(id))
}

#[test]
fn test_prepopulate_uses_active_engineers_only() {
    let directory = create_test_directory();
    let entries = prepopulate(&march_week(), &directory);
    let names: Vec<&str> = entries.iter().map(|e| e.engineer_name.as_str()).collect();
    assert_eq!(names, vec!["Arun", "Meena"]);
    assert_eq!(entries[0].shifts.len(), 7);
}

#[test]
fn test_create_without_engineers_prepopulates() {
    let directory = create_test_directory();
    let roster: DutyRoster = create_roster(
        march_week(),
        RosterStatus::Draft,
        None,
        &directory,
        &[],
        &create_test_admin(),
        now(),
    )
    .unwrap();
    assert_eq!(roster.engineers().len(), 2);
    let arun = roster.engineer(EngineerSlot::Index(0)).unwrap();
    assert_eq!(arun.shift_on(date!(2026 - 03 - 02)), Some(ShiftType::GShift));
    assert_eq!(arun.shift_on(date!(2026 - 03 - 07)), Some(ShiftType::WeekOff));
}

#[test]
fn test_create_requires_admin() {
    let directory = create_test_directory();
    let result = create_roster(
        march_week(),
        RosterStatus::Draft,
        Some(Vec::new()),
        &directory,
        &[],
        &engineer_actor(&directory, 10),
        now(),
    );
    assert!(matches!(result, Err(CoreError::Unauthorized { .. })));
}

#[test]
fn test_create_published_rejects_overlap() {
    let existing = [RosterWindow {
        roster_id: RosterId::new(1),
        week: march_week(),
    }];
    let result = create_roster(
        week(date!(2026 - 03 - 05), date!(2026 - 03 - 11)),
        RosterStatus::Published,
        Some(Vec::new()),
        &[],
        &existing,
        &create_test_admin(),
        now(),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::OverlappingPublishedRoster { .. }
        ))
    ));

    // A draft over the same dates is fine.
    let draft = create_roster(
        week(date!(2026 - 03 - 05), date!(2026 - 03 - 11)),
        RosterStatus::Draft,
        Some(Vec::new()),
        &[],
        &existing,
        &create_test_admin(),
        now(),
    );
    assert!(draft.is_ok());
}

#[test]
fn test_publish_excludes_self_and_rejects_others() {
    let admin = create_test_admin();
    let draft: DutyRoster = stored(
        create_roster(
            march_week(),
            RosterStatus::Draft,
            Some(Vec::new()),
            &[],
            &[],
            &admin,
            now(),
        )
        .unwrap(),
        5,
    );

    let only_self = [RosterWindow {
        roster_id: RosterId::new(5),
        week: march_week(),
    }];
    let published = apply_roster(&draft, RosterCommand::Publish, &only_self, &admin, now())
        .unwrap()
        .roster;
    assert_eq!(published.status(), RosterStatus::Published);

    let other = [RosterWindow {
        roster_id: RosterId::new(6),
        week: week(date!(2026 - 03 - 08), date!(2026 - 03 - 14)),
    }];
    let conflict = apply_roster(&draft, RosterCommand::Publish, &other, &admin, now());
    assert_eq!(
        conflict,
        Err(CoreError::DomainViolation(
            DomainError::OverlappingPublishedRoster {
                conflicting_roster: RosterId::new(6),
                start: date!(2026 - 03 - 08),
                end: date!(2026 - 03 - 14),
            }
        ))
    );
}

#[test]
fn test_publish_from_archived_is_invalid() {
    let admin = create_test_admin();
    let draft: DutyRoster = stored(
        create_roster(
            march_week(),
            RosterStatus::Draft,
            Some(Vec::new()),
            &[],
            &[],
            &admin,
            now(),
        )
        .unwrap(),
        5,
    );
    let archived = apply_roster(&draft, RosterCommand::Archive, &[], &admin, now())
        .unwrap()
        .roster;
    let result = apply_roster(&archived, RosterCommand::Publish, &[], &admin, now());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidRosterTransition {
                from: RosterStatus::Archived,
                to: RosterStatus::Published
            }
        ))
    );
}

#[test]
fn test_set_shift_and_remove_by_entry() {
    let admin = create_test_admin();
    let directory = create_test_directory();
    let roster: DutyRoster = stored(
        create_roster(
            march_week(),
            RosterStatus::Draft,
            None,
            &directory,
            &[],
            &admin,
            now(),
        )
        .unwrap(),
        1,
    );

    let edited = apply_roster(
        &roster,
        RosterCommand::SetShift {
            slot: EngineerSlot::Entry(EntryId::new(2)),
            date: date!(2026 - 03 - 03),
            shift_type: ShiftType::Leave,
        },
        &[],
        &admin,
        now(),
    )
    .unwrap();
    assert_eq!(edited.summary, "Set Meena to LV on 2026-03-03");

    let removed = apply_roster(
        &edited.roster,
        RosterCommand::RemoveEngineer {
            slot: EngineerSlot::Index(0),
        },
        &[],
        &admin,
        now(),
    )
    .unwrap()
    .roster;
    assert_eq!(removed.engineers().len(), 1);
    assert_eq!(removed.engineers()[0].engineer_name, "Meena");

    let out_of_range = apply_roster(
        &removed,
        RosterCommand::RemoveEngineer {
            slot: EngineerSlot::Index(3),
        },
        &[],
        &admin,
        now(),
    );
    assert_eq!(
        out_of_range,
        Err(CoreError::DomainViolation(
            DomainError::EngineerIndexOutOfRange { index: 3, len: 1 }
        ))
    );
}

#[test]
fn test_clone_is_draft_with_same_pattern() {
    let admin = create_test_admin();
    let directory = create_test_directory();
    let source: DutyRoster = stored(
        create_roster(
            march_week(),
            RosterStatus::Published,
            None,
            &directory,
            &[],
            &admin,
            now(),
        )
        .unwrap(),
        1,
    );
    let copy: DutyRoster = clone_roster(&source, date!(2026 - 03 - 09), &admin, now()).unwrap();
    assert_eq!(copy.status(), RosterStatus::Draft);
    assert_eq!(copy.id(), None);
    assert_eq!(copy.week().end(), date!(2026 - 03 - 15));
    let shifted = copy.engineer(EngineerSlot::Index(0)).unwrap();
    assert_eq!(
        shifted.shift_on(date!(2026 - 03 - 14)),
        Some(ShiftType::WeekOff)
    );
}

#[test]
fn test_select_current_picks_published_covering_today() {
    let admin = create_test_admin();
    let make = |id: i64, start, end, status| {
        stored(
            create_roster(
                week(start, end),
                status,
                Some(Vec::new()),
                &[],
                &[],
                &admin,
                now(),
            )
            .unwrap(),
            id,
        )
    };
    let rosters = vec![
        make(1, date!(2026 - 03 - 02), date!(2026 - 03 - 08), RosterStatus::Draft),
        make(
            2,
            date!(2026 - 02 - 23),
            date!(2026 - 03 - 01),
            RosterStatus::Published,
        ),
        make(
            3,
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 08),
            RosterStatus::Published,
        ),
    ];
    let current = select_current(&rosters, date!(2026 - 03 - 04)).unwrap();
    assert_eq!(current.id(), Some(RosterId::new(3)));
    assert!(select_current(&rosters, date!(2026 - 03 - 20)).is_none());
}
