// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{engineer, now};
use crate::{
    AvailabilityRank, AvailabilityReport, DutyRoster, EngineerAvailability, LocalInstant,
    RosterEngineerInput, RosterId, RosterStatus, ShiftAssignment, ShiftType, UserAccount, UserId,
    WeekRange, resolve_availability,
};
use time::Date;
use time::macros::date;

const TODAY: Date = date!(2026 - 03 - 04);

fn at(minute_of_day: u16) -> LocalInstant {
    LocalInstant {
        date: TODAY,
        minute_of_day,
    }
}

fn roster_with(entries: Vec<(&UserAccount, ShiftType)>) -> DutyRoster {
    let week: WeekRange = WeekRange::new(date!(2026 - 03 - 02), date!(2026 - 03 - 08)).unwrap();
    let engineers: Vec<RosterEngineerInput> = entries
        .into_iter()
        .map(|(account, shift_type)| {
            RosterEngineerInput::from_account(
                account,
                vec![ShiftAssignment {
                    date: TODAY,
                    shift_type,
                }],
            )
        })
        .collect();
    DutyRoster::new(week, RosterStatus::Published, engineers, UserId::new(1), now())
        .unwrap()
        .with_id(RosterId::new(3))
}

fn find<'a>(report: &'a AvailabilityReport, name: &str) -> &'a EngineerAvailability {
    report
        .engineers
        .iter()
        .find(|e| e.engineer.name == name)
        .unwrap()
}

#[test]
fn test_general_shift_on_duty_at_ten() {
    let e: UserAccount = engineer(10, "Arun Kumar");
    let roster: DutyRoster = roster_with(vec![(&e, ShiftType::GShift)]);
    let report: AvailabilityReport = resolve_availability(vec![e], Some(&roster), at(600));
    let arun = find(&report, "Arun Kumar");
    assert!(report.has_roster);
    assert_eq!(report.roster_id, Some(RosterId::new(3)));
    assert!(arun.is_on_duty);
    assert!(arun.is_working_today);
    assert!(arun.in_roster);
    assert_eq!(arun.shift_type, Some(ShiftType::GShift));
}

#[test]
fn test_general_shift_off_duty_at_six_pm() {
    let e: UserAccount = engineer(10, "Arun Kumar");
    let roster: DutyRoster = roster_with(vec![(&e, ShiftType::GShift)]);
    let report: AvailabilityReport = resolve_availability(vec![e], Some(&roster), at(18 * 60));
    let arun = find(&report, "Arun Kumar");
    assert!(!arun.is_on_duty);
    assert!(arun.is_working_today);
    assert_eq!(arun.rank(), AvailabilityRank::WorkingToday);
}

#[test]
fn test_week_off_is_never_working() {
    let e: UserAccount = engineer(10, "Arun Kumar");
    let roster: DutyRoster = roster_with(vec![(&e, ShiftType::WeekOff)]);
    for minute in [0, 600, 1439] {
        let report = resolve_availability(vec![e.clone()], Some(&roster), at(minute));
        let arun = find(&report, "Arun Kumar");
        assert!(!arun.is_on_duty);
        assert!(!arun.is_working_today);
        assert!(arun.in_roster);
    }
}

#[test]
fn test_no_roster_reports_everyone_not_in_roster() {
    let engineers = vec![engineer(10, "Arun Kumar"), engineer(11, "Meena Iyer")];
    let report: AvailabilityReport = resolve_availability(engineers, None, at(600));
    assert!(!report.has_roster);
    assert_eq!(report.roster_id, None);
    assert_eq!(report.engineers.len(), 2);
    assert!(report.engineers.iter().all(|e| !e.in_roster && !e.is_on_duty));
}

#[test]
fn test_engineer_without_entry_today_is_not_in_roster() {
    let on: UserAccount = engineer(10, "Arun Kumar");
    let absent: UserAccount = engineer(11, "Meena Iyer");
    let roster: DutyRoster = roster_with(vec![(&on, ShiftType::GShift)]);
    let report = resolve_availability(vec![on, absent], Some(&roster), at(600));
    let meena = find(&report, "Meena Iyer");
    assert!(!meena.in_roster);
    assert_eq!(meena.shift_type, None);
}

#[test]
fn test_ranking_buckets_then_names() {
    let zara: UserAccount = engineer(10, "zara");
    let amit: UserAccount = engineer(11, "Amit");
    let bala: UserAccount = engineer(12, "bala");
    let chen: UserAccount = engineer(13, "Chen");
    let dev: UserAccount = engineer(14, "Dev");
    // 10:00: G-Shift on duty, B-Shift later today, WO off
    let roster: DutyRoster = roster_with(vec![
        (&zara, ShiftType::GShift),
        (&amit, ShiftType::BShift),
        (&bala, ShiftType::GShift),
        (&chen, ShiftType::WeekOff),
    ]);
    let report = resolve_availability(
        vec![dev, chen, bala, amit, zara],
        Some(&roster),
        at(600),
    );
    let order: Vec<&str> = report
        .engineers
        .iter()
        .map(|e| e.engineer.name.as_str())
        .collect();
    assert_eq!(order, vec!["bala", "zara", "Amit", "Chen", "Dev"]);
}

#[test]
fn test_accented_names_sort_with_their_base_letters() {
    let engineers = vec![
        engineer(10, "Zoe"),
        engineer(11, "Émile"),
        engineer(12, "Oscar"),
        engineer(13, "Ángel"),
        engineer(14, "eva"),
    ];
    let report: AvailabilityReport = resolve_availability(engineers, None, at(600));
    let order: Vec<&str> = report
        .engineers
        .iter()
        .map(|e| e.engineer.name.as_str())
        .collect();
    assert_eq!(order, vec!["Ángel", "Émile", "eva", "Oscar", "Zoe"]);
}
