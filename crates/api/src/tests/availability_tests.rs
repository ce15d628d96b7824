// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AvailabilityResponse, CreateRosterRequest, UpdateEngineerShiftRequest, create_roster,
    get_engineers_with_availability, update_engineer_shift,
};
use helpdesk_domain::FacilityClock;
use time::OffsetDateTime;
use time::macros::datetime;

use super::helpers::{Fixture, fixture, now};

/// Publishes the pre-populated week of 2026-03-02 with Meena off on the 4th.
fn publish_week(fx: &mut Fixture) {
    let admin = fx.admin.clone();
    let roster_id: i64 = create_roster(
        &mut fx.persistence,
        CreateRosterRequest {
            week_start_date: String::from("2026-03-02"),
            week_end_date: String::from("2026-03-08"),
            status: Some(String::from("published")),
            engineers: None,
        },
        &admin,
        now(),
    )
    .unwrap()
    .roster_id
    .unwrap();
    update_engineer_shift(
        &mut fx.persistence,
        roster_id,
        &UpdateEngineerShiftRequest {
            engineer_index: None,
            entry_id: Some(2),
            date: String::from("2026-03-04"),
            shift_type: String::from("WO"),
        },
        &admin,
        now(),
    )
    .unwrap();
}

fn availability(fx: &mut Fixture, clock: &FacilityClock, at: OffsetDateTime) -> AvailabilityResponse {
    let admin = fx.admin.clone();
    get_engineers_with_availability(&mut fx.persistence, clock, at, &admin).unwrap()
}

#[test]
fn test_g_shift_engineer_is_on_duty_mid_morning() {
    let mut fx: Fixture = fixture();
    publish_week(&mut fx);

    let report: AvailabilityResponse =
        availability(&mut fx, &FacilityClock::default(), datetime!(2026-03-04 10:00 UTC));
    assert!(report.has_roster);
    assert_eq!(report.date, "2026-03-04");
    assert_eq!(report.minute_of_day, 600);

    let arun = &report.engineers[0];
    assert_eq!(arun.engineer.name, "Arun");
    assert_eq!(arun.shift_type.as_deref(), Some("G-Shift"));
    assert!(arun.is_on_duty);
    assert!(arun.is_working_today);

    let meena = &report.engineers[1];
    assert_eq!(meena.shift_type.as_deref(), Some("WO"));
    assert!(!meena.is_on_duty);
    assert!(!meena.is_working_today);
    assert!(meena.in_roster);
}

#[test]
fn test_after_shift_engineer_is_working_but_off_duty() {
    let mut fx: Fixture = fixture();
    publish_week(&mut fx);

    let report: AvailabilityResponse =
        availability(&mut fx, &FacilityClock::default(), datetime!(2026-03-04 18:00 UTC));
    let arun = &report.engineers[0];
    assert!(!arun.is_on_duty);
    assert!(arun.is_working_today);
}

#[test]
fn test_facility_timezone_sets_today_and_minute() {
    let mut fx: Fixture = fixture();
    publish_week(&mut fx);
    let clock: FacilityClock = FacilityClock::new("Asia/Kolkata").unwrap();

    // 04:30 UTC is 10:00 in Kolkata.
    let report: AvailabilityResponse = availability(&mut fx, &clock, datetime!(2026-03-04 04:30 UTC));
    assert_eq!(report.timezone, "Asia/Kolkata");
    assert_eq!(report.minute_of_day, 600);
    assert!(report.engineers[0].is_on_duty);
}

#[test]
fn test_without_roster_everyone_is_not_in_roster() {
    let mut fx: Fixture = fixture();
    let report: AvailabilityResponse =
        availability(&mut fx, &FacilityClock::default(), datetime!(2026-03-04 10:00 UTC));

    assert!(!report.has_roster);
    assert!(report.roster_id.is_none());
    assert_eq!(report.engineers.len(), 2);
    assert!(report.engineers.iter().all(|e| !e.in_roster && !e.is_on_duty));
    let names: Vec<&str> = report
        .engineers
        .iter()
        .map(|e| e.engineer.name.as_str())
        .collect();
    assert_eq!(names, vec!["Arun", "Meena"]);
}
