//! Decode/encode properties across the scanner and serializer.

use chrono::NaiveDate;
use hours_core::{
    overlaps, scan, serialize, serialize_events, CalendarEvent, Interval, Weekday, WeeklySchedule,
};

const COMPLEX: &str = "Mo 01:00-04:15,08:00-10:00,16:30-18:15; Tu 17:30-18:30; \
                       We 04:15-24:00; Th 00:00-11:00; Fr 02:15-02:30,06:15-09:45; \
                       Sa 01:30-01:45,05:30-10:15; Su 17:45-19:00";

#[test]
fn always_open_has_seven_full_days() {
    let schedule = scan("24/7").unwrap();
    assert_eq!(schedule.len(), 7);
    assert!(schedule
        .iter()
        .all(|i| i.start().to_minutes() == 0 && i.end().to_minutes() == 1440));
}

#[test]
fn single_range_round_trips() {
    let schedule = scan("We 12:00-14:00").unwrap();
    for day in Weekday::all() {
        let expected = if day == Weekday::Wednesday { 1 } else { 0 };
        assert_eq!(schedule.day(day).len(), expected);
    }
    assert_eq!(serialize(&schedule), "We 12:00-14:00");
}

#[test]
fn multi_range_multi_day_round_trips() {
    let input = "Mo 01:00-04:15,08:00-10:00,16:30-18:15; Tu 17:30-18:30";
    assert_eq!(serialize(&scan(input).unwrap()), input);
}

#[test]
fn output_is_monday_first_regardless_of_input_order() {
    let schedule = scan("Tu 17:30-18:30; Mo 08:00-10:00").unwrap();
    assert_eq!(serialize(&schedule), "Mo 08:00-10:00; Tu 17:30-18:30");
}

#[test]
fn complex_week_round_trips() {
    assert_eq!(serialize(&scan(COMPLEX).unwrap()), COMPLEX);
}

#[test]
fn schedule_round_trips_through_text() {
    let mut schedule = WeeklySchedule::new();
    schedule.insert(Interval::from_hm(Weekday::Monday, (9, 0), (12, 0)));
    schedule.insert(Interval::from_hm(Weekday::Monday, (13, 0), (17, 30)));
    schedule.insert(Interval::from_hm(Weekday::Thursday, (22, 0), (24, 0)));
    schedule.insert(Interval::from_hm(Weekday::Saturday, (10, 15), (14, 45)));

    assert_eq!(scan(&serialize(&schedule)).unwrap(), schedule);
}

#[test]
fn serialization_reaches_fixed_point() {
    let inputs = [
        "Su 22:00-02:00",
        "Mo-Fr 08:00-12:00,13:00-17:00; Sa 10:00-14:00",
        "Mo 08:00-10:00,10:00-12:00",
        "24/7",
        "",
    ];
    for input in inputs {
        let once = serialize(&scan(input).unwrap());
        let twice = serialize(&scan(&once).unwrap());
        let thrice = serialize(&scan(&twice).unwrap());
        assert_eq!(once, twice, "input {input:?}");
        assert_eq!(twice, thrice, "input {input:?}");
    }
}

#[test]
fn adjacent_ranges_merge_on_first_round_trip() {
    let once = serialize(&scan("Mo 08:00-10:00,10:00-12:00").unwrap());
    assert_eq!(once, "Mo 08:00-12:00");
}

#[test]
fn midnight_crossing_event_serializes_split() {
    let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let thursday = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
    let event = CalendarEvent::new(
        wednesday.and_hms_opt(22, 0, 0).unwrap(),
        thursday.and_hms_opt(2, 0, 0).unwrap(),
    );
    assert_eq!(serialize_events([&event]), "We 22:00-24:00; Th 00:00-02:00");
}

#[test]
fn scanned_events_serialize_like_the_schedule() {
    let schedule = scan(COMPLEX).unwrap();
    let events = schedule.to_events(NaiveDate::from_ymd_opt(2021, 6, 9).unwrap());
    assert_eq!(events.len(), schedule.len());
    assert_eq!(serialize_events(&events), COMPLEX);
}

#[test]
fn touching_interval_does_not_conflict() {
    let candidate = Interval::from_hm(Weekday::Monday, (9, 0), (10, 0));
    let touching = Interval::from_hm(Weekday::Monday, (8, 0), (9, 0));
    let overlapping = Interval::from_hm(Weekday::Monday, (8, 30), (9, 30));

    assert!(!overlaps(&candidate, [&touching]));
    assert!(overlaps(&candidate, [&overlapping]));
}

#[test]
fn identical_text_ranges_collapse() {
    let events = [
        CalendarEvent::new(
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
        ),
        CalendarEvent::new(
            NaiveDate::from_ymd_opt(2024, 1, 12)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
        ),
    ];
    assert_eq!(serialize_events(&events), "Fr 09:00-11:00");
}

#[test]
fn unparsable_input_fails_without_partial_result() {
    assert!(scan("Mo 08:00-10:00; Xx 09:00-10:00").is_err());
}
