//! Encoding schedules back into the compact opening-hours string.
//!
//! Output is grouped per weekday, Monday first:
//!
//! ```text
//! Mo 01:00-04:15,08:00-10:00; Tu 17:30-18:30
//! ```
//!
//! Ranges keep the order in which they arrive. A range whose text already
//! appears for that day is skipped. Days without ranges are left out, so an
//! empty schedule encodes to the empty string.

use crate::event::CalendarEvent;
use crate::schedule::{Interval, WeeklySchedule, Weekday};

/// Separator between day groups.
pub const DAY_SEPARATOR: &str = "; ";

/// Separator between ranges of one day.
pub const RANGE_SEPARATOR: &str = ",";

/// Encodes a schedule.
pub fn serialize(schedule: &WeeklySchedule) -> String {
    format_days(schedule.iter().copied())
}

/// Encodes calendar events as drawn on the grid.
///
/// Each event crossing midnight is split into its per-day pieces before
/// grouping.
pub fn serialize_events<'a>(events: impl IntoIterator<Item = &'a CalendarEvent>) -> String {
    format_days(events.into_iter().flat_map(CalendarEvent::intervals))
}

fn format_days(intervals: impl IntoIterator<Item = Interval>) -> String {
    let mut ranges: [Vec<String>; 7] = Default::default();
    for interval in intervals {
        let label = interval.range_label();
        let day = &mut ranges[interval.day().index()];
        if !day.contains(&label) {
            day.push(label);
        }
    }

    Weekday::all()
        .into_iter()
        .zip(ranges)
        .filter(|(_, day)| !day.is_empty())
        .map(|(weekday, day)| format!("{weekday} {}", day.join(RANGE_SEPARATOR)))
        .collect::<Vec<_>>()
        .join(DAY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        // January 2024: the 1st is a Monday.
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn schedule(intervals: &[Interval]) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::new();
        for interval in intervals {
            assert!(schedule.insert(*interval));
        }
        schedule
    }

    // ==================== Schedule Tests ====================

    #[test]
    fn empty_schedule_is_empty_string() {
        assert_eq!(serialize(&WeeklySchedule::new()), "");
    }

    #[test]
    fn single_interval() {
        let s = schedule(&[Interval::from_hm(Weekday::Wednesday, (12, 0), (14, 0))]);
        assert_eq!(serialize(&s), "We 12:00-14:00");
    }

    #[test]
    fn days_are_ordered_monday_first() {
        let s = schedule(&[
            Interval::from_hm(Weekday::Tuesday, (17, 30), (18, 30)),
            Interval::from_hm(Weekday::Sunday, (17, 45), (19, 0)),
            Interval::from_hm(Weekday::Monday, (8, 0), (10, 0)),
            Interval::from_hm(Weekday::Monday, (1, 0), (4, 15)),
        ]);
        assert_eq!(
            serialize(&s),
            "Mo 01:00-04:15,08:00-10:00; Tu 17:30-18:30; Su 17:45-19:00"
        );
    }

    #[test]
    fn end_of_day_renders_as_24() {
        let s = schedule(&[Interval::full_day(Weekday::Saturday)]);
        assert_eq!(serialize(&s), "Sa 00:00-24:00");
    }

    #[test]
    fn always_open_renders_every_day() {
        assert_eq!(
            serialize(&WeeklySchedule::always_open()),
            "Mo 00:00-24:00; Tu 00:00-24:00; We 00:00-24:00; Th 00:00-24:00; \
             Fr 00:00-24:00; Sa 00:00-24:00; Su 00:00-24:00"
        );
    }

    // ==================== Event Tests ====================

    #[test]
    fn midnight_crossing_event_is_split() {
        let events = [CalendarEvent::new(at(3, 22, 0), at(4, 2, 0))];
        assert_eq!(
            serialize_events(&events),
            "We 22:00-24:00; Th 00:00-02:00"
        );
    }

    #[test]
    fn multi_day_event_fills_intermediate_days() {
        let events = [CalendarEvent::new(at(5, 18, 0), at(7, 6, 0))];
        assert_eq!(
            serialize_events(&events),
            "Fr 18:00-24:00; Sa 00:00-24:00; Su 00:00-06:00"
        );
    }

    #[test]
    fn duplicate_ranges_collapse() {
        // Same weekday and times in two different weeks.
        let events = [
            CalendarEvent::new(at(1, 8, 0), at(1, 10, 0)),
            CalendarEvent::new(at(8, 8, 0), at(8, 10, 0)),
        ];
        assert_eq!(serialize_events(&events), "Mo 08:00-10:00");
    }

    #[test]
    fn near_duplicates_are_kept() {
        let events = [
            CalendarEvent::new(at(1, 8, 0), at(1, 10, 0)),
            CalendarEvent::new(at(8, 8, 0), at(8, 10, 1)),
        ];
        assert_eq!(serialize_events(&events), "Mo 08:00-10:00,08:00-10:01");
    }

    #[test]
    fn event_order_is_preserved_within_a_day() {
        let events = [
            CalendarEvent::new(at(2, 17, 0), at(2, 18, 0)),
            CalendarEvent::new(at(2, 8, 0), at(2, 9, 0)),
        ];
        assert_eq!(serialize_events(&events), "Tu 17:00-18:00,08:00-09:00");
    }

    #[test]
    fn no_events_is_empty_string() {
        assert_eq!(serialize_events(std::iter::empty()), "");
    }
}
