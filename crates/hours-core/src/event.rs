//! Calendar events, the editing model of the weekly grid.
//!
//! A grid selection is a span between two wall-clock instants and may run past
//! midnight. [`CalendarEvent::intervals`] turns it into the per-day
//! [`Interval`]s a [`WeeklySchedule`](crate::WeeklySchedule) stores.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::schedule::{Interval, TimeOfDay, Weekday};

/// Returns the Monday of the week containing `date`.
///
/// # Panics
/// Panics if that Monday lies before the earliest date chrono supports.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// An open period between two instants, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct CalendarEvent {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawEvent {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawEvent> for CalendarEvent {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Self::try_new(raw.start, raw.end)
            .ok_or_else(|| format!("event {} to {} does not start before it ends", raw.start, raw.end))
    }
}

impl CalendarEvent {
    /// Creates a new event.
    ///
    /// # Panics
    /// Panics unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        assert!(start < end, "event start must precede its end");
        Self { start, end }
    }

    /// Creates a new event, or `None` if it would be empty or inverted.
    pub fn try_new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Weekday the event starts on.
    pub fn weekday(&self) -> Weekday {
        Weekday::from_chrono(self.start.weekday())
    }

    /// Returns true if the event continues past the midnight after its start.
    ///
    /// An event ending exactly at that midnight does not cross it.
    pub fn crosses_midnight(&self) -> bool {
        self.end > next_midnight(self.start)
    }

    /// Splits the event into one interval per calendar day it touches.
    ///
    /// The first day runs from the start time to `24:00`, full intermediate
    /// days run `00:00-24:00`, and the last day runs from `00:00` to the end
    /// time. A zero-length tail (an end at exactly midnight) is left out.
    pub fn intervals(&self) -> Vec<Interval> {
        let first = self.start.date();
        let last = self.end.date();

        first
            .iter_days()
            .take_while(|date| *date <= last)
            .filter_map(|date| {
                let start = if date == first {
                    TimeOfDay::from_naive_time(self.start.time())
                } else {
                    TimeOfDay::MIDNIGHT
                };
                let end = if date == last {
                    TimeOfDay::from_naive_time(self.end.time())
                } else {
                    TimeOfDay::END_OF_DAY
                };
                Interval::try_new(Weekday::from_chrono(date.weekday()), start, end)
            })
            .collect()
    }
}

fn next_midnight(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(NaiveTime::MIN) + Duration::days(1)
}
