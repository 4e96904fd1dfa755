//! Weekly opening-hours model.
//!
//! This module provides the normalized representation of a week of opening
//! hours: for every [`Weekday`], an ordered list of disjoint [`Interval`]s.
//!
//! Intervals never cross midnight. A period that runs past midnight is stored
//! as two intervals, one ending at `24:00` and one starting at `00:00` on the
//! following day.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::conflict;
use crate::error::HoursError;
use crate::event::{week_start, CalendarEvent};
use crate::{scanner, serializer};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Days of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns all days of the week, Monday through Sunday.
    pub fn all() -> [Weekday; 7] {
        [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }

    /// Zero-based position in the week (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// ISO ordinal (Monday = 1, Sunday = 7).
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    /// Returns the day at a zero-based position, if in range.
    pub fn from_index(index: usize) -> Option<Weekday> {
        Self::all().get(index).copied()
    }

    /// Two-letter abbreviation used in the opening-hours syntax.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "Mo",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "We",
            Weekday::Thursday => "Th",
            Weekday::Friday => "Fr",
            Weekday::Saturday => "Sa",
            Weekday::Sunday => "Su",
        }
    }

    /// Parses a two-letter abbreviation (case-sensitive).
    pub fn from_abbreviation(abbr: &str) -> Option<Weekday> {
        Self::all().into_iter().find(|day| day.abbreviation() == abbr)
    }

    /// The following day, wrapping Sunday to Monday.
    pub fn next(self) -> Weekday {
        Self::all()[(self.index() + 1) % 7]
    }

    /// Converts from chrono's Weekday.
    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Time of day as minutes since midnight, `00:00` through `24:00`.
///
/// `24:00` is only meaningful as the end of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Midnight at the end of the day (`24:00`).
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Creates a new TimeOfDay.
    ///
    /// # Panics
    /// Panics if the hour is above 24, the minute above 59, or the time is
    /// past `24:00`.
    pub fn new(hour: u8, minute: u8) -> Self {
        assert!(hour <= 24, "hour must be 0-24");
        assert!(minute < 60, "minute must be 0-59");
        assert!(hour < 24 || minute == 0, "24:00 is the latest time of day");
        Self(hour as u16 * 60 + minute as u16)
    }

    /// Creates a TimeOfDay from minutes since midnight.
    ///
    /// # Panics
    /// Panics if `minutes` exceeds 1440.
    pub fn from_minutes(minutes: u16) -> Self {
        assert!(minutes <= MINUTES_PER_DAY, "minutes must be 0-1440");
        Self(minutes)
    }

    /// Creates a TimeOfDay from minutes since midnight, or `None` past `24:00`.
    pub fn try_from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Creates from a chrono NaiveTime, dropping seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Minutes since midnight.
    pub fn to_minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Returns true for `24:00`.
    pub fn is_end_of_day(self) -> bool {
        self.0 == MINUTES_PER_DAY
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = String;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        Self::try_from_minutes(minutes).ok_or_else(|| format!("{minutes} is past 24:00"))
    }
}

impl From<TimeOfDay> for u16 {
    fn from(time: TimeOfDay) -> Self {
        time.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A contiguous open period within a single day, `[start, end)`.
///
/// `start < end` always holds, including for deserialized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
}

/// Unchecked wire form of an [`Interval`].
#[derive(Deserialize)]
struct RawInterval {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawInterval> for Interval {
    type Error = String;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::try_new(raw.day, raw.start, raw.end).ok_or_else(|| {
            format!(
                "interval {} {}-{} does not start before it ends",
                raw.day, raw.start, raw.end
            )
        })
    }
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Panics
    /// Panics unless `start < end`.
    pub fn new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Self {
        assert!(start < end, "interval start must precede its end");
        Self { day, start, end }
    }

    /// Creates a new interval, or `None` if it would be empty or inverted.
    pub fn try_new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { day, start, end })
    }

    /// Creates an interval from hour/minute pairs.
    pub fn from_hm(day: Weekday, start: (u8, u8), end: (u8, u8)) -> Self {
        Self::new(
            day,
            TimeOfDay::new(start.0, start.1),
            TimeOfDay::new(end.0, end.1),
        )
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// The whole day, `00:00-24:00`.
    pub fn full_day(day: Weekday) -> Self {
        Self::new(day, TimeOfDay::MIDNIGHT, TimeOfDay::END_OF_DAY)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.to_minutes() - self.start.to_minutes()
    }

    /// Checks if a time falls within this interval (end exclusive).
    pub fn contains(&self, time: TimeOfDay) -> bool {
        time >= self.start && time < self.end
    }

    /// The `HH:MM-HH:MM` text of this interval, without the day.
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}

/// Opening hours for one week.
///
/// Each day keeps its intervals sorted by start time, and intervals on the
/// same day never overlap. The JSON form is the compact opening-hours string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeeklySchedule {
    days: [Vec<Interval>; 7],
}

impl WeeklySchedule {
    /// Creates an empty schedule (closed all week).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule that is open around the clock.
    pub fn always_open() -> Self {
        let mut schedule = Self::new();
        for day in Weekday::all() {
            schedule.days[day.index()].push(Interval::full_day(day));
        }
        schedule
    }

    /// Returns the intervals of one day, sorted by start.
    pub fn day(&self, day: Weekday) -> &[Interval] {
        &self.days[day.index()]
    }

    /// Iterates over all intervals, Monday through Sunday.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.days.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Adds an interval in start order.
    ///
    /// Returns false, leaving the schedule untouched, if it overlaps an
    /// interval already present on that day.
    pub fn insert(&mut self, interval: Interval) -> bool {
        let intervals = &mut self.days[interval.day.index()];
        if conflict::overlaps(&interval, intervals.iter()) {
            return false;
        }
        let pos = intervals.partition_point(|existing| existing.start < interval.start);
        intervals.insert(pos, interval);
        true
    }

    /// Removes an interval. Returns false if it was not present.
    pub fn remove(&mut self, interval: &Interval) -> bool {
        let intervals = &mut self.days[interval.day.index()];
        if let Some(pos) = intervals.iter().position(|existing| existing == interval) {
            intervals.remove(pos);
            true
        } else {
            false
        }
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        self.days.iter_mut().for_each(Vec::clear);
    }

    /// Checks if the schedule is open at the given day and time.
    pub fn is_open_at(&self, day: Weekday, time: TimeOfDay) -> bool {
        self.day(day).iter().any(|interval| interval.contains(time))
    }

    /// Returns true if every day is open from `00:00` to `24:00`.
    pub fn is_always_open(&self) -> bool {
        Weekday::all()
            .into_iter()
            .all(|day| self.day(day) == [Interval::full_day(day)])
    }

    /// Anchors every interval to the week containing `reference`, one calendar
    /// event per interval.
    ///
    /// # Panics
    /// Panics if that week does not fit in chrono's date range. Use
    /// [`ScanConfig::scan_window`](crate::ScanConfig::scan_window) to check a
    /// reference week first.
    pub fn to_events(&self, reference: NaiveDate) -> Vec<CalendarEvent> {
        let monday = week_start(reference).and_time(NaiveTime::MIN);
        self.iter()
            .map(|interval| {
                let day = monday + Duration::days(interval.day.index() as i64);
                CalendarEvent::new(
                    day + Duration::minutes(interval.start.to_minutes() as i64),
                    day + Duration::minutes(interval.end.to_minutes() as i64),
                )
            })
            .collect()
    }

    /// Builds a schedule from calendar events, splitting those that cross
    /// midnight.
    ///
    /// Pieces that overlap one already taken (for example the repeated
    /// weekdays of an event longer than a week) are dropped.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a CalendarEvent>) -> Self {
        let mut schedule = Self::new();
        for event in events {
            for interval in event.intervals() {
                schedule.insert(interval);
            }
        }
        schedule
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serializer::serialize(self))
    }
}

impl FromStr for WeeklySchedule {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        scanner::scan(s)
    }
}

impl TryFrom<String> for WeeklySchedule {
    type Error = HoursError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeeklySchedule> for String {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.to_string()
    }
}
