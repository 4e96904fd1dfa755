//! Overlap detection for interactive edits.
//!
//! A new span is checked against the spans already on the grid before it is
//! committed. Spans that merely touch (one ends exactly when the other starts)
//! do not conflict. A span identical to an existing one does.

use chrono::NaiveDateTime;

use crate::event::CalendarEvent;
use crate::schedule::{Interval, MINUTES_PER_DAY};

/// Anything with a half-open `[start, end)` extent on a common axis.
pub trait Span {
    /// Point type of the axis.
    type Point: Ord + Copy;

    fn span_start(&self) -> Self::Point;

    fn span_end(&self) -> Self::Point;

    /// Two spans conflict when each starts before the other ends.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.span_start() < other.span_end() && other.span_start() < self.span_end()
    }
}

/// Intervals are placed on a minutes-of-the-week axis, Monday 00:00 = 0.
impl Span for Interval {
    type Point = u32;

    fn span_start(&self) -> u32 {
        week_minute(self, self.start().to_minutes())
    }

    fn span_end(&self) -> u32 {
        week_minute(self, self.end().to_minutes())
    }
}

impl Span for CalendarEvent {
    type Point = NaiveDateTime;

    fn span_start(&self) -> NaiveDateTime {
        self.start()
    }

    fn span_end(&self) -> NaiveDateTime {
        self.end()
    }
}

fn week_minute(interval: &Interval, minutes: u16) -> u32 {
    interval.day().index() as u32 * MINUTES_PER_DAY as u32 + minutes as u32
}

/// Returns true if `candidate` overlaps any of `existing`.
pub fn overlaps<'a, S>(candidate: &S, existing: impl IntoIterator<Item = &'a S>) -> bool
where
    S: Span + 'a,
{
    existing
        .into_iter()
        .any(|span| candidate.conflicts_with(span))
}

/// Returns every span in `existing` that overlaps `candidate`.
pub fn conflicts<'a, S>(candidate: &S, existing: impl IntoIterator<Item = &'a S>) -> Vec<&'a S>
where
    S: Span + 'a,
{
    existing
        .into_iter()
        .filter(|span| candidate.conflicts_with(span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Weekday;
    use chrono::NaiveDate;

    fn interval(start: (u8, u8), end: (u8, u8)) -> Interval {
        Interval::from_hm(Weekday::Monday, start, end)
    }

    fn event(day: u32, start: (u32, u32), end_day: u32, end: (u32, u32)) -> CalendarEvent {
        let at = |d: u32, (h, m): (u32, u32)| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };
        CalendarEvent::new(at(day, start), at(end_day, end))
    }

    // ==================== Interval Tests ====================

    #[test]
    fn touching_end_does_not_conflict() {
        let candidate = interval((9, 0), (10, 0));
        assert!(!overlaps(&candidate, [&interval((8, 0), (9, 0))]));
        assert!(!overlaps(&candidate, [&interval((10, 0), (11, 0))]));
    }

    #[test]
    fn partial_overlap_conflicts() {
        let candidate = interval((9, 0), (10, 0));
        assert!(overlaps(&candidate, [&interval((8, 30), (9, 30))]));
        assert!(overlaps(&candidate, [&interval((9, 30), (10, 30))]));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let outer = interval((8, 0), (12, 0));
        let inner = interval((9, 0), (10, 0));
        assert!(overlaps(&outer, [&inner]));
        assert!(overlaps(&inner, [&outer]));
    }

    #[test]
    fn exact_duplicate_conflicts() {
        let candidate = interval((9, 0), (10, 0));
        assert!(overlaps(&candidate, [&candidate]));
    }

    #[test]
    fn different_days_do_not_conflict() {
        let monday = Interval::from_hm(Weekday::Monday, (9, 0), (10, 0));
        let tuesday = Interval::from_hm(Weekday::Tuesday, (9, 0), (10, 0));
        assert!(!overlaps(&monday, [&tuesday]));
    }

    #[test]
    fn end_of_day_touches_next_midnight() {
        let late = Interval::full_day(Weekday::Monday);
        let early = Interval::from_hm(Weekday::Tuesday, (0, 0), (1, 0));
        assert!(!overlaps(&late, [&early]));
    }

    #[test]
    fn empty_existing_never_conflicts() {
        let candidate = interval((9, 0), (10, 0));
        assert!(!overlaps(&candidate, std::iter::empty::<&Interval>()));
    }

    #[test]
    fn conflicts_lists_clashing_spans() {
        let existing = [
            interval((7, 0), (8, 0)),
            interval((8, 30), (9, 30)),
            interval((9, 45), (11, 0)),
        ];
        let candidate = interval((9, 0), (10, 0));

        let clashing = conflicts(&candidate, &existing);
        assert_eq!(clashing, [&existing[1], &existing[2]]);
    }

    // ==================== CalendarEvent Tests ====================

    #[test]
    fn overnight_events_conflict_across_midnight() {
        let existing = event(3, (22, 0), 4, (2, 0));
        let candidate = event(4, (1, 0), 4, (3, 0));
        assert!(overlaps(&candidate, [&existing]));
    }

    #[test]
    fn events_touching_at_midnight_do_not_conflict() {
        let existing = event(3, (22, 0), 4, (0, 0));
        let candidate = event(4, (0, 0), 4, (3, 0));
        assert!(!overlaps(&candidate, [&existing]));
    }
}
