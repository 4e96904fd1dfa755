//! Built-in opening-hours rule engine.
//!
//! Understands the weekly subset of the OpenStreetMap `opening_hours` syntax:
//!
//! - `24/7`
//! - weekday selectors: `Mo`, `Mo-Fr`, `Sa-Mo` (wrapping), `Mo,We,Fr`
//! - one or more time ranges: `08:00-12:00,13:00-17:30`
//! - ranges ending at `24:00`, wrapping past midnight (`22:00-02:00`), or
//!   using extended hours (`22:00-26:00`)
//! - `off` / `closed`
//! - rules without a selector, which apply to every day
//!
//! Rules are separated by `;`. A later rule naming a day replaces whatever an
//! earlier rule said about that day.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::oracle::IntervalOracle;
use crate::schedule::{Weekday, MINUTES_PER_DAY};

/// Minutes in one week.
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY as u32;

/// Latest end a range may name (`48:00`).
const MAX_END_MINUTES: u16 = 2 * MINUTES_PER_DAY;

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})$").expect("Invalid regex pattern")
});

/// Errors reported while compiling a rule string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A weekday abbreviation that is not one of `Mo`..`Su`.
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    /// A time with out-of-range hours or minutes.
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Something in time position that is not `HH:MM-HH:MM`.
    #[error("invalid time range: {0}")]
    InvalidRange(String),

    /// A rule that does not fit the grammar at all.
    #[error("malformed rule: {0}")]
    Malformed(String),
}

/// One open range of a rule, in minutes from the rule day's midnight.
///
/// `end` may exceed 1440 when the range runs into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RuleSpan {
    start: u16,
    end: u16,
}

impl RuleSpan {
    const FULL_DAY: RuleSpan = RuleSpan {
        start: 0,
        end: MINUTES_PER_DAY,
    };

    fn parse(text: &str) -> Result<Self, RuleError> {
        let caps = TIME_RANGE
            .captures(text)
            .ok_or_else(|| RuleError::InvalidRange(text.to_string()))?;
        let field = |i: usize| caps[i].parse::<u16>().unwrap_or(u16::MAX);
        let (start_h, start_m, end_h, end_m) = (field(1), field(2), field(3), field(4));

        if start_h >= 24 || start_m >= 60 || end_m >= 60 {
            return Err(RuleError::InvalidTime(text.to_string()));
        }
        let start = start_h * 60 + start_m;
        let mut end = end_h
            .checked_mul(60)
            .and_then(|m| m.checked_add(end_m))
            .filter(|m| *m <= MAX_END_MINUTES)
            .ok_or_else(|| RuleError::InvalidTime(text.to_string()))?;

        if end <= start {
            end += MINUTES_PER_DAY;
        }
        Ok(Self { start, end })
    }
}

/// Compiled weekly rules, one list of ranges per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyRules {
    days: [Vec<RuleSpan>; 7],
}

impl WeeklyRules {
    /// Compiles a rule string. Empty input yields rules that are never open.
    pub fn parse(input: &str) -> Result<Self, RuleError> {
        let mut rules = Self::default();
        for rule in input.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            rules.apply_rule(rule)?;
        }
        Ok(rules)
    }

    fn apply_rule(&mut self, rule: &str) -> Result<(), RuleError> {
        if rule == "24/7" {
            self.set_days(&Weekday::all(), &[RuleSpan::FULL_DAY]);
            return Ok(());
        }

        let starts_with_time = rule.starts_with(|c: char| c.is_ascii_digit());
        let (days, times) = if starts_with_time {
            (Weekday::all().to_vec(), rule)
        } else {
            let (selector, rest) = rule
                .split_once(char::is_whitespace)
                .map(|(selector, rest)| (selector, rest.trim()))
                .unwrap_or((rule, ""));
            if is_closed_keyword(selector) && rest.is_empty() {
                (Weekday::all().to_vec(), selector)
            } else {
                (parse_selector(selector)?, rest)
            }
        };

        let spans = if times.is_empty() {
            vec![RuleSpan::FULL_DAY]
        } else if is_closed_keyword(times) {
            Vec::new()
        } else {
            times
                .split(',')
                .map(|t| RuleSpan::parse(t.trim()))
                .collect::<Result<Vec<_>, _>>()?
        };

        self.set_days(&days, &spans);
        Ok(())
    }

    fn set_days(&mut self, days: &[Weekday], spans: &[RuleSpan]) {
        for day in days {
            self.days[day.index()] = spans.to_vec();
        }
    }

    /// Ranges as `(start, end)` minutes of the week; `end` may run past the
    /// end of Sunday.
    fn week_spans(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.days.iter().enumerate().flat_map(|(index, spans)| {
            let base = index as u32 * MINUTES_PER_DAY as u32;
            spans
                .iter()
                .map(move |span| (base + span.start as u32, base + span.end as u32))
        })
    }

    fn is_open_at_week_minute(&self, minute: u32) -> bool {
        self.week_spans().any(|(start, end)| {
            let offset = (minute + MINUTES_PER_WEEK - start % MINUTES_PER_WEEK) % MINUTES_PER_WEEK;
            offset < end - start
        })
    }

    fn boundaries(&self) -> Vec<u32> {
        let mut points: Vec<u32> = self
            .week_spans()
            .flat_map(|(start, end)| [start % MINUTES_PER_WEEK, end % MINUTES_PER_WEEK])
            .collect();
        points.sort_unstable();
        points.dedup();
        points
    }
}

impl IntervalOracle for WeeklyRules {
    type Error = RuleError;

    fn construct(rules: &str) -> Result<Self, Self::Error> {
        Self::parse(rules)
    }

    fn is_open_at(&self, instant: NaiveDateTime) -> bool {
        self.is_open_at_week_minute(week_minute(instant))
    }

    fn next_change(&self, from: NaiveDateTime, bound: NaiveDateTime) -> Option<NaiveDateTime> {
        let from = truncate_to_minute(from);
        let state = self.is_open_at(from);
        let origin = week_minute(from);

        let mut deltas: Vec<u32> = self
            .boundaries()
            .into_iter()
            .map(|point| match (point + MINUTES_PER_WEEK - origin) % MINUTES_PER_WEEK {
                0 => MINUTES_PER_WEEK,
                delta => delta,
            })
            .collect();
        deltas.sort_unstable();

        deltas
            .into_iter()
            .map(|delta| from + Duration::minutes(delta as i64))
            .take_while(|candidate| *candidate <= bound)
            .find(|candidate| self.is_open_at(*candidate) != state)
    }
}

fn is_closed_keyword(text: &str) -> bool {
    matches!(text, "off" | "closed")
}

fn parse_selector(selector: &str) -> Result<Vec<Weekday>, RuleError> {
    let mut days = Vec::new();
    for part in selector.split(',') {
        match part.split('-').collect::<Vec<_>>().as_slice() {
            [single] => days.push(parse_weekday(single)?),
            [from, to] => {
                let (from, to) = (parse_weekday(from)?, parse_weekday(to)?);
                let mut day = from;
                days.push(day);
                while day != to {
                    day = day.next();
                    days.push(day);
                }
            }
            _ => return Err(RuleError::Malformed(selector.to_string())),
        }
    }
    Ok(days)
}

fn parse_weekday(abbr: &str) -> Result<Weekday, RuleError> {
    Weekday::from_abbreviation(abbr).ok_or_else(|| RuleError::UnknownWeekday(abbr.to_string()))
}

fn week_minute(instant: NaiveDateTime) -> u32 {
    instant.weekday().num_days_from_monday() * MINUTES_PER_DAY as u32
        + instant.hour() * 60
        + instant.minute()
}

fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}
