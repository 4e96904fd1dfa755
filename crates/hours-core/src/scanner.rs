//! Decoding opening-hours strings into a [`WeeklySchedule`].
//!
//! The scanner compiles the input with an [`IntervalOracle`] and walks one
//! reference week, transition by transition:
//!
//! 1. Start at Monday 00:00 and note whether it is already open.
//! 2. Ask the oracle for the next change, bounded by the end of the following
//!    Monday (8 days), so a period opening late on Sunday is seen closing.
//! 3. Pair each opening with the next closing and split the period at every
//!    midnight it crosses.
//! 4. Keep only what falls inside the reference week. Anything past it
//!    repeats the start of the week.
//!
//! `24/7` is answered directly without compiling any rules.

use std::marker::PhantomData;

use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use crate::config::ScanConfig;
use crate::error::{HoursError, Result};
use crate::event::CalendarEvent;
use crate::oracle::IntervalOracle;
use crate::rules::WeeklyRules;
use crate::schedule::{WeeklySchedule, MINUTES_PER_DAY};

/// The always-open shortcut.
pub const ALWAYS_OPEN: &str = "24/7";

/// Scan progress: either still walking with the instant of the pending
/// opening, or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning {
        probe: NaiveDateTime,
        open_since: Option<NaiveDateTime>,
    },
    Done,
}

/// Decodes opening-hours strings using the oracle `O`.
#[derive(Debug, Clone)]
pub struct TransitionScanner<O = WeeklyRules> {
    config: ScanConfig,
    _oracle: PhantomData<fn() -> O>,
}

impl<O: IntervalOracle> Default for TransitionScanner<O> {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl<O: IntervalOracle> TransitionScanner<O> {
    /// Creates a scanner with the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            _oracle: PhantomData,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Decodes `value` into a schedule.
    ///
    /// Fails with [`HoursError::UnparsableInput`] when the oracle rejects the
    /// string, and with [`HoursError::Config`] when the scan window cannot be
    /// placed. No partial schedule is produced.
    pub fn scan(&self, value: &str) -> Result<WeeklySchedule> {
        self.config.scan_window()?;
        if self.config.always_open_shortcut && value == ALWAYS_OPEN {
            debug!("Using 24/7 shortcut");
            return Ok(WeeklySchedule::always_open());
        }

        let oracle = O::construct(value).map_err(|e| HoursError::UnparsableInput {
            input: value.to_string(),
            source: Box::new(e),
        })?;
        self.scan_oracle(&oracle)
    }

    /// Decodes `value` into calendar events anchored to the reference week,
    /// one per interval.
    pub fn scan_events(&self, value: &str) -> Result<Vec<CalendarEvent>> {
        let (week_start, _, _) = self.config.scan_window()?;
        Ok(self.scan(value)?.to_events(week_start.date()))
    }

    /// Walks an already compiled oracle across the reference week.
    pub fn scan_oracle(&self, oracle: &O) -> Result<WeeklySchedule> {
        let (week_start, week_end, bound) = self.config.scan_window()?;
        let max_transitions = self.config.window_days() as usize * MINUTES_PER_DAY as usize;

        let mut schedule = WeeklySchedule::new();
        let mut transitions = 0usize;
        let mut state = ScanState::Scanning {
            probe: week_start,
            open_since: oracle.is_open_at(week_start).then_some(week_start),
        };

        while let ScanState::Scanning { probe, open_since } = state {
            let next = oracle
                .next_change(probe, bound)
                .filter(|at| *at > probe && *at <= bound && transitions < max_transitions);

            state = match (next, open_since) {
                (Some(at), Some(since)) => {
                    transitions += 1;
                    trace!(%at, "closes");
                    record(&mut schedule, since, at, week_end);
                    ScanState::Scanning {
                        probe: at,
                        open_since: None,
                    }
                }
                (Some(at), None) => {
                    transitions += 1;
                    trace!(%at, "opens");
                    ScanState::Scanning {
                        probe: at,
                        open_since: Some(at),
                    }
                }
                (None, Some(since)) => {
                    // Still open at the bound. Whatever lies inside the week is
                    // real; the rest would repeat the start of the week.
                    if since >= week_end {
                        warn!(%since, "Discarding period still open at end of scan window");
                    }
                    record(&mut schedule, since, bound, week_end);
                    ScanState::Done
                }
                (None, None) => ScanState::Done,
            };
        }

        debug!(transitions, intervals = schedule.len(), "Scanned opening hours");
        Ok(schedule)
    }
}

/// Adds the open period `[since, until)`, clipped to the reference week.
fn record(
    schedule: &mut WeeklySchedule,
    since: NaiveDateTime,
    until: NaiveDateTime,
    week_end: NaiveDateTime,
) {
    let Some(event) = CalendarEvent::try_new(since, until.min(week_end)) else {
        trace!(%since, "Skipping period outside the reference week");
        return;
    };
    for interval in event.intervals() {
        let inserted = schedule.insert(interval);
        assert!(inserted, "scanned periods must not overlap: {interval}");
    }
}

/// Decodes `value` with the built-in rule engine and default settings.
pub fn scan(value: &str) -> Result<WeeklySchedule> {
    TransitionScanner::<WeeklyRules>::default().scan(value)
}
