//! Editing session behind the weekly calendar grid.
//!
//! The grid hands over drawn spans and removal requests. The session checks
//! each new span against what is already there, keeps the accepted events in
//! start order, and tells every listener the new opening-hours string after
//! each committed change.
//!
//! Rejected spans are a normal outcome of dragging over an existing event.
//! They leave the session untouched and notify nobody.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use hours_core::{
    overlaps, serialize_events, CalendarEvent, TransitionScanner, WeeklyRules, WeeklySchedule,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};

/// Longest span the weekly grid can hold without overlapping itself.
pub const MAX_SPAN_DAYS: i64 = 7;

/// Identifier of an event within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of trying to add a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The span was committed under this id.
    Added(EventId),
    /// The span overlaps these events and was dropped.
    Conflict(Vec<EventId>),
    /// The span is longer than a week and would overlap itself.
    TooLong,
}

impl EditOutcome {
    /// Returns true if the span was committed.
    pub fn was_added(&self) -> bool {
        matches!(self, EditOutcome::Added(_))
    }

    /// Returns true if the span was dropped.
    pub fn was_rejected(&self) -> bool {
        matches!(self, EditOutcome::Conflict(_) | EditOutcome::TooLong)
    }
}

type ChangeListener = Box<dyn FnMut(&str)>;

/// One editing session over a week of opening hours.
pub struct ScheduleEditor {
    config: EditorConfig,
    events: Vec<(EventId, CalendarEvent)>,
    next_id: u64,
    listeners: Vec<ChangeListener>,
}

impl fmt::Debug for ScheduleEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleEditor")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ScheduleEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ScheduleEditor {
    /// Creates an empty session.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            next_id: 1,
            listeners: Vec::new(),
        }
    }

    /// Creates a session populated from an opening-hours string.
    ///
    /// Fails if the string cannot be decoded.
    pub fn open(value: &str, config: EditorConfig) -> Result<Self> {
        let mut editor = Self::new(config);
        editor.load(value)?;
        Ok(editor)
    }

    /// Creates a session from an opening-hours string, starting empty if the
    /// string cannot be decoded.
    pub fn open_lenient(value: &str, config: EditorConfig) -> Self {
        let mut editor = Self::new(config);
        if let Err(e) = editor.load(value) {
            warn!("Starting with empty opening hours: {}", e);
        }
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replaces all events with those decoded from `value`.
    ///
    /// On failure the session keeps its current events.
    pub fn load(&mut self, value: &str) -> Result<()> {
        let scanner = TransitionScanner::<WeeklyRules>::new(self.config.scan.clone());
        let events = scanner.scan_events(value)?;

        self.events.clear();
        for event in events {
            let id = self.allocate_id();
            self.events.push((id, event));
        }
        self.sort_events();
        debug!(events = self.events.len(), "Loaded opening hours");

        if self.config.notify_on_load {
            self.notify();
        }
        Ok(())
    }

    /// Registers a listener called with the new value after every committed
    /// change.
    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Iterates over events in start order.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &CalendarEvent)> {
        self.events.iter().map(|(id, event)| (*id, event))
    }

    /// Returns the event with the given id.
    pub fn get(&self, id: EventId) -> Option<&CalendarEvent> {
        self.events
            .iter()
            .find(|(event_id, _)| *event_id == id)
            .map(|(_, event)| event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the events that `candidate` would overlap.
    ///
    /// Events are compared on the weekly grid, so a Sunday-night span that
    /// runs into Monday clashes with an early Monday event of the same week.
    pub fn conflicts(&self, candidate: &CalendarEvent) -> Vec<EventId> {
        let pieces = candidate.intervals();
        self.events
            .iter()
            .filter(|(_, existing)| {
                let theirs = existing.intervals();
                pieces.iter().any(|piece| overlaps(piece, &theirs))
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Adds a drawn span unless it overlaps an existing event or is longer
    /// than a week.
    pub fn add(&mut self, event: CalendarEvent) -> EditOutcome {
        if event.end() - event.start() > Duration::days(MAX_SPAN_DAYS) {
            debug!(start = %event.start(), end = %event.end(), "Rejected span longer than a week");
            return EditOutcome::TooLong;
        }

        let clashing = self.conflicts(&event);
        if !clashing.is_empty() {
            debug!(start = %event.start(), end = %event.end(), "Rejected overlapping span");
            return EditOutcome::Conflict(clashing);
        }

        let id = self.allocate_id();
        let pos = self
            .events
            .partition_point(|(_, existing)| existing.start() < event.start());
        self.events.insert(pos, (id, event));
        debug!(%id, start = %event.start(), end = %event.end(), "Added span");

        self.notify();
        EditOutcome::Added(id)
    }

    /// Adds a span given by its raw endpoints.
    pub fn add_span(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<EditOutcome> {
        let event = CalendarEvent::try_new(start, end).ok_or_else(|| {
            EditorError::InvalidInput(format!("span {start} to {end} is empty or inverted"))
        })?;
        if end - start > Duration::days(MAX_SPAN_DAYS) {
            return Err(EditorError::InvalidInput(format!(
                "span {start} to {end} is longer than {MAX_SPAN_DAYS} days"
            )));
        }
        Ok(self.add(event))
    }

    /// Removes an event. Returns `None` if no event has that id.
    pub fn remove(&mut self, id: EventId) -> Option<CalendarEvent> {
        let pos = self.events.iter().position(|(event_id, _)| *event_id == id)?;
        let (_, event) = self.events.remove(pos);
        debug!(%id, "Removed span");

        self.notify();
        Some(event)
    }

    /// Removes every event. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.events.len();
        if removed > 0 {
            self.events.clear();
            self.notify();
        }
        removed
    }

    /// The current opening-hours string.
    pub fn value(&self) -> String {
        serialize_events(self.events.iter().map(|(_, event)| event))
    }

    /// The current events as a normalized schedule.
    pub fn schedule(&self) -> WeeklySchedule {
        WeeklySchedule::from_events(self.events.iter().map(|(_, event)| event))
    }

    fn allocate_id(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }

    fn sort_events(&mut self) {
        self.events.sort_by_key(|(_, event)| event.start());
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let value = self.value();
        for listener in &mut self.listeners {
            listener(&value);
        }
    }
}
