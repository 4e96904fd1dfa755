//! Hours Core - weekly opening hours as text and as intervals.
//!
//! This crate converts between the compact weekly opening-hours syntax
//! (a subset of OpenStreetMap `opening_hours`) and a [`WeeklySchedule`] of
//! disjoint per-day intervals that a 7-day calendar grid can edit.
//!
//! - [`scanner`]: string → schedule, by walking a rule engine's transitions
//! - [`serializer`]: schedule or calendar events → canonical string
//! - [`conflict`]: overlap checks for interactive edits
//! - [`rules`]: the built-in rule engine behind the [`IntervalOracle`] trait
//!
//! # Example
//!
//! ```
//! use hours_core::{scan, serialize, Weekday};
//!
//! let schedule = scan("Tu 17:30-18:30; Mo 08:00-10:00,01:00-04:15").unwrap();
//! assert_eq!(schedule.day(Weekday::Monday).len(), 2);
//! assert_eq!(
//!     serialize(&schedule),
//!     "Mo 01:00-04:15,08:00-10:00; Tu 17:30-18:30"
//! );
//! ```

pub mod config;
pub mod conflict;
pub mod error;
pub mod event;
pub mod oracle;
pub mod rules;
pub mod scanner;
pub mod schedule;
pub mod serializer;

pub use config::ScanConfig;
pub use conflict::{conflicts, overlaps, Span};
pub use error::{HoursError, Result};
pub use event::{week_start, CalendarEvent};
pub use oracle::IntervalOracle;
pub use rules::{RuleError, WeeklyRules};
pub use scanner::{scan, TransitionScanner, ALWAYS_OPEN};
pub use schedule::{Interval, TimeOfDay, Weekday, WeeklySchedule, MINUTES_PER_DAY};
pub use serializer::{serialize, serialize_events};
