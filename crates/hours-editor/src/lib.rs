//! Hours Editor - interactive editing of weekly opening hours.
//!
//! A [`ScheduleEditor`] is the model behind a 7-day calendar grid. It is
//! seeded from an opening-hours string, accepts drawn spans unless they
//! overlap existing ones, and reports the re-encoded string to subscribers
//! after every committed change.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use hours_editor::{EditorConfig, ScheduleEditor};
//!
//! let mut editor = ScheduleEditor::open("Mo 08:00-10:00", EditorConfig::default()).unwrap();
//!
//! let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let outcome = editor
//!     .add_span(
//!         tuesday.and_hms_opt(17, 30, 0).unwrap(),
//!         tuesday.and_hms_opt(18, 30, 0).unwrap(),
//!     )
//!     .unwrap();
//!
//! assert!(outcome.was_added());
//! assert_eq!(editor.value(), "Mo 08:00-10:00; Tu 17:30-18:30");
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use session::{EditOutcome, EventId, ScheduleEditor, MAX_SPAN_DAYS};
