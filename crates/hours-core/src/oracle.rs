//! Boundary to an opening-hours rule engine.
//!
//! The [`TransitionScanner`](crate::TransitionScanner) never interprets the
//! rule grammar itself. It builds an oracle from the input string and only asks
//! two questions: is it open at this instant, and when does that next change.

use chrono::NaiveDateTime;

/// A compiled set of opening-hours rules.
pub trait IntervalOracle: Sized {
    /// Error reported when the rule string cannot be compiled.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compiles a rule string.
    fn construct(rules: &str) -> Result<Self, Self::Error>;

    /// Returns true if the rules say open at `instant`.
    fn is_open_at(&self, instant: NaiveDateTime) -> bool;

    /// Returns the first instant after `from`, no later than `bound`, at which
    /// the open/closed state differs from the state at `from`.
    ///
    /// Returns `None` if the state holds until `bound`.
    fn next_change(&self, from: NaiveDateTime, bound: NaiveDateTime) -> Option<NaiveDateTime>;
}
