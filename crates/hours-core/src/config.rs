//! Scanner configuration.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{HoursError, Result};
use crate::event::week_start;

/// Shortest scan window that still sees a Sunday-night period close.
pub const MIN_SCAN_DAYS: u32 = 8;

/// Longest scan window accepted from configuration.
pub const MAX_SCAN_DAYS: u32 = 14;

/// Settings for [`TransitionScanner`](crate::TransitionScanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Any date in the reference week; the scan starts on that week's Monday.
    #[serde(default = "default_reference_week")]
    pub reference_week: NaiveDate,
    /// Length of the scanned window in days, 8 through 14.
    #[serde(default = "default_scan_days")]
    pub scan_days: u32,
    /// Whether `24/7` skips the rule engine.
    #[serde(default = "default_true")]
    pub always_open_shortcut: bool,
}

fn default_reference_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_scan_days() -> u32 {
    MIN_SCAN_DAYS
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reference_week: default_reference_week(),
            scan_days: default_scan_days(),
            always_open_shortcut: true,
        }
    }
}

impl ScanConfig {
    /// Loads a configuration from JSON. Missing fields take their defaults.
    ///
    /// Fails if the JSON is malformed or the settings do not pass
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HoursError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the window length is within bounds and that the whole
    /// scan window is representable.
    pub fn validate(&self) -> Result<()> {
        if self.scan_days > MAX_SCAN_DAYS {
            return Err(HoursError::Config(format!(
                "scan_days must be at most {MAX_SCAN_DAYS}, got {}",
                self.scan_days
            )));
        }
        self.scan_window().map(|_| ())
    }

    /// Sets the reference week.
    pub fn with_reference_week(mut self, date: NaiveDate) -> Self {
        self.reference_week = date;
        self
    }

    /// Monday of the reference week.
    ///
    /// # Panics
    /// Panics if that Monday lies before the earliest date chrono supports.
    pub fn reference_monday(&self) -> NaiveDate {
        week_start(self.reference_week)
    }

    /// Effective scan window length in days.
    pub fn window_days(&self) -> u32 {
        self.scan_days.clamp(MIN_SCAN_DAYS, MAX_SCAN_DAYS)
    }

    /// Returns the start of the reference week, its end, and the end of the
    /// scan window.
    ///
    /// Fails if any of them falls outside the range chrono can represent.
    pub fn scan_window(&self) -> Result<(NaiveDateTime, NaiveDateTime, NaiveDateTime)> {
        let out_of_range = || {
            HoursError::Config(format!(
                "reference week {} is too close to the supported date range limits",
                self.reference_week
            ))
        };
        let offset = Duration::days(self.reference_week.weekday().num_days_from_monday() as i64);

        let monday = self
            .reference_week
            .checked_sub_signed(offset)
            .ok_or_else(out_of_range)?
            .and_time(NaiveTime::MIN);
        let week_end = monday
            .checked_add_signed(Duration::days(7))
            .ok_or_else(out_of_range)?;
        let bound = monday
            .checked_add_signed(Duration::days(self.window_days() as i64))
            .ok_or_else(out_of_range)?;
        Ok((monday, week_end, bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.reference_monday().weekday(), Weekday::Mon);
        assert_eq!(config.window_days(), 8);
        assert!(config.always_open_shortcut);
    }

    #[test]
    fn reference_week_normalizes_to_monday() {
        let config =
            ScanConfig::default().with_reference_week(NaiveDate::from_ymd_opt(2021, 3, 6).unwrap());
        assert_eq!(
            config.reference_monday(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
    }

    #[test]
    fn short_window_is_clamped() {
        let config = ScanConfig {
            scan_days: 3,
            ..ScanConfig::default()
        };
        assert_eq!(config.window_days(), 8);
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = ScanConfig::from_json(r#"{"scan_days": 10}"#).unwrap();
        assert_eq!(config.scan_days, 10);
        assert_eq!(config.reference_week, default_reference_week());
        assert!(config.always_open_shortcut);
    }

    #[test]
    fn oversized_window_is_clamped() {
        let config = ScanConfig {
            scan_days: u32::MAX,
            ..ScanConfig::default()
        };
        assert_eq!(config.window_days(), MAX_SCAN_DAYS);
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_rejects_oversized_window() {
        let err = ScanConfig::from_json(r#"{"scan_days": 4000000000}"#).unwrap_err();
        assert!(matches!(err, HoursError::Config(_)));
        assert!(ScanConfig::from_json(r#"{"scan_days": 14}"#).is_ok());
    }

    #[test]
    fn from_json_rejects_reference_week_at_date_limit() {
        let err = ScanConfig::from_json(r#"{"reference_week": "+262142-12-31"}"#).unwrap_err();
        assert!(matches!(err, HoursError::Config(_)));
    }

    #[test]
    fn scan_window_spans_week_and_bound() {
        let (start, week_end, bound) = ScanConfig::default().scan_window().unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(start, monday.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(week_end, start + Duration::days(7));
        assert_eq!(bound, start + Duration::days(8));
    }

    #[test]
    fn scan_window_reports_unrepresentable_dates() {
        let config = ScanConfig::default().with_reference_week(NaiveDate::MAX);
        assert!(matches!(config.scan_window(), Err(HoursError::Config(_))));
    }

    #[test]
    fn from_json_reports_config_error() {
        let err = ScanConfig::from_json(r#"{"reference_week": "not a date"}"#).unwrap_err();
        assert!(matches!(err, HoursError::Config(_)));
    }

    #[test]
    fn config_serialization() {
        let config = ScanConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"reference_week\":\"2024-01-01\""));

        let deserialized: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
