//! Editor configuration.

use hours_core::ScanConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Settings for a [`ScheduleEditor`](crate::ScheduleEditor).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// How initial values are decoded and which week the grid shows.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Whether loading a value fires the change listeners.
    #[serde(default)]
    pub notify_on_load: bool,
}

impl EditorConfig {
    /// Loads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.scan.validate()?;
        Ok(config)
    }
}
