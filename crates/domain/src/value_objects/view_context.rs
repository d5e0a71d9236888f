//! View context - how the viewer currently experiences a location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather and time-of-day labels used to gate ambient layers.
///
/// Unset labels never exclude anything: an ambient layer declaring
/// `weatherType: "rain"` is shown when `weather` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ViewContext {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            weather: None,
            time: None,
            timestamp,
        }
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}
