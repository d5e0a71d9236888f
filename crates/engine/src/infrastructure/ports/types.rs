//! Helper types for port operations.

use std::fmt;

/// A dimension value on a telemetry point.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for TelemetryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for TelemetryValue {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for TelemetryValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for TelemetryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for TelemetryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for TelemetryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TelemetryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A named diagnostic point ("layer resolved", "description compiled", ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    pub name: &'static str,
    pub dimensions: Vec<(&'static str, TelemetryValue)>,
}

impl TelemetryEvent {
    pub const LAYER_RESOLVED: &'static str = "layer resolved";
    pub const LAYER_INTERVAL_SET: &'static str = "layer interval set";
    pub const DESCRIPTION_COMPILED: &'static str = "description compiled";
    pub const RENDER_FALLBACK: &'static str = "description render fallback";

    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            dimensions: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<TelemetryValue>) -> Self {
        self.dimensions.push((key, value.into()));
        self
    }

    pub fn dimension(&self, key: &str) -> Option<&TelemetryValue> {
        self.dimensions
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}
