//! Telemetry sink emitting diagnostic points as `tracing` events.

use crate::infrastructure::ports::{TelemetryEvent, TelemetryPort};

/// Forwards telemetry points to the `realmlore::telemetry` tracing target.
///
/// Whatever subscriber the host installs decides where they end up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record(&self, event: TelemetryEvent) {
        let dimensions = event
            .dimensions
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            target: "realmlore::telemetry",
            event = event.name,
            dimensions = %dimensions,
            "telemetry point"
        );
    }
}

/// Drops every point. Handy for one-shot CLI runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn record(&self, _event: TelemetryEvent) {}
}
