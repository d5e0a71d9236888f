//! External capability ports (markup rendering, telemetry sink).

use super::error::RenderError;
use super::types::TelemetryEvent;

/// Turns composed plain text into display markup.
#[cfg_attr(test, mockall::automock)]
pub trait MarkupRendererPort: Send + Sync {
    fn render(&self, text: &str) -> Result<String, RenderError>;
}

/// Receives named diagnostic points. Must never fail the caller.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetryPort: Send + Sync {
    fn record(&self, event: TelemetryEvent);
}
