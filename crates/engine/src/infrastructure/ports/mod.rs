//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Realm, layer, and location storage (in-memory or Neo4j)
//! - Markup rendering (could swap the paragraph renderer for a Markdown engine)
//! - Telemetry sinks
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{LayerRepo, LocationRepo, RealmRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{MarkupRendererPort, TelemetryPort};

pub use types::{TelemetryEvent, TelemetryValue};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockLayerRepo, MockLocationRepo, MockRealmRepo};

#[cfg(test)]
pub use external::{MockMarkupRendererPort, MockTelemetryPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RenderError, RepoError};
