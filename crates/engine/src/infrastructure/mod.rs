//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod importers;
pub mod markup;
pub mod memory;
pub mod neo4j;
pub mod ports;
pub mod telemetry;
