//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps operations for a domain entity type.
//! They depend on repository ports and provide the building blocks for use cases.

pub mod location;
pub mod realm_graph;

pub use location::Location;
pub use realm_graph::{RealmGraph, RealmGraphError, DEFAULT_CHAIN_DEPTH_CAP};
