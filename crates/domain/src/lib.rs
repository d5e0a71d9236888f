//! Realmlore domain: realms, description layers, and the value objects the
//! description engine produces.
//!
//! This crate is pure: no I/O, no async, no storage concerns.

extern crate self as realmlore_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    BorderEdgeOutcome, DescriptionLayer, EdgeOutcome, LayerAttributes, LayerMetadata, LayerScope,
    LayerType, Location, LocationExit, PoliticalEdge, PoliticalRelation, Realm, RealmCategory,
    RealmScope, RealmType, RouteEdge, HERO_ROLE,
};
pub use error::DomainError;
pub use ids::{LayerId, LocationId, RealmId};
pub use value_objects::{
    aggregate_narrative_tags, categorize_realms, CategorizedRealms, CompiledDescription,
    LayerPriorityTable, LocationContext, NeighborLocation, Provenance, ProvenanceEntry,
    ViewContext,
};
