//! Value objects - Immutable types describing views, results, and lookup tables

mod compiled_description;
mod layer_priority;
mod realm_context;
mod view_context;

pub use compiled_description::{CompiledDescription, Provenance, ProvenanceEntry};
pub use layer_priority::LayerPriorityTable;
pub use realm_context::{
    aggregate_narrative_tags, categorize_realms, CategorizedRealms, LocationContext,
    NeighborLocation,
};
pub use view_context::ViewContext;
