//! Layer use cases - Tick-indexed description layer storage and resolution.
//!
//! Point-in-time lookups resolve the single active layer for a scope, type,
//! and tick, falling back up the containment hierarchy when the location has
//! nothing of its own.

mod temporal;

pub use temporal::{LayerSource, LayerStoreError, ResolvedLayer, TemporalLayerStore};
