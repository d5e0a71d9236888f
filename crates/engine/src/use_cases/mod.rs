//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod description;
pub mod layers;
pub mod realm_context;
pub mod world;

pub use description::DescriptionComposer;
pub use layers::TemporalLayerStore;
pub use realm_context::RealmContextService;
pub use world::ImportWorldSeed;
