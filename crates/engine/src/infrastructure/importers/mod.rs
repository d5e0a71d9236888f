//! Content importers for external world data.

mod world_seed;

pub use world_seed::{
    BorderSeed, ImportError, MembershipSeed, PoliticalSeed, RouteSeed, WithinSeed, WorldSeed,
};
