//! World seeding use cases.

mod import_seed;

pub use import_seed::{ImportWorldSeed, SeedError, SeedReport};
