//! Realmlore Engine library.
//!
//! Resolves location descriptions from tick-indexed layers over a realm
//! hierarchy.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping store operations (realm graph, locations)
//! - `use_cases/` - Orchestration across entities (context, layers, composition, seeding)
//! - `infrastructure/` - Port traits and their adapters (in-memory, Neo4j, markup, telemetry)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
