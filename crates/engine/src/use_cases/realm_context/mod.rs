//! Realm context use cases - Narrative context around a location.
//!
//! Categorizes the realms a location sits inside and assembles the payload
//! upstream prompt assembly consumes.

mod context;

pub use context::{RealmContextError, RealmContextService};
