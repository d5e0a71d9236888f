//! In-memory store backends.
//!
//! Used for tests, seeded demo worlds, and single-process deployments. Each
//! store guards its state with a `tokio::sync::RwLock`; writes never hold a
//! lock across another store's await point.

mod layer_repo;
mod location_repo;
mod realm_repo;

pub use layer_repo::InMemoryLayerRepo;
pub use location_repo::InMemoryLocationRepo;
pub use realm_repo::InMemoryRealmRepo;

use std::sync::Arc;

/// All in-memory stores, created together.
pub struct InMemoryRepositories {
    pub realm: Arc<InMemoryRealmRepo>,
    pub layer: Arc<InMemoryLayerRepo>,
    pub location: Arc<InMemoryLocationRepo>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self {
            realm: Arc::new(InMemoryRealmRepo::new()),
            layer: Arc::new(InMemoryLayerRepo::new()),
            location: Arc::new(InMemoryLocationRepo::new()),
        }
    }
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}
