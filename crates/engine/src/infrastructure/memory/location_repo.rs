//! In-memory location store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use realmlore_domain::{Location, LocationId};

use crate::infrastructure::ports::{LocationRepo, RepoError};

#[derive(Default)]
pub struct InMemoryLocationRepo {
    locations: RwLock<HashMap<LocationId, Location>>,
}

impl InMemoryLocationRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationRepo for InMemoryLocationRepo {
    async fn get(&self, id: LocationId) -> Result<Option<Location>, RepoError> {
        Ok(self.locations.read().await.get(&id).cloned())
    }

    async fn save(&self, location: &Location) -> Result<(), RepoError> {
        self.locations
            .write()
            .await
            .insert(location.id, location.clone());
        Ok(())
    }
}
