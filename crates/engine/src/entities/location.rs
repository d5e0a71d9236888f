//! Location entity operations.

use std::sync::Arc;

use realmlore_domain::{self as domain, LocationId, NeighborLocation};

use crate::infrastructure::ports::{LocationRepo, RepoError};

/// Location entity operations.
///
/// Read side of the location store: a location's own record and the
/// locations its exits lead to.
pub struct Location {
    repo: Arc<dyn LocationRepo>,
}

impl Location {
    pub fn new(repo: Arc<dyn LocationRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: LocationId) -> Result<Option<domain::Location>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn save(&self, location: &domain::Location) -> Result<(), RepoError> {
        self.repo.save(location).await
    }

    /// Resolve each exit's target location, best effort.
    ///
    /// Missing targets and per-exit lookup failures are logged and skipped;
    /// a neighbor that cannot be resolved never fails the caller.
    pub async fn resolve_neighbors(&self, location: &domain::Location) -> Vec<NeighborLocation> {
        let mut neighbors = Vec::with_capacity(location.exits.len());

        for exit in &location.exits {
            match self.repo.get(exit.to_location).await {
                Ok(Some(target)) => neighbors.push(NeighborLocation {
                    direction: exit.direction.clone(),
                    location: target,
                }),
                Ok(None) => tracing::debug!(
                    from_location = %location.id,
                    to_location = %exit.to_location,
                    "Exit target not found, skipping neighbor"
                ),
                Err(e) => tracing::warn!(
                    from_location = %location.id,
                    to_location = %exit.to_location,
                    error = %e,
                    "Failed to resolve exit target, skipping neighbor"
                ),
            }
        }

        neighbors
    }
}
