//! Neo4j database implementations.

use std::sync::Arc;

mod graph;
mod helpers;
mod layer_repo;
mod location_repo;
mod realm_repo;
mod schema;

pub use graph::{Neo4jGraph, Neo4jRowStream};
pub use layer_repo::Neo4jLayerRepo;
pub use location_repo::Neo4jLocationRepo;
pub use realm_repo::Neo4jRealmRepo;
pub use schema::ensure_schema;

/// Create all Neo4j repositories from a graph connection.
pub struct Neo4jRepositories {
    pub realm: Arc<Neo4jRealmRepo>,
    pub layer: Arc<Neo4jLayerRepo>,
    pub location: Arc<Neo4jLocationRepo>,
}

impl Neo4jRepositories {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self {
            realm: Arc::new(Neo4jRealmRepo::new(graph.clone())),
            layer: Arc::new(Neo4jLayerRepo::new(graph.clone())),
            location: Arc::new(Neo4jLocationRepo::new(graph)),
        }
    }
}
