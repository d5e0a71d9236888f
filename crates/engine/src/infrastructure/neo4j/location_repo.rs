//! Neo4j location repository.
//!
//! Only the fields the description engine reads are stored here. Exits are
//! kept as a JSON array on the node, so a save never needs the targets to
//! exist yet.

use async_trait::async_trait;
use neo4rs::{query, Row};
use realmlore_domain::{Location, LocationExit, LocationId};

use super::helpers::{fetch_one, NodeExt, RowExt};
use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::{LocationRepo, RepoError};

pub struct Neo4jLocationRepo {
    graph: Neo4jGraph,
}

impl Neo4jLocationRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }

    fn row_to_location(row: &Row) -> Result<Location, RepoError> {
        let node = row.node("l")?;
        let exits: Vec<LocationExit> = node.get_json_or_default("exits")?;

        Ok(Location {
            id: LocationId::from_uuid(node.get_uuid("id")?),
            name: node.get_string_strict("name")?,
            description: node.get_optional_string("description"),
            exits,
        })
    }
}

#[async_trait]
impl LocationRepo for Neo4jLocationRepo {
    async fn get(&self, id: LocationId) -> Result<Option<Location>, RepoError> {
        let q = query("MATCH (l:Location {id: $id}) RETURN l").param("id", id.to_string());
        fetch_one(&self.graph, "get_location", q)
            .await?
            .map(|row| Self::row_to_location(&row))
            .transpose()
    }

    async fn save(&self, location: &Location) -> Result<(), RepoError> {
        let exits = serde_json::to_string(&location.exits).map_err(RepoError::serialization)?;
        let q = query(
            "MERGE (l:Location {id: $id})
             SET l.name = $name,
                 l.description = $description,
                 l.exits = $exits",
        )
        .param("id", location.id.to_string())
        .param("name", location.name.clone())
        .param("description", location.description.clone().unwrap_or_default())
        .param("exits", exits);

        self.graph
            .run(q)
            .await
            .map_err(|e| RepoError::database("save_location", e))?;
        tracing::debug!(location_id = %location.id, "Saved location");
        Ok(())
    }
}
