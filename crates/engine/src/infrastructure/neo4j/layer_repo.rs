//! Neo4j description layer repository.
//!
//! Layers are standalone `:DescriptionLayer` nodes keyed by `scope_id`
//! (`loc:<uuid>` / `realm:<uuid>`). Metadata and attributes are stored as JSON
//! strings; an open-ended `effective_to_tick` is stored as `-1`.

use async_trait::async_trait;
use neo4rs::{query, Query, Row};
use realmlore_domain::{DescriptionLayer, LayerId, LayerScope, LayerType, LocationId};

use super::helpers::{fetch_all, fetch_one, optional_tick_to_i64, tick_to_i64, NodeExt, RowExt};
use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::{LayerRepo, RepoError};

const LAYER_PROPERTIES: &str = "l.scope_id = $scope_id,
                 l.layer_type = $layer_type,
                 l.value = $value,
                 l.effective_from_tick = $effective_from_tick,
                 l.effective_to_tick = $effective_to_tick,
                 l.authored_at = $authored_at,
                 l.priority = $priority,
                 l.metadata = $metadata,
                 l.attributes = $attributes";

pub struct Neo4jLayerRepo {
    graph: Neo4jGraph,
}

impl Neo4jLayerRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }

    fn bind_layer(q: Query, layer: &DescriptionLayer) -> Result<Query, RepoError> {
        let metadata =
            serde_json::to_string(&layer.metadata).map_err(RepoError::serialization)?;
        let attributes =
            serde_json::to_string(&layer.attributes).map_err(RepoError::serialization)?;

        Ok(q.param("id", layer.id.to_string())
            .param("scope_id", layer.scope.to_string())
            .param("layer_type", layer.layer_type.as_str())
            .param("value", layer.value.clone())
            .param("effective_from_tick", tick_to_i64(layer.effective_from_tick))
            .param("effective_to_tick", optional_tick_to_i64(layer.effective_to_tick))
            .param("authored_at", layer.authored_at.to_rfc3339())
            .param("priority", i64::from(layer.priority))
            .param("metadata", metadata)
            .param("attributes", attributes))
    }

    fn row_to_layer(row: &Row) -> Result<DescriptionLayer, RepoError> {
        let node = row.node("l")?;

        let id = LayerId::from_uuid(node.get_uuid("id")?);
        let scope: LayerScope = node
            .get_string_strict("scope_id")?
            .parse()
            .map_err(|e| RepoError::database("parse", e))?;
        let layer_type: LayerType = node
            .get_string_strict("layer_type")?
            .parse()
            .map_err(|e| RepoError::database("parse", e))?;
        let priority = priority_from_i64(node.get_i64_or("priority", 0))?;

        Ok(DescriptionLayer {
            id,
            scope,
            layer_type,
            value: node.get_optional_string("value").unwrap_or_default(),
            effective_from_tick: node.get_optional_tick("effective_from_tick").unwrap_or(0),
            effective_to_tick: node.get_optional_tick("effective_to_tick"),
            authored_at: node.get_datetime_strict("authored_at")?,
            priority,
            metadata: node.get_json_or_default("metadata")?,
            attributes: node.get_json_or_default("attributes")?,
        })
    }

    async fn list(
        &self,
        operation: &'static str,
        q: Query,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        fetch_all(&self.graph, operation, q)
            .await?
            .iter()
            .map(Self::row_to_layer)
            .collect()
    }
}

/// Stored priorities are i64; anything outside `i32` is a corrupt record.
fn priority_from_i64(raw: i64) -> Result<i32, RepoError> {
    i32::try_from(raw).map_err(|e| {
        RepoError::database(
            "parse",
            format!("Invalid priority in field 'priority': {} (value: {})", e, raw),
        )
    })
}

#[async_trait]
impl LayerRepo for Neo4jLayerRepo {
    async fn get(&self, id: LayerId) -> Result<Option<DescriptionLayer>, RepoError> {
        let q = query("MATCH (l:DescriptionLayer {id: $id}) RETURN l").param("id", id.to_string());
        fetch_one(&self.graph, "get_layer", q)
            .await?
            .map(|row| Self::row_to_layer(&row))
            .transpose()
    }

    async fn insert(&self, layer: &DescriptionLayer) -> Result<(), RepoError> {
        let cypher = format!(
            "OPTIONAL MATCH (existing:DescriptionLayer {{id: $id}})
             WITH existing WHERE existing IS NULL
             CREATE (l:DescriptionLayer {{id: $id}})
             SET {}
             RETURN l.id AS id",
            LAYER_PROPERTIES
        );
        let q = Self::bind_layer(query(&cypher), layer)?;

        match fetch_one(&self.graph, "insert_layer", q).await? {
            Some(_) => Ok(()),
            None => Err(RepoError::constraint(format!(
                "DescriptionLayer {} already exists",
                layer.id
            ))),
        }
    }

    async fn update(&self, layer: &DescriptionLayer) -> Result<(), RepoError> {
        let cypher = format!(
            "MATCH (l:DescriptionLayer {{id: $id}})
             SET {}
             RETURN l.id AS id",
            LAYER_PROPERTIES
        );
        let q = Self::bind_layer(query(&cypher), layer)?;

        match fetch_one(&self.graph, "update_layer", q).await? {
            Some(_) => Ok(()),
            None => Err(RepoError::not_found("DescriptionLayer", layer.id)),
        }
    }

    async fn delete(&self, id: LayerId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (l:DescriptionLayer {id: $id})
             WITH l, l.id AS deleted_id
             DELETE l
             RETURN count(deleted_id) AS deleted",
        )
        .param("id", id.to_string());

        let deleted = match fetch_one(&self.graph, "delete_layer", q).await? {
            Some(row) => row
                .get::<i64>("deleted")
                .map_err(|e| RepoError::database("delete_layer", e))?,
            None => 0,
        };
        Ok(deleted > 0)
    }

    async fn list_for_scope(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        let q = query(
            "MATCH (l:DescriptionLayer {scope_id: $scope_id, layer_type: $layer_type})
             RETURN l ORDER BY l.id",
        )
        .param("scope_id", scope.to_string())
        .param("layer_type", layer_type.as_str());

        self.list("list_layers_for_scope", q).await
    }

    async fn list_for_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        let q = query(
            "MATCH (l:DescriptionLayer {scope_id: $scope_id})
             RETURN l ORDER BY l.id",
        )
        .param("scope_id", LayerScope::Location(location_id).to_string());

        self.list("list_layers_for_location", q).await
    }
}
