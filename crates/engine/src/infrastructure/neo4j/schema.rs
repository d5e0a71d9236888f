//! Neo4j schema initialization - constraints and indexes.

use neo4rs::query;

use crate::infrastructure::neo4j::Neo4jGraph;

/// Initialize Neo4j schema with required constraints and indexes.
///
/// This should be called once on startup. Constraints are created with
/// IF NOT EXISTS to be idempotent.
pub async fn ensure_schema(graph: &Neo4jGraph) -> Result<(), neo4rs::Error> {
    graph
        .run(query(
            "CREATE CONSTRAINT realm_id_unique IF NOT EXISTS
             FOR (r:Realm) REQUIRE r.id IS UNIQUE",
        ))
        .await?;

    graph
        .run(query(
            "CREATE CONSTRAINT location_id_unique IF NOT EXISTS
             FOR (l:Location) REQUIRE l.id IS UNIQUE",
        ))
        .await?;

    graph
        .run(query(
            "CREATE CONSTRAINT description_layer_id_unique IF NOT EXISTS
             FOR (d:DescriptionLayer) REQUIRE d.id IS UNIQUE",
        ))
        .await?;

    // Every resolution starts from (scope_id, layer_type).
    graph
        .run(query(
            "CREATE INDEX description_layer_scope IF NOT EXISTS
             FOR (d:DescriptionLayer) ON (d.scope_id, d.layer_type)",
        ))
        .await?;

    tracing::info!("Neo4j schema initialized (constraints and indexes ensured)");
    Ok(())
}
