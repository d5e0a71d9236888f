//! Neo4j realm graph repository.
//!
//! # Graph shape
//! - `(:Realm {id, name, realm_type, scope, narrative_tags})`, tags as a JSON array
//! - `(child:Realm|Location)-[:WITHIN]->(:Realm)`
//! - `(entity:Realm|Location)-[:MEMBER_OF]->(:Realm)`
//! - `(:Realm)-[:BORDERS]->(:Realm)`
//! - `(:Realm)-[:ROUTE {label}]->(:Realm)`
//! - `(:Realm)-[:POLITICAL {relation}]->(:Realm)`

use std::collections::BTreeSet;

use async_trait::async_trait;
use neo4rs::{query, Row};
use uuid::Uuid;

use realmlore_domain::{PoliticalEdge, PoliticalRelation, Realm, RealmId, RouteEdge};

use super::helpers::{fetch_all, fetch_one, merge_edge, NodeExt, RowExt};
use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::{RealmRepo, RepoError};

pub struct Neo4jRealmRepo {
    graph: Neo4jGraph,
}

impl Neo4jRealmRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }

    fn row_to_realm(row: &Row) -> Result<Realm, RepoError> {
        let node = row.node("r")?;

        let id = RealmId::from_uuid(node.get_uuid("id")?);
        let name = node.get_string_strict("name")?;
        let realm_type = node
            .get_string_strict("realm_type")?
            .parse()
            .map_err(|e| RepoError::database("parse", e))?;
        let scope = node
            .get_string_strict("scope")?
            .parse()
            .map_err(|e| RepoError::database("parse", e))?;
        let narrative_tags: BTreeSet<String> = node.get_json_or_default("narrative_tags")?;

        Ok(Realm {
            id,
            name,
            realm_type,
            scope,
            narrative_tags,
        })
    }

    fn row_to_realm_id(row: &Row, column: &str) -> Result<RealmId, RepoError> {
        let raw = row.get_string_strict(column)?;
        raw.parse()
            .map_err(|e| RepoError::database("parse", format!("Invalid realm id '{}': {}", raw, e)))
    }

    async fn list_realms(
        &self,
        operation: &'static str,
        cypher: &str,
        id: Uuid,
    ) -> Result<Vec<Realm>, RepoError> {
        let q = query(cypher).param("id", id.to_string());
        fetch_all(&self.graph, operation, q)
            .await?
            .iter()
            .map(Self::row_to_realm)
            .collect()
    }
}

#[async_trait]
impl RealmRepo for Neo4jRealmRepo {
    async fn get(&self, id: RealmId) -> Result<Option<Realm>, RepoError> {
        let q = query("MATCH (r:Realm {id: $id}) RETURN r").param("id", id.to_string());
        fetch_one(&self.graph, "get_realm", q)
            .await?
            .map(|row| Self::row_to_realm(&row))
            .transpose()
    }

    async fn upsert(&self, realm: &Realm) -> Result<(), RepoError> {
        let tags = serde_json::to_string(&realm.narrative_tags)
            .map_err(RepoError::serialization)?;
        let q = query(
            "MERGE (r:Realm {id: $id})
             SET r.name = $name,
                 r.realm_type = $realm_type,
                 r.scope = $scope,
                 r.narrative_tags = $narrative_tags",
        )
        .param("id", realm.id.to_string())
        .param("name", realm.name.clone())
        .param("realm_type", realm.realm_type.as_str())
        .param("scope", realm.scope.as_str())
        .param("narrative_tags", tags);

        self.graph
            .run(q)
            .await
            .map_err(|e| RepoError::database("upsert_realm", e))?;
        tracing::debug!(realm_id = %realm.id, "Upserted realm");
        Ok(())
    }

    async fn delete(&self, id: RealmId) -> Result<bool, RepoError> {
        // DETACH DELETE drops every incident relationship, both directions.
        let q = query(
            "MATCH (r:Realm {id: $id})
             WITH r, r.id AS deleted_id
             DETACH DELETE r
             RETURN count(deleted_id) AS deleted",
        )
        .param("id", id.to_string());

        let deleted = match fetch_one(&self.graph, "delete_realm", q).await? {
            Some(row) => row
                .get::<i64>("deleted")
                .map_err(|e| RepoError::database("delete_realm", e))?,
            None => 0,
        };
        Ok(deleted > 0)
    }

    async fn list_within_parents(&self, child: Uuid) -> Result<Vec<RealmId>, RepoError> {
        let q = query(
            "MATCH (c {id: $id})-[:WITHIN]->(p:Realm)
             WHERE c:Realm OR c:Location
             RETURN p.id AS parent_id
             ORDER BY parent_id",
        )
        .param("id", child.to_string());

        fetch_all(&self.graph, "list_within_parents", q)
            .await?
            .iter()
            .map(|row| Self::row_to_realm_id(row, "parent_id"))
            .collect()
    }

    async fn insert_within_edge(&self, child: Uuid, parent: RealmId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (c {id: $child}) WHERE c:Realm OR c:Location
             MATCH (p:Realm {id: $parent})
             OPTIONAL MATCH (c)-[existing:WITHIN]->(p)
             WITH c, p, count(existing) > 0 AS existed
             MERGE (c)-[:WITHIN]->(p)
             RETURN existed",
        )
        .param("child", child.to_string())
        .param("parent", parent.to_string());

        merge_edge(&self.graph, "insert_within_edge", q, child).await
    }

    async fn insert_membership_edge(
        &self,
        entity: Uuid,
        realm: RealmId,
    ) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (e {id: $entity}) WHERE e:Realm OR e:Location
             MATCH (r:Realm {id: $realm})
             OPTIONAL MATCH (e)-[existing:MEMBER_OF]->(r)
             WITH e, r, count(existing) > 0 AS existed
             MERGE (e)-[:MEMBER_OF]->(r)
             RETURN existed",
        )
        .param("entity", entity.to_string())
        .param("realm", realm.to_string());

        merge_edge(&self.graph, "insert_membership_edge", q, entity).await
    }

    async fn list_memberships(&self, entity: Uuid) -> Result<Vec<Realm>, RepoError> {
        self.list_realms(
            "list_memberships",
            "MATCH (e {id: $id})-[:MEMBER_OF]->(r:Realm)
             RETURN r ORDER BY r.id",
            entity,
        )
        .await
    }

    async fn insert_border_edge(&self, from: RealmId, to: RealmId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (a:Realm {id: $from})
             MATCH (b:Realm {id: $to})
             OPTIONAL MATCH (a)-[existing:BORDERS]->(b)
             WITH a, b, count(existing) > 0 AS existed
             MERGE (a)-[:BORDERS]->(b)
             RETURN existed",
        )
        .param("from", from.to_string())
        .param("to", to.to_string());

        merge_edge(&self.graph, "insert_border_edge", q, from).await
    }

    async fn list_bordering(&self, realm: RealmId) -> Result<Vec<Realm>, RepoError> {
        self.list_realms(
            "list_bordering",
            "MATCH (:Realm {id: $id})-[:BORDERS]->(r:Realm)
             RETURN r ORDER BY r.id",
            realm.to_uuid(),
        )
        .await
    }

    async fn insert_route_edge(&self, edge: &RouteEdge) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (a:Realm {id: $from})
             MATCH (b:Realm {id: $to})
             OPTIONAL MATCH (a)-[existing:ROUTE {label: $label}]->(b)
             WITH a, b, count(existing) > 0 AS existed
             MERGE (a)-[:ROUTE {label: $label}]->(b)
             RETURN existed",
        )
        .param("from", edge.from.to_string())
        .param("to", edge.to.to_string())
        .param("label", edge.label.clone());

        merge_edge(&self.graph, "insert_route_edge", q, edge.from).await
    }

    async fn list_routes_from(&self, realm: RealmId) -> Result<Vec<RouteEdge>, RepoError> {
        let q = query(
            "MATCH (:Realm {id: $id})-[e:ROUTE]->(b:Realm)
             RETURN b.id AS to_id, e.label AS label
             ORDER BY to_id, label",
        )
        .param("id", realm.to_string());

        fetch_all(&self.graph, "list_routes_from", q)
            .await?
            .iter()
            .map(|row| {
                Ok(RouteEdge {
                    from: realm,
                    to: Self::row_to_realm_id(row, "to_id")?,
                    label: row.get_string_strict("label")?,
                })
            })
            .collect()
    }

    async fn insert_political_edge(&self, edge: &PoliticalEdge) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (a:Realm {id: $from})
             MATCH (b:Realm {id: $to})
             OPTIONAL MATCH (a)-[existing:POLITICAL {relation: $relation}]->(b)
             WITH a, b, count(existing) > 0 AS existed
             MERGE (a)-[:POLITICAL {relation: $relation}]->(b)
             RETURN existed",
        )
        .param("from", edge.from.to_string())
        .param("to", edge.to.to_string())
        .param("relation", edge.relation.as_str());

        merge_edge(&self.graph, "insert_political_edge", q, edge.from).await
    }

    async fn list_political_from(&self, realm: RealmId) -> Result<Vec<PoliticalEdge>, RepoError> {
        let q = query(
            "MATCH (:Realm {id: $id})-[e:POLITICAL]->(b:Realm)
             RETURN b.id AS to_id, e.relation AS relation
             ORDER BY to_id, relation",
        )
        .param("id", realm.to_string());

        fetch_all(&self.graph, "list_political_from", q)
            .await?
            .iter()
            .map(|row| {
                let relation: PoliticalRelation = row
                    .get_string_strict("relation")?
                    .parse()
                    .map_err(|e| RepoError::database("parse", e))?;
                Ok(PoliticalEdge {
                    from: realm,
                    to: Self::row_to_realm_id(row, "to_id")?,
                    relation,
                })
            })
            .collect()
    }
}
