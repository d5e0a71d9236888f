//! Realm graph entity operations.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use realmlore_domain::{
    BorderEdgeOutcome, EdgeOutcome, PoliticalEdge, PoliticalRelation, Realm, RealmId, RouteEdge,
};

use crate::infrastructure::ports::{RealmRepo, RepoError};

/// Hard cap on upward containment walks. Guards against corrupted cyclic data.
pub const DEFAULT_CHAIN_DEPTH_CAP: usize = 50;

/// Errors from realm graph mutations.
#[derive(Debug, thiserror::Error)]
pub enum RealmGraphError {
    #[error("Self-referential {edge} edge on {id}")]
    SelfReference { edge: &'static str, id: Uuid },
    #[error("Containment edge {child} -> {parent} would create a cycle")]
    CycleDetected { child: Uuid, parent: RealmId },
    #[error("Route label cannot be empty")]
    EmptyRouteLabel,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl RealmGraphError {
    /// True for invariant violations (as opposed to store failures).
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

/// Realm graph operations.
///
/// Owns the graph invariants on top of the primitive [`RealmRepo`] port:
/// containment stays acyclic, borders stay reciprocal, routes stay labelled.
///
/// ## Containment writes
///
/// `add_within_edge` is read-then-write: it walks the parent's ancestors and
/// only then inserts. Writes through the same `RealmGraph` are serialized by
/// an async mutex, so interlocking `A -> B` / `B -> A` calls cannot both pass
/// the cycle check. Writers in other processes are not covered; they need a
/// transactional primitive in the backing store.
pub struct RealmGraph {
    repo: Arc<dyn RealmRepo>,
    depth_cap: usize,
    within_writes: Mutex<()>,
}

impl RealmGraph {
    pub fn new(repo: Arc<dyn RealmRepo>) -> Self {
        Self::with_depth_cap(repo, DEFAULT_CHAIN_DEPTH_CAP)
    }

    pub fn with_depth_cap(repo: Arc<dyn RealmRepo>, depth_cap: usize) -> Self {
        Self {
            repo,
            depth_cap,
            within_writes: Mutex::new(()),
        }
    }

    pub fn depth_cap(&self) -> usize {
        self.depth_cap
    }

    // =========================================================================
    // Vertices
    // =========================================================================

    pub async fn get(&self, id: RealmId) -> Result<Option<Realm>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn upsert(&self, realm: &Realm) -> Result<(), RepoError> {
        self.repo.upsert(realm).await
    }

    /// Remove a realm and every incident edge, in both directions, across all
    /// edge categories. Returns `false` if the realm did not exist.
    pub async fn delete_realm(&self, id: RealmId) -> Result<bool, RepoError> {
        let deleted = self.repo.delete(id).await?;
        tracing::debug!(realm_id = %id, deleted, "Realm deleted with incident edges");
        Ok(deleted)
    }

    // =========================================================================
    // Containment
    // =========================================================================

    /// Place `child` (a location or realm) inside `parent`.
    pub async fn add_within_edge(
        &self,
        child: impl Into<Uuid>,
        parent: RealmId,
    ) -> Result<EdgeOutcome, RealmGraphError> {
        let child = child.into();
        if child == parent.to_uuid() {
            return Err(RealmGraphError::SelfReference {
                edge: "within",
                id: child,
            });
        }

        let _guard = self.within_writes.lock().await;

        if self.repo.list_within_parents(child).await?.contains(&parent) {
            return Ok(EdgeOutcome::AlreadyExists);
        }

        let ancestors = self.ancestor_ids(parent.to_uuid()).await?;
        if ancestors.iter().any(|id| id.to_uuid() == child) {
            tracing::warn!(
                child = %child,
                parent = %parent,
                "Rejected containment edge that would create a cycle"
            );
            return Err(RealmGraphError::CycleDetected { child, parent });
        }

        let created = self.repo.insert_within_edge(child, parent).await?;
        Ok(EdgeOutcome::from_created(created))
    }

    /// Breadth-first upward walk over WITHIN edges starting at `entity`.
    ///
    /// Nearest ancestors come first; order inside one BFS level follows the
    /// store and carries no meaning. Never contains `entity` itself, visits
    /// each realm once, and stops after `depth_cap` levels.
    pub async fn get_containment_chain(
        &self,
        entity: impl Into<Uuid>,
    ) -> Result<Vec<Realm>, RepoError> {
        let entity = entity.into();
        let ids = self.ancestor_ids(entity).await?;

        let mut chain = Vec::with_capacity(ids.len());
        for id in ids {
            match self.repo.get(id).await? {
                Some(realm) => chain.push(realm),
                None => tracing::warn!(
                    entity = %entity,
                    realm_id = %id,
                    "Containment edge points at a missing realm, skipping"
                ),
            }
        }
        Ok(chain)
    }

    async fn ancestor_ids(&self, start: Uuid) -> Result<Vec<RealmId>, RepoError> {
        let mut visited: HashSet<Uuid> = HashSet::from([start]);
        let mut frontier = vec![start];
        let mut ancestors = Vec::new();
        let mut depth = 0;

        while !frontier.is_empty() && depth < self.depth_cap {
            let mut next = Vec::new();
            for node in frontier {
                for parent in self.repo.list_within_parents(node).await? {
                    if visited.insert(parent.to_uuid()) {
                        ancestors.push(parent);
                        next.push(parent.to_uuid());
                    }
                }
            }
            frontier = next;
            depth += 1;
        }

        if !frontier.is_empty() {
            tracing::warn!(
                start = %start,
                depth_cap = self.depth_cap,
                "Containment walk hit the depth cap; chain truncated"
            );
        }

        Ok(ancestors)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    pub async fn add_membership_edge(
        &self,
        entity: impl Into<Uuid>,
        realm: RealmId,
    ) -> Result<EdgeOutcome, RealmGraphError> {
        let entity = entity.into();
        if entity == realm.to_uuid() {
            return Err(RealmGraphError::SelfReference {
                edge: "membership",
                id: entity,
            });
        }
        let created = self.repo.insert_membership_edge(entity, realm).await?;
        Ok(EdgeOutcome::from_created(created))
    }

    pub async fn get_memberships(&self, entity: impl Into<Uuid>) -> Result<Vec<Realm>, RepoError> {
        self.repo.list_memberships(entity.into()).await
    }

    // =========================================================================
    // Borders, routes, politics
    // =========================================================================

    /// Write `a -> b` and `b -> a`, reporting each direction separately.
    pub async fn add_border_edge(
        &self,
        a: RealmId,
        b: RealmId,
    ) -> Result<BorderEdgeOutcome, RealmGraphError> {
        if a == b {
            return Err(RealmGraphError::SelfReference {
                edge: "border",
                id: a.to_uuid(),
            });
        }
        let forward = self.repo.insert_border_edge(a, b).await?;
        let reverse = self.repo.insert_border_edge(b, a).await?;
        Ok(BorderEdgeOutcome {
            forward: EdgeOutcome::from_created(forward),
            reverse: EdgeOutcome::from_created(reverse),
        })
    }

    pub async fn get_bordering_realms(&self, realm: RealmId) -> Result<Vec<Realm>, RepoError> {
        self.repo.list_bordering(realm).await
    }

    pub async fn add_route_edge(
        &self,
        from: RealmId,
        to: RealmId,
        label: &str,
    ) -> Result<EdgeOutcome, RealmGraphError> {
        if from == to {
            return Err(RealmGraphError::SelfReference {
                edge: "route",
                id: from.to_uuid(),
            });
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(RealmGraphError::EmptyRouteLabel);
        }
        let edge = RouteEdge {
            from,
            to,
            label: label.to_string(),
        };
        let created = self.repo.insert_route_edge(&edge).await?;
        Ok(EdgeOutcome::from_created(created))
    }

    pub async fn get_routes(&self, from: RealmId) -> Result<Vec<RouteEdge>, RepoError> {
        self.repo.list_routes_from(from).await
    }

    pub async fn add_political_edge(
        &self,
        from: RealmId,
        to: RealmId,
        relation: PoliticalRelation,
    ) -> Result<EdgeOutcome, RealmGraphError> {
        if from == to {
            return Err(RealmGraphError::SelfReference {
                edge: "political",
                id: from.to_uuid(),
            });
        }
        let edge = PoliticalEdge { from, to, relation };
        let created = self.repo.insert_political_edge(&edge).await?;
        Ok(EdgeOutcome::from_created(created))
    }

    pub async fn get_political_relations(
        &self,
        from: RealmId,
    ) -> Result<Vec<PoliticalEdge>, RepoError> {
        self.repo.list_political_from(from).await
    }
}
