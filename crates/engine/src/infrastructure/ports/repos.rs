//! Repository port traits for store access.
//!
//! These contracts are deliberately narrow: primitive reads and idempotent
//! writes. Graph algorithms (cycle checks, breadth-first containment walks)
//! and temporal resolution live above the ports so every backend gets the
//! same semantics.

use async_trait::async_trait;
use realmlore_domain::{
    DescriptionLayer, LayerId, LayerScope, LayerType, Location, LocationId, PoliticalEdge, Realm,
    RealmId, RouteEdge,
};
use uuid::Uuid;

use super::error::RepoError;

// =============================================================================
// Realm Graph Storage
// =============================================================================

/// Realm vertices plus the five edge categories.
///
/// Edge writes return `true` when the edge was created and `false` when it
/// already existed. Containment children and membership entities are raw
/// UUIDs because both locations and realms can sit inside a realm.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealmRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: RealmId) -> Result<Option<Realm>, RepoError>;
    async fn upsert(&self, realm: &Realm) -> Result<(), RepoError>;
    /// Remove the vertex and purge every incident edge in both directions.
    /// Returns `false` when the realm did not exist.
    async fn delete(&self, id: RealmId) -> Result<bool, RepoError>;

    // Containment (child -> parent)
    async fn list_within_parents(&self, child: Uuid) -> Result<Vec<RealmId>, RepoError>;
    async fn insert_within_edge(&self, child: Uuid, parent: RealmId) -> Result<bool, RepoError>;

    // Membership (entity -> realm)
    async fn insert_membership_edge(
        &self,
        entity: Uuid,
        realm: RealmId,
    ) -> Result<bool, RepoError>;
    async fn list_memberships(&self, entity: Uuid) -> Result<Vec<Realm>, RepoError>;

    // Borders (one direction per call)
    async fn insert_border_edge(&self, from: RealmId, to: RealmId) -> Result<bool, RepoError>;
    async fn list_bordering(&self, realm: RealmId) -> Result<Vec<Realm>, RepoError>;

    // Routes
    async fn insert_route_edge(&self, edge: &RouteEdge) -> Result<bool, RepoError>;
    async fn list_routes_from(&self, realm: RealmId) -> Result<Vec<RouteEdge>, RepoError>;

    // Political relations
    async fn insert_political_edge(&self, edge: &PoliticalEdge) -> Result<bool, RepoError>;
    async fn list_political_from(&self, realm: RealmId) -> Result<Vec<PoliticalEdge>, RepoError>;
}

// =============================================================================
// Description Layer Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LayerRepo: Send + Sync {
    async fn get(&self, id: LayerId) -> Result<Option<DescriptionLayer>, RepoError>;
    /// Append a new layer version.
    async fn insert(&self, layer: &DescriptionLayer) -> Result<(), RepoError>;
    /// Overwrite an existing layer. Fails with `NotFound` if the id is unknown.
    async fn update(&self, layer: &DescriptionLayer) -> Result<(), RepoError>;
    async fn delete(&self, id: LayerId) -> Result<bool, RepoError>;

    /// Every layer of one type bound to a scope, regardless of interval.
    async fn list_for_scope(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
    ) -> Result<Vec<DescriptionLayer>, RepoError>;

    /// Every layer bound to `loc:<location_id>`, all types, regardless of interval.
    async fn list_for_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<DescriptionLayer>, RepoError>;
}

// =============================================================================
// Location Storage (read side)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepo: Send + Sync {
    async fn get(&self, id: LocationId) -> Result<Option<Location>, RepoError>;
    async fn save(&self, location: &Location) -> Result<(), RepoError>;
}
