//! In-memory realm graph store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use realmlore_domain::{PoliticalEdge, Realm, RealmId, RouteEdge};

use crate::infrastructure::ports::{RealmRepo, RepoError};

#[derive(Default)]
struct RealmGraphState {
    realms: HashMap<RealmId, Realm>,
    // Edge lists keep insertion order so walks are reproducible.
    within: Vec<(Uuid, RealmId)>,
    membership: Vec<(Uuid, RealmId)>,
    borders: Vec<(RealmId, RealmId)>,
    routes: Vec<RouteEdge>,
    political: Vec<PoliticalEdge>,
}

impl RealmGraphState {
    fn realms_for(&self, ids: impl Iterator<Item = RealmId>) -> Vec<Realm> {
        ids.filter_map(|id| self.realms.get(&id).cloned()).collect()
    }
}

/// Realm store kept entirely in process memory.
#[derive(Default)]
pub struct InMemoryRealmRepo {
    state: RwLock<RealmGraphState>,
}

impl InMemoryRealmRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RealmRepo for InMemoryRealmRepo {
    async fn get(&self, id: RealmId) -> Result<Option<Realm>, RepoError> {
        Ok(self.state.read().await.realms.get(&id).cloned())
    }

    async fn upsert(&self, realm: &Realm) -> Result<(), RepoError> {
        self.state
            .write()
            .await
            .realms
            .insert(realm.id, realm.clone());
        Ok(())
    }

    async fn delete(&self, id: RealmId) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        let existed = state.realms.remove(&id).is_some();
        let vertex = id.to_uuid();

        state
            .within
            .retain(|(child, parent)| *child != vertex && *parent != id);
        state
            .membership
            .retain(|(entity, realm)| *entity != vertex && *realm != id);
        state.borders.retain(|(from, to)| *from != id && *to != id);
        state.routes.retain(|edge| edge.from != id && edge.to != id);
        state.political.retain(|edge| edge.from != id && edge.to != id);

        Ok(existed)
    }

    async fn list_within_parents(&self, child: Uuid) -> Result<Vec<RealmId>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .within
            .iter()
            .filter(|(c, _)| *c == child)
            .map(|(_, parent)| *parent)
            .collect())
    }

    async fn insert_within_edge(&self, child: Uuid, parent: RealmId) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        if state.within.contains(&(child, parent)) {
            return Ok(false);
        }
        state.within.push((child, parent));
        Ok(true)
    }

    async fn insert_membership_edge(
        &self,
        entity: Uuid,
        realm: RealmId,
    ) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        if state.membership.contains(&(entity, realm)) {
            return Ok(false);
        }
        state.membership.push((entity, realm));
        Ok(true)
    }

    async fn list_memberships(&self, entity: Uuid) -> Result<Vec<Realm>, RepoError> {
        let state = self.state.read().await;
        let ids = state
            .membership
            .iter()
            .filter(|(e, _)| *e == entity)
            .map(|(_, realm)| *realm);
        Ok(state.realms_for(ids))
    }

    async fn insert_border_edge(&self, from: RealmId, to: RealmId) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        if state.borders.contains(&(from, to)) {
            return Ok(false);
        }
        state.borders.push((from, to));
        Ok(true)
    }

    async fn list_bordering(&self, realm: RealmId) -> Result<Vec<Realm>, RepoError> {
        let state = self.state.read().await;
        let ids = state
            .borders
            .iter()
            .filter(|(from, _)| *from == realm)
            .map(|(_, to)| *to);
        Ok(state.realms_for(ids))
    }

    async fn insert_route_edge(&self, edge: &RouteEdge) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        if state.routes.contains(edge) {
            return Ok(false);
        }
        state.routes.push(edge.clone());
        Ok(true)
    }

    async fn list_routes_from(&self, realm: RealmId) -> Result<Vec<RouteEdge>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .routes
            .iter()
            .filter(|edge| edge.from == realm)
            .cloned()
            .collect())
    }

    async fn insert_political_edge(&self, edge: &PoliticalEdge) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        if state.political.contains(edge) {
            return Ok(false);
        }
        state.political.push(*edge);
        Ok(true)
    }

    async fn list_political_from(&self, realm: RealmId) -> Result<Vec<PoliticalEdge>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .political
            .iter()
            .filter(|edge| edge.from == realm)
            .copied()
            .collect())
    }
}
