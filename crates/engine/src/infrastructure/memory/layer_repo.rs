//! In-memory description layer store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use realmlore_domain::{DescriptionLayer, LayerId, LayerScope, LayerType, LocationId};

use crate::infrastructure::ports::{LayerRepo, RepoError};

/// Layer store keyed by id; iteration order is id order, so listings are stable.
#[derive(Default)]
pub struct InMemoryLayerRepo {
    layers: RwLock<BTreeMap<LayerId, DescriptionLayer>>,
}

impl InMemoryLayerRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.layers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.layers.read().await.is_empty()
    }
}

#[async_trait]
impl LayerRepo for InMemoryLayerRepo {
    async fn get(&self, id: LayerId) -> Result<Option<DescriptionLayer>, RepoError> {
        Ok(self.layers.read().await.get(&id).cloned())
    }

    async fn insert(&self, layer: &DescriptionLayer) -> Result<(), RepoError> {
        let mut layers = self.layers.write().await;
        if layers.contains_key(&layer.id) {
            return Err(RepoError::constraint(format!(
                "DescriptionLayer {} already exists",
                layer.id
            )));
        }
        layers.insert(layer.id, layer.clone());
        Ok(())
    }

    async fn update(&self, layer: &DescriptionLayer) -> Result<(), RepoError> {
        let mut layers = self.layers.write().await;
        match layers.get_mut(&layer.id) {
            Some(existing) => {
                *existing = layer.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("DescriptionLayer", layer.id)),
        }
    }

    async fn delete(&self, id: LayerId) -> Result<bool, RepoError> {
        Ok(self.layers.write().await.remove(&id).is_some())
    }

    async fn list_for_scope(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        Ok(self
            .layers
            .read()
            .await
            .values()
            .filter(|layer| layer.scope == scope && layer.layer_type == layer_type)
            .cloned()
            .collect())
    }

    async fn list_for_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        let scope = LayerScope::Location(location_id);
        Ok(self
            .layers
            .read()
            .await
            .values()
            .filter(|layer| layer.scope == scope)
            .cloned()
            .collect())
    }
}
