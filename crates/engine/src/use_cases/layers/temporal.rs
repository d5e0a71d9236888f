//! Temporal layer store.

use std::cmp::Ordering;
use std::sync::Arc;

use realmlore_domain::{
    DescriptionLayer, LayerId, LayerMetadata, LayerScope, LayerType, LocationId,
    RealmId,
};

use crate::infrastructure::ports::{ClockPort, LayerRepo, RepoError, TelemetryEvent, TelemetryPort};
use crate::use_cases::realm_context::RealmContextService;

#[derive(Debug, thiserror::Error)]
pub enum LayerStoreError {
    #[error("Invalid layer interval: to tick {to} precedes from tick {from}")]
    InvalidInterval { from: u64, to: u64 },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Where a location lookup found its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    Location,
    /// Found on a containing realm during hierarchical fallback
    Realm(RealmId),
}

impl LayerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Realm(_) => "realm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayer {
    pub layer: DescriptionLayer,
    pub source: LayerSource,
}

/// Newest authored wins. Identical `authored_at` falls back to the later
/// `effective_from_tick`, then the larger layer id, so the pick never
/// depends on store order.
fn resolution_order(a: &DescriptionLayer, b: &DescriptionLayer) -> Ordering {
    a.authored_at
        .cmp(&b.authored_at)
        .then(a.effective_from_tick.cmp(&b.effective_from_tick))
        .then(a.id.cmp(&b.id))
}

/// Scoped, typed, interval-bounded layer storage.
///
/// Layer writes never read or modify existing layers, so concurrent writers
/// for one scope need no coordination: resolution is deterministic whatever
/// the arrival order.
pub struct TemporalLayerStore {
    layers: Arc<dyn LayerRepo>,
    realm_context: Arc<RealmContextService>,
    telemetry: Arc<dyn TelemetryPort>,
    clock: Arc<dyn ClockPort>,
}

impl TemporalLayerStore {
    pub fn new(
        layers: Arc<dyn LayerRepo>,
        realm_context: Arc<RealmContextService>,
        telemetry: Arc<dyn TelemetryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            layers,
            realm_context,
            telemetry,
            clock,
        }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// The single active layer for `(scope, layer_type)` at `tick`, if any.
    pub async fn find_active_layer(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
        tick: u64,
    ) -> Result<Option<DescriptionLayer>, RepoError> {
        let candidates = self.layers.list_for_scope(scope, layer_type).await?;
        Ok(candidates
            .into_iter()
            .filter(|layer| layer.is_active_at(tick))
            .max_by(resolution_order))
    }

    /// Resolve a layer for a location, falling back through its realms.
    ///
    /// The location's own scope always wins. Otherwise containing realms are
    /// probed in ascending scope rank (LOCAL first) and the first hit is
    /// returned. If the containment chain cannot be resolved, the lookup
    /// degrades to location-only and returns `None`.
    pub async fn get_active_layer_for_location(
        &self,
        location_id: LocationId,
        layer_type: LayerType,
        tick: u64,
    ) -> Result<Option<ResolvedLayer>, RepoError> {
        if let Some(layer) = self
            .find_active_layer(LayerScope::Location(location_id), layer_type, tick)
            .await?
        {
            return Ok(Some(self.resolved(location_id, tick, layer, LayerSource::Location)));
        }

        let mut realms = match self
            .realm_context
            .get_containing_realms(location_id, None)
            .await
        {
            Ok(realms) => realms,
            Err(e) => {
                tracing::warn!(
                    location_id = %location_id,
                    layer_type = %layer_type,
                    error = %e,
                    "Containment chain unavailable, skipping realm fallback"
                );
                return Ok(None);
            }
        };
        // Stable: realms sharing a rank keep their chain order.
        realms.sort_by_key(|realm| realm.scope);

        for realm in realms {
            if let Some(layer) = self
                .find_active_layer(LayerScope::Realm(realm.id), layer_type, tick)
                .await?
            {
                return Ok(Some(self.resolved(
                    location_id,
                    tick,
                    layer,
                    LayerSource::Realm(realm.id),
                )));
            }
        }

        tracing::debug!(
            location_id = %location_id,
            layer_type = %layer_type,
            tick,
            "No active layer for location or its realms"
        );
        Ok(None)
    }

    fn resolved(
        &self,
        location_id: LocationId,
        tick: u64,
        layer: DescriptionLayer,
        source: LayerSource,
    ) -> ResolvedLayer {
        self.telemetry.record(
            TelemetryEvent::new(TelemetryEvent::LAYER_RESOLVED)
                .with("location_id", location_id.to_string())
                .with("layer_id", layer.id.to_string())
                .with("layer_type", layer.layer_type.as_str())
                .with("tick", tick)
                .with("source", source.as_str()),
        );
        ResolvedLayer { layer, source }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write a new layer covering `[from_tick, to_tick]`.
    ///
    /// Always creates a new layer. Prior overlapping layers are left alone;
    /// callers wanting exclusivity must bound the prior layer themselves.
    pub async fn set_layer_interval(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
        from_tick: u64,
        to_tick: Option<u64>,
        value: impl Into<String>,
        metadata: LayerMetadata,
    ) -> Result<DescriptionLayer, LayerStoreError> {
        let layer = DescriptionLayer::new(scope, layer_type, value, self.clock.now())
            .with_interval(from_tick, to_tick)
            .with_metadata(metadata);
        self.add_layer(&layer).await?;
        Ok(layer)
    }

    /// Open-ended location layer effective from `tick`.
    pub async fn set_layer_for_location(
        &self,
        location_id: LocationId,
        layer_type: LayerType,
        tick: u64,
        value: impl Into<String>,
        metadata: LayerMetadata,
    ) -> Result<DescriptionLayer, LayerStoreError> {
        self.set_layer_interval(location_id.into(), layer_type, tick, None, value, metadata)
            .await
    }

    /// Open-ended realm layer effective from `tick`.
    pub async fn set_layer_for_realm(
        &self,
        realm_id: RealmId,
        layer_type: LayerType,
        tick: u64,
        value: impl Into<String>,
        metadata: LayerMetadata,
    ) -> Result<DescriptionLayer, LayerStoreError> {
        self.set_layer_interval(realm_id.into(), layer_type, tick, None, value, metadata)
            .await
    }

    /// Insert a fully built layer (priority and attributes included).
    pub async fn add_layer(&self, layer: &DescriptionLayer) -> Result<(), LayerStoreError> {
        validate_interval(layer)?;
        self.layers.insert(layer).await?;

        self.telemetry.record(
            TelemetryEvent::new(TelemetryEvent::LAYER_INTERVAL_SET)
                .with("scope_id", layer.scope.to_string())
                .with("layer_type", layer.layer_type.as_str())
                .with("from_tick", layer.effective_from_tick)
                .with("open_ended", layer.effective_to_tick.is_none()),
        );
        tracing::debug!(
            layer_id = %layer.id,
            scope_id = %layer.scope,
            layer_type = %layer.layer_type,
            "Layer written"
        );
        Ok(())
    }

    /// Replace a stored layer in place, e.g. to bound its `effective_to_tick`.
    pub async fn update_layer(&self, layer: &DescriptionLayer) -> Result<(), LayerStoreError> {
        validate_interval(layer)?;
        self.layers.update(layer).await?;
        Ok(())
    }

    pub async fn delete_layer(&self, id: LayerId) -> Result<bool, RepoError> {
        self.layers.delete(id).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_layer(&self, id: LayerId) -> Result<Option<DescriptionLayer>, RepoError> {
        self.layers.get(id).await
    }

    /// Every layer attached to the location, all types, no tick filter.
    pub async fn get_layers_for_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        self.layers.list_for_location(location_id).await
    }

    /// Layers whose interval overlaps `[start_tick, end_tick]`, ascending by
    /// `effective_from_tick`. Missing bounds are unbounded.
    pub async fn query_layer_history(
        &self,
        scope: LayerScope,
        layer_type: LayerType,
        start_tick: Option<u64>,
        end_tick: Option<u64>,
    ) -> Result<Vec<DescriptionLayer>, RepoError> {
        let mut history: Vec<_> = self
            .layers
            .list_for_scope(scope, layer_type)
            .await?
            .into_iter()
            .filter(|layer| layer.overlaps(start_tick, end_tick))
            .collect();
        history.sort_by(|a, b| {
            a.effective_from_tick
                .cmp(&b.effective_from_tick)
                .then(a.authored_at.cmp(&b.authored_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(history)
    }
}

fn validate_interval(layer: &DescriptionLayer) -> Result<(), LayerStoreError> {
    match layer.effective_to_tick {
        Some(to) if to < layer.effective_from_tick => Err(LayerStoreError::InvalidInterval {
            from: layer.effective_from_tick,
            to,
        }),
        _ => Ok(()),
    }
}
