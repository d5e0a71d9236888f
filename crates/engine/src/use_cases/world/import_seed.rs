//! Apply a world seed through the validated graph and layer operations.

use std::sync::Arc;

use realmlore_domain::EdgeOutcome;

use crate::entities::{Location, RealmGraph, RealmGraphError};
use crate::infrastructure::importers::WorldSeed;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::layers::{LayerStoreError, TemporalLayerStore};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Realm graph rejected seed: {0}")]
    Graph(#[from] RealmGraphError),
    #[error("Layer store rejected seed: {0}")]
    Layer(#[from] LayerStoreError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// What a seed import wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub realms: usize,
    pub locations: usize,
    pub edges_created: usize,
    pub edges_existing: usize,
    pub layers: usize,
}

impl SeedReport {
    fn count(&mut self, outcome: EdgeOutcome) {
        if outcome.was_created() {
            self.edges_created += 1;
        } else {
            self.edges_existing += 1;
        }
    }
}

/// Writes vertices first, then edges, then layers.
///
/// Stops at the first rejected edge or layer; whatever was written before
/// stays written. Re-running the same seed is safe for vertices and edges.
pub struct ImportWorldSeed {
    realms: Arc<RealmGraph>,
    locations: Arc<Location>,
    layers: Arc<TemporalLayerStore>,
}

impl ImportWorldSeed {
    pub fn new(
        realms: Arc<RealmGraph>,
        locations: Arc<Location>,
        layers: Arc<TemporalLayerStore>,
    ) -> Self {
        Self {
            realms,
            locations,
            layers,
        }
    }

    pub async fn execute(&self, seed: &WorldSeed) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for realm in &seed.realms {
            self.realms.upsert(realm).await?;
            report.realms += 1;
        }
        for location in &seed.locations {
            self.locations.save(location).await?;
            report.locations += 1;
        }

        for edge in &seed.within {
            let outcome = self.realms.add_within_edge(edge.child, edge.parent).await?;
            report.count(outcome);
        }
        for edge in &seed.memberships {
            let outcome = self.realms.add_membership_edge(edge.entity, edge.realm).await?;
            report.count(outcome);
        }
        for edge in &seed.borders {
            let outcome = self.realms.add_border_edge(edge.a, edge.b).await?;
            report.count(outcome.forward);
            report.count(outcome.reverse);
        }
        for edge in &seed.routes {
            let outcome = self
                .realms
                .add_route_edge(edge.from, edge.to, &edge.label)
                .await?;
            report.count(outcome);
        }
        for edge in &seed.political {
            let outcome = self
                .realms
                .add_political_edge(edge.from, edge.to, edge.relation)
                .await?;
            report.count(outcome);
        }

        for layer in &seed.layers {
            if self.layers.get_layer(layer.id).await?.is_some() {
                tracing::debug!(layer_id = %layer.id, "Seed layer already stored, skipping");
                continue;
            }
            self.layers.add_layer(layer).await?;
            report.layers += 1;
        }

        tracing::info!(
            realms = report.realms,
            locations = report.locations,
            edges_created = report.edges_created,
            edges_existing = report.edges_existing,
            layers = report.layers,
            "World seed applied"
        );
        Ok(report)
    }
}
