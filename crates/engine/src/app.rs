//! Application state and composition.

use std::sync::Arc;

use crate::config::{EngineConfig, StoreBackend};
use crate::entities::{Location, RealmGraph};
use crate::infrastructure::{
    clock::SystemClock,
    importers::WorldSeed,
    markup::ParagraphMarkupRenderer,
    memory::InMemoryRepositories,
    neo4j::{ensure_schema, Neo4jGraph, Neo4jRepositories},
    ports::{ClockPort, LayerRepo, LocationRepo, MarkupRendererPort, RealmRepo, TelemetryPort},
    telemetry::TracingTelemetry,
};
use crate::use_cases::{
    DescriptionComposer, ImportWorldSeed, RealmContextService, TemporalLayerStore,
};

/// Main application state.
///
/// Holds the store ports and every use case wired on top of them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Store ports, whichever backend they come from.
pub struct Repositories {
    pub realm: Arc<dyn RealmRepo>,
    pub layer: Arc<dyn LayerRepo>,
    pub location: Arc<dyn LocationRepo>,
}

impl From<InMemoryRepositories> for Repositories {
    fn from(repos: InMemoryRepositories) -> Self {
        Self {
            realm: repos.realm,
            layer: repos.layer,
            location: repos.location,
        }
    }
}

impl From<Neo4jRepositories> for Repositories {
    fn from(repos: Neo4jRepositories) -> Self {
        Self {
            realm: repos.realm,
            layer: repos.layer,
            location: repos.location,
        }
    }
}

/// Container for all use cases and the entities they share.
pub struct UseCases {
    pub realm_graph: Arc<RealmGraph>,
    pub locations: Arc<Location>,
    pub realm_context: Arc<RealmContextService>,
    pub layers: Arc<TemporalLayerStore>,
    pub description: Arc<DescriptionComposer>,
    pub import_seed: Arc<ImportWorldSeed>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repositories: Repositories,
        config: &EngineConfig,
        clock: Arc<dyn ClockPort>,
        telemetry: Arc<dyn TelemetryPort>,
        renderer: Arc<dyn MarkupRendererPort>,
    ) -> Self {
        let realm_graph = Arc::new(RealmGraph::with_depth_cap(
            repositories.realm.clone(),
            config.chain_depth_cap,
        ));
        let locations = Arc::new(Location::new(repositories.location.clone()));
        let realm_context = Arc::new(RealmContextService::new(
            realm_graph.clone(),
            locations.clone(),
        ));
        let layers = Arc::new(TemporalLayerStore::new(
            repositories.layer.clone(),
            realm_context.clone(),
            telemetry.clone(),
            clock.clone(),
        ));
        let description = Arc::new(DescriptionComposer::new(
            repositories.layer.clone(),
            renderer,
            telemetry,
            clock,
            config.composition.priorities,
        ));
        let import_seed = Arc::new(ImportWorldSeed::new(
            realm_graph.clone(),
            locations.clone(),
            layers.clone(),
        ));

        Self {
            repositories,
            use_cases: UseCases {
                realm_graph,
                locations,
                realm_context,
                layers,
                description,
                import_seed,
            },
        }
    }

    /// Build the app for `config`: connect the chosen backend, then apply the
    /// seed file if one is configured.
    pub async fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let repositories: Repositories = match config.store {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory stores");
                InMemoryRepositories::new().into()
            }
            StoreBackend::Neo4j => {
                tracing::info!(uri = %config.neo4j.uri, "Connecting to Neo4j");
                let graph = Neo4jGraph::connect(
                    &config.neo4j.uri,
                    &config.neo4j.user,
                    &config.neo4j.password,
                )
                .await?;
                ensure_schema(&graph).await?;
                Neo4jRepositories::new(graph).into()
            }
        };

        let app = Self::new(
            repositories,
            config,
            Arc::new(SystemClock::new()),
            Arc::new(TracingTelemetry::new()),
            Arc::new(ParagraphMarkupRenderer::new()),
        );

        if let Some(path) = &config.seed_file {
            let seed = WorldSeed::load(path).await?;
            app.use_cases.import_seed.execute(&seed).await?;
        }

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::telemetry::NoopTelemetry;
    use chrono::{TimeZone, Utc};
    use realmlore_domain::{
        self as domain, DescriptionLayer, LayerAttributes, LayerMetadata, LayerType, Realm,
        RealmScope, RealmType, ViewContext,
    };
    use std::io::Write;

    fn memory_app() -> App {
        let now = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();
        App::new(
            InMemoryRepositories::new().into(),
            &EngineConfig::default(),
            Arc::new(FixedClock(now)),
            Arc::new(NoopTelemetry),
            Arc::new(ParagraphMarkupRenderer::new()),
        )
    }

    #[tokio::test]
    async fn wired_use_cases_share_the_same_stores() {
        let app = memory_app();
        let uc = &app.use_cases;
        let kingdom = Realm::new("Varn", RealmType::Kingdom, RealmScope::Regional)
            .with_tags(["ancient"]);
        let gate = domain::Location::new("North Gate");
        uc.realm_graph.upsert(&kingdom).await.unwrap();
        uc.locations.save(&gate).await.unwrap();
        uc.realm_graph.add_within_edge(gate.id, kingdom.id).await.unwrap();

        uc.layers
            .set_layer_for_location(
                gate.id,
                LayerType::Base,
                0,
                "A plain wooden gate stands.",
                LayerMetadata::default(),
            )
            .await
            .unwrap();
        let attributes = LayerAttributes {
            supersedes: vec!["plain wooden gate".into()],
            ..LayerAttributes::default()
        };
        let burning =
            DescriptionLayer::new(gate.id, LayerType::Dynamic, "The gate is ablaze.", Utc::now())
                .with_attributes(attributes);
        uc.layers.add_layer(&burning).await.unwrap();
        uc.layers
            .set_layer_for_realm(
                kingdom.id,
                LayerType::Ambient,
                0,
                "Banners snap.",
                LayerMetadata::default(),
            )
            .await
            .unwrap();

        let compiled = uc
            .description
            .compile(gate.id, ViewContext::new(Utc::now()), None)
            .await
            .unwrap();
        assert_eq!(compiled.text, "The gate is ablaze.");

        let ambient = uc
            .layers
            .get_active_layer_for_location(gate.id, LayerType::Ambient, 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ambient.layer.value, "Banners snap.");

        let context = uc.realm_context.get_location_context(gate.id, 3).await.unwrap();
        assert_eq!(context.narrative_tags, vec!["ancient"]);
    }

    #[tokio::test]
    async fn from_config_applies_seed_file() {
        let location = domain::Location::new("Pier");
        let seed = WorldSeed {
            layers: vec![DescriptionLayer::new(
                location.id,
                LayerType::Base,
                "Gulls wheel overhead.",
                Utc::now(),
            )],
            locations: vec![location.clone()],
            ..WorldSeed::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&seed).unwrap().as_bytes())
            .unwrap();

        let config = EngineConfig {
            seed_file: Some(file.path().to_path_buf()),
            ..EngineConfig::default()
        };
        let app = App::from_config(&config).await.unwrap();

        let compiled = app
            .use_cases
            .description
            .compile(location.id, ViewContext::new(Utc::now()), None)
            .await
            .unwrap();
        assert_eq!(compiled.text, "Gulls wheel overhead.");
        assert_eq!(compiled.html, "<p>Gulls wheel overhead.</p>");
    }
}
