//! Realm context service.

use std::sync::Arc;

use realmlore_domain::{
    aggregate_narrative_tags, categorize_realms, LocationContext, LocationId, Realm, RealmType,
};

use crate::entities::{Location, RealmGraph};
use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum RealmContextError {
    #[error("Location not found: {0}")]
    LocationNotFound(LocationId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Builds realm-aware context for locations on top of the realm graph.
pub struct RealmContextService {
    realms: Arc<RealmGraph>,
    locations: Arc<Location>,
}

impl RealmContextService {
    pub fn new(realms: Arc<RealmGraph>, locations: Arc<Location>) -> Self {
        Self { realms, locations }
    }

    /// Realms containing the location, nearest first.
    ///
    /// With a `type_filter`, only realms of that type are kept; their relative
    /// chain order is preserved.
    pub async fn get_containing_realms(
        &self,
        location_id: LocationId,
        type_filter: Option<RealmType>,
    ) -> Result<Vec<Realm>, RepoError> {
        let chain = self.realms.get_containment_chain(location_id).await?;
        Ok(match type_filter {
            Some(realm_type) => chain
                .into_iter()
                .filter(|realm| realm.realm_type == realm_type)
                .collect(),
            None => chain,
        })
    }

    /// Full narrative context for a location at `tick`.
    ///
    /// Fails only if the location itself is missing or a store errors while
    /// walking the containment chain. Neighbors are best effort.
    pub async fn get_location_context(
        &self,
        location_id: LocationId,
        tick: u64,
    ) -> Result<LocationContext, RealmContextError> {
        let location = self
            .locations
            .get(location_id)
            .await?
            .ok_or(RealmContextError::LocationNotFound(location_id))?;

        let containing_realms = self.get_containing_realms(location_id, None).await?;
        let realms = categorize_realms(&containing_realms);
        let narrative_tags = aggregate_narrative_tags(&containing_realms);
        let neighbors = self.locations.resolve_neighbors(&location).await;

        tracing::debug!(
            location_id = %location_id,
            tick,
            realm_count = containing_realms.len(),
            neighbor_count = neighbors.len(),
            "Assembled location context"
        );

        Ok(LocationContext {
            location,
            tick,
            containing_realms,
            realms,
            neighbors,
            narrative_tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::LocationRepo;
    use realmlore_domain::{self as domain, LocationExit, RealmScope};

    struct World {
        service: RealmContextService,
        graph: Arc<RealmGraph>,
        repos: InMemoryRepositories,
    }

    fn world() -> World {
        let repos = InMemoryRepositories::new();
        let graph = Arc::new(RealmGraph::new(repos.realm.clone()));
        let locations = Arc::new(Location::new(repos.location.clone()));
        World {
            service: RealmContextService::new(graph.clone(), locations),
            graph,
            repos,
        }
    }

    async fn realm(graph: &RealmGraph, name: &str, realm_type: RealmType, tags: &[&str]) -> Realm {
        let realm =
            Realm::new(name, realm_type, RealmScope::Regional).with_tags(tags.iter().copied());
        graph.upsert(&realm).await.unwrap();
        realm
    }

    #[tokio::test]
    async fn type_filter_keeps_chain_order() {
        let w = world();
        let location = LocationId::new();
        let district = realm(&w.graph, "Docks", RealmType::District, &[]).await;
        let city = realm(&w.graph, "Port Ash", RealmType::City, &[]).await;
        let kingdom = realm(&w.graph, "Varn", RealmType::Kingdom, &[]).await;
        let forest = realm(&w.graph, "Mistwood", RealmType::Forest, &[]).await;
        w.graph.add_within_edge(location, district.id).await.unwrap();
        w.graph.add_within_edge(district.id, city.id).await.unwrap();
        w.graph.add_within_edge(city.id, forest.id).await.unwrap();
        w.graph.add_within_edge(forest.id, kingdom.id).await.unwrap();

        let all = w.service.get_containing_realms(location, None).await.unwrap();
        assert_eq!(all.len(), 4);

        let cities = w
            .service
            .get_containing_realms(location, Some(RealmType::City))
            .await
            .unwrap();
        assert_eq!(cities, vec![city]);

        let none = w
            .service
            .get_containing_realms(location, Some(RealmType::Dungeon))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn missing_location_is_not_found() {
        let w = world();
        let missing = LocationId::new();
        let err = w.service.get_location_context(missing, 0).await.unwrap_err();
        assert!(matches!(err, RealmContextError::LocationNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn context_aggregates_tags_across_whole_chain() {
        let w = world();
        let harbor = realm(&w.graph, "Harbor", RealmType::District, &["bustling", "ancient"]).await;
        let coast = realm(&w.graph, "Coast", RealmType::Kingdom, &["bustling", "coastal"]).await;
        let rain = realm(&w.graph, "Rainbelt", RealmType::WeatherZone, &["wet"]).await;

        let market = domain::Location::new("Fish Market");
        let pier = domain::Location::new("Pier")
            .with_exit(LocationExit::new("south", market.id))
            .with_exit(LocationExit::new("north", LocationId::new()));
        w.repos.location.save(&market).await.unwrap();
        w.repos.location.save(&pier).await.unwrap();

        w.graph.add_within_edge(pier.id, harbor.id).await.unwrap();
        w.graph.add_within_edge(pier.id, rain.id).await.unwrap();
        w.graph.add_within_edge(harbor.id, coast.id).await.unwrap();

        let context = w.service.get_location_context(pier.id, 42).await.unwrap();

        assert_eq!(context.location, pier);
        assert_eq!(context.tick, 42);
        assert_eq!(context.containing_realms.len(), 3);
        assert_eq!(context.realms.political.len(), 2);
        assert_eq!(context.realms.weather, vec![rain]);
        assert_eq!(
            context.narrative_tags,
            vec!["ancient", "bustling", "coastal", "wet"]
        );
        assert_eq!(context.neighbors.len(), 1);
        assert_eq!(context.neighbors[0].location.name, "Fish Market");
    }
}
