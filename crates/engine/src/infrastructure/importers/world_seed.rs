//! World seed importer.
//!
//! Loads a JSON world description (realms, locations, edges, layers) for
//! demo worlds, fixtures, and bulk world-building. Parsing only; applying a
//! seed goes through the validated graph and layer operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use realmlore_domain::{
    DescriptionLayer, Location, PoliticalRelation, Realm, RealmId,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Seed file not found at {0}")]
    SeedNotFound(PathBuf),
}

/// `child` may be a location or a realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithinSeed {
    pub child: Uuid,
    pub parent: RealmId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSeed {
    pub entity: Uuid,
    pub realm: RealmId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSeed {
    pub a: RealmId,
    pub b: RealmId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSeed {
    pub from: RealmId,
    pub to: RealmId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliticalSeed {
    pub from: RealmId,
    pub to: RealmId,
    pub relation: PoliticalRelation,
}

/// A whole world in one document. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldSeed {
    pub realms: Vec<Realm>,
    pub locations: Vec<Location>,
    pub within: Vec<WithinSeed>,
    pub memberships: Vec<MembershipSeed>,
    pub borders: Vec<BorderSeed>,
    pub routes: Vec<RouteSeed>,
    pub political: Vec<PoliticalSeed>,
    pub layers: Vec<DescriptionLayer>,
}

impl WorldSeed {
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        if !fs::try_exists(path).await? {
            return Err(ImportError::SeedNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).await?;
        let seed = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            realms = seed.realms.len(),
            locations = seed.locations.len(),
            layers = seed.layers.len(),
            "Loaded world seed"
        );
        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realmlore_domain::{LayerScope, LayerType, RealmScope, RealmType};
    use std::io::Write;

    const SEED: &str = r#"{
        "realms": [
            {
                "id": "6f1c9a52-0d4e-4f3a-9a51-1b8f0f7c2a10",
                "name": "Varn",
                "realmType": "KINGDOM",
                "scope": "REGIONAL",
                "narrativeTags": ["ancient"]
            }
        ],
        "locations": [
            {
                "id": "0b0c4f7e-3d0e-4b6a-8a8f-5c9d3e2a1f00",
                "name": "Gatehouse",
                "exits": [
                    {"direction": "north", "toLocation": "1b0c4f7e-3d0e-4b6a-8a8f-5c9d3e2a1f00"}
                ]
            }
        ],
        "within": [
            {
                "child": "0b0c4f7e-3d0e-4b6a-8a8f-5c9d3e2a1f00",
                "parent": "6f1c9a52-0d4e-4f3a-9a51-1b8f0f7c2a10"
            }
        ],
        "routes": [
            {
                "from": "6f1c9a52-0d4e-4f3a-9a51-1b8f0f7c2a10",
                "to": "7f1c9a52-0d4e-4f3a-9a51-1b8f0f7c2a10",
                "label": "Salt Road"
            }
        ],
        "layers": [
            {
                "id": "9a1c9a52-0d4e-4f3a-9a51-1b8f0f7c2a10",
                "scopeId": "loc:0b0c4f7e-3d0e-4b6a-8a8f-5c9d3e2a1f00",
                "layerType": "base",
                "value": "A plain wooden gate stands.",
                "effectiveFromTick": 0,
                "authoredAt": "2026-01-10T00:00:00Z"
            }
        ]
    }"#;

    #[test]
    fn parses_partial_seed_with_defaults() {
        let seed = WorldSeed::from_json(SEED).unwrap();

        assert_eq!(seed.realms[0].realm_type, RealmType::Kingdom);
        assert_eq!(seed.realms[0].scope, RealmScope::Regional);
        assert!(seed.realms[0].narrative_tags.contains("ancient"));
        assert_eq!(seed.locations[0].exits[0].direction, "north");
        assert_eq!(seed.routes[0].label, "Salt Road");
        assert!(seed.memberships.is_empty());
        assert!(seed.political.is_empty());

        let layer = &seed.layers[0];
        assert_eq!(layer.layer_type, LayerType::Base);
        assert!(matches!(layer.scope, LayerScope::Location(_)));
        assert_eq!(layer.effective_to_tick, None);
        assert_eq!(layer.priority, 0);
    }

    #[test]
    fn rejects_malformed_scope() {
        let json = SEED.replace("loc:0b0c", "zone:0b0c");
        assert!(matches!(
            WorldSeed::from_json(&json),
            Err(ImportError::Json(_))
        ));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seed = WorldSeed::load(file.path()).await.unwrap();
        assert_eq!(seed.realms.len(), 1);
        assert_eq!(seed.layers.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = WorldSeed::load(&path).await.unwrap_err();
        assert!(matches!(err, ImportError::SeedNotFound(p) if p == path));
    }
}
