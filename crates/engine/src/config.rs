//! Engine configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use realmlore_domain::LayerPriorityTable;

use crate::entities::DEFAULT_CHAIN_DEPTH_CAP;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Which store backend to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Neo4j,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "neo4j" => Ok(Self::Neo4j),
            other => Err(format!("expected 'memory' or 'neo4j', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
        }
    }
}

/// Fixed composition tables, passed explicitly to the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositionConfig {
    pub priorities: LayerPriorityTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub store: StoreBackend,
    pub neo4j: Neo4jConfig,
    pub chain_depth_cap: usize,
    pub seed_file: Option<PathBuf>,
    pub composition: CompositionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            neo4j: Neo4jConfig::default(),
            chain_depth_cap: DEFAULT_CHAIN_DEPTH_CAP,
            seed_file: None,
            composition: CompositionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let store = match var("REALMLORE_STORE") {
            Some(raw) => raw
                .parse::<StoreBackend>()
                .map_err(|e| ConfigError::invalid("REALMLORE_STORE", &raw, e))?,
            None => defaults.store,
        };

        let chain_depth_cap = match var("REALMLORE_CHAIN_DEPTH_CAP") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(
                        "REALMLORE_CHAIN_DEPTH_CAP",
                        &raw,
                        "must be at least 1",
                    ))
                }
                Ok(cap) => cap,
                Err(e) => return Err(ConfigError::invalid("REALMLORE_CHAIN_DEPTH_CAP", &raw, e)),
            },
            None => defaults.chain_depth_cap,
        };

        let neo4j = Neo4jConfig {
            uri: var("NEO4J_URI").unwrap_or(defaults.neo4j.uri),
            user: var("NEO4J_USER").unwrap_or(defaults.neo4j.user),
            password: var("NEO4J_PASSWORD").unwrap_or(defaults.neo4j.password),
        };

        Ok(Self {
            store,
            neo4j,
            chain_depth_cap,
            seed_file: var("REALMLORE_SEED_FILE").map(PathBuf::from),
            composition: defaults.composition,
        })
    }
}

/// Load `.env.local` then `.env` from the working directory or the repo root.
///
/// Missing files are fine; variables already set in the environment win.
pub fn load_dotenv() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for dir in [std::path::PathBuf::from("."), repo_root] {
        for filename in [".env.local", ".env"] {
            let path = dir.join(filename);
            if path.exists() {
                let _ = dotenvy::from_path(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.chain_depth_cap, 50);
        assert_eq!(config.composition.priorities, LayerPriorityTable::STANDARD);
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("REALMLORE_STORE", "Neo4j"),
            ("NEO4J_URI", "bolt://graph:7687"),
            ("NEO4J_USER", "lore"),
            ("NEO4J_PASSWORD", "secret"),
            ("REALMLORE_CHAIN_DEPTH_CAP", "12"),
            ("REALMLORE_SEED_FILE", "worlds/demo.json"),
        ]))
        .unwrap();

        assert_eq!(config.store, StoreBackend::Neo4j);
        assert_eq!(config.neo4j.uri, "bolt://graph:7687");
        assert_eq!(config.neo4j.user, "lore");
        assert_eq!(config.chain_depth_cap, 12);
        assert_eq!(config.seed_file, Some(PathBuf::from("worlds/demo.json")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[("REALMLORE_STORE", "  ")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn rejects_bad_values() {
        let err =
            EngineConfig::from_lookup(lookup(&[("REALMLORE_STORE", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("REALMLORE_STORE"));

        for depth in ["0", "lots"] {
            let vars = [("REALMLORE_CHAIN_DEPTH_CAP", depth)];
            assert!(EngineConfig::from_lookup(lookup(&vars)).is_err());
        }
    }
}
