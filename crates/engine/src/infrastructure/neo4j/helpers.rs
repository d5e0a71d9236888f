//! Neo4j row conversion helpers.
//!
//! Extension traits that turn missing or malformed properties into
//! `RepoError`s, plus small query runners shared by the repositories.

use chrono::{DateTime, Utc};
use neo4rs::{Node, Query, Row};
use uuid::Uuid;

use realmlore_domain::common::{parse_datetime, StringExt};

use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::RepoError;

/// Neo4j stores integers as i64. Open-ended bounds are written as `-1`.
pub const OPEN_BOUND: i64 = -1;

pub fn tick_to_i64(tick: u64) -> i64 {
    i64::try_from(tick).unwrap_or(i64::MAX)
}

pub fn optional_tick_to_i64(tick: Option<u64>) -> i64 {
    tick.map_or(OPEN_BOUND, tick_to_i64)
}

/// Extension trait for Neo4j Node to simplify common deserialization patterns.
pub trait NodeExt {
    /// Get a required UUID property and parse it.
    fn get_uuid(&self, field: &str) -> Result<Uuid, RepoError>;

    /// Get a required string property.
    fn get_string_strict(&self, field: &str) -> Result<String, RepoError>;

    /// Get an optional string property, returning None if empty or missing.
    fn get_optional_string(&self, field: &str) -> Option<String>;

    /// Get a required RFC3339 timestamp property.
    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError>;

    /// Get an i64 property with a default value if missing.
    fn get_i64_or(&self, field: &str, default: i64) -> i64;

    /// Get a non-negative integer property. Negative (`OPEN_BOUND`) or missing is `None`.
    fn get_optional_tick(&self, field: &str) -> Option<u64>;

    /// Get and deserialize a JSON property, defaulting when missing or empty.
    fn get_json_or_default<T: serde::de::DeserializeOwned + Default>(
        &self,
        field: &str,
    ) -> Result<T, RepoError>;
}

impl NodeExt for Node {
    fn get_uuid(&self, field: &str) -> Result<Uuid, RepoError> {
        let s = self.get_string_strict(field)?;
        Uuid::parse_str(&s).map_err(|e| {
            RepoError::database(
                "parse",
                format!("Invalid UUID in field '{}': {} (value: '{}')", field, e, s),
            )
        })
    }

    fn get_string_strict(&self, field: &str) -> Result<String, RepoError> {
        self.get(field).map_err(|e| {
            RepoError::database(
                "query",
                format!("Missing required field '{}': {}", field, e),
            )
        })
    }

    fn get_optional_string(&self, field: &str) -> Option<String> {
        self.get::<String>(field).ok().and_then(|s| s.into_option())
    }

    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError> {
        let s = self.get_string_strict(field)?;
        parse_datetime(&s).map_err(|e| {
            RepoError::database(
                "parse",
                format!(
                    "Invalid datetime in field '{}': {} (value: '{}')",
                    field, e, s
                ),
            )
        })
    }

    fn get_i64_or(&self, field: &str, default: i64) -> i64 {
        self.get(field).unwrap_or(default)
    }

    fn get_optional_tick(&self, field: &str) -> Option<u64> {
        self.get::<i64>(field)
            .ok()
            .and_then(|n| u64::try_from(n).ok())
    }

    fn get_json_or_default<T: serde::de::DeserializeOwned + Default>(
        &self,
        field: &str,
    ) -> Result<T, RepoError> {
        match self.get_optional_string(field) {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                RepoError::serialization(format!("Invalid JSON in field '{}': {}", field, e))
            }),
            None => Ok(T::default()),
        }
    }
}

/// Extension trait for Neo4j Row column access.
pub trait RowExt {
    fn node(&self, column: &str) -> Result<Node, RepoError>;
    fn get_string_strict(&self, column: &str) -> Result<String, RepoError>;
    fn get_bool_strict(&self, column: &str) -> Result<bool, RepoError>;
}

impl RowExt for Row {
    fn node(&self, column: &str) -> Result<Node, RepoError> {
        self.get(column)
            .map_err(|e| RepoError::database("query", format!("Missing node '{}': {}", column, e)))
    }

    fn get_string_strict(&self, column: &str) -> Result<String, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::database(
                "query",
                format!("Missing required column '{}': {}", column, e),
            )
        })
    }

    fn get_bool_strict(&self, column: &str) -> Result<bool, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::database(
                "query",
                format!("Missing required column '{}': {}", column, e),
            )
        })
    }
}

/// Run a query and collect every row.
pub async fn fetch_all(
    graph: &Neo4jGraph,
    operation: &'static str,
    q: Query,
) -> Result<Vec<Row>, RepoError> {
    let mut result = graph
        .execute(q)
        .await
        .map_err(|e| RepoError::database(operation, e))?;
    let mut rows = Vec::new();
    while let Some(row) = result
        .next()
        .await
        .map_err(|e| RepoError::database(operation, e))?
    {
        rows.push(row);
    }
    Ok(rows)
}

/// Run a query and return its first row, if any.
pub async fn fetch_one(
    graph: &Neo4jGraph,
    operation: &'static str,
    q: Query,
) -> Result<Option<Row>, RepoError> {
    let mut result = graph
        .execute(q)
        .await
        .map_err(|e| RepoError::database(operation, e))?;
    result
        .next()
        .await
        .map_err(|e| RepoError::database(operation, e))
}

/// Run an edge MERGE that returns an `existed` column.
///
/// Returns `true` when the edge was created. No row means an endpoint is
/// missing, reported as `NotFound` for `endpoint`.
pub async fn merge_edge(
    graph: &Neo4jGraph,
    operation: &'static str,
    q: Query,
    endpoint: impl ToString,
) -> Result<bool, RepoError> {
    match fetch_one(graph, operation, q).await? {
        Some(row) => Ok(!row.get_bool_strict("existed")?),
        None => Err(RepoError::not_found("Realm or Location", endpoint)),
    }
}
