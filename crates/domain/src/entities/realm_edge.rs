//! Typed edges between realms (and from entities into realms).
//!
//! # Graph relationships
//! - `(child)-[:WITHIN]->(Realm)` - containment, acyclic
//! - `(entity)-[:MEMBER_OF]->(Realm)` - many-to-many membership
//! - `(Realm)-[:BORDERS]->(Realm)` - always written as a reciprocal pair
//! - `(Realm)-[:ROUTE {label}]->(Realm)` - directed, labelled
//! - `(Realm)-[:POLITICAL {relation}]->(Realm)` - directed, typed

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::RealmId;

/// Typed political relation between two realms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalRelation {
    VassalOf,
    AlliedWith,
    AtWarWith,
}

impl PoliticalRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VassalOf => "vassal_of",
            Self::AlliedWith => "allied_with",
            Self::AtWarWith => "at_war_with",
        }
    }
}

impl fmt::Display for PoliticalRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoliticalRelation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vassal_of" => Ok(Self::VassalOf),
            "allied_with" => Ok(Self::AlliedWith),
            "at_war_with" => Ok(Self::AtWarWith),
            other => Err(DomainError::parse(format!(
                "Unknown political relation: {}",
                other
            ))),
        }
    }
}

/// Directed, labelled route between realms (trade road, sea lane, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEdge {
    pub from: RealmId,
    pub to: RealmId,
    pub label: String,
}

/// Directed political edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalEdge {
    pub from: RealmId,
    pub to: RealmId,
    pub relation: PoliticalRelation,
}

/// Result of an idempotent edge write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOutcome {
    Created,
    AlreadyExists,
}

impl EdgeOutcome {
    pub fn from_created(created: bool) -> Self {
        if created {
            Self::Created
        } else {
            Self::AlreadyExists
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Creation flags for both directions of a border edge pair.
///
/// Each direction is reported independently so that a pair that was half
/// written before (only `a -> b` present) is repaired and reported correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderEdgeOutcome {
    pub forward: EdgeOutcome,
    pub reverse: EdgeOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn political_relation_parses_storage_names() {
        assert_eq!(
            "allied_with".parse::<PoliticalRelation>().unwrap(),
            PoliticalRelation::AlliedWith
        );
        assert!("friends_with".parse::<PoliticalRelation>().is_err());
    }

    #[test]
    fn edge_outcome_from_flag() {
        assert!(EdgeOutcome::from_created(true).was_created());
        assert_eq!(EdgeOutcome::from_created(false), EdgeOutcome::AlreadyExists);
    }
}
