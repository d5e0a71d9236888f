//! Realm entity - Named regions in the world's containment hierarchy
//!
//! Realms are continents, kingdoms, cities, weather zones, trade networks and
//! so on. Locations (and smaller realms) sit WITHIN realms; the resulting
//! upward chain drives both narrative context and layer fallback.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::RealmId;

/// The kind of region a realm represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealmType {
    World,
    Continent,
    MountainRange,
    Forest,
    Kingdom,
    City,
    District,
    WeatherZone,
    TradeNetwork,
    Alliance,
    Dungeon,
}

impl RealmType {
    pub const ALL: [RealmType; 11] = [
        Self::World,
        Self::Continent,
        Self::MountainRange,
        Self::Forest,
        Self::Kingdom,
        Self::City,
        Self::District,
        Self::WeatherZone,
        Self::TradeNetwork,
        Self::Alliance,
        Self::Dungeon,
    ];

    /// Static type -> category table.
    pub fn category(&self) -> RealmCategory {
        match self {
            Self::Continent | Self::MountainRange | Self::Forest | Self::World => {
                RealmCategory::Geographic
            }
            Self::Kingdom | Self::City | Self::District => RealmCategory::Political,
            Self::WeatherZone => RealmCategory::Weather,
            Self::TradeNetwork | Self::Alliance | Self::Dungeon => RealmCategory::Functional,
        }
    }

    /// Get the string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::World => "WORLD",
            Self::Continent => "CONTINENT",
            Self::MountainRange => "MOUNTAIN_RANGE",
            Self::Forest => "FOREST",
            Self::Kingdom => "KINGDOM",
            Self::City => "CITY",
            Self::District => "DISTRICT",
            Self::WeatherZone => "WEATHER_ZONE",
            Self::TradeNetwork => "TRADE_NETWORK",
            Self::Alliance => "ALLIANCE",
            Self::Dungeon => "DUNGEON",
        }
    }
}

impl fmt::Display for RealmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RealmType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown realm type: {}", s)))
    }
}

/// Narrative bucket a realm type falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RealmCategory {
    Geographic,
    Political,
    Weather,
    Functional,
}

/// Breadth of a realm. The derived ordering is the scope rank used by
/// hierarchical layer fallback: LOCAL < REGIONAL < MACRO < CONTINENTAL < GLOBAL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealmScope {
    #[default]
    Local,
    Regional,
    Macro,
    Continental,
    Global,
}

impl RealmScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Regional => "REGIONAL",
            Self::Macro => "MACRO",
            Self::Continental => "CONTINENTAL",
            Self::Global => "GLOBAL",
        }
    }
}

impl fmt::Display for RealmScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RealmScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(Self::Local),
            "REGIONAL" => Ok(Self::Regional),
            "MACRO" => Ok(Self::Macro),
            "CONTINENTAL" => Ok(Self::Continental),
            "GLOBAL" => Ok(Self::Global),
            _ => Err(DomainError::parse(format!("Unknown realm scope: {}", s))),
        }
    }
}

/// A realm vertex in the world graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    pub id: RealmId,
    pub name: String,
    pub realm_type: RealmType,
    pub scope: RealmScope,
    /// Flavor tags fed to prompt assembly ("bustling", "ancient", ...)
    #[serde(default)]
    pub narrative_tags: BTreeSet<String>,
}

impl Realm {
    pub fn new(name: impl Into<String>, realm_type: RealmType, scope: RealmScope) -> Self {
        Self {
            id: RealmId::new(),
            name: name.into(),
            realm_type,
            scope,
            narrative_tags: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: RealmId) -> Self {
        self.id = id;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.narrative_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn category(&self) -> RealmCategory {
        self.realm_type.category()
    }
}
