//! DescriptionLayer entity - Time-bounded narrative fragments
//!
//! A location's description is never stored as one string. It is assembled
//! from layers bound to a scope (a location or a realm), a type, and a tick
//! interval. Layers are append-only per version: an "edit" writes a new layer
//! with a later `authored_at`, and resolution picks the newest active one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::non_blank;
use crate::error::DomainError;
use crate::ids::{LayerId, LocationId, RealmId};

/// `metadata.role` value marking hero prose.
pub const HERO_ROLE: &str = "hero";

/// What a layer is attached to. Serialized as `loc:<uuid>` / `realm:<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerScope {
    Location(LocationId),
    Realm(RealmId),
}

impl LayerScope {
    pub const LOCATION_PREFIX: &'static str = "loc:";
    pub const REALM_PREFIX: &'static str = "realm:";

    pub fn location(&self) -> Option<LocationId> {
        match self {
            Self::Location(id) => Some(*id),
            Self::Realm(_) => None,
        }
    }
}

impl From<LocationId> for LayerScope {
    fn from(id: LocationId) -> Self {
        Self::Location(id)
    }
}

impl From<RealmId> for LayerScope {
    fn from(id: RealmId) -> Self {
        Self::Realm(id)
    }
}

impl fmt::Display for LayerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(id) => write!(f, "{}{}", Self::LOCATION_PREFIX, id),
            Self::Realm(id) => write!(f, "{}{}", Self::REALM_PREFIX, id),
        }
    }
}

impl FromStr for LayerScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = s.strip_prefix(Self::LOCATION_PREFIX) {
            raw.parse::<LocationId>()
                .map(Self::Location)
                .map_err(|e| DomainError::invalid_id(format!("{}: {}", s, e)))
        } else if let Some(raw) = s.strip_prefix(Self::REALM_PREFIX) {
            raw.parse::<RealmId>()
                .map(Self::Realm)
                .map_err(|e| DomainError::invalid_id(format!("{}: {}", s, e)))
        } else {
            Err(DomainError::parse(format!("Unknown layer scope: {}", s)))
        }
    }
}

impl Serialize for LayerScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LayerScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Layer kinds, in the order the composer treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// The location's baseline prose
    Base,
    /// Structural events (a burning gate, a collapsed bridge); always active
    Dynamic,
    /// Weather / time-of-day flavor; active only when the view context matches
    Ambient,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Dynamic => "dynamic",
            Self::Ambient => "ambient",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "dynamic" => Ok(Self::Dynamic),
            "ambient" => Ok(Self::Ambient),
            _ => Err(DomainError::parse(format!("Unknown layer type: {}", s))),
        }
    }
}

/// Authoring metadata carried by a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerMetadata {
    /// `"hero"` marks hero prose (together with `replaces_base`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub replaces_base: bool,
    /// Provenance hints: who or what produced the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_ref: Option<String>,
}

impl LayerMetadata {
    pub fn hero() -> Self {
        Self {
            role: Some(HERO_ROLE.to_string()),
            replaces_base: true,
            ..Self::default()
        }
    }
}

/// Matching attributes carried by a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_bucket: Option<String>,
    /// Phrases in the root prose this layer invalidates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supersedes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionLayer {
    pub id: LayerId,
    #[serde(rename = "scopeId")]
    pub scope: LayerScope,
    pub layer_type: LayerType,
    pub value: String,
    pub effective_from_tick: u64,
    /// `None` means the layer never lapses
    #[serde(default)]
    pub effective_to_tick: Option<u64>,
    pub authored_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub metadata: LayerMetadata,
    #[serde(default)]
    pub attributes: LayerAttributes,
}

impl DescriptionLayer {
    /// A new open-ended layer effective from tick 0.
    pub fn new(
        scope: impl Into<LayerScope>,
        layer_type: LayerType,
        value: impl Into<String>,
        authored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LayerId::new(),
            scope: scope.into(),
            layer_type,
            value: value.into(),
            effective_from_tick: 0,
            effective_to_tick: None,
            authored_at,
            priority: 0,
            metadata: LayerMetadata::default(),
            attributes: LayerAttributes::default(),
        }
    }

    pub fn with_id(mut self, id: LayerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_interval(mut self, from_tick: u64, to_tick: Option<u64>) -> Self {
        self.effective_from_tick = from_tick;
        self.effective_to_tick = to_tick;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, metadata: LayerMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_attributes(mut self, attributes: LayerAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Closed interval check: `from <= tick <= to`, or open-ended.
    pub fn is_active_at(&self, tick: u64) -> bool {
        self.effective_from_tick <= tick && self.effective_to_tick.map_or(true, |to| tick <= to)
    }

    /// Does this layer's interval intersect `[start, end]`? Missing bounds are unbounded.
    pub fn overlaps(&self, start: Option<u64>, end: Option<u64>) -> bool {
        let starts_before_end = end.map_or(true, |end| self.effective_from_tick <= end);
        let ends_after_start = match (self.effective_to_tick, start) {
            (Some(to), Some(start)) => to >= start,
            _ => true,
        };
        starts_before_end && ends_after_start
    }

    /// Hero prose: a dynamic layer that fully replaces the base description.
    pub fn is_hero_prose(&self) -> bool {
        self.layer_type == LayerType::Dynamic
            && self.metadata.role.as_deref() == Some(HERO_ROLE)
            && self.metadata.replaces_base
            && non_blank(&self.value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn scope_round_trips_through_string() {
        let location = LocationId::new();
        let scope = LayerScope::Location(location);
        let raw = scope.to_string();
        assert!(raw.starts_with("loc:"));
        assert_eq!(raw.parse::<LayerScope>().unwrap(), scope);

        let realm = LayerScope::Realm(RealmId::new());
        assert!(realm.to_string().starts_with("realm:"));
        assert_eq!(realm.to_string().parse::<LayerScope>().unwrap(), realm);
    }

    #[test]
    fn scope_rejects_unknown_prefix() {
        assert!("zone:1234".parse::<LayerScope>().is_err());
        assert!("loc:not-a-uuid".parse::<LayerScope>().is_err());
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let layer = DescriptionLayer::new(LocationId::new(), LayerType::Base, "x", at(1))
            .with_interval(10, Some(20));
        assert!(!layer.is_active_at(9));
        assert!(layer.is_active_at(10));
        assert!(layer.is_active_at(20));
        assert!(!layer.is_active_at(21));
    }

    #[test]
    fn open_ended_interval_never_lapses() {
        let layer = DescriptionLayer::new(LocationId::new(), LayerType::Base, "x", at(1))
            .with_interval(5, None);
        assert!(layer.is_active_at(u64::MAX));
        assert!(!layer.is_active_at(4));
    }

    #[test]
    fn overlap_handles_missing_bounds() {
        let layer = DescriptionLayer::new(LocationId::new(), LayerType::Base, "x", at(1))
            .with_interval(10, Some(20));
        assert!(layer.overlaps(None, None));
        assert!(layer.overlaps(Some(20), None));
        assert!(!layer.overlaps(Some(21), None));
        assert!(layer.overlaps(None, Some(10)));
        assert!(!layer.overlaps(None, Some(9)));
        assert!(layer.overlaps(Some(12), Some(15)));
    }

    #[test]
    fn hero_prose_requires_all_flags() {
        let hero = DescriptionLayer::new(LocationId::new(), LayerType::Dynamic, "Ruins.", at(1))
            .with_metadata(LayerMetadata::hero());
        assert!(hero.is_hero_prose());

        let blank = hero.clone().with_id(LayerId::new());
        let blank = DescriptionLayer {
            value: "   ".into(),
            ..blank
        };
        assert!(!blank.is_hero_prose());

        let not_replacing = DescriptionLayer {
            metadata: LayerMetadata {
                replaces_base: false,
                ..LayerMetadata::hero()
            },
            ..hero.clone()
        };
        assert!(!not_replacing.is_hero_prose());

        let base = DescriptionLayer {
            layer_type: LayerType::Base,
            ..hero
        };
        assert!(!base.is_hero_prose());
    }

    #[test]
    fn layer_serializes_scope_id_string() {
        let location = LocationId::new();
        let layer = DescriptionLayer::new(location, LayerType::Ambient, "Rain.", at(2));
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["scopeId"], format!("loc:{}", location));
        assert_eq!(json["layerType"], "ambient");
        assert!(json["effectiveToTick"].is_null());
    }
}
