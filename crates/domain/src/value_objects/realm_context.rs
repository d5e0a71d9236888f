//! Narrative context payload assembled around a location.
//!
//! Consumed by prompt assembly upstream; the helpers here are pure so they can
//! be reused on any realm list (containment chains, memberships, borders).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::common::non_blank;
use crate::entities::{Location, Realm, RealmCategory};

/// Realms bucketed by narrative category, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedRealms {
    pub geographic: Vec<Realm>,
    pub political: Vec<Realm>,
    pub weather: Vec<Realm>,
    pub functional: Vec<Realm>,
}

impl CategorizedRealms {
    pub fn bucket(&self, category: RealmCategory) -> &[Realm] {
        match category {
            RealmCategory::Geographic => &self.geographic,
            RealmCategory::Political => &self.political,
            RealmCategory::Weather => &self.weather,
            RealmCategory::Functional => &self.functional,
        }
    }

    pub fn len(&self) -> usize {
        self.geographic.len() + self.political.len() + self.weather.len() + self.functional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket realms by the static type -> category table.
pub fn categorize_realms(realms: &[Realm]) -> CategorizedRealms {
    let mut categorized = CategorizedRealms::default();
    for realm in realms {
        let bucket = match realm.category() {
            RealmCategory::Geographic => &mut categorized.geographic,
            RealmCategory::Political => &mut categorized.political,
            RealmCategory::Weather => &mut categorized.weather,
            RealmCategory::Functional => &mut categorized.functional,
        };
        bucket.push(realm.clone());
    }
    categorized
}

/// Union of all narrative tags, deduplicated and lexicographically sorted.
pub fn aggregate_narrative_tags(realms: &[Realm]) -> Vec<String> {
    realms
        .iter()
        .flat_map(|realm| realm.narrative_tags.iter())
        .filter_map(|tag| non_blank(tag))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A location reachable through one of the current location's exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborLocation {
    pub direction: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationContext {
    pub location: Location,
    pub tick: u64,
    /// Full containment chain, nearest ancestors first
    pub containing_realms: Vec<Realm>,
    pub realms: CategorizedRealms,
    pub neighbors: Vec<NeighborLocation>,
    pub narrative_tags: Vec<String>,
}
