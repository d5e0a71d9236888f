//! Location entity - A place players can stand in
//!
//! Locations are owned by the location store; this core only reads them to
//! resolve a location's own record and its exits when building narrative
//! context.

use serde::{Deserialize, Serialize};

use crate::ids::LocationId;

/// An exit from one location to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationExit {
    /// Direction label as shown to players ("north", "through the archway")
    pub direction: String,
    pub to_location: LocationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LocationExit {
    pub fn new(direction: impl Into<String>, to_location: LocationId) -> Self {
        Self {
            direction: direction.into(),
            to_location,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Static description, usable as composer fallback text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exits: Vec<LocationExit>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            description: None,
            exits: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: LocationId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exit(mut self, exit: LocationExit) -> Self {
        self.exits.push(exit);
        self
    }
}
