//! Compiled description - the composer's output and its audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ViewContext;
use crate::entities::LayerType;
use crate::ids::{LayerId, LocationId};

/// One contributing layer, in composition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEntry {
    pub layer_id: LayerId,
    pub layer_type: LayerType,
    pub priority: i32,
    pub authored_at: DateTime<Utc>,
    /// Set on root-text layers that lost at least one sentence to masking
    pub superseded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub location_id: LocationId,
    pub layers: Vec<ProvenanceEntry>,
    pub context: ViewContext,
    pub compiled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledDescription {
    pub text: String,
    pub html: String,
    pub provenance: Provenance,
}

impl CompiledDescription {
    /// Nothing to say about this location.
    pub fn empty(
        location_id: LocationId,
        context: ViewContext,
        compiled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: String::new(),
            html: String::new(),
            provenance: Provenance {
                location_id,
                layers: Vec::new(),
                context,
                compiled_at,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
