//! Fixed lookup table ranking layer types during composition.

use serde::{Deserialize, Serialize};

use crate::entities::LayerType;

/// Type priority used to order non-root sections (higher first).
///
/// Passed explicitly to the composer rather than read from a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPriorityTable {
    pub base: i32,
    pub dynamic: i32,
    pub ambient: i32,
}

impl LayerPriorityTable {
    pub const STANDARD: Self = Self {
        base: 0,
        dynamic: 500,
        ambient: 100,
    };

    pub fn priority_of(&self, layer_type: LayerType) -> i32 {
        match layer_type {
            LayerType::Base => self.base,
            LayerType::Dynamic => self.dynamic,
            LayerType::Ambient => self.ambient,
        }
    }
}

impl Default for LayerPriorityTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_outranks_ambient() {
        let table = LayerPriorityTable::default();
        assert_eq!(table.priority_of(LayerType::Dynamic), 500);
        assert_eq!(table.priority_of(LayerType::Ambient), 100);
        assert!(table.priority_of(LayerType::Dynamic) > table.priority_of(LayerType::Ambient));
    }
}
