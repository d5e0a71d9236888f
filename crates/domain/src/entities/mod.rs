//! Domain entities - Core objects with identity

mod layer;
mod location;
mod realm;
mod realm_edge;

pub use layer::{
    DescriptionLayer, LayerAttributes, LayerMetadata, LayerScope, LayerType, HERO_ROLE,
};
pub use location::{Location, LocationExit};
pub use realm::{Realm, RealmCategory, RealmScope, RealmType};
pub use realm_edge::{BorderEdgeOutcome, EdgeOutcome, PoliticalEdge, PoliticalRelation, RouteEdge};
