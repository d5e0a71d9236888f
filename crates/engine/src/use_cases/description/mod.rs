//! Description use cases - Composing a location's narrative text.
//!
//! Works on the flat set of layers currently attached to a location. This is
//! a separate access path from the tick-indexed lookups in `layers`.

mod compose;
mod masking;

pub use compose::DescriptionComposer;
pub use masking::{split_sentences, SupersedeMask};
