//! Features Module - Transformed-space naming and resolution
//!
//! Maps each position of the preprocessing output back onto the original
//! (human-meaningful) column it was produced from.

pub mod mapping;
pub mod naming;


// Re-export common types
pub use mapping::{FeatureMapping, MappedFeature};
pub use naming::TransformedName;
