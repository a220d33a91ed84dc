//! Explain Module - Global and local feature rankings
//!
//! - `aggregate` - importance vector + feature mapping -> ranked originals
//! - `engine` - the explanation service built once at startup
//! - `types` - ranked entries and response shapes

pub mod aggregate;
pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregate::aggregate;
pub use engine::ExplanationService;
pub use types::{
    FeatureContribution, LocalExplanation, ModelInfo, RankedExplanation, RiskLevel,
    StudentSummary,
};
