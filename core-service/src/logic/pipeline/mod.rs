//! Pipeline Module - Preprocessing, training and persistence
//!
//! ## Stages
//! - `scaler` / `encoder` - per-column transformers
//! - `preprocessor` - column transformer (scaled, encoded, passthrough)
//! - `artifact` - fitted pipeline persisted as JSON
//! - `training` - schema inference and fitting from the dataset

pub mod artifact;
pub mod encoder;
pub mod preprocessor;
pub mod scaler;
pub mod training;

#[cfg(test)]
mod tests;

pub use artifact::{ModelPipeline, PipelineMetadata};
pub use preprocessor::Preprocessor;
pub use training::{infer_schema, load_or_train, train};
