//! Logic Module - Pipeline, model and explanation engines
//!
//! ## Architecture
//! - `schema/` - declared input columns (kind, default, layout hash)
//! - `features/` - transformed-name decoding and feature mapping
//! - `pipeline/` - preprocessing, training, persisted artifact
//! - `model/` - decision tree and tree SHAP
//! - `explain/` - aggregation and the explanation service
//! - `dataset/` - student record store

pub mod config;
pub mod dataset;
pub mod explain;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod schema;
