//! Studata Core - student outcome model and explainability layer
//!
//! ## Layout
//! - `logic/schema` - declared input columns, defaults, layout hash
//! - `logic/features` - transformed-name decoding and original-feature mapping
//! - `logic/pipeline` - scaling / one-hot / passthrough preprocessing, persistence
//! - `logic/model` - decision tree classifier and tree SHAP attribution
//! - `logic/explain` - aggregation, ranking and the explanation service
//! - `logic/dataset` - CSV-backed student record store

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, CoreResult, ErrorKind};
pub use logic::config::ServiceConfig;
pub use logic::dataset::{DatasetStore, StudentRecord};
pub use logic::explain::{
    aggregate, ExplanationService, FeatureContribution, LocalExplanation, ModelInfo,
    RankedExplanation, RiskLevel, StudentSummary,
};
pub use logic::features::{FeatureMapping, TransformedName};
pub use logic::pipeline::ModelPipeline;
pub use logic::schema::{CellValue, ColumnSpec, FeatureKind, FeatureSchema, LayoutInfo, RawRow};
