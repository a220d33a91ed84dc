//! Error handling
//!
//! Every failure in the core maps to one of three kinds:
//! - `NotFound` - the requested student does not exist
//! - `Initialization` - dataset or persisted pipeline missing/unreadable (fatal at startup)
//! - `Computation` - preprocessing, prediction or attribution failed for one request

use std::path::PathBuf;

use crate::logic::schema::LayoutMismatchError;

pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Initialization,
    Computation,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    // Dataset errors
    #[error("failed to open dataset {path}")]
    DatasetIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dataset {path}")]
    DatasetParse {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("dataset {path} contains no records")]
    EmptyDataset { path: PathBuf },

    #[error("dataset has no '{column}' column")]
    MissingTargetColumn { column: String },

    #[error("record {id} has no target label")]
    MissingTarget { id: u64 },

    // Pipeline persistence errors
    #[error("persisted pipeline not found at {path} and training is disabled")]
    ModelMissing { path: PathBuf },

    #[error("failed to read pipeline from {path}")]
    ModelRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse pipeline from {path}")]
    ModelParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write pipeline to {path}")]
    ModelWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize pipeline")]
    ModelSerialize { source: serde_json::Error },

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("cannot train on an empty set of rows")]
    EmptyTrainingSet,

    #[error("malformed decision tree: {reason}")]
    InvalidTree { reason: String },

    // Request errors
    #[error("student {id} not found")]
    RecordNotFound { id: u64 },

    #[error("importance vector has {got} values, expected {expected}")]
    VectorLengthMismatch { expected: usize, got: usize },

    #[error("row has {got} transformed features, expected {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("predicted label '{label}' is not one of the classifier's classes")]
    UnknownPredictedClass { label: String },

    #[error("classifier returned no prediction for the row")]
    EmptyPrediction,

    #[error("explainer has {got} expected values, classifier has {expected} classes")]
    ClassCountMismatch { expected: usize, got: usize },

    #[error("column '{column}' expects a number, got '{value}'")]
    InvalidCell { column: String, value: String },
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::RecordNotFound { .. } => ErrorKind::NotFound,
            CoreError::DatasetIo { .. }
            | CoreError::DatasetParse { .. }
            | CoreError::EmptyDataset { .. }
            | CoreError::MissingTargetColumn { .. }
            | CoreError::MissingTarget { .. }
            | CoreError::ModelMissing { .. }
            | CoreError::ModelRead { .. }
            | CoreError::ModelParse { .. }
            | CoreError::ModelWrite { .. }
            | CoreError::ModelSerialize { .. }
            | CoreError::LayoutMismatch(_)
            | CoreError::EmptyTrainingSet
            | CoreError::InvalidTree { .. } => ErrorKind::Initialization,
            CoreError::VectorLengthMismatch { .. }
            | CoreError::FeatureCountMismatch { .. }
            | CoreError::UnknownPredictedClass { .. }
            | CoreError::EmptyPrediction
            | CoreError::ClassCountMismatch { .. }
            | CoreError::InvalidCell { .. } => ErrorKind::Computation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
