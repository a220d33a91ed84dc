//! Pipeline Artifact - schema + preprocessor + classifier, persisted as JSON
//!
//! The artifact records the layout hash of the schema it was fitted on.
//! Loading re-computes the hash and refuses an artifact whose schema no
//! longer matches, so positions in the transformed space can never drift
//! away from the feature mapping built on top of them.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::preprocessor::Preprocessor;
use crate::constants::{NAMING_VERSION, SCHEMA_VERSION};
use crate::error::{CoreError, CoreResult};
use crate::logic::features::TransformedName;
use crate::logic::model::DecisionTree;
use crate::logic::schema::{FeatureSchema, LayoutInfo, LayoutMismatchError, RawRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub layout_hash: u32,
    pub naming_version: u8,
    pub trained_at: DateTime<Utc>,
    pub n_training_rows: usize,
}

/// Fitted preprocessing pipeline and classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPipeline {
    schema: FeatureSchema,
    preprocessor: Preprocessor,
    classifier: DecisionTree,
    metadata: PipelineMetadata,
}

impl ModelPipeline {
    pub fn new(
        schema: FeatureSchema,
        preprocessor: Preprocessor,
        classifier: DecisionTree,
        n_training_rows: usize,
    ) -> Self {
        let metadata = PipelineMetadata {
            layout_hash: schema.layout_hash(),
            naming_version: NAMING_VERSION,
            trained_at: Utc::now(),
            n_training_rows,
        };
        Self {
            schema,
            preprocessor,
            classifier,
            metadata,
        }
    }

    /// Read and validate a persisted pipeline
    pub fn load(path: &Path) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::ModelRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let pipeline: Self = serde_json::from_str(&raw).map_err(|e| CoreError::ModelParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        pipeline.validate()?;

        log::info!(
            "Pipeline loaded from '{}' (layout {:08x}, {} features -> {} transformed, trained {})",
            path.display(),
            pipeline.metadata.layout_hash,
            pipeline.schema.len(),
            pipeline.preprocessor.output_len(),
            pipeline.metadata.trained_at.to_rfc3339()
        );
        Ok(pipeline)
    }

    /// Write the pipeline as pretty JSON (parent directories are created)
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::ModelSerialize { source: e })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::ModelWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, json).map_err(|e| CoreError::ModelWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::info!("Pipeline saved to '{}'", path.display());
        Ok(())
    }

    /// Check the recorded layout against the schema, the stage widths and
    /// the classifier's structure
    pub fn validate(&self) -> CoreResult<()> {
        if self.metadata.naming_version != NAMING_VERSION {
            return Err(LayoutMismatchError {
                expected_version: SCHEMA_VERSION,
                expected_hash: self.metadata.layout_hash,
                actual_version: self.schema.version,
                actual_hash: self.schema.layout_hash(),
            }
            .into());
        }
        self.schema.validate_layout(self.metadata.layout_hash)?;

        if self.preprocessor.output_len() != self.classifier.n_features() {
            return Err(CoreError::FeatureCountMismatch {
                expected: self.classifier.n_features(),
                got: self.preprocessor.output_len(),
            });
        }
        self.classifier.validate()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &DecisionTree {
        &self.classifier
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    /// Tagged name of every transformed position
    pub fn output_names(&self) -> Vec<TransformedName> {
        self.preprocessor.output_names()
    }

    /// Align raw rows to the schema (default-filling absent columns) and transform
    pub fn transform(&self, rows: &[RawRow]) -> CoreResult<Array2<f64>> {
        let aligned: Vec<_> = rows.iter().map(|row| self.schema.align(row)).collect();
        self.preprocessor.transform(&aligned)
    }

    /// Single-row variant of `transform`, shape `[1, transformed]`
    pub fn transform_row(&self, row: &RawRow) -> CoreResult<Array2<f64>> {
        self.preprocessor.transform(&[self.schema.align(row)])
    }

    pub fn predict(&self, rows: &[RawRow]) -> CoreResult<Vec<String>> {
        let x = self.transform(rows)?;
        self.classifier.predict(x.view())
    }

    pub fn layout_info(&self) -> LayoutInfo {
        LayoutInfo {
            schema_version: self.schema.version,
            naming_version: self.metadata.naming_version,
            hash: self.metadata.layout_hash,
            feature_count: self.schema.len(),
            transformed_count: self.preprocessor.output_len(),
            feature_names: self.schema.names(),
        }
    }
}
