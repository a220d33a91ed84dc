//! Explanation Service
//!
//! Built once at startup and read-only afterwards:
//! - fitted pipeline (schema, preprocessor, classifier)
//! - feature mapping from transformed positions to original columns
//! - global ranking from the classifier's impurity importances
//! - tree explainer primed with the transformed dataset
//! - predictions for every dataset record
//!
//! Every request method takes `&self` and allocates its own scratch, so the
//! service can be shared across worker threads behind an `Arc`.

use super::aggregate::aggregate;
use super::types::{
    FeatureContribution, LocalExplanation, ModelInfo, RankedExplanation, RiskLevel,
    StudentSummary,
};
use crate::constants::{FIRST_RECORD_ID, GLOBAL_TOP_K, LOCAL_TOP_K};
use crate::error::{CoreError, CoreResult};
use crate::logic::config::ServiceConfig;
use crate::logic::dataset::{DatasetStore, StudentRecord};
use crate::logic::features::FeatureMapping;
use crate::logic::model::TreeExplainer;
use crate::logic::pipeline::{load_or_train, ModelPipeline};
use crate::logic::schema::RawRow;

pub struct ExplanationService {
    pipeline: ModelPipeline,
    dataset: DatasetStore,
    mapping: FeatureMapping,
    global: RankedExplanation,
    explainer: TreeExplainer,
    predictions: Vec<String>,
}

impl ExplanationService {
    /// Load the dataset, load (or train) the pipeline, then build every cache
    pub fn init(config: &ServiceConfig) -> CoreResult<Self> {
        let dataset = DatasetStore::load(&config.data_path)?;
        let pipeline = load_or_train(config, &dataset)?;
        Self::from_parts(pipeline, dataset)
    }

    pub fn from_parts(pipeline: ModelPipeline, dataset: DatasetStore) -> CoreResult<Self> {
        pipeline.validate()?;
        let schema = pipeline.schema();

        let absent = schema.missing_from(dataset.columns());
        if !absent.is_empty() {
            log::warn!(
                "Dataset is missing {} declared column(s), defaults will be used: {:?}",
                absent.len(),
                absent
            );
        }

        let mapping = FeatureMapping::build(&pipeline.output_names(), &schema.names());
        let global = aggregate(&pipeline.classifier().feature_importances(), &mapping)?;

        let rows: Vec<RawRow> = dataset.all().iter().map(|r| r.values.clone()).collect();
        let background = pipeline.transform(&rows)?;
        let explainer = TreeExplainer::new(pipeline.classifier(), background.view());
        let predictions = pipeline.classifier().predict(background.view())?;

        log::info!(
            "Explanation service ready: {} original features ({} mapped, {} positions dropped), {} records",
            schema.len(),
            mapping.len(),
            mapping.dropped().len(),
            dataset.len()
        );

        Ok(Self {
            pipeline,
            dataset,
            mapping,
            global,
            explainer,
            predictions,
        })
    }

    // ========================================================================
    // EXPLANATIONS
    // ========================================================================

    /// Top global features by aggregated impurity importance
    pub fn global_explanation(&self) -> &[FeatureContribution] {
        self.global.top(GLOBAL_TOP_K)
    }

    /// Full cached global ranking
    pub fn global_ranking(&self) -> &RankedExplanation {
        &self.global
    }

    /// Top features behind the prediction for one student
    pub fn local_explanation(&self, id: u64) -> CoreResult<LocalExplanation> {
        let record = self.dataset.get(id)?;
        let (prediction, base_value, ranked) = self.explain_record(record)?;

        Ok(LocalExplanation {
            id,
            risk: RiskLevel::from_label(&prediction),
            prediction,
            base_value,
            contributions: ranked.top(LOCAL_TOP_K).to_vec(),
        })
    }

    /// Full local ranking for one student (predicted class only)
    pub fn local_ranking(&self, id: u64) -> CoreResult<RankedExplanation> {
        let record = self.dataset.get(id)?;
        self.explain_record(record).map(|(_, _, ranked)| ranked)
    }

    fn explain_record(&self, record: &StudentRecord) -> CoreResult<(String, f64, RankedExplanation)> {
        let x = self.pipeline.transform_row(&record.values)?;
        let classifier = self.pipeline.classifier();

        let prediction = classifier
            .predict(x.view())?
            .into_iter()
            .next()
            .ok_or(CoreError::EmptyPrediction)?;
        let class_index = classifier
            .classes()
            .iter()
            .position(|c| *c == prediction)
            .ok_or_else(|| CoreError::UnknownPredictedClass {
                label: prediction.clone(),
            })?;

        let phi = self.explainer.explain_row(x.row(0));
        let slice: Vec<f64> = phi.column(class_index).to_vec();
        let ranked = aggregate(&slice, &self.mapping)?;

        let expected_values = self.explainer.expected_values();
        let base_value = expected_values.get(class_index).copied().ok_or(
            CoreError::ClassCountMismatch {
                expected: classifier.classes().len(),
                got: expected_values.len(),
            },
        )?;

        log::debug!(
            "Local explanation for student {}: predicted '{}' (class {})",
            record.id,
            prediction,
            class_index
        );
        Ok((prediction, base_value, ranked))
    }

    // ========================================================================
    // PREDICTION
    // ========================================================================

    /// Predict labels for ad-hoc rows; absent columns take schema defaults
    pub fn predict(&self, rows: &[RawRow]) -> CoreResult<Vec<String>> {
        self.pipeline.predict(rows)
    }

    // ========================================================================
    // STUDENTS
    // ========================================================================

    pub fn student(&self, id: u64) -> CoreResult<StudentSummary> {
        let record = self.dataset.get(id)?;
        let index = (record.id - FIRST_RECORD_ID) as usize;
        let prediction = self.predictions.get(index).map(String::as_str).unwrap_or_default();
        Ok(summary(record, prediction))
    }

    /// Cached predictions in id order, optionally filtered by risk
    pub fn students(&self, limit: Option<usize>, risk: Option<RiskLevel>) -> Vec<StudentSummary> {
        // Records and predictions share one order
        self.dataset
            .all()
            .iter()
            .zip(&self.predictions)
            .map(|(record, prediction)| summary(record, prediction))
            .filter(|s| risk.map_or(true, |level| s.risk == level))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    // ========================================================================
    // INFO
    // ========================================================================

    pub fn model_info(&self) -> ModelInfo {
        let classifier = self.pipeline.classifier();
        let metadata = self.pipeline.metadata();

        ModelInfo {
            layout: self.pipeline.layout_info(),
            classes: classifier.classes().to_vec(),
            transformed_features: self
                .pipeline
                .output_names()
                .iter()
                .map(|n| n.to_string())
                .collect(),
            dropped_positions: self.mapping.dropped().to_vec(),
            tree_depth: classifier.depth(),
            tree_nodes: classifier.nodes().len(),
            trained_at: metadata.trained_at,
            n_training_rows: metadata.n_training_rows,
            n_records: self.dataset.len(),
        }
    }

    pub fn mapping(&self) -> &FeatureMapping {
        &self.mapping
    }

    pub fn pipeline(&self) -> &ModelPipeline {
        &self.pipeline
    }

    pub fn record_count(&self) -> usize {
        self.dataset.len()
    }
}

fn summary(record: &StudentRecord, prediction: &str) -> StudentSummary {
    StudentSummary {
        id: record.id,
        prediction: prediction.to_string(),
        risk: RiskLevel::from_label(prediction),
        actual: record.target.clone(),
    }
}
