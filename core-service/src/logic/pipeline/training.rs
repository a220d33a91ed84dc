//! Training - fit a pipeline from the dataset when none is persisted
//!
//! Schema inference:
//! - sensitive column with numeric cells -> Passthrough
//! - every present cell numeric -> Numerical
//! - anything else -> Categorical
//!
//! Numeric defaults are the training mean; categorical defaults are Missing
//! (encoded as all zeros).

use std::collections::HashSet;

use super::artifact::ModelPipeline;
use super::preprocessor::Preprocessor;
use crate::constants::TARGET_COLUMN;
use crate::error::{CoreError, CoreResult};
use crate::logic::config::ServiceConfig;
use crate::logic::dataset::DatasetStore;
use crate::logic::model::{DecisionTree, TreeConfig};
use crate::logic::schema::{CellValue, ColumnSpec, FeatureKind, FeatureSchema};

/// Load the persisted pipeline, or train and save one if allowed
pub fn load_or_train(config: &ServiceConfig, store: &DatasetStore) -> CoreResult<ModelPipeline> {
    if config.model_path.exists() {
        return ModelPipeline::load(&config.model_path);
    }

    if !config.train_if_missing {
        return Err(CoreError::ModelMissing {
            path: config.model_path.clone(),
        });
    }

    log::info!(
        "No pipeline at '{}', training from {} records",
        config.model_path.display(),
        store.len()
    );
    let pipeline = train(store, &config.sensitive_features, &config.tree)?;
    pipeline.save(&config.model_path)?;
    Ok(pipeline)
}

/// Declare a schema for the dataset's feature columns (file order)
pub fn infer_schema<S: AsRef<str>>(store: &DatasetStore, sensitive: &[S]) -> FeatureSchema {
    let sensitive: HashSet<&str> = sensitive.iter().map(|s| s.as_ref()).collect();

    let columns = store
        .columns()
        .iter()
        .map(|name| {
            let cells: Vec<&CellValue> = store
                .all()
                .iter()
                .filter_map(|r| r.values.get(name))
                .filter(|c| !c.is_missing())
                .collect();
            let numbers: Vec<f64> = cells.iter().filter_map(|c| c.as_number()).collect();
            let numeric = !cells.is_empty() && numbers.len() == cells.len();

            if !numeric {
                if sensitive.contains(name.as_str()) {
                    log::warn!("Sensitive column '{}' is not numeric, encoding it instead", name);
                }
                return ColumnSpec::new(name.as_str(), FeatureKind::Categorical, CellValue::Missing);
            }

            let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
            let kind = if sensitive.contains(name.as_str()) {
                FeatureKind::Passthrough
            } else {
                FeatureKind::Numerical
            };
            ColumnSpec::new(name.as_str(), kind, CellValue::Number(mean))
        })
        .collect();

    FeatureSchema::new(columns)
}

/// Fit preprocessor and classifier on every record of the dataset
pub fn train<S: AsRef<str>>(
    store: &DatasetStore,
    sensitive: &[S],
    tree_config: &TreeConfig,
) -> CoreResult<ModelPipeline> {
    if store.is_empty() {
        return Err(CoreError::EmptyTrainingSet);
    }
    if !store.has_target() {
        return Err(CoreError::MissingTargetColumn {
            column: TARGET_COLUMN.to_string(),
        });
    }

    let labels = store
        .all()
        .iter()
        .map(|r| r.target.clone().ok_or(CoreError::MissingTarget { id: r.id }))
        .collect::<CoreResult<Vec<String>>>()?;

    let schema = infer_schema(store, sensitive);
    let rows: Vec<_> = store.all().iter().map(|r| schema.align(&r.values)).collect();

    let preprocessor = Preprocessor::fit(&schema, &rows)?;
    let x = preprocessor.transform(&rows)?;
    let classifier = DecisionTree::fit(x.view(), &labels, tree_config)?;

    log::info!(
        "Pipeline trained: {} rows, {} features -> {} transformed, {} classes, depth {}",
        rows.len(),
        schema.len(),
        preprocessor.output_len(),
        classifier.classes().len(),
        classifier.depth()
    );
    Ok(ModelPipeline::new(schema, preprocessor, classifier, rows.len()))
}
