//! Importance Aggregator
//!
//! Sums a per-transformed-position vector back onto original features and
//! ranks them. Values are summed with their sign, so one-hot categories with
//! offsetting contributions can cancel out.

use super::types::{FeatureContribution, RankedExplanation};
use crate::error::{CoreError, CoreResult};
use crate::logic::features::FeatureMapping;

pub fn aggregate(values: &[f64], mapping: &FeatureMapping) -> CoreResult<RankedExplanation> {
    if values.len() != mapping.transformed_len() {
        return Err(CoreError::VectorLengthMismatch {
            expected: mapping.transformed_len(),
            got: values.len(),
        });
    }

    let mut entries: Vec<FeatureContribution> = mapping
        .entries()
        .iter()
        .map(|feature| FeatureContribution {
            name: feature.name.clone(),
            value: feature.positions.iter().map(|&p| values[p]).sum(),
        })
        .collect();

    // Stable: equal magnitudes keep mapping order
    entries.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));

    Ok(RankedExplanation::from_ranked(entries))
}
