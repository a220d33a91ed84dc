use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{LABEL_DROPOUT, LABEL_ENROLLED, LABEL_GRADUATE};
use crate::logic::schema::LayoutInfo;

/// One original feature and its aggregated value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,
}

/// Original features sorted by descending absolute value
///
/// Ties keep the mapping's first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedExplanation {
    entries: Vec<FeatureContribution>,
}

impl RankedExplanation {
    /// Caller guarantees `entries` is already ranked
    pub(crate) fn from_ranked(entries: Vec<FeatureContribution>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FeatureContribution] {
        &self.entries
    }

    /// First `k` entries (fewer if fewer features are mapped)
    pub fn top(&self, k: usize) -> &[FeatureContribution] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome risk derived from the predicted label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    pub fn from_label(label: &str) -> Self {
        match label {
            LABEL_DROPOUT => RiskLevel::High,
            LABEL_ENROLLED => RiskLevel::Medium,
            LABEL_GRADUATE => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    /// Parse a query value (`high`, `medium`, `low`, `unknown`)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(RiskLevel::High),
            "medium" => Some(RiskLevel::Medium),
            "low" => Some(RiskLevel::Low),
            "unknown" => Some(RiskLevel::Unknown),
            _ => None,
        }
    }
}

/// Cached prediction for one dataset record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: u64,
    pub prediction: String,
    pub risk: RiskLevel,
    /// Recorded outcome, if the dataset carries one
    pub actual: Option<String>,
}

/// Why the model predicted what it predicted for one student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalExplanation {
    pub id: u64,
    pub prediction: String,
    pub risk: RiskLevel,
    /// Model output before any feature is known, for the predicted class
    pub base_value: f64,
    pub contributions: Vec<FeatureContribution>,
}

/// Loaded pipeline summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub layout: LayoutInfo,
    pub classes: Vec<String>,
    pub transformed_features: Vec<String>,
    pub dropped_positions: Vec<usize>,
    pub tree_depth: usize,
    pub tree_nodes: usize,
    pub trained_at: DateTime<Utc>,
    pub n_training_rows: usize,
    pub n_records: usize,
}
