//! Student listing bodies

use serde::{Deserialize, Serialize};
use studata_core::{FeatureContribution, LocalExplanation, RiskLevel, StudentSummary};

/// Default page size for `GET /students`
pub const DEFAULT_STUDENT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct StudentsQuery {
    pub limit: Option<usize>,
    pub risk: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentList {
    pub total: usize,
    pub students: Vec<StudentSummary>,
}

/// Cached prediction plus the explanation behind it
#[derive(Debug, Serialize)]
pub struct StudentDetail {
    pub id: u64,
    pub prediction: String,
    pub risk: RiskLevel,
    pub actual: Option<String>,
    pub base_value: f64,
    pub top_features: Vec<FeatureContribution>,
}

impl StudentDetail {
    pub fn new(summary: StudentSummary, explanation: LocalExplanation) -> Self {
        Self {
            id: summary.id,
            prediction: explanation.prediction,
            risk: explanation.risk,
            actual: summary.actual,
            base_value: explanation.base_value,
            top_features: explanation.contributions,
        }
    }
}
