//! Prediction request body
//!
//! The response is a bare JSON array of labels, one per input row.

use serde::Deserialize;
use studata_core::RawRow;

/// One row object or an array of row objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    One(RawRow),
    Many(Vec<RawRow>),
}

impl PredictRequest {
    pub fn into_rows(self) -> Vec<RawRow> {
        match self {
            PredictRequest::One(row) => vec![row],
            PredictRequest::Many(rows) => rows,
        }
    }

    /// `{}` and `[]` carry no input
    pub fn is_empty(&self) -> bool {
        match self {
            PredictRequest::One(row) => row.is_empty(),
            PredictRequest::Many(rows) => rows.is_empty(),
        }
    }
}
