//! Standard scaling for numerical columns

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::logic::schema::CellValue;

/// `(x - mean) / scale` for one input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub column: String,
    /// Position of the column in the schema
    pub source: usize,
    pub mean: f64,
    /// Population standard deviation (1.0 when the column is constant)
    pub scale: f64,
}

impl StandardScaler {
    pub fn fit(column: &str, source: usize, values: &[f64]) -> Self {
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Self {
            column: column.to_string(),
            source,
            mean,
            scale: if std > f64::EPSILON { std } else { 1.0 },
        }
    }

    pub fn transform(&self, cell: &CellValue) -> CoreResult<f64> {
        Ok((numeric_cell(&self.column, cell)? - self.mean) / self.scale)
    }
}

/// Numeric view of a cell, or `InvalidCell` naming the column
pub fn numeric_cell(column: &str, cell: &CellValue) -> CoreResult<f64> {
    cell.as_number().ok_or_else(|| CoreError::InvalidCell {
        column: column.to_string(),
        value: match cell {
            CellValue::Text(s) => s.clone(),
            _ => "null".to_string(),
        },
    })
}
