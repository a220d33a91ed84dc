//! Column Transformer - schema-aligned rows -> transformed matrix
//!
//! Output layout (fixed at fit time):
//! 1. scaled numerical columns, in schema order
//! 2. one-hot blocks for categorical columns, in schema order
//! 3. passthrough columns, in schema order

use ndarray::{aview1, Array2};
use serde::{Deserialize, Serialize};

use super::encoder::OneHotEncoder;
use super::scaler::{numeric_cell, StandardScaler};
use crate::error::{CoreError, CoreResult};
use crate::logic::features::TransformedName;
use crate::logic::schema::{CellValue, FeatureKind, FeatureSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassthroughColumn {
    pub column: String,
    pub source: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    n_inputs: usize,
    scaled: Vec<StandardScaler>,
    encoded: Vec<OneHotEncoder>,
    passthrough: Vec<PassthroughColumn>,
}

impl Preprocessor {
    /// Fit on rows already aligned to `schema` (see `FeatureSchema::align`)
    pub fn fit(schema: &FeatureSchema, rows: &[Vec<CellValue>]) -> CoreResult<Self> {
        if rows.is_empty() {
            return Err(CoreError::EmptyTrainingSet);
        }

        let mut scaled = Vec::new();
        let mut encoded = Vec::new();
        let mut passthrough = Vec::new();

        for (source, col) in schema.columns.iter().enumerate() {
            match col.kind {
                FeatureKind::Numerical => {
                    let values = rows
                        .iter()
                        .map(|row| numeric_cell(&col.name, &row[source]))
                        .collect::<CoreResult<Vec<f64>>>()?;
                    scaled.push(StandardScaler::fit(&col.name, source, &values));
                }
                FeatureKind::Categorical => {
                    encoded.push(OneHotEncoder::fit(
                        &col.name,
                        source,
                        rows.iter().map(|row| &row[source]),
                    ));
                }
                FeatureKind::Passthrough => passthrough.push(PassthroughColumn {
                    column: col.name.clone(),
                    source,
                }),
            }
        }

        let preprocessor = Self {
            n_inputs: schema.len(),
            scaled,
            encoded,
            passthrough,
        };
        log::debug!(
            "Preprocessor fitted: {} scaled, {} encoded ({} outputs), {} passthrough",
            preprocessor.scaled.len(),
            preprocessor.encoded.len(),
            preprocessor.encoded.iter().map(OneHotEncoder::width).sum::<usize>(),
            preprocessor.passthrough.len()
        );
        Ok(preprocessor)
    }

    /// Number of transformed features
    pub fn output_len(&self) -> usize {
        self.scaled.len()
            + self.encoded.iter().map(OneHotEncoder::width).sum::<usize>()
            + self.passthrough.len()
    }

    /// Tagged name of every output position, in output order
    pub fn output_names(&self) -> Vec<TransformedName> {
        let mut names = Vec::with_capacity(self.output_len());
        names.extend(self.scaled.iter().map(|s| TransformedName::scaled(&s.column)));
        for encoder in &self.encoded {
            names.extend(
                encoder
                    .categories
                    .iter()
                    .map(|category| TransformedName::encoded(&encoder.column, category)),
            );
        }
        names.extend(self.passthrough.iter().map(|p| TransformedName::passthrough(&p.column)));
        names
    }

    /// Transform aligned rows into a `[rows, output_len]` matrix
    pub fn transform(&self, rows: &[Vec<CellValue>]) -> CoreResult<Array2<f64>> {
        let mut out = Array2::zeros((rows.len(), self.output_len()));
        let mut values = vec![0.0; self.output_len()];

        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.n_inputs {
                return Err(CoreError::FeatureCountMismatch {
                    expected: self.n_inputs,
                    got: row.len(),
                });
            }

            let mut offset = 0;

            for scaler in &self.scaled {
                values[offset] = scaler.transform(&row[scaler.source])?;
                offset += 1;
            }
            for encoder in &self.encoded {
                let width = encoder.width();
                encoder.encode_into(&row[encoder.source], &mut values[offset..offset + width]);
                offset += width;
            }
            for column in &self.passthrough {
                values[offset] = numeric_cell(&column.column, &row[column.source])?;
                offset += 1;
            }
            out.row_mut(i).assign(&aview1(&values));
        }

        Ok(out)
    }
}
