//! One-hot encoding for categorical columns
//!
//! Categories are sorted lexicographically (so "33" sorts before "9").
//! Unknown categories and missing cells encode as all zeros.

use serde::{Deserialize, Serialize};

use crate::logic::schema::CellValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub column: String,
    /// Position of the column in the schema
    pub source: usize,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit<'a>(column: &str, source: usize, cells: impl Iterator<Item = &'a CellValue>) -> Self {
        let mut categories: Vec<String> = cells.filter_map(CellValue::category_key).collect();
        categories.sort();
        categories.dedup();

        Self {
            column: column.to_string(),
            source,
            categories,
        }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Index of the hot position for a cell, if its category is known
    pub fn hot_index(&self, cell: &CellValue) -> Option<usize> {
        let key = cell.category_key()?;
        self.categories.binary_search(&key).ok()
    }

    /// Write the encoding into `out` (length = `width()`)
    pub fn encode_into(&self, cell: &CellValue, out: &mut [f64]) {
        out.iter_mut().for_each(|v| *v = 0.0);
        if let Some(i) = self.hot_index(cell) {
            out[i] = 1.0;
        }
    }
}
