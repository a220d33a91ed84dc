use std::path::Path;

use crate::constants::{CSV_DELIMITER, CSV_QUOTE, FIRST_RECORD_ID, TARGET_COLUMN};
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::record::StudentRecord;
use crate::logic::schema::{CellValue, RawRow};

/// In-memory student table, loaded once and never mutated afterwards
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    columns: Vec<String>,
    records: Vec<StudentRecord>,
}

impl DatasetStore {
    /// Read a `;`-delimited dataset with a header row.
    ///
    /// The target column (if present) is split out of the feature values;
    /// records get sequential ids starting at 1 in file order.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| CoreError::DatasetIo {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(CSV_DELIMITER)
            .quote(CSV_QUOTE)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let header: Vec<String> = rdr
            .headers()
            .map_err(|e| CoreError::DatasetParse {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CoreError::DatasetParse {
                path: path.to_path_buf(),
                source: e,
            })?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if rows.is_empty() {
            return Err(CoreError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }

        let store = Self::from_rows(header, rows);

        log::info!(
            "Dataset '{}' loaded: {} records, {} feature columns",
            path.display(),
            store.len(),
            store.columns.len()
        );
        Ok(store)
    }

    /// Build from a header and raw string rows (same rules as `load`)
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let target_index = header.iter().position(|h| h == TARGET_COLUMN);
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != target_index)
            .map(|(_, h)| h.clone())
            .collect();

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let mut values = RawRow::with_capacity(columns.len());
                let mut target = None;
                for (j, cell) in row.iter().enumerate() {
                    let Some(name) = header.get(j) else { continue };
                    if Some(j) == target_index {
                        let label = cell.trim();
                        target = (!label.is_empty()).then(|| label.to_string());
                    } else {
                        values.insert(name.clone(), CellValue::parse(cell));
                    }
                }
                StudentRecord {
                    id: FIRST_RECORD_ID + i as u64,
                    values,
                    target,
                }
            })
            .collect();

        Self {
            columns,
            records,
        }
    }

    /// Look up a record by its synthetic id
    pub fn get(&self, id: u64) -> CoreResult<&StudentRecord> {
        id.checked_sub(FIRST_RECORD_ID)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| self.records.get(offset))
            .ok_or(CoreError::RecordNotFound { id })
    }

    /// All records in id order
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Feature columns in file order (target excluded)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_target(&self) -> bool {
        self.records.iter().any(|r| r.target.is_some())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
