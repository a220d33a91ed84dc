//! Feature Schema - Declared input columns
//!
//! **This file controls the input contract between callers and the pipeline**
//!
//! ## Rules (NEVER break these):
//! 1. Column order is the order the preprocessing pipeline was fitted on
//! 2. Every column carries its kind and the default used when a request omits it
//! 3. Change the encoding of this struct → increment SCHEMA_VERSION
//!
//! The layout hash covers the schema version, the naming convention version,
//! and every (name, kind) pair, so a persisted pipeline whose schema was
//! edited by hand is rejected at startup.

use std::collections::HashSet;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::value::{CellValue, RawRow};
use crate::constants::{NAMING_VERSION, SCHEMA_VERSION};

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// How the preprocessing pipeline treats an original column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Standard-scaled number
    Numerical,
    /// One-hot encoded category
    Categorical,
    /// Sensitive column kept as-is
    Passthrough,
}

impl FeatureKind {
    fn tag(self) -> u8 {
        match self {
            FeatureKind::Numerical => 0,
            FeatureKind::Categorical => 1,
            FeatureKind::Passthrough => 2,
        }
    }
}

/// One declared input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: FeatureKind,
    /// Fill value used when a row omits this column (or sends null)
    pub default: CellValue,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: FeatureKind, default: CellValue) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
        }
    }
}

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Ordered list of declared input columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u8,
    pub columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Original feature names in declared order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get column index by name (O(n) but columns are few)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column spec by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Reorder a raw row into declared column order.
    ///
    /// Columns the row omits (or sends as null) are filled with the column
    /// default. Columns the schema does not declare are ignored.
    pub fn align(&self, row: &RawRow) -> Vec<CellValue> {
        self.columns
            .iter()
            .map(|col| match row.get(&col.name) {
                Some(value) if !value.is_missing() => value.clone(),
                _ => col.default.clone(),
            })
            .collect()
    }

    /// Declared columns absent from a header (these will be default-filled)
    pub fn missing_from<'a>(&'a self, header: &[String]) -> Vec<&'a str> {
        let present: HashSet<&str> = header.iter().map(String::as_str).collect();
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| !present.contains(name))
            .collect()
    }

    /// CRC32 of the schema layout
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();

        hasher.update(&[self.version, NAMING_VERSION]);

        for col in &self.columns {
            hasher.update(col.name.as_bytes());
            hasher.update(&[0]); // Separator
            hasher.update(&[col.kind.tag()]);
        }

        hasher.finalize()
    }

    /// Validate a stored hash against this schema
    pub fn validate_layout(&self, expected_hash: u32) -> Result<(), LayoutMismatchError> {
        let actual_hash = self.layout_hash();

        if self.version != SCHEMA_VERSION || actual_hash != expected_hash {
            return Err(LayoutMismatchError {
                expected_version: SCHEMA_VERSION,
                expected_hash,
                actual_version: self.version,
                actual_hash,
            });
        }

        Ok(())
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout summary for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub schema_version: u8,
    pub naming_version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub transformed_count: usize,
    pub feature_names: Vec<String>,
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a schema doesn't match its recorded layout
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

// ============================================================================
// TESTS
// ============================================================================
