//! Feature Mapping - original feature -> transformed positions
//!
//! Built once when the pipeline is loaded, read-only afterwards and shared by
//! every request. Positions whose name does not resolve to a declared
//! original feature are dropped (logged, never an error).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::naming::TransformedName;

/// Positions occupied by one original feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedFeature {
    pub name: String,
    /// Ascending positions in the transformed vector
    pub positions: Vec<usize>,
}

/// Original feature name -> ordered transformed positions
///
/// Entries keep first-encounter order (by transformed position), which is
/// also the tie-break order used when ranking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureMapping {
    entries: Vec<MappedFeature>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    transformed_len: usize,
    dropped: Vec<usize>,
}

impl FeatureMapping {
    /// Build from the pipeline's typed output names
    pub fn build<S: AsRef<str>>(names: &[TransformedName], originals: &[S]) -> Self {
        let declared: HashSet<&str> = originals.iter().map(|s| s.as_ref()).collect();
        let mut mapping = FeatureMapping {
            transformed_len: names.len(),
            ..Default::default()
        };

        for (position, name) in names.iter().enumerate() {
            let original = name.original();
            if declared.contains(original) {
                mapping.push(original, position);
            } else {
                mapping.drop_position(position, &name.to_string());
            }
        }

        mapping
    }

    /// Build from rendered name strings (`num__x`, `cat__x_v`, `remainder__x`)
    pub fn from_raw_names<S: AsRef<str>, T: AsRef<str>>(raw_names: &[S], originals: &[T]) -> Self {
        let declared: HashSet<&str> = originals.iter().map(|s| s.as_ref()).collect();
        let mut mapping = FeatureMapping {
            transformed_len: raw_names.len(),
            ..Default::default()
        };

        for (position, raw) in raw_names.iter().enumerate() {
            let raw = raw.as_ref();
            match TransformedName::parse(raw, originals) {
                Some(name) if declared.contains(name.original()) => {
                    mapping.push(name.original(), position);
                }
                _ => mapping.drop_position(position, raw),
            }
        }

        mapping
    }

    fn push(&mut self, original: &str, position: usize) {
        match self.index.get(original) {
            Some(&slot) => self.entries[slot].positions.push(position),
            None => {
                self.index.insert(original.to_string(), self.entries.len());
                self.entries.push(MappedFeature {
                    name: original.to_string(),
                    positions: vec![position],
                });
            }
        }
    }

    fn drop_position(&mut self, position: usize, raw: &str) {
        log::warn!(
            "Transformed feature '{}' (position {}) does not map to a declared column, excluded from explanations",
            raw,
            position
        );
        self.dropped.push(position);
    }

    /// Mapped features in insertion order
    pub fn entries(&self) -> &[MappedFeature] {
        &self.entries
    }

    /// Positions for one original feature
    pub fn positions(&self, original: &str) -> Option<&[usize]> {
        self.index
            .get(original)
            .map(|&slot| self.entries[slot].positions.as_slice())
    }

    /// Length of the transformed vector this mapping was built for
    pub fn transformed_len(&self) -> usize {
        self.transformed_len
    }

    /// Positions excluded because their name did not resolve
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Number of mapped original features
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
