//! Cell values - one raw input value per (row, column)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A raw input row keyed by original column name
pub type RawRow = HashMap<String, CellValue>;

/// Raw cell as read from the dataset or a JSON request body
///
/// JSON mapping: number -> `Number`, string -> `Text`, null -> `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl CellValue {
    /// Parse a dataset cell (empty -> Missing, numeric -> Number, else Text)
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric view of the cell; text is parsed, missing and non-finite yield `None`
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Missing => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Canonical category string (whole numbers render without a fraction)
    pub fn category_key(&self) -> Option<String> {
        match self {
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{}", *v as i64))
            }
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Missing => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        assert_eq!(CellValue::parse("12.5"), CellValue::Number(12.5));
        assert_eq!(CellValue::parse("  "), CellValue::Missing);
        assert_eq!(CellValue::parse("Graduate"), CellValue::Text("Graduate".into()));
        assert_eq!(CellValue::parse("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn test_as_number_rejects_non_finite() {
        assert_eq!(CellValue::from(" 19 ").as_number(), Some(19.0));
        for text in ["NaN", "inf", "-inf", "infinity"] {
            assert_eq!(CellValue::from(text).as_number(), None, "{text}");
        }
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Missing.as_number(), None);
    }

    #[test]
    fn test_category_key() {
        assert_eq!(CellValue::Number(33.0).category_key().as_deref(), Some("33"));
        assert_eq!(CellValue::Number(0.5).category_key().as_deref(), Some("0.5"));
        assert_eq!(CellValue::from("9").category_key().as_deref(), Some("9"));
        assert_eq!(CellValue::Missing.category_key(), None);
    }

    #[test]
    fn test_json_mapping() {
        let row: RawRow = serde_json::from_str(r#"{"Age": 19, "Course": "33", "Gender": null}"#).unwrap();
        assert_eq!(row["Age"], CellValue::Number(19.0));
        assert_eq!(row["Course"], CellValue::Text("33".into()));
        assert_eq!(row["Gender"], CellValue::Missing);
    }
}
