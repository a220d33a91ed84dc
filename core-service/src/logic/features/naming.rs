//! Transformed Feature Names
//!
//! Every position in the preprocessing output carries a tagged name:
//! - `Scaled(name)` renders as `num__<name>`
//! - `Encoded { base, category }` renders as `cat__<base>_<category>`
//! - `Passthrough(name)` renders as `remainder__<name>`
//!
//! The pipeline produces the typed variant directly, so resolving a position
//! back to its original column never needs string surgery. `parse` exists for
//! name lists that arrive as plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATEGORY_SEPARATOR, ENCODED_PREFIX, PASSTHROUGH_PREFIX, SCALED_PREFIX, STAGE_SEPARATOR,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum TransformedName {
    Scaled { name: String },
    Encoded { base: String, category: String },
    Passthrough { name: String },
}

impl TransformedName {
    pub fn scaled(name: impl Into<String>) -> Self {
        TransformedName::Scaled { name: name.into() }
    }

    pub fn encoded(base: impl Into<String>, category: impl Into<String>) -> Self {
        TransformedName::Encoded {
            base: base.into(),
            category: category.into(),
        }
    }

    pub fn passthrough(name: impl Into<String>) -> Self {
        TransformedName::Passthrough { name: name.into() }
    }

    /// Name of the original column this position came from
    pub fn original(&self) -> &str {
        match self {
            TransformedName::Scaled { name } | TransformedName::Passthrough { name } => name,
            TransformedName::Encoded { base, .. } => base,
        }
    }

    /// Decode a rendered name.
    ///
    /// For encoded names the base is the longest declared original name
    /// followed by the category separator; when none matches, the last
    /// underscore-delimited segment is taken as the category. Unknown stage
    /// prefixes return `None`.
    pub fn parse<S: AsRef<str>>(raw: &str, declared: &[S]) -> Option<Self> {
        let (stage, rest) = raw.split_once(STAGE_SEPARATOR)?;

        match stage {
            SCALED_PREFIX => Some(Self::scaled(rest)),
            PASSTHROUGH_PREFIX => Some(Self::passthrough(rest)),
            ENCODED_PREFIX => {
                let declared_base = declared
                    .iter()
                    .map(|s| s.as_ref())
                    .filter(|base| {
                        rest.len() > base.len()
                            && rest.starts_with(base)
                            && rest[base.len()..].starts_with(CATEGORY_SEPARATOR)
                    })
                    .max_by_key(|base| base.len());

                match declared_base {
                    Some(base) => Some(Self::encoded(base, &rest[base.len() + 1..])),
                    None => {
                        let (base, category) = rest.rsplit_once(CATEGORY_SEPARATOR)?;
                        Some(Self::encoded(base, category))
                    }
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for TransformedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformedName::Scaled { name } => {
                write!(f, "{SCALED_PREFIX}{STAGE_SEPARATOR}{name}")
            }
            TransformedName::Encoded { base, category } => {
                write!(f, "{ENCODED_PREFIX}{STAGE_SEPARATOR}{base}{CATEGORY_SEPARATOR}{category}")
            }
            TransformedName::Passthrough { name } => {
                write!(f, "{PASSTHROUGH_PREFIX}{STAGE_SEPARATOR}{name}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECLARED: &[&str] = &["Age", "Course", "Gender", "Course_type"];

    #[test]
    fn test_render() {
        assert_eq!(TransformedName::scaled("Age").to_string(), "num__Age");
        assert_eq!(TransformedName::encoded("Course", "33").to_string(), "cat__Course_33");
        assert_eq!(TransformedName::passthrough("Gender").to_string(), "remainder__Gender");
    }

    #[test]
    fn test_parse_each_stage() {
        assert_eq!(TransformedName::parse("num__Age", DECLARED), Some(TransformedName::scaled("Age")));
        assert_eq!(
            TransformedName::parse("cat__Course_9", DECLARED),
            Some(TransformedName::encoded("Course", "9"))
        );
        assert_eq!(
            TransformedName::parse("remainder__Gender", DECLARED),
            Some(TransformedName::passthrough("Gender"))
        );
    }

    #[test]
    fn test_parse_prefers_longest_declared_base() {
        // "Course_type_evening" must resolve to Course_type, not Course
        assert_eq!(
            TransformedName::parse("cat__Course_type_evening", DECLARED),
            Some(TransformedName::encoded("Course_type", "evening"))
        );
    }

    #[test]
    fn test_parse_category_with_underscore() {
        assert_eq!(
            TransformedName::parse("cat__Course_night_shift", DECLARED),
            Some(TransformedName::encoded("Course", "night_shift"))
        );
    }

    #[test]
    fn test_parse_undeclared_falls_back_to_last_segment() {
        assert_eq!(
            TransformedName::parse("cat__Mother_job_teacher", DECLARED),
            Some(TransformedName::encoded("Mother_job", "teacher"))
        );
    }

    #[test]
    fn test_parse_unknown_prefix() {
        assert_eq!(TransformedName::parse("poly__Age", DECLARED), None);
        assert_eq!(TransformedName::parse("Age", DECLARED), None);
        assert_eq!(TransformedName::parse("cat__Course", &["Course"]), None);
    }

    #[test]
    fn test_original() {
        assert_eq!(TransformedName::encoded("Course", "33").original(), "Course");
        assert_eq!(TransformedName::passthrough("Gender").original(), "Gender");
    }
}
