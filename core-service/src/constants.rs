//! Central Configuration Constants
//!
//! Single source of truth for schema, naming and serving defaults.
//! To change how the pipeline names its output columns, only edit this file
//! (and bump `NAMING_VERSION`).

/// Number of entries returned by the global explanation
pub const GLOBAL_TOP_K: usize = 10;

/// Number of entries returned by a local (single student) explanation
pub const LOCAL_TOP_K: usize = 5;

/// Default dataset file
pub const DEFAULT_DATA_FILENAME: &str = "data.csv";

/// Default persisted pipeline file
pub const DEFAULT_MODEL_FILENAME: &str = "model_pipeline.json";

/// Dataset field delimiter
pub const CSV_DELIMITER: u8 = b';';

/// Dataset quote character
pub const CSV_QUOTE: u8 = b'"';

/// Label column in the dataset
pub const TARGET_COLUMN: &str = "Target";

/// First synthetic student identifier assigned at load time
pub const FIRST_RECORD_ID: u64 = 1;

// ============================================
// Naming convention (transformed feature names)
// ============================================

/// Naming convention version
/// MUST be incremented when prefixes or separators change
pub const NAMING_VERSION: u8 = 1;

/// Stage prefix for standard-scaled numerical columns
pub const SCALED_PREFIX: &str = "num";

/// Stage prefix for one-hot encoded categorical columns
pub const ENCODED_PREFIX: &str = "cat";

/// Stage prefix for passthrough (remainder) columns
pub const PASSTHROUGH_PREFIX: &str = "remainder";

/// Separator between stage prefix and column name
pub const STAGE_SEPARATOR: &str = "__";

/// Separator between base column name and category value
pub const CATEGORY_SEPARATOR: char = '_';

// ============================================
// Schema
// ============================================

/// Feature schema version
/// MUST be incremented when the schema encoding changes
pub const SCHEMA_VERSION: u8 = 1;

/// Sensitive features: passed through untouched instead of scaled/encoded
pub const DEFAULT_SENSITIVE_FEATURES: &[&str] = &[
    "Marital status",
    "Application mode",
    "Course",
    "Previous qualification",
    "Nacionality",
    "Mother's qualification",
    "Educational special needs",
    "Tuition fees up to date",
    "Gender",
    "Age at enrollment",
    "International",
];

// ============================================
// Outcome labels
// ============================================

/// Label predicted for students expected to drop out
pub const LABEL_DROPOUT: &str = "Dropout";

/// Label predicted for students expected to extend their studies
pub const LABEL_ENROLLED: &str = "Enrolled";

/// Label predicted for students expected to graduate on time
pub const LABEL_GRADUATE: &str = "Graduate";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Studata";
