//! Schema Module - declared input columns and raw cell values

pub mod layout;
pub mod value;

pub use layout::{ColumnSpec, FeatureKind, FeatureSchema, LayoutInfo, LayoutMismatchError};
pub use value::{CellValue, RawRow};
