use serde::{Deserialize, Serialize};

use crate::logic::schema::RawRow;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Synthetic identifier assigned at load time (1-based, file order)
    pub id: u64,

    // ✅ Raw feature values keyed by column name
    pub values: RawRow,

    // ✅ Recorded outcome, when the dataset carries one
    pub target: Option<String>,
}
