//! Dataset Module - Student record store
//!
//! Loads the student table once at startup and serves lookups by the
//! synthetic identifier assigned at load time. Read-only after loading.

pub mod record;
pub mod store;


pub use record::StudentRecord;
pub use store::DatasetStore;
