//! Request and response bodies

pub mod predict;
pub mod student;

pub use predict::*;
pub use student::*;
