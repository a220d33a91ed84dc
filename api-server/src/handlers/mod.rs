//! HTTP handlers

pub mod explain;
pub mod health;
pub mod model;
pub mod predict;
pub mod students;
