//! Model Module - Classifier and attribution method
//!
//! The classifier is a CART decision tree over the transformed feature
//! space; the attribution method is exact tree SHAP over the same tree.

pub mod shap;
pub mod tree;

// Re-export common types
pub use shap::TreeExplainer;
pub use tree::{DecisionTree, Node, TreeConfig};
