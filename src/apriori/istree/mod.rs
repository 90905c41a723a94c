//! Level-wise item set tree.
//!
//! The tree simultaneously indexes the candidate sets of the current
//! generation, counts their supports against transactions or a compacted
//! transaction tree, grows one level at a time with downward-closure
//! pruned candidate generation, and supports a post pass that reduces the
//! result to maximal or closed sets.

pub mod tree;
pub mod tree_ops;

pub use tree::{FilterMode, FrequentSets, IsTree};
