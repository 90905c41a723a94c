//! # levelwise
//!
//! Level-wise (Apriori) mining of frequent item sets from transaction
//! databases.
//!
//! A transaction is a set of item ids; a set is frequent when at least
//! `min_support` transactions contain it. The miner enumerates all
//! frequent sets with a prefix tree of support counters that grows one
//! level per pass: candidate extensions are pruned through the downward
//! closure of support, and counting runs against a prefix-compacted
//! transaction tree so duplicate and shared-prefix transactions are
//! handled once.
//!
//! ## Example
//!
//! ```rust
//! use levelwise::apriori_algorithm;
//!
//! let transactions = vec![vec![1, 2, 3], vec![1, 2], vec![2, 3]];
//! let levels = apriori_algorithm(&transactions, 2, None);
//!
//! let pairs = &levels[1];
//! assert_eq!(pairs.len(), 2); // {1,2} and {2,3}
//! ```

pub mod apriori;

pub use apriori::{apriori_algorithm, FilterMode, FrequentLevel, IsTree, MinerError};

#[cfg(test)]
mod proptests;
