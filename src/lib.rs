//! Set-trie containers with fast subset and superset queries.
//!
//! This crate provides a `SetTrie`, which stores a collection of sets, and
//! the set-keyed maps `SetTrieMap` and `SetTrieMultiMap` built on the same
//! trie. A set is stored as the path of its elements in ascending order, so
//! sets sharing their smallest elements share nodes.
//!
//! # Features
//!
//! - Exact membership and lookup in O(n log b) for a set of n elements and
//!   b children per node
//! - Superset and subset existence checks that prune the search by element
//!   order
//! - Lazy superset and subset iterators yielding sets in ascending order
//! - Removal that prunes branches no stored set uses
//! - Indented tree dumps for debugging

mod engine;
mod error;
mod format;
mod iter;
mod node;
mod node_pool;
mod set_trie;
mod set_trie_map;
mod set_trie_multimap;

pub use error::{Result, SetTrieError};
pub use format::TreeFormat;
pub use iter::{MatchKeys, MatchValues, Matches, MultiMatches, MultiValues, Sets};
pub use set_trie::SetTrie;
pub use set_trie_map::SetTrieMap;
pub use set_trie_multimap::SetTrieMultiMap;

#[cfg(test)]
mod proptest_settrie;
