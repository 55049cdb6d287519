//! Collections for corpus statistics and top-K retrieval.
//!
//! This crate provides:
//!
//! - [`TrieMap`], an ordered string-keyed map stored as a path-compressed
//!   prefix tree, with prefix queries and an entry API
//! - [`BoundedSortedMap`] and [`BoundedSortedMultiMap`], ordered containers
//!   that keep only the highest (or lowest) `K` keys or mappings seen
//! - [`SparseDoubleArray`] and [`SparseIntArray`], numeric arrays storing only
//!   their non-zero entries
//! - supporting types: [`HashIndexer`] for dense ids, [`TreeMultiMap`] and
//!   [`HashMultiMap`], [`ObjectCounter`] and [`HashBiMap`]
//!
//! None of the collections synchronize internally, except [`SharedIndexer`].
//! Fallible operations return [`Result`] with a [`CollectionError`].
//!
//! # Example
//!
//! ```
//! use corpus_collections::{BoundedOptions, BoundedSortedMultiMap, MultiMap, Score, TrieMap};
//!
//! let mut frequencies = TrieMap::new();
//! for word in "the cat sat on the mat".split(' ') {
//!     *frequencies.entry(word).or_insert(0) += 1;
//! }
//!
//! let mut top = BoundedSortedMultiMap::new(BoundedOptions::new(1)).unwrap();
//! for (word, count) in frequencies.iter() {
//!     top.insert(Score(f64::from(*count)), word);
//! }
//! assert_eq!(top.iter().next().map(|(_, w)| w.as_str()), Some("the"));
//! ```

mod bimap;
mod bounded;
mod counter;
mod entry;
mod error;
mod indexer;
mod iter;
mod multimap;
mod node;
mod node_arena;
mod sparse_array;
mod trie_key;
mod trie_map;

pub use bimap::HashBiMap;
pub use bounded::{BoundPolicy, BoundedOptions, BoundedSortedMap, BoundedSortedMultiMap, Retention, Score};
pub use counter::ObjectCounter;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{CollectionError, Result};
pub use indexer::{HashIndexer, SharedIndexer};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use multimap::{HashMultiMap, MultiMap, TreeMultiMap};
pub use sparse_array::{Accumulate, SparseDoubleArray, SparseIntArray, SparseNumericArray};
pub use trie_key::TrieKey;
pub use trie_map::TrieMap;

#[cfg(test)]
mod proptests;
