use std::collections::{BTreeMap, HashMap};
use std::ops::{Index, IndexMut};

use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::node::{count_overlap, TrieNode, TrieNodeIdx, ROOT};
use crate::node_arena::NodeArena;
use crate::trie_key::TrieKey;

/// A `TrieMap` is an ordered map from string keys to values, stored as a
/// path-compressed prefix tree.
///
/// Every node carries the run of characters that follows the edge leading to
/// it, so chains of single-child nodes collapse into one. Inserting a key that
/// diverges in the middle of such a run splits the node in two. Nodes live in
/// an arena and refer to each other by index.
///
/// # Features
///
/// - Lookups in O(k · log f), where k is the key length and f the fan-out
/// - Iteration in ascending key order, with no sorting step
/// - Prefix queries
/// - Entry API for in-place updates
///
/// # Examples
///
/// ```
/// use corpus_collections::TrieMap;
///
/// let mut map = TrieMap::new();
///
/// map.insert("apple", 1);
/// map.insert("app", 2);
/// map.insert("apply", 3);
///
/// assert_eq!(map.get("app"), Some(&2));
/// assert!(!map.contains_key("ap"));
///
/// let keys: Vec<String> = map.keys().collect();
/// assert_eq!(keys, vec!["app", "apple", "apply"]);
///
/// assert_eq!(map.remove("app"), Some(2));
/// assert_eq!(map.get("app"), None);
/// assert_eq!(map.get("apple"), Some(&1));
/// ```
#[derive(Clone)]
pub struct TrieMap<T> {
    pub(crate) data: Vec<Option<T>>,
    pub(crate) free_indices: Vec<usize>,
    pub(crate) arena: NodeArena,
    pub(crate) size: usize,
}

impl<T, K: TrieKey, const N: usize> From<[(K, T); N]> for TrieMap<T> {
    fn from(array: [(K, T); N]) -> Self {
        let mut trie = TrieMap::with_capacity(N);
        for (key, value) in array {
            trie.insert(key, value);
        }
        trie
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TrieMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for TrieMap<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }

        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for TrieMap<T> {}

impl<T, Q: ?Sized> Index<&Q> for TrieMap<T>
where
    Q: TrieKey,
{
    type Output = T;

    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<T, Q: ?Sized> IndexMut<&Q> for TrieMap<T>
where
    Q: TrieKey,
{
    fn index_mut(&mut self, key: &Q) -> &mut Self::Output {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<T, K: TrieKey> Extend<(K, T)> for TrieMap<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<T, K: TrieKey> FromIterator<(K, T)> for TrieMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut trie = TrieMap::new();
        trie.extend(iter);
        trie
    }
}

impl<T> From<HashMap<String, T>> for TrieMap<T> {
    fn from(map: HashMap<String, T>) -> Self {
        let mut trie = TrieMap::with_capacity(map.len());
        for (k, v) in map {
            trie.insert(k, v);
        }
        trie
    }
}

impl<T> From<BTreeMap<String, T>> for TrieMap<T> {
    fn from(map: BTreeMap<String, T>) -> Self {
        let mut trie = TrieMap::with_capacity(map.len());
        for (k, v) in map {
            trie.insert(k, v);
        }
        trie
    }
}

impl<T> From<TrieMap<T>> for BTreeMap<String, T> {
    fn from(trie: TrieMap<T>) -> Self {
        trie.into_iter().collect()
    }
}

impl<T> Default for TrieMap<T> {
    /// Creates a new empty `TrieMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let map: TrieMap<i32> = Default::default();
    /// assert!(map.is_empty());
    /// ```
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TrieMap<T> {
    /// Creates a new empty `TrieMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let map: TrieMap<i32> = TrieMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        TrieMap {
            data: Vec::new(),
            free_indices: Vec::new(),
            arena: NodeArena::new(),
            size: 0,
        }
    }

    /// Creates a new `TrieMap` with room for `capacity` values before the
    /// value storage reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        TrieMap {
            data: Vec::with_capacity(capacity),
            free_indices: Vec::new(),
            arena: NodeArena::new(),
            size: 0,
        }
    }

    /// Returns the number of keys in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert("a", 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of nodes in the tree, root included.
    ///
    /// Plain [`remove`](Self::remove) leaves valueless nodes behind; this count
    /// shows how much structure [`compact`](Self::compact) can reclaim.
    pub fn node_count(&self) -> usize {
        self.arena.live_nodes()
    }

    /// Removes all keys from the map.
    pub fn clear(&mut self) {
        self.data.clear();
        self.free_indices.clear();
        self.arena.clear();
        self.size = 0;
    }

    fn store_value(&mut self, value: T) -> usize {
        if let Some(free_idx) = self.free_indices.pop() {
            self.data[free_idx] = Some(value);
            free_idx
        } else {
            self.data.push(Some(value));
            self.data.len() - 1
        }
    }

    fn take_value(&mut self, data_idx: usize) -> Option<T> {
        let value = self.data[data_idx].take();
        if value.is_some() {
            self.free_indices.push(data_idx);
        }
        value
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns the value previously mapped to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// assert_eq!(map.insert("cat", 1), None);
    /// assert_eq!(map.insert("car", 2), None);
    /// assert_eq!(map.insert("cat", 3), Some(1));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert<K: TrieKey>(&mut self, key: K, value: T) -> Option<T> {
        let key: Vec<char> = key.key_chars().collect();
        self.insert_chars(&key, value).1
    }

    /// Inserts `value` under `key`, returning the slot now holding it and the
    /// value it displaced.
    pub(crate) fn insert_chars(&mut self, key: &[char], value: T) -> (usize, Option<T>) {
        let mut current = ROOT;
        let mut pos = 0;

        loop {
            let node = self.arena.get_node(current);
            let prefix_len = node.prefix.len();
            let overlap = count_overlap(&node.prefix, &key[pos..]);

            if overlap < prefix_len {
                let data_idx = self.split_node(current, overlap, &key[pos..], value);
                self.size += 1;
                return (data_idx, None);
            }
            pos += prefix_len;

            if pos == key.len() {
                return self.replace_value(current, value);
            }

            let label = key[pos];
            match self.arena.get_child_idx(current, label) {
                Some(child) => {
                    current = child;
                    pos += 1;
                }
                None => {
                    let data_idx = self.store_value(value);
                    let leaf = TrieNode::with_prefix(key[pos + 1..].into(), Some(data_idx));
                    let leaf_idx = self.arena.allocate(leaf);
                    self.arena.add_child(current, label, leaf_idx);
                    self.size += 1;
                    return (data_idx, None);
                }
            }
        }
    }

    /// Splits `node_idx` after `overlap` characters of its prefix and hangs
    /// the new key below (or on) the shortened node.
    ///
    /// `rest` is the part of the key that starts where the node's prefix does.
    fn split_node(&mut self, node_idx: TrieNodeIdx, overlap: usize, rest: &[char], value: T) -> usize {
        let node = self.arena.get_node_mut(node_idx);
        let old_prefix = std::mem::take(&mut node.prefix);
        let distinguishing = old_prefix[overlap];

        let tail = TrieNode {
            prefix: old_prefix[overlap + 1..].into(),
            children: std::mem::take(&mut node.children),
            data_idx: node.data_idx.take(),
        };
        node.prefix = old_prefix[..overlap].into();

        let tail_idx = self.arena.allocate(tail);
        self.arena.add_child(node_idx, distinguishing, tail_idx);

        let data_idx = self.store_value(value);
        if overlap == rest.len() {
            // The new key ends exactly where the shared run does.
            self.arena.get_node_mut(node_idx).data_idx = Some(data_idx);
        } else {
            let leaf = TrieNode::with_prefix(rest[overlap + 1..].into(), Some(data_idx));
            let leaf_idx = self.arena.allocate(leaf);
            self.arena.add_child(node_idx, rest[overlap], leaf_idx);
        }

        log::trace!(
            "split node {} after {} of {} prefix chars",
            node_idx.0,
            overlap,
            old_prefix.len()
        );
        data_idx
    }

    fn replace_value(&mut self, node_idx: TrieNodeIdx, value: T) -> (usize, Option<T>) {
        match self.arena.get_node(node_idx).data_idx {
            Some(data_idx) => (data_idx, self.data[data_idx].replace(value)),
            None => {
                let data_idx = self.store_value(value);
                self.arena.get_node_mut(node_idx).data_idx = Some(data_idx);
                self.size += 1;
                (data_idx, None)
            }
        }
    }

    /// Walks the key through the tree without modifying it.
    ///
    /// Returns the node the key ends on, terminal or not.
    fn find_node(&self, mut chars: impl Iterator<Item = char>) -> Option<TrieNodeIdx> {
        let mut current = ROOT;
        loop {
            let node = self.arena.get_node(current);
            for &expected in node.prefix.iter() {
                if chars.next() != Some(expected) {
                    return None;
                }
            }
            match chars.next() {
                None => return Some(current),
                Some(label) => current = self.arena.get_child_idx(current, label)?,
            }
        }
    }

    /// Like [`find_node`](Self::find_node), also recording each `(parent, label)` edge taken.
    fn find_path(&self, mut chars: impl Iterator<Item = char>) -> Option<(TrieNodeIdx, Vec<(TrieNodeIdx, char)>)> {
        let mut current = ROOT;
        let mut path = Vec::new();
        loop {
            let node = self.arena.get_node(current);
            for &expected in node.prefix.iter() {
                if chars.next() != Some(expected) {
                    return None;
                }
            }
            match chars.next() {
                None => return Some((current, path)),
                Some(label) => {
                    let child = self.arena.get_child_idx(current, label)?;
                    path.push((current, label));
                    current = child;
                }
            }
        }
    }

    pub(crate) fn find_data_idx<K: TrieKey>(&self, key: &K) -> Option<usize> {
        let node = self.find_node(key.key_chars())?;
        self.arena
            .get_node(node)
            .data_idx
            .filter(|&idx| self.data[idx].is_some())
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("cat", 1);
    /// map.insert("car", 2);
    /// assert_eq!(map.get("cat"), Some(&1));
    /// assert_eq!(map.get("ca"), None);
    /// ```
    pub fn get<K: TrieKey>(&self, key: K) -> Option<&T> {
        let data_idx = self.find_data_idx(&key)?;
        self.data[data_idx].as_ref()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<K: TrieKey>(&mut self, key: K) -> Option<&mut T> {
        let data_idx = self.find_data_idx(&key)?;
        self.data[data_idx].as_mut()
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<K: TrieKey>(&self, key: K) -> bool {
        self.find_data_idx(&key).is_some()
    }

    /// Returns an entry representing a key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::{TrieMap, Entry};
    /// let mut counts = TrieMap::new();
    ///
    /// for word in ["to", "be", "or", "not", "to", "be"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(counts.get("to"), Some(&2));
    /// assert_eq!(counts.get("not"), Some(&1));
    /// ```
    pub fn entry<K: TrieKey>(&mut self, key: K) -> Entry<'_, T> {
        let key = key.to_key_string();
        match self.find_data_idx(&key) {
            Some(data_idx) => Entry::Occupied(OccupiedEntry {
                trie: self,
                key,
                data_idx,
            }),
            None => Entry::Vacant(VacantEntry { trie: self, key }),
        }
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// Only the value is cleared; the node that held it stays in the tree.
    /// Use [`remove_and_compact`](Self::remove_and_compact) to also merge the
    /// nodes the key no longer needs, or [`compact`](Self::compact) to tidy
    /// the whole tree later.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    ///
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// ```
    pub fn remove<K: TrieKey>(&mut self, key: K) -> Option<T> {
        let node_idx = self.find_node(key.key_chars())?;
        self.clear_node_value(node_idx)
    }

    fn clear_node_value(&mut self, node_idx: TrieNodeIdx) -> Option<T> {
        let data_idx = self.arena.get_node_mut(node_idx).data_idx.take()?;
        let value = self.take_value(data_idx);
        if value.is_some() {
            self.size -= 1;
        }
        value
    }

    /// Removes a key from the map and merges the nodes along its path that
    /// no longer carry a value or a branch.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("cat", 1);
    /// map.insert("car", 2);
    /// let nodes = map.node_count();
    ///
    /// assert_eq!(map.remove_and_compact("car"), Some(2));
    /// assert!(map.node_count() < nodes);
    /// assert_eq!(map.get("cat"), Some(&1));
    /// ```
    pub fn remove_and_compact<K: TrieKey>(&mut self, key: K) -> Option<T> {
        let (node_idx, mut path) = self.find_path(key.key_chars())?;
        let value = self.clear_node_value(node_idx)?;

        let mut current = node_idx;
        while current != ROOT && !self.arena.get_node(current).is_terminal() {
            if self.arena.has_children(current) {
                self.arena.merge_with_only_child(current);
                break;
            }
            let Some((parent, label)) = path.pop() else {
                break;
            };
            self.arena.remove_child(parent, label);
            self.arena.release(current);
            log::trace!("detached empty node {} from {}", current.0, parent.0);
            current = parent;
        }

        Some(value)
    }

    /// Restores maximal compression after plain [`remove`](Self::remove)s.
    ///
    /// Detaches every valueless leaf and merges every valueless node that has
    /// a single child into that child. Returns the number of nodes reclaimed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("apple", 1);
    /// map.insert("application", 2);
    ///
    /// map.remove("apple");
    /// map.remove("application");
    ///
    /// assert!(map.compact() > 0);
    /// assert_eq!(map.node_count(), 1);
    /// assert_eq!(map.compact(), 0);
    /// ```
    pub fn compact(&mut self) -> usize {
        fn compact_node(arena: &mut NodeArena, node_idx: TrieNodeIdx, reclaimed: &mut usize) {
            let children = arena.get_node(node_idx).children.clone();
            for (label, child_idx) in children {
                compact_node(arena, child_idx, reclaimed);

                let child = arena.get_node(child_idx);
                if !child.is_terminal() && child.child_len() == 0 {
                    arena.remove_child(node_idx, label);
                    arena.release(child_idx);
                    *reclaimed += 1;
                }
            }

            if arena.merge_with_only_child(node_idx) {
                *reclaimed += 1;
            }
        }

        let mut reclaimed = 0;
        compact_node(&mut self.arena, ROOT, &mut reclaimed);
        log::debug!(
            "compaction reclaimed {} nodes, {} remain",
            reclaimed,
            self.arena.live_nodes()
        );
        reclaimed
    }

    /// Returns an iterator over the key-value pairs of the map, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    ///
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, vec![("a".to_string(), &1), ("b".to_string(), &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            data: &self.data,
            iter: self.arena.keys_and_indices(ROOT),
        }
    }

    /// Returns an iterator over the keys of the map, in order.
    pub fn keys(&self) -> Keys<'_, T> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map, in key order.
    pub fn values(&self) -> Values<'_, T> {
        Values { inner: self.iter() }
    }

    /// Returns a mutable iterator over the key-value pairs of the map, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// for (_, value) in map.iter_mut() {
    ///     *value += 10;
    /// }
    ///
    /// assert_eq!(map.get("a"), Some(&11));
    /// assert_eq!(map.get("b"), Some(&12));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        // Keys are built as the walk advances; only the slot table is gathered here.
        IterMut {
            slots: self.data.iter_mut().map(Option::as_mut).collect(),
            iter: self.arena.keys_and_indices(ROOT),
            remaining: self.size,
        }
    }

    /// Returns a mutable iterator over the values of the map, in key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, T> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns an iterator over all key-value pairs whose key starts with
    /// `prefix`, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("apple", 1);
    /// map.insert("application", 2);
    /// map.insert("banana", 3);
    ///
    /// let mut iter = map.prefix_iter("appl");
    /// assert_eq!(iter.next(), Some(("apple".to_string(), &1)));
    /// assert_eq!(iter.next(), Some(("application".to_string(), &2)));
    /// assert!(iter.next().is_none());
    /// ```
    pub fn prefix_iter<K: TrieKey>(&self, prefix: K) -> Iter<'_, T> {
        let prefix: Vec<char> = prefix.key_chars().collect();
        Iter {
            data: &self.data,
            iter: self.arena.prefix_keys_and_indices(&prefix),
        }
    }

    /// Returns an iterator over all keys that start with `prefix`.
    pub fn prefix_keys<K: TrieKey>(&self, prefix: K) -> Keys<'_, T> {
        Keys {
            inner: self.prefix_iter(prefix),
        }
    }

    /// Returns an iterator over all values whose keys start with `prefix`.
    pub fn prefix_values<K: TrieKey>(&self, prefix: K) -> Values<'_, T> {
        Values {
            inner: self.prefix_iter(prefix),
        }
    }

    /// Returns `true` if any key in the map starts with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("apple", 1);
    ///
    /// assert!(map.starts_with("app"));
    /// assert!(map.starts_with("apple"));
    /// assert!(!map.starts_with("apples"));
    /// assert!(!map.starts_with("ban"));
    /// ```
    pub fn starts_with<K: TrieKey>(&self, prefix: K) -> bool {
        self.prefix_iter(prefix).next().is_some()
    }

    /// Retains only the entries specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    ///
    /// map.retain(|_, v| *v % 2 == 1);
    ///
    /// assert_eq!(map.len(), 2);
    /// assert!(!map.contains_key("b"));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut T) -> bool,
    {
        let rejected: Vec<String> = self
            .iter_mut()
            .filter_map(|(key, value)| (!f(&key, value)).then_some(key))
            .collect();

        for key in rejected {
            self.remove(&key);
        }
    }

    /// Removes every entry, returning them in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    ///
    /// let drained: Vec<_> = map.drain().collect();
    /// assert_eq!(drained, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> IntoIter<T> {
        std::mem::take(self).into_iter()
    }

    /// Gets the value for `key`, inserting the result of `f` first if absent.
    pub fn get_or_insert_with<K: TrieKey, F>(&mut self, key: K, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.entry(key).or_insert_with(f)
    }

    /// Returns a mutable reference to the value stored in `data_idx`.
    ///
    /// Only called with slots an entry has just checked or filled.
    pub(crate) fn slot_mut(&mut self, data_idx: usize) -> &mut T {
        self.data[data_idx]
            .as_mut()
            .expect("entry slot always holds a value")
    }
}
