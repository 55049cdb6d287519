//! Maps from a key to a set of values.
//!
//! [`TreeMultiMap`] keeps keys ordered and backs the bounded collections;
//! [`HashMultiMap`] trades ordering for constant-time access.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;
use std::ops::RangeBounds;

use hashbrown::{HashMap, HashSet};

/// Operations shared by every multimap.
///
/// A multimap holds each `(key, value)` mapping at most once. [`len`](Self::len)
/// counts distinct keys while [`range`](Self::range) counts mappings.
pub trait MultiMap<K, V> {
    /// Adds a mapping, returning `true` if it was not already present.
    fn insert(&mut self, key: K, value: V) -> bool;

    /// Adds every value under `key`, returning `true` if any mapping was new.
    fn insert_many<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>;

    /// Removes a single mapping, returning `true` if it was present.
    ///
    /// A key whose last value is removed is dropped from the map.
    fn remove_mapping(&mut self, key: &K, value: &V) -> bool;

    /// Returns `true` if `key` maps to `value`.
    fn contains_mapping(&self, key: &K, value: &V) -> bool;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    /// Total number of key-value mappings.
    fn range(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A multimap backed by a hash map of hash sets. Iteration order is unspecified.
///
/// # Examples
///
/// ```
/// use corpus_collections::{HashMultiMap, MultiMap};
///
/// let mut senses = HashMultiMap::new();
/// senses.insert("bank", "river");
/// senses.insert("bank", "money");
/// senses.insert("bank", "river");
///
/// assert_eq!(senses.len(), 1);
/// assert_eq!(senses.range(), 2);
/// assert!(senses.contains_mapping(&"bank", &"money"));
/// ```
#[derive(Clone, Debug)]
pub struct HashMultiMap<K, V> {
    map: HashMap<K, HashSet<V>>,
    range: usize,
}

impl<K, V> Default for HashMultiMap<K, V> {
    fn default() -> Self {
        HashMultiMap {
            map: HashMap::new(),
            range: 0,
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> HashMultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values mapped to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&HashSet<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Removes `key` and every value mapped to it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<HashSet<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let values = self.map.remove(key)?;
        self.range -= values.len();
        Some(values)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns `true` if any key maps to `value`. Runs in time linear in the
    /// number of keys.
    pub fn contains_value(&self, value: &V) -> bool {
        self.map.values().any(|values| values.contains(value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Every value, once per mapping.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }

    /// Every `(key, value)` mapping.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.range = 0;
    }
}

impl<K: Eq + Hash, V: Eq + Hash> MultiMap<K, V> for HashMultiMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> bool {
        let added = self.map.entry(key).or_default().insert(value);
        if added {
            self.range += 1;
        }
        added
    }

    fn insert_many<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let set = self.map.entry(key).or_default();
        let before = set.len();
        set.extend(values);
        let added = set.len() - before;
        self.range += added;
        added > 0
    }

    fn remove_mapping(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        if !values.remove(value) {
            return false;
        }
        if values.is_empty() {
            self.map.remove(key);
        }
        self.range -= 1;
        true
    }

    fn contains_mapping(&self, key: &K, value: &V) -> bool {
        self.map.get(key).is_some_and(|values| values.contains(value))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn range(&self) -> usize {
        self.range
    }
}

impl<K: Eq + Hash, V: Eq + Hash> FromIterator<(K, V)> for HashMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMultiMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Extend<(K, V)> for HashMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Which end of the key order an operation acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyEnd {
    First,
    Last,
}

/// A multimap with ordered keys, each mapped to an ordered set of values.
///
/// The number of mappings is maintained on every mutation, so
/// [`range`](MultiMap::range) is constant time.
///
/// # Examples
///
/// ```
/// use corpus_collections::{MultiMap, TreeMultiMap};
///
/// let mut by_length = TreeMultiMap::new();
/// for word in ["ox", "cat", "ant", "horse"] {
///     by_length.insert(word.len(), word);
/// }
///
/// assert_eq!(by_length.first_key(), Some(&2));
/// assert_eq!(by_length.last_key(), Some(&5));
///
/// let three: Vec<_> = by_length.range_iter(3..=3).map(|(_, w)| *w).collect();
/// assert_eq!(three, vec!["ant", "cat"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeMultiMap<K, V> {
    map: BTreeMap<K, BTreeSet<V>>,
    range: usize,
}

impl<K, V> Default for TreeMultiMap<K, V> {
    fn default() -> Self {
        TreeMultiMap {
            map: BTreeMap::new(),
            range: 0,
        }
    }
}

impl<K: Ord, V: Ord> TreeMultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values mapped to `key`, in order.
    pub fn get<Q>(&self, key: &Q) -> Option<&BTreeSet<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get(key)
    }

    /// Removes `key` and every value mapped to it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<BTreeSet<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let values = self.map.remove(key)?;
        self.range -= values.len();
        Some(values)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.map.values().any(|values| values.contains(value))
    }

    pub fn first_key(&self) -> Option<&K> {
        self.map.keys().next()
    }

    pub fn last_key(&self) -> Option<&K> {
        self.map.keys().next_back()
    }

    /// Removes the lowest key with all of its values.
    pub fn pop_first(&mut self) -> Option<(K, BTreeSet<V>)> {
        let (key, values) = self.map.pop_first()?;
        self.range -= values.len();
        Some((key, values))
    }

    /// Removes the highest key with all of its values.
    pub fn pop_last(&mut self) -> Option<(K, BTreeSet<V>)> {
        let (key, values) = self.map.pop_last()?;
        self.range -= values.len();
        Some((key, values))
    }

    /// Removes one value from the first or last key.
    ///
    /// `choose` receives the number of values under that key and returns the
    /// position, in value order, of the one to remove.
    pub(crate) fn remove_value_at(
        &mut self,
        end: KeyEnd,
        choose: impl FnOnce(usize) -> usize,
    ) -> Option<V> {
        let mut entry = match end {
            KeyEnd::First => self.map.first_entry()?,
            KeyEnd::Last => self.map.last_entry()?,
        };

        let values = entry.get_mut();
        let position = choose(values.len());
        let removed = if position == 0 {
            values.pop_first()
        } else if position + 1 == values.len() {
            values.pop_last()
        } else {
            let mut removed = None;
            let mut kept = BTreeSet::new();
            for (i, value) in std::mem::take(values).into_iter().enumerate() {
                if i == position {
                    removed = Some(value);
                } else {
                    kept.insert(value);
                }
            }
            *values = kept;
            removed
        };

        if values.is_empty() {
            entry.remove();
        }
        if removed.is_some() {
            self.range -= 1;
        }
        removed
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Every value in key order, once per mapping.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }

    /// Every `(key, value)` mapping in key order, then value order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.map
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    /// Each key with its full value set, in key order.
    pub fn value_sets(&self) -> impl DoubleEndedIterator<Item = (&K, &BTreeSet<V>)> + '_ {
        self.map.iter()
    }

    /// Every mapping whose key falls within `bounds`.
    pub fn range_iter<R>(&self, bounds: R) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_
    where
        R: RangeBounds<K>,
    {
        self.map
            .range(bounds)
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.range = 0;
    }
}

impl<K: Ord, V: Ord> MultiMap<K, V> for TreeMultiMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> bool {
        let added = self.map.entry(key).or_default().insert(value);
        if added {
            self.range += 1;
        }
        added
    }

    fn insert_many<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let set = self.map.entry(key).or_default();
        let before = set.len();
        set.extend(values);
        let added = set.len() - before;
        self.range += added;
        added > 0
    }

    fn remove_mapping(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        if !values.remove(value) {
            return false;
        }
        if values.is_empty() {
            self.map.remove(key);
        }
        self.range -= 1;
        true
    }

    fn contains_mapping(&self, key: &K, value: &V) -> bool {
        self.map.get(key).is_some_and(|values| values.contains(value))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn range(&self) -> usize {
        self.range
    }
}

impl<K: Ord, V: Ord> FromIterator<(K, V)> for TreeMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMultiMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V: Ord> Extend<(K, V)> for TreeMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
