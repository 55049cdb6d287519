//! One-to-one maps that can be queried from either side.

use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;

use crate::error::{CollectionError, Result};

/// A bidirectional map: every key has one value and every value one key.
///
/// # Examples
///
/// ```
/// use corpus_collections::HashBiMap;
///
/// let mut ids = HashBiMap::new();
/// ids.insert("apple", 0);
/// ids.insert("pear", 1);
///
/// assert_eq!(ids.get(&"pear"), Some(&1));
/// assert_eq!(ids.get_by_value(&0), Some(&"apple"));
///
/// // Taking value 1 displaces the pair that held it.
/// ids.insert("plum", 1);
/// assert!(!ids.contains_key(&"pear"));
/// assert_eq!(ids.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashBiMap<K: Eq + Hash, V: Eq + Hash> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K: Eq + Hash, V: Eq + Hash> Default for HashBiMap<K, V> {
    fn default() -> Self {
        HashBiMap {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<K, V> HashBiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from pairs that must already be one-to-one.
    ///
    /// Repeating an identical pair is allowed; mapping a key to two values, or
    /// two keys to one value, is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use corpus_collections::{CollectionError, HashBiMap};
    ///
    /// assert!(HashBiMap::try_from_pairs([(1, 'a'), (2, 'b'), (1, 'a')]).is_ok());
    ///
    /// let err = HashBiMap::try_from_pairs([(1, 'a'), (2, 'a')]).unwrap_err();
    /// assert_eq!(err, CollectionError::NotBijective { pairs: 2, keys: 2, values: 1 });
    /// ```
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = HashBiMap::new();
        let mut pairs_seen = 0;
        let mut conflict = false;

        for (key, value) in pairs {
            pairs_seen += 1;
            if let Some(previous) = map.forward.insert(key.clone(), value.clone()) {
                conflict |= previous != value;
            }
            if let Some(previous) = map.backward.insert(value, key.clone()) {
                conflict |= previous != key;
            }
        }

        if conflict {
            return Err(CollectionError::NotBijective {
                pairs: pairs_seen,
                keys: map.forward.len(),
                values: map.backward.len(),
            });
        }
        Ok(map)
    }

    /// Maps `key` to `value`, returning the value `key` held before.
    ///
    /// Any other key already mapped to `value` is removed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.forward.get(&key) == Some(&value) {
            return Some(value);
        }
        if let Some(displaced_key) = self.backward.remove(&value) {
            self.forward.remove(&displaced_key);
        }

        let previous = self.forward.insert(key.clone(), value.clone());
        if let Some(previous) = &previous {
            self.backward.remove(previous);
        }
        self.backward.insert(value, key);
        previous
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(key)
    }

    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward.get(value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.forward.remove(key)?;
        self.backward.remove(&value);
        Some(value)
    }

    pub fn remove_by_value<Q>(&mut self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = self.backward.remove(value)?;
        self.forward.remove(&key);
        Some(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.contains_key(key)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward.contains_key(value)
    }

    /// Swaps the roles of keys and values.
    pub fn inverse(self) -> HashBiMap<V, K> {
        HashBiMap {
            forward: self.backward,
            backward: self.forward,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.forward.iter()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

impl<K, V> Extend<(K, V)> for HashBiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_displaces_conflicts() {
        let mut map = HashBiMap::new();
        assert_eq!(map.insert(1, 'a'), None);
        assert_eq!(map.insert(2, 'b'), None);
        assert_eq!(map.insert(1, 'a'), Some('a'));

        // Key 1 moves to 'b', displacing key 2.
        assert_eq!(map.insert(1, 'b'), Some('a'));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_by_value(&'b'), Some(&1));
        assert!(!map.contains_value(&'a'));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove_both_directions() {
        let mut map = HashBiMap::try_from_pairs([("x", 1), ("y", 2)]).unwrap();
        assert_eq!(map.remove(&"x"), Some(1));
        assert!(!map.contains_value(&1));
        assert_eq!(map.remove_by_value(&2), Some("y"));
        assert!(map.is_empty());
        assert_eq!(map.remove(&"x"), None);
    }

    #[test]
    fn test_inverse() {
        let map = HashBiMap::try_from_pairs([("one", 1), ("two", 2)]).unwrap();
        let inverse = map.inverse();
        assert_eq!(inverse.get(&2), Some(&"two"));
        assert_eq!(inverse.get_by_value(&"one"), Some(&1));
    }

    #[test]
    fn test_try_from_pairs_rejects_key_conflict() {
        let err = HashBiMap::try_from_pairs([(1, 'a'), (1, 'b')]).unwrap_err();
        assert_eq!(
            err,
            CollectionError::NotBijective {
                pairs: 2,
                keys: 1,
                values: 2
            }
        );
    }
}
