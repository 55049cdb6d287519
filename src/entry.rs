use crate::TrieMap;

/// Represents an entry in a `TrieMap` which may either be vacant or occupied.
///
/// The key is looked up once when the entry is created; the entry then acts
/// on the value slot it found.
///
/// # Examples
///
/// ```
/// use corpus_collections::{TrieMap, Entry};
///
/// let mut map = TrieMap::new();
///
/// match map.entry("a") {
///     Entry::Vacant(entry) => {
///         entry.insert(1);
///     }
///     Entry::Occupied(entry) => {
///         *entry.into_mut() += 1;
///     }
/// }
/// assert_eq!(map.get("a"), Some(&1));
/// ```
pub enum Entry<'a, T> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, T>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, T>),
}

/// A view into an occupied entry in a `TrieMap`.
///
/// It is part of the [`Entry`] API.
pub struct OccupiedEntry<'a, T> {
    pub(crate) trie: &'a mut TrieMap<T>,
    pub(crate) key: String,
    pub(crate) data_idx: usize,
}

/// A view into a vacant entry in a `TrieMap`.
///
/// It is part of the [`Entry`] API.
pub struct VacantEntry<'a, T> {
    pub(crate) trie: &'a mut TrieMap<T>,
    pub(crate) key: String,
}

impl<'a, T> Entry<'a, T> {
    /// Returns a reference to the value in the entry.
    pub fn get(&self) -> Option<&T> {
        match self {
            Entry::Occupied(entry) => Some(entry.get()),
            Entry::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Entry::Occupied(entry) => Some(entry.get_mut()),
            Entry::Vacant(_) => None,
        }
    }

    /// Ensures a value is in the entry by inserting the default if empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map: TrieMap<Vec<u32>> = TrieMap::new();
    ///
    /// map.entry("primes").or_default().push(2);
    /// map.entry("primes").or_default().push(3);
    /// assert_eq!(map.get("primes"), Some(&vec![2, 3]));
    /// ```
    pub fn or_default(self) -> &'a mut T
    where
        T: Default,
    {
        self.or_insert_with(T::default)
    }

    /// Ensures a value is in the entry by inserting the given value if empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    ///
    /// map.entry("a").or_insert(1);
    /// assert_eq!(map.get("a"), Some(&1));
    ///
    /// *map.entry("a").or_insert(10) *= 2;
    /// assert_eq!(map.get("a"), Some(&2));
    /// ```
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the function if empty.
    pub fn or_insert_with<F: FnOnce() -> T>(self, default: F) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Like [`or_insert_with`](Self::or_insert_with), passing the key to the function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    ///
    /// map.entry("héllo").or_insert_with_key(|key| key.chars().count());
    /// assert_eq!(map.get("héllo"), Some(&5));
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&str) -> T>(self, default: F) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Returns the key of the entry.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    ///
    /// map.entry("a").and_modify(|v| *v += 1).or_insert(1);
    /// assert_eq!(map.get("a"), Some(&1));
    ///
    /// map.entry("a").and_modify(|v| *v += 1).or_insert(0);
    /// assert_eq!(map.get("a"), Some(&2));
    /// ```
    pub fn and_modify<F: FnOnce(&mut T)>(self, f: F) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &T {
        match self.trie.data[self.data_idx].as_ref() {
            Some(value) => value,
            None => unreachable!("occupied entry always holds a value"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut T {
        self.trie.slot_mut(self.data_idx)
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// lifetime of the map.
    pub fn into_mut(self) -> &'a mut T {
        let trie = self.trie;
        trie.slot_mut(self.data_idx)
    }

    /// Gets the key of the entry.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the value in the entry, returning the old value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::{TrieMap, Entry};
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    ///
    /// if let Entry::Occupied(mut entry) = map.entry("a") {
    ///     assert_eq!(entry.insert(2), 1);
    /// }
    ///
    /// assert_eq!(map.get("a"), Some(&2));
    /// ```
    pub fn insert(&mut self, value: T) -> T {
        std::mem::replace(self.trie.slot_mut(self.data_idx), value)
    }

    /// Removes the entry, returning the value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::{TrieMap, Entry};
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    ///
    /// if let Entry::Occupied(entry) = map.entry("a") {
    ///     assert_eq!(entry.remove(), 1);
    /// }
    ///
    /// assert!(!map.contains_key("a"));
    /// ```
    pub fn remove(self) -> T {
        self.remove_entry().1
    }

    /// Removes the entry, returning the key and value.
    pub fn remove_entry(self) -> (String, T) {
        match self.trie.remove(&self.key) {
            Some(value) => (self.key, value),
            None => unreachable!("occupied entry always holds a value"),
        }
    }
}

impl<'a, T> VacantEntry<'a, T> {
    /// Gets the key that would be used when inserting a value.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> String {
        self.key
    }

    /// Inserts the given value into the entry, and returns a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::{TrieMap, Entry};
    /// let mut map = TrieMap::new();
    /// map.insert("car", 1);
    ///
    /// if let Entry::Vacant(entry) = map.entry("cat") {
    ///     *entry.insert(2) += 1;
    /// }
    ///
    /// assert_eq!(map.get("cat"), Some(&3));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert(self, value: T) -> &'a mut T {
        let key: Vec<char> = self.key.chars().collect();
        let trie = self.trie;
        let (data_idx, _) = trie.insert_chars(&key, value);
        trie.slot_mut(data_idx)
    }
}
