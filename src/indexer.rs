//! Dense integer ids for arbitrary items.

use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;
use parking_lot::RwLock;

/// Assigns each distinct item an id from `0..len()`, in first-seen order.
///
/// # Examples
///
/// ```
/// use corpus_collections::HashIndexer;
///
/// let mut vocab = HashIndexer::new();
/// assert_eq!(vocab.index("the"), 0);
/// assert_eq!(vocab.index("cat"), 1);
/// assert_eq!(vocab.index("the"), 0);
///
/// assert_eq!(vocab.find(&"cat"), Some(1));
/// assert_eq!(vocab.find(&"dog"), None);
/// assert_eq!(vocab.lookup(1), Some(&"cat"));
/// ```
#[derive(Clone, Debug)]
pub struct HashIndexer<T> {
    ids: HashMap<T, usize>,
    items: Vec<T>,
}

impl<T> Default for HashIndexer<T> {
    fn default() -> Self {
        HashIndexer {
            ids: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> HashIndexer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `item`, assigning the next free one if it is new.
    pub fn index(&mut self, item: T) -> usize {
        if let Some(&id) = self.ids.get(&item) {
            return id;
        }
        let id = self.items.len();
        self.ids.insert(item.clone(), id);
        self.items.push(item);
        id
    }

    /// Indexes every item, returning their ids in input order.
    pub fn index_all<I>(&mut self, items: I) -> Vec<usize>
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().map(|item| self.index(item)).collect()
    }

    /// Returns the id of `item` without assigning one.
    pub fn find<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(item).copied()
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.contains_key(item)
    }

    /// Returns the item with id `id`.
    pub fn lookup(&self, id: usize) -> Option<&T> {
        self.items.get(id)
    }

    /// The largest id handed out so far.
    pub fn highest_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, positioned by id.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// `(id, item)` pairs in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &T)> + '_ {
        self.items.iter().enumerate()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.items.clear();
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for HashIndexer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut indexer = HashIndexer::new();
        indexer.index_all(iter);
        indexer
    }
}

/// A [`HashIndexer`] that can be shared between threads.
///
/// Lookups of known items take only the read lock. A miss retakes the lock
/// for writing, and [`HashIndexer::index`] checks again before assigning, so
/// racing threads always agree on an item's id.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use corpus_collections::SharedIndexer;
///
/// let indexer = Arc::new(SharedIndexer::new());
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let indexer = Arc::clone(&indexer);
///         thread::spawn(move || indexer.index(&"shared".to_string()))
///     })
///     .collect();
///
/// let ids: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// assert!(ids.iter().all(|&id| id == 0));
/// assert_eq!(indexer.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SharedIndexer<T> {
    inner: RwLock<HashIndexer<T>>,
}

impl<T: Eq + Hash + Clone> SharedIndexer<T> {
    pub fn new() -> Self {
        SharedIndexer {
            inner: RwLock::new(HashIndexer::new()),
        }
    }

    /// Returns the id of `item`, assigning one if it is new.
    pub fn index(&self, item: &T) -> usize {
        if let Some(id) = self.inner.read().find(item) {
            return id;
        }
        self.inner.write().index(item.clone())
    }

    pub fn find<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().find(item)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains(item)
    }

    /// Returns a copy of the item with id `id`.
    pub fn lookup(&self, id: usize) -> Option<T> {
        self.inner.read().lookup(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> HashIndexer<T> {
        self.inner.read().clone()
    }

    pub fn into_inner(self) -> HashIndexer<T> {
        self.inner.into_inner()
    }
}

impl<T> From<HashIndexer<T>> for SharedIndexer<T> {
    fn from(indexer: HashIndexer<T>) -> Self {
        SharedIndexer {
            inner: RwLock::new(indexer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut indexer: HashIndexer<String> = ["a", "b", "a", "c"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(indexer.len(), 3);
        assert_eq!(indexer.highest_index(), Some(2));
        assert_eq!(indexer.find("c"), Some(2));
        assert!(indexer.contains("a"));
        assert_eq!(indexer.index_all(["c".to_string(), "d".to_string()]), vec![2, 3]);

        let pairs: Vec<_> = indexer.iter().map(|(id, s)| (id, s.as_str())).collect();
        assert_eq!(pairs, vec![(0, "a"), (1, "b"), (2, "c"), (3, "d")]);

        indexer.clear();
        assert!(indexer.is_empty());
        assert_eq!(indexer.highest_index(), None);
        assert_eq!(indexer.lookup(0), None);
    }

    #[test]
    fn test_shared_indexer_matches_sequential() {
        let shared = SharedIndexer::new();
        for word in ["x", "y", "x", "z", "y"] {
            shared.index(&word);
        }
        assert_eq!(shared.len(), 3);
        assert_eq!(shared.find(&"z"), Some(2));
        assert_eq!(shared.lookup(1), Some("y"));

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.items(), &["x", "y", "z"]);

        shared.clear();
        assert!(shared.is_empty());
    }

    #[test]
    fn test_shared_indexer_concurrent_agreement() {
        let shared = SharedIndexer::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for i in 0..100u32 {
                        shared.index(&i);
                    }
                });
            }
        });

        let indexer = shared.into_inner();
        assert_eq!(indexer.len(), 100);
        for (id, item) in indexer.iter() {
            assert_eq!(indexer.find(item), Some(id));
        }
    }
}
