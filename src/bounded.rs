//! Size-bounded ordered collections for streaming top-K selection.
//!
//! Both collections keep their contents sorted and, once an insertion pushes
//! them past their bound, evict from the end of the key order that is not
//! being retained.
//!
//! ```
//! use corpus_collections::{BoundedOptions, BoundedSortedMultiMap, MultiMap, Score};
//!
//! let mut nearest = BoundedSortedMultiMap::new(BoundedOptions::new(2)).unwrap();
//! nearest.insert(Score(0.25), "cat");
//! nearest.insert(Score(0.75), "dog");
//! nearest.insert(Score(0.5), "cow");
//!
//! let kept: Vec<_> = nearest.iter_desc().map(|(_, word)| *word).collect();
//! assert_eq!(kept, vec!["dog", "cow"]);
//! ```

use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CollectionError, Result};
use crate::multimap::{KeyEnd, MultiMap, TreeMultiMap};

/// What the bound of a [`BoundedSortedMultiMap`] limits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundPolicy {
    /// At most `bound` distinct keys; overflow evicts a whole key.
    Keys,
    /// At most `bound` key-value mappings; overflow evicts a single mapping.
    #[default]
    Mappings,
}

/// Which end of the key order survives eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Retention {
    #[default]
    Highest,
    Lowest,
}

impl Retention {
    fn evicted_end(self) -> KeyEnd {
        match self {
            Retention::Highest => KeyEnd::First,
            Retention::Lowest => KeyEnd::Last,
        }
    }
}

/// Construction parameters for the bounded collections.
///
/// # Examples
///
/// ```
/// use corpus_collections::{BoundPolicy, BoundedOptions, Retention};
///
/// let options = BoundedOptions::new(10)
///     .with_policy(BoundPolicy::Keys)
///     .with_retention(Retention::Lowest);
///
/// assert_eq!(options.bound, 10);
/// assert!(!options.fair);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedOptions {
    /// Maximum number of keys or mappings, per `policy`. Must be positive.
    pub bound: usize,
    pub policy: BoundPolicy,
    pub retention: Retention,
    /// Under [`BoundPolicy::Mappings`], evict a uniformly random value of the
    /// extreme key instead of its first value.
    pub fair: bool,
}

impl BoundedOptions {
    /// Mapping-bound options retaining the highest keys, without fair eviction.
    pub fn new(bound: usize) -> Self {
        BoundedOptions {
            bound,
            policy: BoundPolicy::default(),
            retention: Retention::default(),
            fair: false,
        }
    }

    pub fn with_policy(mut self, policy: BoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_fair(mut self, fair: bool) -> Self {
        self.fair = fair;
        self
    }

    fn validate(self) -> Result<Self> {
        if self.bound == 0 {
            return Err(CollectionError::InvalidBound { bound: self.bound });
        }
        Ok(self)
    }
}

/// A totally ordered `f64`, for use as a similarity or ranking key.
///
/// Ordering and equality follow [`f64::total_cmp`], so `-0.0 < 0.0` and NaN
/// sorts above every number.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Score(pub f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Score {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// An ordered map holding at most `bound` keys.
///
/// # Examples
///
/// ```
/// use corpus_collections::BoundedSortedMap;
///
/// let mut top = BoundedSortedMap::new(2).unwrap();
/// for (freq, word) in [(5, "the"), (1, "zebra"), (3, "cat")] {
///     top.insert(freq, word);
/// }
///
/// assert_eq!(top.into_sorted_vec(), vec![(3, "cat"), (5, "the")]);
/// ```
#[derive(Clone, Debug)]
pub struct BoundedSortedMap<K, V> {
    map: BTreeMap<K, V>,
    bound: usize,
    retention: Retention,
}

impl<K: Ord, V> BoundedSortedMap<K, V> {
    /// Creates a map retaining the `bound` highest keys.
    pub fn new(bound: usize) -> Result<Self> {
        Self::with_retention(bound, Retention::Highest)
    }

    pub fn with_retention(bound: usize, retention: Retention) -> Result<Self> {
        if bound == 0 {
            return Err(CollectionError::InvalidBound { bound });
        }
        Ok(BoundedSortedMap {
            map: BTreeMap::new(),
            bound,
            retention,
        })
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Inserts a pair, returning the value previously stored under `key`.
    ///
    /// If the map then exceeds its bound, the entry at the evicted end is
    /// dropped, which may be the one just inserted.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.map.insert(key, value);
        if self.map.len() > self.bound {
            match self.retention {
                Retention::Highest => self.map.pop_first(),
                Retention::Lowest => self.map.pop_last(),
            };
            log::trace!("bounded map evicted a key, bound {}", self.bound);
        }
        previous
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.map.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.map.last_key_value()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.map.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.map.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, K, V> {
        self.map.values()
    }

    pub fn into_sorted_vec(self) -> Vec<(K, V)> {
        self.map.into_iter().collect()
    }
}

impl<K: Ord, V> Extend<(K, V)> for BoundedSortedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// An ordered multimap bounded by distinct keys or by total mappings.
///
/// Every insertion is checked against the bound on its own, so a bulk
/// insertion may evict several times. With [`BoundedOptions::fair`] set, the
/// mapping evicted from a key is picked with `R`; seed it for reproducible
/// runs.
///
/// # Examples
///
/// ```
/// use corpus_collections::{BoundPolicy, BoundedOptions, BoundedSortedMultiMap, MultiMap};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let options = BoundedOptions::new(2).with_policy(BoundPolicy::Keys);
/// let mut map = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(7)).unwrap();
///
/// map.insert(1, 'a');
/// map.insert(3, 'b');
/// map.insert(3, 'c');
/// map.insert(2, 'd');
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.range(), 3);
/// assert_eq!(map.first_key(), Some(&2));
/// ```
#[derive(Clone, Debug)]
pub struct BoundedSortedMultiMap<K, V, R = StdRng> {
    map: TreeMultiMap<K, V>,
    options: BoundedOptions,
    rng: R,
}

impl<K: Ord, V: Ord> BoundedSortedMultiMap<K, V, StdRng> {
    /// Creates a map whose fair eviction draws from an OS-seeded generator.
    pub fn new(options: BoundedOptions) -> Result<Self> {
        Self::with_rng(options, StdRng::from_os_rng())
    }
}

impl<K: Ord, V: Ord, R: Rng> BoundedSortedMultiMap<K, V, R> {
    pub fn with_rng(options: BoundedOptions, rng: R) -> Result<Self> {
        Ok(BoundedSortedMultiMap {
            map: TreeMultiMap::new(),
            options: options.validate()?,
            rng,
        })
    }

    pub fn options(&self) -> &BoundedOptions {
        &self.options
    }

    fn enforce_bound(&mut self) {
        let bound = self.options.bound;
        let end = self.options.retention.evicted_end();

        match self.options.policy {
            BoundPolicy::Keys => {
                while self.map.len() > bound {
                    let evicted = match end {
                        KeyEnd::First => self.map.pop_first(),
                        KeyEnd::Last => self.map.pop_last(),
                    };
                    if let Some((_, values)) = evicted {
                        log::trace!("evicted a key holding {} values", values.len());
                    }
                }
            }
            BoundPolicy::Mappings => {
                while self.map.range() > bound {
                    let fair = self.options.fair;
                    let rng = &mut self.rng;
                    let evicted = self.map.remove_value_at(end, |count| {
                        if fair { rng.random_range(0..count) } else { 0 }
                    });
                    if evicted.is_none() {
                        break;
                    }
                    log::trace!("evicted one mapping, {} remain", self.map.range());
                }
            }
        }
    }

    /// Inserts every pair, checking the bound after each one.
    pub fn insert_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Clone,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &K) -> Option<&BTreeSet<V>> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.map.first_key()
    }

    pub fn last_key(&self) -> Option<&K> {
        self.map.last_key()
    }

    /// Mappings in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map.iter()
    }

    /// Mappings from the highest key down; values of one key stay ascending.
    pub fn iter_desc(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map
            .value_sets()
            .rev()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn into_multimap(self) -> TreeMultiMap<K, V> {
        self.map
    }
}

impl<K: Ord + Clone, V: Ord, R: Rng> MultiMap<K, V> for BoundedSortedMultiMap<K, V, R> {
    /// Adds a mapping, then evicts if the bound is exceeded.
    ///
    /// Returns whether the mapping was new, even if it was evicted straight away.
    fn insert(&mut self, key: K, value: V) -> bool {
        let added = self.map.insert(key, value);
        if added {
            self.enforce_bound();
        }
        added
    }

    fn insert_many<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let mut added = false;
        for value in values {
            added |= self.insert(key.clone(), value);
        }
        added
    }

    fn remove_mapping(&mut self, key: &K, value: &V) -> bool {
        self.map.remove_mapping(key, value)
    }

    fn contains_mapping(&self, key: &K, value: &V) -> bool {
        self.map.contains_mapping(key, value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn range(&self) -> usize {
        self.map.range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(options: BoundedOptions) -> BoundedSortedMultiMap<i32, i32, StdRng> {
        BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_zero_bound_rejected() {
        assert_eq!(
            BoundedSortedMap::<i32, i32>::new(0).unwrap_err(),
            CollectionError::InvalidBound { bound: 0 }
        );
        assert!(BoundedSortedMultiMap::<i32, i32>::new(BoundedOptions::new(0)).is_err());
    }

    #[test]
    fn test_bounded_map_keeps_highest() {
        let mut map = BoundedSortedMap::new(3).unwrap();
        for i in [5, 1, 9, 3, 7, 2] {
            map.insert(i, i * 10);
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![5, 7, 9]);
        assert_eq!(map.get(&7), Some(&70));
        assert_eq!(map.insert(9, 0), Some(90));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_bounded_map_keeps_lowest() {
        let mut map = BoundedSortedMap::with_retention(2, Retention::Lowest).unwrap();
        map.extend([(5, 'a'), (1, 'b'), (9, 'c'), (3, 'd')]);
        assert_eq!(map.into_sorted_vec(), vec![(1, 'b'), (3, 'd')]);
    }

    #[test]
    fn test_key_bound_evicts_whole_key() {
        let mut map = seeded(BoundedOptions::new(2).with_policy(BoundPolicy::Keys));
        map.insert_many(1, [10, 11, 12]);
        map.insert_many(2, [20, 21]);
        map.insert(3, 30);

        assert_eq!(map.len(), 2);
        assert_eq!(map.range(), 3);
        assert!(!map.contains_key(&1));
        assert_eq!(map.first_key(), Some(&2));
    }

    #[test]
    fn test_mapping_bound_evicts_one_value() {
        let mut map = seeded(BoundedOptions::new(3));
        map.insert_many(1, [10, 11]);
        map.insert(2, 20);
        map.insert(3, 30);

        assert_eq!(map.range(), 3);
        let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(1, 11), (2, 20), (3, 30)]);
    }

    #[test]
    fn test_mapping_bound_retaining_lowest() {
        let mut map = seeded(BoundedOptions::new(2).with_retention(Retention::Lowest));
        map.insert_all([(5, 1), (1, 1), (9, 1), (1, 2)]);

        let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn test_fair_eviction_stays_bounded() {
        let mut map = seeded(BoundedOptions::new(4).with_fair(true));
        map.insert_many(0, 0..10);
        map.insert_many(1, 0..3);

        assert_eq!(map.range(), 4);
        assert_eq!(map.get(&1).map(|v| v.len()), Some(3));
        assert_eq!(map.get(&0).map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_fair_eviction_is_reproducible() {
        let run = || {
            let mut map = seeded(BoundedOptions::new(3).with_fair(true));
            map.insert_many(0, 0..20);
            map.iter().map(|(_, v)| *v).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_insert_all_with_owned_keys() {
        let options = BoundedOptions::new(2).with_policy(BoundPolicy::Keys);
        let mut map = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(1)).unwrap();
        map.insert_all([
            ("pear".to_string(), 1),
            ("apple".to_string(), 2),
            ("plum".to_string(), 3),
            ("pear".to_string(), 4),
        ]);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["pear", "pear", "plum"]);
        assert_eq!(map.range(), 3);
    }

    #[test]
    fn test_iter_desc() {
        let mut map: BoundedSortedMultiMap<i32, char> =
            BoundedSortedMultiMap::with_rng(BoundedOptions::new(10), StdRng::seed_from_u64(42))
                .unwrap();
        map.insert_all([(1, 'a'), (2, 'b'), (2, 'c')]);
        let pairs: Vec<_> = map.iter_desc().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(2, 'b'), (2, 'c'), (1, 'a')]);
    }

    #[test]
    fn test_score_ordering() {
        let mut scores = vec![Score(0.5), Score(-1.0), Score(f64::NAN), Score(0.0), Score(-0.0)];
        scores.sort();
        let raw: Vec<f64> = scores[..4].iter().map(|s| s.0).collect();
        assert_eq!(raw, vec![-1.0, -0.0, 0.0, 0.5]);
        assert!(scores[4].0.is_nan());
        assert_eq!(Score(1.5), Score::from(1.5));
        assert_ne!(Score(0.0), Score(-0.0));
    }
}
