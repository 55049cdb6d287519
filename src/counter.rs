//! Occurrence counting.

use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;
use rand::{rngs::StdRng, SeedableRng};

use crate::bounded::{BoundPolicy, BoundedOptions, BoundedSortedMultiMap};
use crate::error::{CollectionError, Result};
use crate::multimap::MultiMap;

/// Counts how often each distinct item has been seen.
///
/// # Examples
///
/// ```
/// use corpus_collections::ObjectCounter;
///
/// let counts: ObjectCounter<&str> = "a rose is a rose is a rose".split(' ').collect();
///
/// assert_eq!(counts.get_count(&"rose"), 3);
/// assert_eq!(counts.sum(), 8);
/// assert_eq!(counts.len(), 3);
/// assert_eq!(counts.frequency(&"is"), 0.25);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectCounter<T: Eq + Hash> {
    counts: HashMap<T, usize>,
    sum: usize,
}

impl<T: Eq + Hash> Default for ObjectCounter<T> {
    fn default() -> Self {
        ObjectCounter {
            counts: HashMap::new(),
            sum: 0,
        }
    }
}

impl<T: Eq + Hash> ObjectCounter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `item`, returning its new count.
    pub fn count(&mut self, item: T) -> usize {
        let count = self.counts.entry(item).or_insert(0);
        *count += 1;
        self.sum += 1;
        *count
    }

    /// Counts `n` occurrences of `item`, returning its new count.
    ///
    /// A count of zero is rejected.
    pub fn count_n(&mut self, item: T, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(CollectionError::NonPositiveCount);
        }
        let count = self.counts.entry(item).or_insert(0);
        *count += n;
        self.sum += n;
        Ok(*count)
    }

    /// Counts one occurrence of every item.
    pub fn count_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.count(item);
        }
    }

    /// Returns how often `item` was counted; zero if never.
    pub fn get_count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// The share of all counts that went to `item`, or `0.0` when nothing was counted.
    pub fn frequency<Q>(&self, item: &Q) -> f64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.sum == 0 {
            return 0.0;
        }
        self.get_count(item) as f64 / self.sum as f64
    }

    /// Total of all counts.
    pub fn sum(&self) -> usize {
        self.sum
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.counts.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(item, &count)| (item, count))
    }

    /// An item with the highest count. Which one is unspecified among ties.
    pub fn max(&self) -> Option<(&T, usize)> {
        self.iter().max_by_key(|&(_, count)| count)
    }

    /// An item with the lowest count. Which one is unspecified among ties.
    pub fn min(&self) -> Option<(&T, usize)> {
        self.iter().min_by_key(|&(_, count)| count)
    }

    /// Adds every count of `other` to this counter.
    pub fn merge(&mut self, other: &ObjectCounter<T>)
    where
        T: Clone,
    {
        for (item, count) in other.iter() {
            *self.counts.entry(item.clone()).or_insert(0) += count;
        }
        self.sum += other.sum;
    }

    /// Forgets every count.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.sum = 0;
    }

    /// The `k` most frequent items with their counts, most frequent first.
    ///
    /// Items with equal counts are listed in ascending order; when they
    /// straddle the cut, the greater items are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use corpus_collections::ObjectCounter;
    ///
    /// let counts: ObjectCounter<char> = "mississippi".chars().collect();
    /// let top = counts.most_common(2).unwrap();
    /// assert_eq!(top, vec![(&'i', 4), (&'s', 4)]);
    /// ```
    pub fn most_common(&self, k: usize) -> Result<Vec<(&T, usize)>>
    where
        T: Ord,
    {
        let options = BoundedOptions::new(k).with_policy(BoundPolicy::Mappings);
        // Unfair eviction never draws from the generator.
        let mut top = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(0))?;
        for (item, count) in self.iter() {
            top.insert(count, item);
        }
        Ok(top.iter_desc().map(|(&count, &item)| (item, count)).collect())
    }
}

impl<T: Eq + Hash> FromIterator<T> for ObjectCounter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counter = ObjectCounter::new();
        counter.count_all(iter);
        counter
    }
}

impl<T: Eq + Hash> Extend<T> for ObjectCounter<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.count_all(iter);
    }
}
