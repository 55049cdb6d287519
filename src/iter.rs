use crate::{node::ROOT, node_arena::KeysAndDataIdx, TrieMap};

/// An iterator over the key-value pairs of a `TrieMap`, in key order.
///
/// This struct is created by the [`iter`] and [`prefix_iter`] methods on [`TrieMap`].
///
/// [`iter`]: TrieMap::iter
/// [`prefix_iter`]: TrieMap::prefix_iter
pub struct Iter<'a, T> {
    pub(crate) data: &'a [Option<T>],
    pub(crate) iter: KeysAndDataIdx<'a>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (String, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (key, data_idx) in self.iter.by_ref() {
            if let Some(Some(value)) = self.data.get(data_idx) {
                return Some((key, value));
            }
        }
        None
    }
}

/// An iterator over the keys of a `TrieMap`.
///
/// This struct is created by the [`keys`] and [`prefix_keys`] methods on [`TrieMap`].
///
/// [`keys`]: TrieMap::keys
/// [`prefix_keys`]: TrieMap::prefix_keys
pub struct Keys<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<T> Iterator for Keys<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `TrieMap`.
///
/// This struct is created by the [`values`] and [`prefix_values`] methods on [`TrieMap`].
///
/// [`values`]: TrieMap::values
/// [`prefix_values`]: TrieMap::prefix_values
pub struct Values<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A mutable iterator over the key-value pairs of a `TrieMap`, in key order.
///
/// This struct is created by the [`iter_mut`] method on [`TrieMap`].
///
/// [`iter_mut`]: TrieMap::iter_mut
pub struct IterMut<'a, T> {
    pub(crate) slots: Vec<Option<&'a mut T>>,
    pub(crate) iter: KeysAndDataIdx<'a>,
    pub(crate) remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (String, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        for (key, data_idx) in self.iter.by_ref() {
            if let Some(value) = self.slots.get_mut(data_idx).and_then(Option::take) {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// A mutable iterator over the values of a `TrieMap`.
pub struct ValuesMut<'a, T> {
    pub(crate) inner: IterMut<'a, T>,
}

impl<'a, T> Iterator for ValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the key-value pairs of a `TrieMap`, in key order.
///
/// This struct is created when a `TrieMap` is consumed using `into_iter()`,
/// and by [`TrieMap::drain`].
pub struct IntoIter<T> {
    data: Vec<Option<T>>,
    order: std::vec::IntoIter<(String, usize)>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (String, T);

    fn next(&mut self) -> Option<Self::Item> {
        for (key, data_idx) in self.order.by_ref() {
            if let Some(value) = self.data.get_mut(data_idx).and_then(Option::take) {
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> IntoIterator for TrieMap<T> {
    type Item = (String, T);
    type IntoIter = IntoIter<T>;

    /// Consumes the map into an iterator yielding owned key-value pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corpus_collections::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    ///
    /// let pairs: Vec<(String, i32)> = map.into_iter().collect();
    /// assert_eq!(pairs, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<(String, usize)> = self.arena.keys_and_indices(ROOT).collect();
        IntoIter {
            data: self.data,
            order: order.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TrieMap<T> {
    type Item = (String, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut TrieMap<T> {
    type Item = (String, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
