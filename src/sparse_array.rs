//! Numeric arrays that store only their non-zero entries.

use num_traits::{Num, WrappingAdd};

use crate::error::{CollectionError, Result};

/// A sparse `f64` array.
pub type SparseDoubleArray = SparseNumericArray<f64>;

/// A sparse `i32` array.
pub type SparseIntArray = SparseNumericArray<i32>;

/// Addition used by [`SparseNumericArray::add`].
///
/// Integers wrap on overflow; floats add normally.
pub trait Accumulate: Num + Copy {
    fn accumulate(self, delta: Self) -> Self;
}

macro_rules! wrapping_accumulate {
    ($($t:ty),*) => {
        $(impl Accumulate for $t {
            #[inline]
            fn accumulate(self, delta: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &delta)
            }
        })*
    };
}

wrapping_accumulate!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Accumulate for f32 {
    #[inline]
    fn accumulate(self, delta: Self) -> Self {
        self + delta
    }
}

impl Accumulate for f64 {
    #[inline]
    fn accumulate(self, delta: Self) -> Self {
        self + delta
    }
}

/// An array of `length` numbers, of which only the non-zero ones are stored.
///
/// Stored entries live in two parallel vectors sorted by index, so lookups are
/// a binary search and every index without an entry reads as zero. Setting an
/// entry to zero removes it; the array never holds an explicit zero.
///
/// # Examples
///
/// ```
/// use corpus_collections::SparseDoubleArray;
///
/// let mut counts = SparseDoubleArray::new(1_000_000);
/// counts.add(40, 1.5).unwrap();
/// counts.add(7, 2.0).unwrap();
/// counts.add(40, 1.0).unwrap();
///
/// assert_eq!(counts.get(40).unwrap(), 2.5);
/// assert_eq!(counts.get(8).unwrap(), 0.0);
/// assert_eq!(counts.cardinality(), 2);
/// assert_eq!(counts.element_indices(), &[7, 40]);
///
/// assert!(counts.get(1_000_000).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "SparseParts<T>", bound(deserialize = "T: Num + Copy + serde::Deserialize<'de>"))
)]
pub struct SparseNumericArray<T> {
    indices: Vec<usize>,
    values: Vec<T>,
    length: usize,
}

/// Unvalidated form of a sparse array, as read from a serialized document.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SparseParts<T> {
    indices: Vec<usize>,
    values: Vec<T>,
    length: usize,
}

#[cfg(feature = "serde")]
impl<T: Num + Copy> TryFrom<SparseParts<T>> for SparseNumericArray<T> {
    type Error = CollectionError;

    fn try_from(parts: SparseParts<T>) -> Result<Self> {
        Self::from_parts(parts.indices, parts.values, parts.length)
    }
}

impl<T: Num + Copy> SparseNumericArray<T> {
    /// Creates an all-zero array accepting indices `0..length`.
    pub fn new(length: usize) -> Self {
        SparseNumericArray {
            indices: Vec::new(),
            values: Vec::new(),
            length,
        }
    }

    /// Creates an all-zero array accepting any index below `usize::MAX`.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Copies the non-zero entries of `dense`; the length is `dense.len()`.
    pub fn from_dense(dense: &[T]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .map(|(index, value)| (index, *value))
            .unzip();

        SparseNumericArray {
            indices,
            values,
            length: dense.len(),
        }
    }

    /// Builds an array from parallel index and value vectors.
    ///
    /// Indices must be strictly increasing and below `length`. Zero values
    /// are accepted and dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use corpus_collections::{CollectionError, SparseIntArray};
    ///
    /// let array = SparseIntArray::from_parts(vec![1, 4, 6], vec![3, 0, -2], 10).unwrap();
    /// assert_eq!(array.cardinality(), 2);
    ///
    /// let err = SparseIntArray::from_parts(vec![4, 1], vec![1, 1], 10).unwrap_err();
    /// assert_eq!(err, CollectionError::UnsortedIndices { previous: 4, next: 1 });
    /// ```
    pub fn from_parts(indices: Vec<usize>, values: Vec<T>, length: usize) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(CollectionError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        if let Some(pair) = indices.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(CollectionError::UnsortedIndices {
                previous: pair[0],
                next: pair[1],
            });
        }
        if let Some(&index) = indices.last().filter(|&&index| index >= length) {
            return Err(CollectionError::IndexOutOfBounds { index, length });
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, value)| !value.is_zero())
            .unzip();

        Ok(SparseNumericArray {
            indices,
            values,
            length,
        })
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.length {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    /// The declared length, not the number of stored entries.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if no entry is non-zero.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of non-zero entries.
    pub fn cardinality(&self) -> usize {
        self.indices.len()
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        })
    }

    /// Sets the value at `index`, returning the previous value.
    ///
    /// Writing zero removes the entry; writing zero where there is no entry
    /// changes nothing.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.check_index(index)?;
        let previous = match self.indices.binary_search(&index) {
            Ok(pos) if value.is_zero() => {
                self.indices.remove(pos);
                self.values.remove(pos)
            }
            Ok(pos) => std::mem::replace(&mut self.values[pos], value),
            Err(pos) => {
                if !value.is_zero() {
                    self.indices.insert(pos, index);
                    self.values.insert(pos, value);
                }
                T::zero()
            }
        };
        Ok(previous)
    }

    /// Indices of the non-zero entries, ascending.
    pub fn element_indices(&self) -> &[usize] {
        &self.indices
    }

    /// The non-zero entries as `(index, value)` pairs, ascending by index.
    ///
    /// Each call starts a fresh pass.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, T)> + ExactSizeIterator + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Writes the array densely into `out`, zeroing every other slot.
    ///
    /// Fails without writing if a stored index does not fit in `out`.
    pub fn to_dense(&self, out: &mut [T]) -> Result<()> {
        if let Some(&index) = self.indices.last().filter(|&&index| index >= out.len()) {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                length: out.len(),
            });
        }

        out.fill(T::zero());
        for (index, value) in self.iter() {
            out[index] = value;
        }
        Ok(())
    }

    /// A dense copy of the array.
    ///
    /// Arrays created with [`unbounded`](Self::unbounded) are copied up to
    /// their highest stored index.
    pub fn to_vec(&self) -> Vec<T> {
        let len = if self.length == usize::MAX {
            self.indices.last().map_or(0, |&index| index + 1)
        } else {
            self.length
        };

        let mut dense = vec![T::zero(); len];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }

    /// Resets every entry to zero.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.values.clear();
    }
}

impl<T: Accumulate> SparseNumericArray<T> {
    /// Adds `delta` to the value at `index`, returning the new value.
    ///
    /// Needs a single binary search. An entry whose sum reaches zero is removed.
    /// Integer sums wrap on overflow.
    pub fn add(&mut self, index: usize, delta: T) -> Result<T> {
        self.check_index(index)?;
        if delta.is_zero() {
            return self.get(index);
        }

        match self.indices.binary_search(&index) {
            Ok(pos) => {
                let sum = self.values[pos].accumulate(delta);
                if sum.is_zero() {
                    self.indices.remove(pos);
                    self.values.remove(pos);
                } else {
                    self.values[pos] = sum;
                }
                Ok(sum)
            }
            Err(pos) => {
                self.indices.insert(pos, index);
                self.values.insert(pos, delta);
                Ok(delta)
            }
        }
    }
}
