//! HashedSet: public set API over `BucketTable`.

use crate::equality::{DefaultEquality, Equality};
use crate::error::SetError;
use crate::growth::{self, DEFAULT_CAPACITY};
use crate::iter::{Cursor, IntoIter, Iter};
use crate::table::BucketTable;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::{BitAnd, BitOr, BitXor, Sub};
use std::collections::hash_map::RandomState;

/// A hash set with separate chaining and an injected equality capability.
///
/// Capacity is the length of the bucket array. It starts at
/// [`DEFAULT_CAPACITY`] (or the requested value) and, whenever an insertion
/// fills the last empty bucket, grows to the smallest `6k ± 1` prime that is
/// at least the element count.
///
/// Single-threaded: no internal synchronisation is performed. Structural
/// mutation during a [`Cursor`] walk is detected; during an [`Iter`] it is
/// ruled out by the borrow.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `add` | `O(1)`*, `O(n)` when growing |
/// | `contains` | `O(1)`* |
/// | `remove` | `O(1)`* |
/// | `clear` | `O(capacity)` |
///
/// \* Plus the length of the chain the value hashes into.
pub struct HashedSet<T, E = DefaultEquality> {
    pub(crate) table: BucketTable<T>,
    equality: E,
}

impl<T> HashedSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_equality(capacity, DefaultEquality::<RandomState>::default())
    }
}

impl<T> Default for HashedSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> HashedSet<T, E>
where
    E: Equality<T>,
{
    pub fn with_equality(equality: E) -> Self {
        Self::with_capacity_and_equality(DEFAULT_CAPACITY, equality)
    }

    /// A capacity of 0 is treated as 1.
    pub fn with_capacity_and_equality(capacity: usize, equality: E) -> Self {
        Self {
            table: BucketTable::with_capacity(capacity),
            equality,
        }
    }

    /// Builds a set from `source`. If the source reports an exact length up
    /// front, the initial capacity is the growth-policy prime for that
    /// length; otherwise [`DEFAULT_CAPACITY`] is used.
    pub fn from_iter_with_equality<I>(source: I, equality: E) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let source = source.into_iter();
        let capacity = match source.size_hint() {
            (lower, Some(upper)) if lower == upper => growth::next_capacity(lower),
            _ => DEFAULT_CAPACITY,
        };
        let mut set = Self::with_capacity_and_equality(capacity, equality);
        for value in source {
            set.add(value);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Always false; kept for parity with read-only collection views.
    pub fn is_read_only(&self) -> bool {
        false
    }

    pub fn equality(&self) -> &E {
        &self.equality
    }

    /// Adds `value`, returning false (and leaving the set untouched) if an
    /// equal value is already present.
    pub fn add(&mut self, value: T) -> bool {
        self.table.insert(&self.equality, value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.table.contains(&self.equality, value)
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.table.delete(&self.equality, value)
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.table)
    }

    /// Starts a fail-fast enumeration that does not hold a borrow of the set.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.table.id(), self.table.version())
    }

    /// Adds every element of `other`.
    pub fn union_with<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in other {
            self.add(value);
        }
    }

    /// Removes every element of `other` that is present.
    pub fn except_with<I>(&mut self, other: I)
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        for value in other {
            self.remove(value.borrow());
        }
    }

    /// True if any element of `other` is in the set. Stops at the first hit.
    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        other.into_iter().any(|v| self.contains(v.borrow()))
    }

    /// True if every element of `other` is in the set.
    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        other.into_iter().all(|v| self.contains(v.borrow()))
    }

    /// Writes every element, in enumeration order, into `destination`
    /// starting at `offset`.
    pub fn copy_to(&self, destination: &mut [T], offset: isize) -> Result<(), SetError>
    where
        T: Clone,
    {
        let start = usize::try_from(offset).map_err(|_| SetError::NegativeOffset { offset })?;
        let Some(window) = destination.get_mut(start..) else {
            return Err(SetError::InsufficientSpace {
                available: 0,
                required: self.len(),
            });
        };
        if window.len() < self.len() {
            return Err(SetError::InsufficientSpace {
                available: window.len(),
                required: self.len(),
            });
        }
        for (slot, value) in window.iter_mut().zip(self.iter()) {
            *slot = value.clone();
        }
        Ok(())
    }
}

impl<T, E> HashedSet<T, E>
where
    E: Equality<T> + Clone,
{
    /// Collects `other` into a set sharing this set's equality, so that
    /// duplicates are collapsed the same way membership is tested.
    fn materialize<I>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_iter_with_equality(other, self.equality.clone())
    }

    /// Keeps only the elements also present in `other`.
    ///
    /// Both sides are snapshotted first and the set is rebuilt from the
    /// snapshot of `other`, so no chain is mutated while it is being read.
    pub fn intersect_with<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.materialize(other);
        let current = self.table.take();
        for value in other {
            if current.contains(&self.equality, &value) {
                self.table.insert(&self.equality, value);
            }
        }
    }

    /// Toggles membership of every distinct element of `other`.
    pub fn symmetric_except_with<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.materialize(other);
        for value in other {
            if self.table.delete(&self.equality, &value).is_none() {
                self.table.insert(&self.equality, value);
            }
        }
    }

    /// True if `other`, once deduplicated, holds exactly this set's elements.
    pub fn set_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.materialize(other);
        other.len() == self.len() && self.is_superset_of(&other)
    }

    /// True if every element of the set is in `other`. The empty set is a
    /// subset of anything.
    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        if self.is_empty() {
            return true;
        }
        let other = self.materialize(other);
        self.len() <= other.len() && other.is_superset_of(self)
    }

    pub fn is_proper_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.materialize(other);
        self.len() < other.len() && other.is_superset_of(self)
    }

    pub fn is_proper_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.materialize(other);
        self.len() > other.len() && self.is_superset_of(&other)
    }
}

impl<T, E> HashedSet<T, E>
where
    T: Clone,
    E: Equality<T> + Clone,
{
    /// New set holding the elements of `a` or `b`, using `a`'s equality.
    pub fn union(a: &Self, b: &Self) -> Self {
        let mut out = a.clone();
        out.union_with(b.iter().cloned());
        out
    }

    /// New set holding the elements of `a` that are not in `b`, using `a`'s
    /// equality.
    pub fn except(a: &Self, b: &Self) -> Self {
        let mut out = a.clone();
        out.except_with(b);
        out
    }
}

impl<T: Clone, E: Clone> Clone for HashedSet<T, E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            equality: self.equality.clone(),
        }
    }
}

/// Same elements under `self`'s equality. A set is always equal to itself
/// without walking it.
impl<T, E: Equality<T>> PartialEq for HashedSet<T, E> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || (self.len() == other.len() && self.is_superset_of(other))
    }
}

impl<T: fmt::Debug, E> fmt::Debug for HashedSet<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(Iter::new(&self.table)).finish()
    }
}

impl<T, S> FromIterator<T> for HashedSet<T, DefaultEquality<S>>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_equality(iter, DefaultEquality::default())
    }
}

impl<T, E: Equality<T>> Extend<T> for HashedSet<T, E> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.union_with(iter)
    }
}

impl<T, E> IntoIterator for HashedSet<T, E> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.table)
    }
}

impl<'a, T, E> IntoIterator for &'a HashedSet<T, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(&self.table)
    }
}

impl<T: Clone, E: Equality<T> + Clone> BitOr for &HashedSet<T, E> {
    type Output = HashedSet<T, E>;

    fn bitor(self, rhs: Self) -> Self::Output {
        HashedSet::union(self, rhs)
    }
}

impl<T: Clone, E: Equality<T> + Clone> Sub for &HashedSet<T, E> {
    type Output = HashedSet<T, E>;

    fn sub(self, rhs: Self) -> Self::Output {
        HashedSet::except(self, rhs)
    }
}

impl<T: Clone, E: Equality<T> + Clone> BitAnd for &HashedSet<T, E> {
    type Output = HashedSet<T, E>;

    fn bitand(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out.intersect_with(rhs.iter().cloned());
        out
    }
}

impl<T: Clone, E: Equality<T> + Clone> BitXor for &HashedSet<T, E> {
    type Output = HashedSet<T, E>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out.symmetric_except_with(rhs.iter().cloned());
        out
    }
}
