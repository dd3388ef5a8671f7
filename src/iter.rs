//! Enumeration over a [`HashedSet`]: borrowed, owning, and detached cursors.
//!
//! All three visit buckets in storage order and each chain from head to
//! tail. That order depends on capacity and insertion history; it is not
//! sorted and must not be relied on across different capacities.

use crate::error::SetError;
use crate::hashed_set::HashedSet;
use crate::table::{BucketTable, Walk};
use core::iter::FusedIterator;

/// Borrowed iterator over a set. The borrow rules out mutation for its
/// whole lifetime, so no version check is needed.
pub struct Iter<'a, T> {
    table: &'a BucketTable<T>,
    walk: Walk,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(table: &'a BucketTable<T>) -> Self {
        Self {
            table,
            walk: Walk::default(),
            remaining: table.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.walk.advance(self.table)?;
        self.remaining = self.remaining.saturating_sub(1);
        self.table.value(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            walk: self.walk,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator; yields values in enumeration order.
pub struct IntoIter<T> {
    table: BucketTable<T>,
    walk: Walk,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(table: BucketTable<T>) -> Self {
        Self {
            table,
            walk: Walk::default(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.walk.advance(&self.table)?;
        self.table.take_slot(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len(), Some(self.table.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Fail-fast enumeration that does not borrow the set.
///
/// A cursor captures the set's table identity and version stamp when
/// created and compares both against the live values on every
/// [`advance`](Cursor::advance). Any structural mutation in between (a
/// successful add or remove, or a clear of a non-empty set) makes the next
/// step fail with [`SetError::ConcurrentModification`] instead of yielding
/// stale data. So does advancing against a different set, including one
/// assigned or swapped into the original's place.
///
/// ```
/// use chain_set::{HashedSet, SetError};
///
/// let mut set: HashedSet<i32> = (0..4).collect();
/// let mut cursor = set.cursor();
/// assert!(cursor.advance(&set).unwrap().is_some());
/// set.add(10);
/// assert_eq!(cursor.advance(&set), Err(SetError::ConcurrentModification));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    walk: Walk,
    table_id: u64,
    version: u64,
    done: bool,
}

impl Cursor {
    pub(crate) fn new(table_id: u64, version: u64) -> Self {
        Self {
            walk: Walk::default(),
            table_id,
            version,
            done: false,
        }
    }

    /// Yields the next element, `Ok(None)` once the set is exhausted.
    /// An exhausted cursor stays exhausted.
    pub fn advance<'a, T, E>(
        &mut self,
        set: &'a HashedSet<T, E>,
    ) -> Result<Option<&'a T>, SetError> {
        if self.done {
            return Ok(None);
        }
        let table = &set.table;
        if table.id() != self.table_id || table.version() != self.version {
            tracing::trace!(
                captured_table = self.table_id,
                live_table = table.id(),
                captured = self.version,
                live = table.version(),
                "set modified during enumeration"
            );
            return Err(SetError::ConcurrentModification);
        }
        match self.walk.advance(table) {
            Some(key) => Ok(table.value(key)),
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}
