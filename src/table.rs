//! BucketTable: structural layer with separate chaining over a slot arena.
//!
//! Bucket heads and chain links are generational keys into a `SlotMap`, so
//! each entry is owned by exactly one predecessor (a bucket slot or the
//! previous entry) and removed slots are recycled through the arena's free
//! list. The equality capability is passed into every primitive that needs
//! it; the table never stores or calls any other user code.

use crate::equality::Equality;
use crate::growth;
use core::mem;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{DefaultKey, SlotMap};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identity for a freshly built table.
fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug)]
pub(crate) struct Entry<T> {
    value: T,
    next: Option<DefaultKey>,
}

/// `id` is assigned at construction and never shared between live tables
/// (a clone gets its own), so a cursor can tell its table from a
/// replacement that happens to reach the same version.
#[derive(Debug)]
pub(crate) struct BucketTable<T> {
    buckets: Box<[Option<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry<T>>,
    filled: usize,
    id: u64,
    version: u64,
}

impl<T: Clone> Clone for BucketTable<T> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            slots: self.slots.clone(),
            filled: self.filled,
            id: next_table_id(),
            version: self.version,
        }
    }
}

fn empty_buckets(capacity: usize) -> Box<[Option<DefaultKey>]> {
    vec![None; capacity].into_boxed_slice()
}

impl<T> BucketTable<T> {
    /// A zero capacity is bumped to 1 so that every value has a bucket.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(1)),
            slots: SlotMap::with_key(),
            filled: 0,
            id: next_table_id(),
            version: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    pub(crate) fn filled_buckets(&self) -> usize {
        self.filled
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn value(&self, key: DefaultKey) -> Option<&T> {
        self.slots.get(key).map(|e| &e.value)
    }

    /// Detaches a slot without touching bucket bookkeeping. Only for
    /// consuming iteration, where the table is discarded afterwards.
    pub(crate) fn take_slot(&mut self, key: DefaultKey) -> Option<T> {
        self.slots.remove(key).map(|e| e.value)
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn index_for<E: Equality<T>>(eq: &E, value: &T, capacity: usize) -> usize {
        (eq.hash(value).unsigned_abs() % capacity as u64) as usize
    }

    fn bucket_index<E: Equality<T>>(&self, eq: &E, value: &T) -> usize {
        Self::index_for(eq, value, self.capacity())
    }

    fn find<E: Equality<T>>(&self, eq: &E, value: &T) -> Option<DefaultKey> {
        let mut cur = self.buckets[self.bucket_index(eq, value)];
        while let Some(k) = cur {
            let entry = &self.slots[k];
            if eq.equals(&entry.value, value) {
                return Some(k);
            }
            cur = entry.next;
        }
        None
    }

    pub(crate) fn contains<E: Equality<T>>(&self, eq: &E, value: &T) -> bool {
        self.find(eq, value).is_some()
    }

    /// Appends `value` to its chain unless an equal value is already there.
    /// Filling a previously empty bucket may grow the table.
    pub(crate) fn insert<E: Equality<T>>(&mut self, eq: &E, value: T) -> bool {
        let index = self.bucket_index(eq, &value);
        let Some(head) = self.buckets[index] else {
            let key = self.slots.insert(Entry { value, next: None });
            self.buckets[index] = Some(key);
            self.filled += 1;
            self.bump_version();
            self.grow_if_saturated(eq);
            return true;
        };

        let mut tail = head;
        loop {
            let entry = &self.slots[tail];
            if eq.equals(&entry.value, &value) {
                return false;
            }
            match entry.next {
                Some(next) => tail = next,
                None => break,
            }
        }

        let key = self.slots.insert(Entry { value, next: None });
        self.slots[tail].next = Some(key);
        self.bump_version();
        true
    }

    /// Splices the entry equal to `value` out of its chain and returns it.
    pub(crate) fn delete<E: Equality<T>>(&mut self, eq: &E, value: &T) -> Option<T> {
        let index = self.bucket_index(eq, value);
        let head = self.buckets[index]?;

        if eq.equals(&self.slots[head].value, value) {
            let removed = self.slots.remove(head)?;
            self.buckets[index] = removed.next;
            if removed.next.is_none() {
                self.filled -= 1;
            }
            self.bump_version();
            return Some(removed.value);
        }

        let mut prev = head;
        while let Some(cur) = self.slots[prev].next {
            if eq.equals(&self.slots[cur].value, value) {
                let removed = self.slots.remove(cur)?;
                self.slots[prev].next = removed.next;
                self.bump_version();
                return Some(removed.value);
            }
            prev = cur;
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        tracing::trace!(len = self.len(), capacity = self.capacity(), "clearing bucket table");
        self.buckets.fill(None);
        self.slots.clear();
        self.filled = 0;
        self.bump_version();
    }

    /// Moves every entry out into a returned table, leaving `self` empty at
    /// the same capacity. The version stamp carries over and is bumped
    /// exactly as `clear` would bump it. `self` keeps its identity; the
    /// returned table gets a new one.
    pub(crate) fn take(&mut self) -> BucketTable<T> {
        let mut emptied = BucketTable::with_capacity(self.capacity());
        emptied.version = self.version;
        mem::swap(&mut emptied.id, &mut self.id);
        let taken = mem::replace(self, emptied);
        if !taken.is_empty() {
            self.bump_version();
        }
        taken
    }

    fn grow_if_saturated<E: Equality<T>>(&mut self, eq: &E) {
        while self.filled == self.capacity() {
            let from = self.capacity();
            let to = growth::next_capacity(self.len().max(from + 1));
            tracing::debug!(from, to, len = self.len(), "growing bucket table");
            self.rehash(eq, to);
        }
    }

    /// Relinks every entry into a fresh bucket array of `new_capacity`,
    /// visiting the old table in enumeration order and appending to chain
    /// tails, exactly as re-inserting each value would. Does not check the
    /// growth trigger and does not change the version stamp.
    pub(crate) fn rehash<E: Equality<T>>(&mut self, eq: &E, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        let old = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        let mut tails: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        self.filled = 0;

        for head in old.iter().copied() {
            let mut cur = head;
            while let Some(k) = cur {
                let index = Self::index_for(eq, &self.slots[k].value, new_capacity);
                cur = self.slots[k].next.take();
                match tails[index] {
                    Some(tail) => self.slots[tail].next = Some(k),
                    None => {
                        self.buckets[index] = Some(k);
                        self.filled += 1;
                    }
                }
                tails[index] = Some(k);
            }
        }
    }

    /// Chain lengths in bucket order.
    #[cfg(test)]
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(k) = cur {
                    n += 1;
                    cur = self.slots[k].next;
                }
                n
            })
            .collect()
    }
}

/// Position of an in-progress enumeration: the next bucket to open and the
/// next entry within the current chain. Holds no borrow of the table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Walk {
    bucket: usize,
    next: Option<DefaultKey>,
}

impl Walk {
    /// Returns the key of the next entry in bucket order, then chain order.
    pub(crate) fn advance<T>(&mut self, table: &BucketTable<T>) -> Option<DefaultKey> {
        loop {
            if let Some(k) = self.next {
                self.next = table.slots.get(k)?.next;
                return Some(k);
            }
            self.next = *table.buckets.get(self.bucket)?;
            self.bucket += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::from_fns;

    fn identity() -> impl Equality<i64> + Clone {
        from_fns(|a: &i64, b: &i64| a == b, |v: &i64| *v)
    }

    fn collect(table: &BucketTable<i64>) -> Vec<i64> {
        let mut walk = Walk::default();
        let mut out = Vec::new();
        while let Some(k) = walk.advance(table) {
            out.push(*table.value(k).unwrap());
        }
        out
    }

    /// Invariant: a duplicate insert is rejected without bumping the version.
    #[test]
    fn duplicate_insert_leaves_version_alone() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(7);
        assert!(t.insert(&eq, 3));
        let v = t.version();
        assert!(!t.insert(&eq, 3));
        assert_eq!(t.version(), v);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: colliding values are chained head to tail in insertion order.
    #[test]
    fn collisions_chain_in_insertion_order() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(7);
        for v in [1, 8, 15, 2] {
            assert!(t.insert(&eq, v));
        }
        assert_eq!(collect(&t), vec![1, 8, 15, 2]);
        assert_eq!(t.filled_buckets(), 2);
        assert_eq!(t.chain_lengths(), vec![0, 3, 1, 0, 0, 0, 0]);
    }

    /// Invariant: removing the head promotes its successor; removing from the
    /// middle keeps the rest of the chain reachable.
    #[test]
    fn delete_splices_head_middle_and_tail() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(7);
        for v in [1, 8, 15, 22] {
            t.insert(&eq, v);
        }
        assert_eq!(t.delete(&eq, &1), Some(1));
        assert_eq!(collect(&t), vec![8, 15, 22]);
        assert_eq!(t.delete(&eq, &15), Some(15));
        assert_eq!(collect(&t), vec![8, 22]);
        assert_eq!(t.delete(&eq, &22), Some(22));
        assert_eq!(collect(&t), vec![8]);
        assert_eq!(t.delete(&eq, &29), None);
        assert_eq!(t.filled_buckets(), 1);
    }

    /// Invariant: emptying a single-entry bucket decrements the filled count.
    #[test]
    fn emptying_a_bucket_decrements_filled_count() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(7);
        t.insert(&eq, 4);
        t.insert(&eq, 5);
        assert_eq!(t.filled_buckets(), 2);
        t.delete(&eq, &4);
        assert_eq!(t.filled_buckets(), 1);
        t.delete(&eq, &5);
        assert_eq!(t.filled_buckets(), 0);
        assert!(t.delete(&eq, &5).is_none());
    }

    /// Invariant: growth fires exactly when the last empty bucket is filled,
    /// and the new capacity follows the 6k±1 prime rule.
    #[test]
    fn growth_capacities_follow_prime_rule() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(3);
        t.insert(&eq, 0);
        t.insert(&eq, 1);
        assert_eq!(t.capacity(), 3);
        t.insert(&eq, 2);
        assert_eq!(t.capacity(), 5);
        t.insert(&eq, 3);
        t.insert(&eq, 4);
        assert_eq!(t.capacity(), 7);
        t.insert(&eq, 5);
        t.insert(&eq, 6);
        assert_eq!(t.capacity(), 11);
        for v in 7..=10 {
            t.insert(&eq, v);
        }
        assert_eq!(t.capacity(), 13);
        assert_eq!(collect(&t), (0..=10).collect::<Vec<_>>());
    }

    /// Invariant: rehash preserves membership and recomputes every index.
    #[test]
    fn rehash_preserves_members() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(101);
        for v in 0..50 {
            t.insert(&eq, v * 3);
        }
        let before = t.version();
        t.rehash(&eq, 7);
        assert_eq!(t.capacity(), 7);
        assert_eq!(t.version(), before);
        assert_eq!(t.len(), 50);
        assert_eq!(t.chain_lengths().iter().sum::<usize>(), 50);
        for v in 0..50 {
            assert!(t.contains(&eq, &(v * 3)));
            assert!(!t.contains(&eq, &(v * 3 + 1)));
        }
    }

    /// Invariant: clearing an empty table is a no-op for the version stamp.
    #[test]
    fn clear_bumps_version_once_only_when_non_empty() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(5);
        t.clear();
        assert_eq!(t.version(), 0);
        t.insert(&eq, 1);
        t.insert(&eq, 2);
        let v = t.version();
        t.clear();
        assert_eq!(t.version(), v + 1);
        assert_eq!(t.len(), 0);
        assert_eq!(t.filled_buckets(), 0);
        assert!(collect(&t).is_empty());
    }

    /// Invariant: `take` moves contents out and leaves an empty table whose
    /// version has moved on.
    #[test]
    fn take_moves_contents_and_bumps_version() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(5);
        t.insert(&eq, 1);
        t.insert(&eq, 2);
        let v = t.version();
        let id = t.id();
        let taken = t.take();
        assert!(t.is_empty());
        assert_eq!(t.capacity(), 5);
        assert_eq!(t.version(), v + 1);
        assert_eq!(t.id(), id);
        assert_ne!(taken.id(), id);
        assert_eq!(collect(&taken), vec![1, 2]);
    }

    /// Invariant: fresh tables and clones never share an identity, even at
    /// equal versions.
    #[test]
    fn identities_are_unique_per_table() {
        let eq = identity();
        let mut a = BucketTable::<i64>::with_capacity(5);
        let b = BucketTable::<i64>::with_capacity(5);
        assert_ne!(a.id(), b.id());
        a.insert(&eq, 7);
        let c = a.clone();
        assert_eq!(c.version(), a.version());
        assert_ne!(c.id(), a.id());
        assert_eq!(collect(&c), vec![7]);
    }

    /// Invariant: a zero capacity request still yields a usable table.
    #[test]
    fn zero_capacity_is_usable() {
        let eq = identity();
        let mut t = BucketTable::<i64>::with_capacity(0);
        assert_eq!(t.capacity(), 1);
        assert!(t.insert(&eq, 42));
        assert!(t.contains(&eq, &42));
        assert_eq!(t.capacity(), 5);
    }
}
