//! Equality capabilities injected into a set.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// The pair of operations a set uses to decide membership.
///
/// `equals` must be an equivalence relation (reflexive, symmetric and
/// transitive), and values it considers equal must produce the same
/// `hash`. Bucket indices are `|hash| mod capacity`, so negative hashes are
/// allowed. A set calls these with shared references only and never
/// mutates through them.
pub trait Equality<T: ?Sized> {
    /// True when `a` and `b` denote the same member.
    fn equals(&self, a: &T, b: &T) -> bool;
    /// Hash consistent with [`equals`](Equality::equals).
    fn hash(&self, value: &T) -> i64;
}

/// Natural equality of `T`: `Eq` for comparison, `Hash` through `S`.
#[derive(Clone, Debug, Default)]
pub struct DefaultEquality<S = RandomState> {
    hasher: S,
}

impl<S> DefaultEquality<S> {
    /// Uses `hasher` in place of a randomly seeded [`RandomState`].
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<T, S> Equality<T> for DefaultEquality<S>
where
    T: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &T) -> i64 {
        self.hasher.hash_one(value) as i64
    }
}

/// Capability backed by a pair of closures. Built with [`from_fns`].
#[derive(Clone, Copy)]
pub struct FnEquality<F, H> {
    equals: F,
    hash: H,
}

/// Builds a capability from an equality predicate and a hash function.
///
/// ```
/// use chain_set::{equality, HashedSet};
///
/// let by_abs = equality::from_fns(|a: &i32, b: &i32| a.abs() == b.abs(), |v: &i32| *v as i64);
/// let mut set = HashedSet::with_equality(by_abs);
/// assert!(set.add(1));
/// assert!(!set.add(-1));
/// ```
pub fn from_fns<T, F, H>(equals: F, hash: H) -> FnEquality<F, H>
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
    H: Fn(&T) -> i64,
{
    FnEquality { equals, hash }
}

impl<T, F, H> Equality<T> for FnEquality<F, H>
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
    H: Fn(&T) -> i64,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    #[inline]
    fn hash(&self, value: &T) -> i64 {
        (self.hash)(value)
    }
}

impl<F, H> fmt::Debug for FnEquality<F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnEquality")
    }
}

/// Lifts a capability over `T` to `Option<T>`, where `None` stands for an
/// absent element: it equals only `None` and always hashes to 0.
#[derive(Clone, Debug, Default)]
pub struct OptionEquality<E> {
    inner: E,
}

impl<E> OptionEquality<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<T, E: Equality<T>> Equality<Option<T>> for OptionEquality<E> {
    fn equals(&self, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.inner.equals(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn hash(&self, value: &Option<T>) -> i64 {
        value.as_ref().map_or(0, |v| self.inner.hash(v))
    }
}
