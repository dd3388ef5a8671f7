//! chain-set: a single-threaded hash set with separate chaining, prime
//! bucket counts, an injected equality capability and fail-fast cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the table engine small and exact so that every set-algebra
//!   operation can be reasoned about in terms of four primitives:
//!   membership, insert, delete and ordered full-table enumeration.
//! - Layers:
//!   - `BucketTable<T>`: structural layer. A boxed slice of bucket heads,
//!     each the start of a singly-linked chain stored in a generational
//!     slot arena. Tracks element count, filled-bucket count and a version
//!     stamp. Takes the equality capability as an argument to each
//!     primitive.
//!   - `HashedSet<T, E>`: public API. Owns the table and the capability,
//!     and builds the set algebra from the table primitives only.
//!   - `Iter` / `IntoIter` / `Cursor`: enumeration. `Cursor` is detached
//!     from the set and re-validates the table identity and version stamp
//!     on every step.
//!
//! Constraints
//! - Single-threaded: no internal synchronisation; callers needing shared
//!   access must bring their own exclusion.
//! - Bucket index is `|hash| mod capacity`; an index computed before a
//!   resize is never reused after it.
//! - Within one chain no two entries are equal under the capability.
//! - Growth fires only when an insertion fills the last empty bucket.
//!   The new capacity is the smallest `6k ± 1` prime at least the element
//!   count (and strictly above the old capacity). Rehashing relinks entries
//!   in enumeration order and runs synchronously inside that insertion.
//!
//! Version stamps
//! - Bumped once per successful insert, successful delete and clear of a
//!   non-empty set. Failed inserts/deletes and rehashes leave it alone.
//! - `Iter` borrows the set, so the compiler already forbids interleaved
//!   mutation. `Cursor` holds no borrow and reports
//!   `SetError::ConcurrentModification` on the first step after a change.
//!
//! Notes and non-goals
//! - No persistence, serialisation or concurrent access.
//! - Panics raised by a user capability propagate unchanged.
//! - Absent arguments are unrepresentable: sources are `IntoIterator`
//!   values and capabilities are owned.

pub mod equality;
mod error;
pub mod growth;
mod hashed_set;
mod iter;
mod table;
mod table_proptest;

// Public surface
pub use equality::{DefaultEquality, Equality, FnEquality, OptionEquality};
pub use error::SetError;
pub use growth::DEFAULT_CAPACITY;
pub use hashed_set::HashedSet;
pub use iter::{Cursor, IntoIter, Iter};
