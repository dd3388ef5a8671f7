use derive_more::{Display, Error};

/// Failures surfaced by [`HashedSet`](crate::HashedSet) and its
/// [`Cursor`](crate::Cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SetError {
    /// `copy_to` was handed an offset below zero.
    #[display("offset {offset} is negative")]
    NegativeOffset { offset: isize },
    /// `copy_to` destination cannot hold every element from the offset onwards.
    #[display("destination has room for {available} elements but the set holds {required}")]
    InsufficientSpace { available: usize, required: usize },
    /// The set changed structurally while a cursor was walking it.
    #[display("set was modified during enumeration")]
    ConcurrentModification,
}

impl SetError {
    /// True for the argument-out-of-range class (`copy_to` failures).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            SetError::NegativeOffset { .. } | SetError::InsufficientSpace { .. }
        )
    }
}
