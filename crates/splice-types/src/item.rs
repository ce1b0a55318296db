//! Sequence items and the pending/ready classifier.
//!
//! An input sequence is a `Vec<Item<T, P>>`: each slot either already holds a
//! value (`Ready`) or holds a handle `P` to a computation that will settle
//! later (`Pending`). The classifier is the single predicate the rewriter
//! consults to decide which slots need waiting on.

/// One element of an input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<T, P> {
    /// A value the caller already has.
    Ready(T),
    /// A handle to a computation that settles exactly once, later.
    Pending(P),
}

impl<T, P> Item<T, P> {
    /// Returns `true` if this item is a pending computation.
    ///
    /// Pure and stateless: asking twice yields the same answer.
    pub fn is_pending(&self) -> bool {
        matches!(self, Item::Pending(_))
    }

    /// Returns the ready value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Item::Ready(value) => Some(value),
            Item::Pending(_) => None,
        }
    }

    /// Map the pending handle, leaving ready values untouched.
    pub fn map_pending<Q>(self, f: impl FnOnce(P) -> Q) -> Item<T, Q> {
        match self {
            Item::Ready(value) => Item::Ready(value),
            Item::Pending(handle) => Item::Pending(f(handle)),
        }
    }
}

impl<T, P> From<T> for Item<T, P> {
    fn from(value: T) -> Self {
        Item::Ready(value)
    }
}

/// Classifier predicate: is `item` a pending computation?
pub fn is_pending<T, P>(item: &Item<T, P>) -> bool {
    item.is_pending()
}

/// Count the pending computations in a sequence.
pub fn count_pending<T, P>(items: &[Item<T, P>]) -> usize {
    items.iter().filter(|item| is_pending(*item)).count()
}
