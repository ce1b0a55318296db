//! The single failure kind surfaced by aggregation.

use std::fmt;

/// A pending computation rejected; carries its reason verbatim.
///
/// Only the first rejection observed in real time is ever reported. The
/// reason is opaque to the splicing machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection<E> {
    /// Slot index of the rejecting computation within the pending subsequence.
    pub slot: usize,
    /// Position of the rejecting computation within the input sequence.
    pub position: usize,
    /// The reason produced by the computation.
    pub reason: E,
}

impl<E> Rejection<E> {
    /// A rejection for `slot`, positioned at the slot itself.
    ///
    /// The rewriter remaps the position onto the input sequence with
    /// [`Rejection::at_position`].
    pub fn new(slot: usize, reason: E) -> Self {
        Self {
            slot,
            position: slot,
            reason,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn reason(&self) -> &E {
        &self.reason
    }

    /// Discard the slot bookkeeping and keep the caller's reason.
    pub fn into_reason(self) -> E {
        self.reason
    }
}

impl<E: fmt::Display> fmt::Display for Rejection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pending computation at position {} (slot {}) rejected: {}",
            self.position, self.slot, self.reason
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Rejection<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new(1, "boom").at_position(3);
        let text = rejection.to_string();
        assert!(text.contains("position 3"));
        assert!(text.contains("slot 1"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_rejection_into_reason() {
        let rejection = Rejection::new(0, String::from("X"));
        assert_eq!(rejection.position, 0);
        assert_eq!(rejection.reason(), "X");
        assert_eq!(rejection.into_reason(), "X");
    }

    #[test]
    fn test_rejection_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(Rejection::new(2, "Y"));
        assert!(err.to_string().ends_with("rejected: Y"));
    }
}
