//! Original/current value pairs for editable fields

use serde::{Deserialize, Serialize};

/// An editable field value together with the frozen value it had when the
/// snapshot was exported.
///
/// The original is set once at construction and has no setter; edits only
/// ever touch the current value. The diff engine compares the two sides to
/// decide whether the field changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditablePair<T> {
    original: T,
    current: T,
}

impl<T: Clone> EditablePair<T> {
    /// Create a pair whose original and current sides are the same value.
    ///
    /// Used for freshly fetched values, and for documents that carry no
    /// shadow column (no change is detectable for such a field).
    pub fn frozen(value: T) -> Self {
        Self {
            original: value.clone(),
            current: value,
        }
    }
}

impl<T> EditablePair<T> {
    /// Rebuild a pair from a shadow column (original) and a live column
    /// (current) read back from an edited document.
    pub fn reconstructed(original: T, current: T) -> Self {
        Self { original, current }
    }

    /// The value at export time
    pub fn original(&self) -> &T {
        &self.original
    }

    /// The value after user edits
    pub fn current(&self) -> &T {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_sides_are_equal() {
        let pair = EditablePair::frozen(2.5_f64);
        assert_eq!(pair.original(), pair.current());
    }

    #[test]
    fn test_reconstructed_keeps_both_sides() {
        let pair = EditablePair::reconstructed(2.5_f64, 4.0);
        assert_eq!(*pair.original(), 2.5);
        assert_eq!(*pair.current(), 4.0);
    }
}
