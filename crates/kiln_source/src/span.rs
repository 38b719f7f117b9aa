//! Byte-offset ranges within a source file.

use serde::{Deserialize, Serialize};

/// A byte offset range within a single source file.
///
/// The `start` is inclusive and `end` is exclusive. Which file a span belongs
/// to is carried by whatever holds the span (a diagnostic or an AST).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span covering `start..end`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span for `len` bytes beginning at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start as u32, (start + len) as u32)
    }

    /// Produces a span that covers both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let s = Span::new(10, 20);
        assert_eq!(s.start, 10);
        assert_eq!(s.end, 20);
        assert_eq!(Span::at(10, 10), s);
    }

    #[test]
    fn merge_order_independent() {
        let a = Span::new(5, 15);
        let b = Span::new(10, 25);
        assert_eq!(a.merge(b), Span::new(5, 25));
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(10, 20).len(), 10);
        assert!(Span::new(5, 5).is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(10, 20);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
