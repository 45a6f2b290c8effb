// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Rank spans
//!
//! Every position of a space has a rank: its zero-based index when the
//! positions are listed in the order of the space. Region algebra is carried
//! out on half-open rank spans `[start, end)`, which keeps adjacency checks and
//! lengths free of off-by-one corrections. Spans never leave this crate.

use std::fmt;

/// A half-open span of ranks `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Span {
    start_inclusive: i64,
    end_exclusive: i64,
}

impl Span {
    /// Creates the span `[a, b)`, swapping the bounds when `b < a`.
    #[inline]
    pub(crate) fn new(a: i64, b: i64) -> Self {
        let (s, e) = if b < a { (b, a) } else { (a, b) };
        Self {
            start_inclusive: s,
            end_exclusive: e,
        }
    }

    /// The span covering the closed rank range `[first, last]`.
    #[inline]
    pub(crate) fn closed(first: i64, last: i64) -> Self {
        Self::new(first, last + 1)
    }

    #[inline]
    pub(crate) fn start(&self) -> i64 {
        self.start_inclusive
    }

    #[inline]
    pub(crate) fn end(&self) -> i64 {
        self.end_exclusive
    }

    /// Rank of the last member. Meaningless for an empty span.
    #[inline]
    pub(crate) fn last(&self) -> i64 {
        self.end_exclusive - 1
    }

    #[inline]
    pub(crate) fn len(&self) -> i64 {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    #[inline]
    pub(crate) fn contains(&self, rank: i64) -> bool {
        rank >= self.start_inclusive && rank < self.end_exclusive
    }

    /// `true` if the two spans overlap or touch.
    #[inline]
    pub(crate) fn meets(&self, other: &Span) -> bool {
        self.start_inclusive <= other.end_exclusive && other.start_inclusive <= self.end_exclusive
    }

    #[inline]
    pub(crate) fn intersection(&self, other: &Span) -> Option<Span> {
        let start = self.start_inclusive.max(other.start_inclusive);
        let end = self.end_exclusive.min(other.end_exclusive);
        (start < end).then(|| Span::new(start, end))
    }

    /// Smallest span covering both.
    #[inline]
    pub(crate) fn hull(&self, other: &Span) -> Span {
        Span::new(
            self.start_inclusive.min(other.start_inclusive),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// Splits off the first `len` ranks. Returns `(head, tail)`.
    #[inline]
    pub(crate) fn split_at_len(&self, len: i64) -> (Span, Span) {
        let cut = (self.start_inclusive + len.max(0)).min(self.end_exclusive);
        (
            Span::new(self.start_inclusive, cut),
            Span::new(cut, self.end_exclusive),
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_swaps_reversed_bounds() {
        let s = Span::new(5, 3);
        assert_eq!(s.start(), 3);
        assert_eq!(s.end(), 5);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_closed_includes_last() {
        let s = Span::closed(2, 4);
        assert_eq!(s.len(), 3);
        assert!(s.contains(4));
        assert!(!s.contains(5));
        assert_eq!(s.last(), 4);
    }

    #[test]
    fn test_intersection_and_meets() {
        let a = Span::new(0, 4);
        let b = Span::new(4, 6);
        assert!(a.intersection(&b).is_none());
        assert!(a.meets(&b));
        assert!(!a.meets(&Span::new(5, 6)));
        assert_eq!(a.intersection(&Span::new(2, 8)), Some(Span::new(2, 4)));
        assert_eq!(a.intersection(&b), None);
        assert_eq!(a.hull(&Span::new(7, 9)), Span::new(0, 9));
    }

    #[test]
    fn test_split_at_len_clamps() {
        let s = Span::new(10, 15);
        assert_eq!(s.split_at_len(2), (Span::new(10, 12), Span::new(12, 15)));
        let (head, tail) = s.split_at_len(9);
        assert_eq!(head, s);
        assert!(tail.is_empty());
    }
}
