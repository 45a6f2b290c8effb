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

//! Sorted, disjoint, coalesced sets of rank spans.
//!
//! Invariants (always held):
//!    - spans are sorted by `start()`
//!    - spans are non-empty, non-overlapping and never touch
//!
//! Complexity:
//!    - union/subtract/intersection/symmetric difference: `O(n + m)`

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    /// Builds a set from arbitrary spans, sorting and coalescing them.
    pub(crate) fn from_vec(mut spans: Vec<Span>) -> Self {
        spans.retain(|s| !s.is_empty());
        if spans.len() > 1 {
            spans.sort_unstable_by_key(|s| s.start());
            let mut write = 0;
            for read in 1..spans.len() {
                if spans[write].meets(&spans[read]) {
                    spans[write] = spans[write].hull(&spans[read]);
                } else {
                    write += 1;
                    spans[write] = spans[read];
                }
            }
            spans.truncate(write + 1);
        }
        debug_assert!(Self::are_invariants_held(&spans));
        Self { spans }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    #[inline]
    pub(crate) fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    /// Number of ranks covered.
    #[inline]
    pub(crate) fn total_len(&self) -> i64 {
        self.spans.iter().map(Span::len).sum()
    }

    /// A ∪ B
    pub(crate) fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let (a, b) = (&self.spans, &other.spans);
        let (mut i, mut j) = (0usize, 0usize);
        let mut out = Self::with_capacity(a.len() + b.len());
        while i < a.len() && j < b.len() {
            let next = if a[i].start() <= b[j].start() {
                i += 1;
                a[i - 1]
            } else {
                j += 1;
                b[j - 1]
            };
            Self::append_and_merge_sorted(&mut out.spans, next);
        }
        for &span in a[i..].iter().chain(&b[j..]) {
            Self::append_and_merge_sorted(&mut out.spans, span);
        }
        debug_assert!(Self::are_invariants_held(&out.spans));
        out
    }

    /// A ∩ B
    pub(crate) fn intersection(&self, other: &Self) -> Self {
        let (a, b) = (&self.spans, &other.spans);
        let (mut i, mut j) = (0usize, 0usize);
        let mut out = Self::with_capacity(a.len().min(b.len()));
        while i < a.len() && j < b.len() {
            if let Some(overlap) = a[i].intersection(&b[j]) {
                out.spans.push(overlap);
            }
            if a[i].end() < b[j].end() {
                i += 1;
            } else {
                j += 1;
            }
        }
        debug_assert!(Self::are_invariants_held(&out.spans));
        out
    }

    /// A \ B
    pub(crate) fn subtract(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let (minuends, subtrahends) = (&self.spans, &other.spans);
        let mut out = Self::with_capacity(minuends.len());
        let mut cursor = 0usize;

        for &minuend in minuends {
            let mut current = minuend;
            while cursor < subtrahends.len() && subtrahends[cursor].end() <= current.start() {
                cursor += 1;
            }

            let mut lookahead = cursor;
            let mut consumed = false;
            while lookahead < subtrahends.len() && subtrahends[lookahead].start() < current.end() {
                let cut = subtrahends[lookahead];
                if cut.start() > current.start() {
                    out.spans.push(Span::new(current.start(), cut.start()));
                }
                if cut.end() >= current.end() {
                    consumed = true;
                    break;
                }
                current = Span::new(cut.end(), current.end());
                lookahead += 1;
            }
            if !consumed {
                out.spans.push(current);
            }
            cursor = lookahead;
        }
        debug_assert!(Self::are_invariants_held(&out.spans));
        out
    }

    /// (A \ B) ∪ (B \ A)
    pub(crate) fn symmetric_difference(&self, other: &Self) -> Self {
        self.subtract(other).union(&other.subtract(self))
    }

    #[inline]
    fn append_and_merge_sorted(destination: &mut Vec<Span>, next: Span) {
        if let Some(last) = destination.last_mut() {
            if last.meets(&next) {
                *last = last.hull(&next);
                return;
            }
        }
        destination.push(next);
    }

    fn are_invariants_held(spans: &[Span]) -> bool {
        spans.iter().all(|s| !s.is_empty()) && spans.windows(2).all(|w| w[0].end() < w[1].start())
    }
}

impl FromIterator<Span> for SpanSet {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
