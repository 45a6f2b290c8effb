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

use std::fmt;

use tracing::trace;

use super::{Region, RegionIter, fmt_spans};
use crate::expr::{Operand, RegionExpression, SparseRegionExpression};
use crate::position::Position;
use crate::size::Size;
use crate::space::Space;
use crate::span::Span;
use crate::violation::{Evidence, Obligation, Violation};

/// An ordered sequence of non-overlapping contiguous runs.
///
/// The holes between runs are not part of the region. Runs may touch; the
/// builder keeps pieces exactly as they were appended. A sparse region with
/// no runs is the empty sparse region.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SparseRegion {
    space: Space,
    spans: Vec<Span>,
}

impl SparseRegion {
    pub(crate) fn from_spans(space: Space, spans: Vec<Span>) -> Self {
        debug_assert!(spans.iter().all(|s| !s.is_empty()));
        debug_assert!(spans.windows(2).all(|w| w[0].end() <= w[1].start()));
        Self { space, spans }
    }

    /// The sparse region without runs.
    #[inline]
    pub fn empty(space: Space) -> Self {
        Self {
            space,
            spans: Vec::new(),
        }
    }

    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    #[inline]
    pub(crate) fn spans(&self) -> &[Span] {
        &self.spans
    }

    #[inline]
    pub fn num_regions(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The run with the given index.
    pub fn region(&self, index: usize) -> RegionExpression {
        match self.spans.get(index) {
            Some(&span) => RegionExpression::Successful(Region::contiguous(self.space.clone(), span)),
            None => RegionExpression::Failed(
                Violation::new(Obligation::SubRegionIndexInBounds)
                    .with(Evidence::Count(i64::try_from(index).unwrap_or(i64::MAX)))
                    .with(Evidence::Count(i64::try_from(self.spans.len()).unwrap_or(i64::MAX))),
            ),
        }
    }

    /// Binary search over the runs.
    pub fn contains(&self, position: &Position) -> bool {
        if position.space() != &self.space {
            return false;
        }
        let rank = position.rank();
        let candidate = self.spans.partition_point(|s| s.end() <= rank);
        self.spans.get(candidate).is_some_and(|s| s.contains(rank))
    }

    /// Index of the run that is exactly `region`, found by binary search.
    pub fn index_of(&self, region: &Region) -> Option<usize> {
        if region.space() != &self.space {
            return None;
        }
        let [run] = region.spans() else {
            return None;
        };
        let candidate = self.spans.partition_point(|s| s.start() < run.start());
        (self.spans.get(candidate) == Some(run)).then_some(candidate)
    }

    /// `true` if `region` is one of the runs, not merely covered by them.
    #[inline]
    pub fn contains_region(&self, region: &Region) -> bool {
        self.index_of(region).is_some()
    }

    pub fn size(&self) -> Size {
        Size::new_unchecked(self.space.clone(), self.spans.iter().map(Span::len).sum())
    }

    pub fn start(&self) -> Option<Position> {
        self.spans
            .first()
            .map(|s| Position::from_rank(&self.space, s.start()))
    }

    pub fn end(&self) -> Option<Position> {
        self.spans
            .last()
            .map(|s| Position::from_rank(&self.space, s.last()))
    }

    #[inline]
    pub fn iter(&self) -> RegionIter<'_> {
        RegionIter::new(&self.space, &self.spans)
    }

    /// Each run as a region of its own.
    pub fn pieces(&self) -> impl Iterator<Item = Region> + '_ {
        self.spans
            .iter()
            .map(move |&span| Region::contiguous(self.space.clone(), span))
    }

    /// The region with these positions: empty, contiguous or sparse
    /// depending on the number of runs.
    pub fn into_region(self) -> Region {
        match self.spans.len() {
            0 | 1 => Region::from_spans_keeping_pieces(self.space, self.spans),
            _ => Region::Sparse(self),
        }
    }
}

impl fmt::Display for SparseRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_spans(&self.space, &self.spans, f)
    }
}

/// Accumulates runs into a [`SparseRegion`].
///
/// Regions must be appended in order and must not overlap. The first
/// offending input turns the builder into a failed builder: later input is
/// ignored and [`SparseRegionBuilder::build`] reports that first violation.
///
/// ```
/// use locus_core::space::Space;
///
/// let space = Space::integers(0, 99).unwrap();
/// let p = |raw| space.position(raw).unwrap();
/// let a = space.region(&p(0), &p(3)).unwrap();
/// let b = space.region(&p(8), &p(9)).unwrap();
///
/// let sparse = space.sparse_region_builder().concatenate(&a).concatenate(&b).build();
/// assert_eq!(sparse.unwrap().num_regions(), 2);
///
/// let reversed = space.sparse_region_builder().concatenate(&b).concatenate(&a).build();
/// assert!(reversed.is_failed());
/// ```
#[derive(Debug, Clone)]
pub struct SparseRegionBuilder {
    space: Space,
    spans: Vec<Span>,
    violation: Option<Violation>,
}

impl SparseRegionBuilder {
    #[inline]
    pub(crate) fn new(space: Space) -> Self {
        Self {
            space,
            spans: Vec::new(),
            violation: None,
        }
    }

    /// A builder that always builds to `violation`.
    #[inline]
    pub fn failed(space: Space, violation: Violation) -> Self {
        Self {
            space,
            spans: Vec::new(),
            violation: Some(violation),
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.violation.is_some()
    }

    /// Appends every run of `region`.
    #[must_use]
    pub fn concatenate<R: Operand<Region> + ?Sized>(mut self, region: &R) -> Self {
        if self.violation.is_some() {
            return self;
        }
        let region = match region.resolve() {
            Ok(r) => r,
            Err(v) => {
                self.violation = Some(v.clone());
                return self;
            }
        };
        if region.space() != &self.space {
            let v = Violation::space_mismatch(&self.space, region.space()).with(region.clone());
            return self.fail(v);
        }
        for &span in region.spans() {
            if let Some(last) = self.spans.last() {
                if span.start() < last.end() {
                    let v = Violation::new(Obligation::SubRegionsOrdered)
                        .with(Region::from_spans_keeping_pieces(
                            self.space.clone(),
                            self.spans.clone(),
                        ))
                        .with(region.clone());
                    return self.fail(v);
                }
            }
            self.spans.push(span);
        }
        self
    }

    fn fail(mut self, violation: Violation) -> Self {
        trace!(violation = %violation, "sparse region builder failed");
        self.violation = Some(violation);
        self.spans.clear();
        self
    }

    pub fn build(self) -> SparseRegionExpression {
        match self.violation {
            Some(v) => SparseRegionExpression::Failed(v),
            None => SparseRegionExpression::Successful(SparseRegion::from_spans(
                self.space,
                self.spans,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(space: &Space, a: i64, b: i64) -> Region {
        space
            .region(&space.position(a).unwrap(), &space.position(b).unwrap())
            .unwrap()
    }

    #[test]
    fn test_builder_keeps_touching_pieces() {
        let s = Space::integers(0, 20).unwrap();
        let built = s
            .sparse_region_builder()
            .concatenate(&region(&s, 0, 3))
            .concatenate(&region(&s, 4, 6))
            .build()
            .unwrap();
        assert_eq!(built.num_regions(), 2);
        assert_eq!(built.size().units(), 7);
        assert_eq!(built.to_string(), "{[0, 3], [4, 6]}");
    }

    #[test]
    fn test_builder_flattens_sparse_input() {
        let s = Space::integers(0, 20).unwrap();
        let first = s
            .sparse_region_builder()
            .concatenate(&region(&s, 0, 1))
            .concatenate(&region(&s, 3, 4))
            .build()
            .unwrap()
            .into_region();
        let built = s
            .sparse_region_builder()
            .concatenate(&first)
            .concatenate(&region(&s, 10, 12))
            .build()
            .unwrap();
        assert_eq!(built.num_regions(), 3);
    }

    #[test]
    fn test_builder_failure_is_sticky() {
        let s = Space::integers(0, 20).unwrap();
        let builder = s
            .sparse_region_builder()
            .concatenate(&region(&s, 5, 8))
            .concatenate(&region(&s, 7, 9));
        assert!(builder.is_failed());
        let built = builder.concatenate(&region(&s, 15, 16)).build();
        assert_eq!(
            built.violation().map(|v| v.obligation()),
            Some(Obligation::SubRegionsOrdered)
        );
    }

    #[test]
    fn test_builder_rejects_foreign_and_failed_input() {
        let s = Space::integers(0, 20).unwrap();
        let other = Space::integers(0, 20).unwrap();
        let builder = s
            .sparse_region_builder()
            .concatenate(&region(&s, 0, 1))
            .concatenate(&region(&other, 3, 4));
        assert!(builder.is_failed());
        let built = builder.concatenate(&region(&s, 6, 7)).build();
        assert_eq!(
            built.violation().map(|v| v.obligation()),
            Some(Obligation::SameSpace)
        );
        let failed = s.region(&s.position(4).unwrap(), &s.position(2).unwrap());
        let built = s.sparse_region_builder().concatenate(&failed).build();
        assert_eq!(
            built.violation().map(|v| v.obligation()),
            Some(Obligation::StartNotAfterEnd)
        );
        let explicit = SparseRegionBuilder::failed(s.clone(), Violation::new(Obligation::NonEmpty));
        assert!(explicit.build().is_failed());
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let s = Space::integers(0, 20).unwrap();
        let built = s
            .sparse_region_builder()
            .concatenate(&s.empty())
            .concatenate(&region(&s, 2, 3))
            .build()
            .unwrap();
        assert_eq!(built.num_regions(), 1);
        assert!(SparseRegion::empty(s.clone()).is_empty());
    }

    #[test]
    fn test_sparse_region_accessors() {
        let s = Space::integers(0, 20).unwrap();
        let built = s
            .sparse_region_builder()
            .concatenate(&region(&s, 2, 3))
            .concatenate(&region(&s, 7, 9))
            .build()
            .unwrap();
        assert_eq!(built.start().map(|p| p.raw()), Some(2));
        assert_eq!(built.end().map(|p| p.raw()), Some(9));
        assert!(built.contains(&s.position(8).unwrap()));
        assert!(!built.contains(&s.position(5).unwrap()));
        assert_eq!(built.region(1).unwrap(), region(&s, 7, 9));
        assert!(built.region(2).is_failed());
        assert_eq!(built.iter().count(), 5);
        assert_eq!(built.pieces().count(), 2);
    }

    #[test]
    fn test_contains_region_matches_whole_runs_only() {
        let s = Space::integers(0, 40).unwrap();
        let built = s
            .sparse_region_builder()
            .concatenate(&region(&s, 2, 3))
            .concatenate(&region(&s, 4, 6))
            .concatenate(&region(&s, 10, 15))
            .build()
            .unwrap();
        assert!(built.contains_region(&region(&s, 4, 6)));
        assert_eq!(built.index_of(&region(&s, 10, 15)), Some(2));
        assert_eq!(built.index_of(&region(&s, 2, 3)), Some(0));
        assert!(!built.contains_region(&region(&s, 11, 14)));
        assert!(!built.contains_region(&region(&s, 2, 6)));
        assert!(!built.contains_region(&s.empty()));
        let both = built.region(0).unwrap().expr().concatenate(&region(&s, 10, 15)).unwrap();
        assert!(!built.contains_region(&both));
        let other = Space::integers(0, 40).unwrap();
        assert!(!built.contains_region(&region(&other, 4, 6)));
        assert!(!SparseRegion::empty(s.clone()).contains_region(&region(&s, 4, 6)));
    }
}
