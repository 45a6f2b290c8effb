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

//! # Regions
//!
//! A [`Region`] is an immutable set of positions of one space. It is either
//! a single contiguous run, a sparse sequence of runs with holes between
//! them, or empty. Regions never copy the data they describe; they are
//! addresses only.
//!
//! Each run is kept as a half-open span of ranks, so the same code serves
//! ascending and descending spaces.

mod iter;
mod sparse;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use iter::RegionIter;
pub use sparse::{SparseRegion, SparseRegionBuilder};

use crate::expr::RegionExpression;
use crate::order::{Comparison, Order};
use crate::position::Position;
use crate::search::{BisectSearcher, Criterion, LinearSearcher, Searcher};
use crate::size::Size;
use crate::space::Space;
use crate::span::Span;
use crate::span_set::SpanSet;
use crate::violation::{Evidence, Obligation, Violation};

/// A single run of positions, `start..=end` in the order of its space.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContiguousRegion {
    space: Space,
    span: Span,
}

impl ContiguousRegion {
    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    #[inline]
    pub fn start(&self) -> Position {
        Position::from_rank(&self.space, self.span.start())
    }

    #[inline]
    pub fn end(&self) -> Position {
        Position::from_rank(&self.space, self.span.last())
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new_unchecked(self.space.clone(), self.span.len())
    }
}

/// A region without positions, together with the reason it is empty.
#[derive(Clone, Debug)]
pub struct EmptyRegion {
    space: Space,
    violation: Violation,
}

impl EmptyRegion {
    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Why the region came out empty.
    #[inline]
    pub fn violation(&self) -> &Violation {
        &self.violation
    }
}

/// A set of positions of one space.
///
/// Equality compares the space and the runs; an empty region equals any
/// other empty region of the same space, and a sparse region with a single
/// run equals the contiguous region covering it.
#[derive(Clone, Debug)]
pub enum Region {
    Contiguous(ContiguousRegion),
    Sparse(SparseRegion),
    Empty(EmptyRegion),
}

impl Region {
    #[inline]
    pub(crate) fn contiguous(space: Space, span: Span) -> Region {
        debug_assert!(!span.is_empty());
        debug_assert!(span.start() >= 0 && span.end() <= space.count());
        Region::Contiguous(ContiguousRegion { space, span })
    }

    #[inline]
    pub(crate) fn empty(space: Space, violation: Violation) -> Region {
        Region::Empty(EmptyRegion { space, violation })
    }

    /// Region with exactly the given runs; no runs gives an empty region.
    pub(crate) fn from_spans_keeping_pieces(space: Space, mut spans: Vec<Span>) -> Region {
        match spans.len() {
            0 => {
                let violation = Violation::new(Obligation::NonEmpty).with(space.clone());
                Region::empty(space, violation)
            }
            1 => Region::contiguous(space, spans.remove(0)),
            _ => Region::Sparse(SparseRegion::from_spans(space, spans)),
        }
    }

    /// Region of a coalesced span set. `on_empty` explains an empty result.
    pub(crate) fn from_span_set(
        space: Space,
        set: SpanSet,
        on_empty: impl FnOnce() -> Violation,
    ) -> Region {
        if set.is_empty() {
            return Region::empty(space, on_empty());
        }
        Region::from_spans_keeping_pieces(space, set.into_spans())
    }

    #[inline]
    pub fn space(&self) -> &Space {
        match self {
            Region::Contiguous(c) => &c.space,
            Region::Sparse(s) => s.space(),
            Region::Empty(e) => &e.space,
        }
    }

    #[inline]
    pub(crate) fn spans(&self) -> &[Span] {
        match self {
            Region::Contiguous(c) => std::slice::from_ref(&c.span),
            Region::Sparse(s) => s.spans(),
            Region::Empty(_) => &[],
        }
    }

    #[inline]
    pub(crate) fn span_set(&self) -> SpanSet {
        SpanSet::from_vec(self.spans().to_vec())
    }

    /// Smallest run covering every position.
    #[inline]
    pub(crate) fn hull(&self) -> Option<Span> {
        let spans = self.spans();
        match (spans.first(), spans.last()) {
            (Some(first), Some(last)) => Some(first.hull(last)),
            _ => None,
        }
    }

    /// Runs covering the positions with indices `from..to` of this region.
    pub(crate) fn spans_between(&self, from: i64, to: i64) -> Vec<Span> {
        let mut out = Vec::new();
        let mut offset = 0i64;
        for span in self.spans() {
            if offset >= to {
                break;
            }
            let (lo, hi) = (offset, offset + span.len());
            let (a, b) = (from.max(lo), to.min(hi));
            if a < b {
                out.push(Span::new(span.start() + (a - lo), span.start() + (b - lo)));
            }
            offset = hi;
        }
        out
    }

    /// First position, if any.
    #[inline]
    pub fn start(&self) -> Option<Position> {
        self.spans()
            .first()
            .map(|s| Position::from_rank(self.space(), s.start()))
    }

    /// Last position, if any.
    #[inline]
    pub fn end(&self) -> Option<Position> {
        self.spans()
            .last()
            .map(|s| Position::from_rank(self.space(), s.last()))
    }

    /// Number of positions.
    pub fn size(&self) -> Size {
        let units = self.spans().iter().map(Span::len).sum();
        Size::new_unchecked(self.space().clone(), units)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans().is_empty()
    }

    /// Membership test; `O(log n)` in the number of runs.
    pub fn contains(&self, position: &Position) -> bool {
        if position.space() != self.space() {
            return false;
        }
        let rank = position.rank();
        let spans = self.spans();
        let candidate = spans.partition_point(|s| s.end() <= rank);
        spans.get(candidate).is_some_and(|s| s.contains(rank))
    }

    /// The position with the given index in this region.
    pub fn nth(&self, index: i64) -> Option<Position> {
        if index < 0 {
            return None;
        }
        let mut rest = index;
        for span in self.spans() {
            if rest < span.len() {
                return Some(Position::from_rank(self.space(), span.start() + rest));
            }
            rest -= span.len();
        }
        None
    }

    /// Positions in the order of the space.
    #[inline]
    pub fn iter(&self) -> RegionIter<'_> {
        RegionIter::new(self.space(), self.spans())
    }

    /// Number of contiguous runs.
    #[inline]
    pub fn num_regions(&self) -> usize {
        self.spans().len()
    }

    /// The contiguous run with the given index.
    pub fn region(&self, index: usize) -> RegionExpression {
        match self.spans().get(index) {
            Some(&span) => RegionExpression::Successful(Region::contiguous(self.space().clone(), span)),
            None => RegionExpression::Failed(
                Violation::new(Obligation::SubRegionIndexInBounds)
                    .with(Evidence::Count(i64::try_from(index).unwrap_or(i64::MAX)))
                    .with(self.clone()),
            ),
        }
    }

    /// Each contiguous run as a region of its own.
    pub fn pieces(&self) -> impl Iterator<Item = Region> + '_ {
        self.spans()
            .iter()
            .map(move |&span| Region::contiguous(self.space().clone(), span))
    }

    /// Why the region is empty, for empty regions.
    #[inline]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Region::Empty(e) => Some(&e.violation),
            _ => None,
        }
    }

    #[inline]
    pub fn expr(&self) -> RegionExpression {
        RegionExpression::Successful(self.clone())
    }

    /// The same positions as a sparse region, one piece per run.
    pub fn to_sparse(&self) -> SparseRegion {
        match self {
            Region::Sparse(s) => s.clone(),
            _ => SparseRegion::from_spans(self.space().clone(), self.spans().to_vec()),
        }
    }

    /// A searcher over this region, chosen by the space's search strategy
    /// when it has one.
    pub fn searcher(&self, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher> {
        match self.space().search_strategy() {
            Some(strategy) => strategy.searcher(self, criteria),
            None => self.default_search_strategy(criteria),
        }
    }

    /// Bisection for a single monotonic criterion, a linear scan otherwise.
    pub fn default_search_strategy(&self, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher> {
        match (self, criteria) {
            (Region::Contiguous(_) | Region::Sparse(_), [single]) if single.is_monotonic() => {
                Box::new(BisectSearcher::new(self.clone(), Arc::clone(single)))
            }
            _ => Box::new(LinearSearcher::new(self.clone(), criteria.to_vec())),
        }
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.space() == other.space() && self.spans() == other.spans()
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.space().hash(state);
        self.spans().hash(state);
    }
}

impl From<ContiguousRegion> for Region {
    fn from(c: ContiguousRegion) -> Self {
        Region::Contiguous(c)
    }
}

impl From<SparseRegion> for Region {
    fn from(s: SparseRegion) -> Self {
        s.into_region()
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = Position;
    type IntoIter = RegionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn fmt_spans(space: &Space, spans: &[Span], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let runs: Vec<String> = spans
        .iter()
        .map(|s| {
            format!(
                "[{}, {}]",
                Position::from_rank(space, s.start()),
                Position::from_rank(space, s.last())
            )
        })
        .collect();
    match runs.len() {
        1 => write!(f, "{}", runs[0]),
        _ => write!(f, "{{{}}}", runs.join(", ")),
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_spans(self.space(), self.spans(), f)
    }
}

/// Orders regions of one space by first position, then by last position.
///
/// Empty regions and regions of different spaces are incomparable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegionOrder;

impl Order<Region> for RegionOrder {
    fn compare_values(&self, left: &Region, right: &Region) -> Comparison {
        if left.space() != right.space() {
            return Comparison::IncomparableLeft;
        }
        match (left.hull(), right.hull()) {
            (None, _) => Comparison::IncomparableLeft,
            (_, None) => Comparison::IncomparableRight,
            (Some(a), Some(b)) => (a.start(), a.end()).cmp(&(b.start(), b.end())).into(),
        }
    }
}
