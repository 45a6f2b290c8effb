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

use std::sync::Arc;

use tracing::{instrument, trace};

use super::{Criterion, LinearSearcher, Searcher, not_found};
use crate::expr::{PositionExpression, RegionExpression};
use crate::order::Comparison;
use crate::region::Region;

/// Binary search for a criterion whose matches form a single run.
///
/// Relies on [`Criterion::locate`]. When the criterion gives no answer, or
/// an incomparable one, the search falls back to a linear scan.
#[derive(Debug, Clone)]
pub struct BisectSearcher {
    region: Region,
    criterion: Arc<dyn Criterion>,
}

impl BisectSearcher {
    pub fn new(region: Region, criterion: Arc<dyn Criterion>) -> Self {
        Self { region, criterion }
    }

    fn locate_at(&self, index: i64) -> Option<Comparison> {
        let position = self.region.nth(index)?;
        self.criterion
            .locate(&position)
            .filter(|c| !c.is_incomparable())
    }

    /// First index in `0..len` whose location satisfies `past`, or `len`.
    /// `None` when some probe could not be located.
    fn partition_point<P>(&self, past: P) -> Option<i64>
    where
        P: Fn(Comparison) -> bool,
    {
        let (mut lo, mut hi) = (0i64, self.region.size().units());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if past(self.locate_at(mid)?) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Some(lo)
    }

    /// Index range `first..end` of the matching run.
    fn run(&self) -> Option<(i64, i64)> {
        let first = self.partition_point(|c| !c.is_less())?;
        let end = self.partition_point(Comparison::is_greater)?;
        Some((first, end))
    }

    fn matches_at(&self, index: i64) -> bool {
        self.region
            .nth(index)
            .is_some_and(|p| self.criterion.matches(&p))
    }

    fn fallback(&self) -> LinearSearcher {
        trace!(criterion = ?self.criterion, "criterion gave no location, scanning");
        LinearSearcher::new(self.region.clone(), vec![Arc::clone(&self.criterion)])
    }
}

impl Searcher for BisectSearcher {
    #[instrument(level = "trace", skip_all)]
    fn find(&self) -> PositionExpression {
        let Some((first, end)) = self.run() else {
            return self.fallback().find();
        };
        match self.region.nth(first) {
            Some(p) if first < end && self.criterion.matches(&p) => PositionExpression::Successful(p),
            _ => PositionExpression::Failed(not_found(&self.region)),
        }
    }

    #[instrument(level = "trace", skip_all)]
    fn find_last(&self) -> PositionExpression {
        let Some((first, end)) = self.run() else {
            return self.fallback().find_last();
        };
        match self.region.nth(end - 1) {
            Some(p) if first < end && self.criterion.matches(&p) => PositionExpression::Successful(p),
            _ => PositionExpression::Failed(not_found(&self.region)),
        }
    }

    #[instrument(level = "trace", skip_all)]
    fn find_all(&self) -> RegionExpression {
        let Some((first, end)) = self.run() else {
            return self.fallback().find_all();
        };
        let space = self.region.space().clone();
        if first < end && self.matches_at(first) && self.matches_at(end - 1) {
            let spans = self.region.spans_between(first, end);
            return RegionExpression::Successful(Region::from_spans_keeping_pieces(space, spans));
        }
        RegionExpression::Successful(Region::empty(space, not_found(&self.region)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::search::{AtOrAfter, AtOrBefore, PositionEquals, Within};
    use crate::space::{PositionOrder, Space};
    use crate::violation::Obligation;

    fn bisect(region: &Region, criterion: impl Criterion + 'static) -> BisectSearcher {
        BisectSearcher::new(region.clone(), Arc::new(criterion))
    }

    fn region(space: &Space, a: i64, b: i64) -> Region {
        space
            .region(&space.position(a).unwrap(), &space.position(b).unwrap())
            .unwrap()
    }

    #[test]
    fn test_finds_bounds_of_run() {
        let s = Space::integers(0, 999).unwrap();
        let r = s.all();
        let after = bisect(&r, AtOrAfter::new(s.position(617).unwrap()));
        assert_eq!(after.find().unwrap().raw(), 617);
        assert_eq!(after.find_last().unwrap().raw(), 999);
        assert_eq!(after.find_all().unwrap(), region(&s, 617, 999));

        let before = bisect(&r, AtOrBefore::new(s.position(12).unwrap()));
        assert_eq!(before.find().unwrap().raw(), 0);
        assert_eq!(before.find_last().unwrap().raw(), 12);
    }

    #[test]
    fn test_sparse_region_skips_holes() {
        let s = Space::integers(0, 99).unwrap();
        let r = s
            .sparse_region_builder()
            .concatenate(&region(&s, 0, 9))
            .concatenate(&region(&s, 50, 59))
            .build()
            .unwrap()
            .into_region();
        let after = bisect(&r, AtOrAfter::new(s.position(20).unwrap()));
        assert_eq!(after.find().unwrap().raw(), 50);
        let within = bisect(&r, Within::new(region(&s, 5, 55)));
        let hits = within.find_all().unwrap();
        assert_eq!(hits.num_regions(), 2);
        assert_eq!(hits.size().units(), 11);
    }

    #[test]
    fn test_missing_target() {
        let s = Space::integers(0, 99).unwrap();
        let r = region(&s, 10, 20);
        let eq = bisect(&r, PositionEquals::new(s.position(50).unwrap()));
        assert_eq!(
            eq.find().violation().map(|v| v.obligation()),
            Some(Obligation::MustBeFound)
        );
        assert!(eq.find_last().is_failed());
        assert!(eq.find_all().unwrap().is_empty());
        assert!(bisect(&s.empty(), PositionEquals::new(s.min())).find().is_failed());
    }

    #[test]
    fn test_descending_space() {
        let d = Space::integers(0, 99)
            .unwrap()
            .with_order(PositionOrder::Descending);
        let r = d.all();
        let after = bisect(&r, AtOrAfter::new(d.position(30).unwrap()));
        assert_eq!(after.find().unwrap().raw(), 30);
        assert_eq!(after.find_last().unwrap().raw(), 0);
    }

    #[test]
    fn test_falls_back_to_scan() {
        let s = Space::integers(0, 99).unwrap();
        let other = Space::integers(0, 99).unwrap();
        let foreign = bisect(&s.all(), PositionEquals::new(other.position(5).unwrap()));
        assert!(foreign.find().is_failed());

        let sparse_within = s
            .sparse_region_builder()
            .concatenate(&region(&s, 1, 2))
            .concatenate(&region(&s, 8, 9))
            .build()
            .unwrap()
            .into_region();
        let within = bisect(&s.all(), Within::new(sparse_within));
        assert_eq!(within.find().unwrap().raw(), 1);
        assert_eq!(within.find_last().unwrap().raw(), 9);
        let all: Vec<i64> = within.find_all().unwrap().iter().map(|p: Position| p.raw()).collect();
        assert_eq!(all, vec![1, 2, 8, 9]);
    }
}
