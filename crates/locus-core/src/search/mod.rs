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

//! # Searching regions
//!
//! A [`Searcher`] locates the positions of a region that satisfy a set of
//! [`Criterion`]s. Which searcher is used is decided by a
//! [`SearchStrategy`]; a space may carry its own strategy, otherwise the
//! region picks one itself (see [`Region::default_search_strategy`]).
//!
//! All criteria must hold for a position to match. An empty list of criteria
//! matches every position.

mod bisect;
mod criteria;
mod linear;

use std::fmt;
use std::sync::Arc;

pub use bisect::BisectSearcher;
pub use criteria::{AtOrAfter, AtOrBefore, Matching, PositionEquals, Within};
pub use linear::LinearSearcher;

use crate::expr::{PositionExpression, RegionExpression};
use crate::order::Comparison;
use crate::position::Position;
use crate::region::Region;
use crate::span::Span;
use crate::span_set::SpanSet;
use crate::violation::{Obligation, Violation};

/// A predicate over positions.
pub trait Criterion: fmt::Debug + Send + Sync {
    fn matches(&self, position: &Position) -> bool;

    /// Where `position` lies relative to the run of matching positions:
    /// less means before it, equal inside it and greater after it.
    ///
    /// Criteria whose matches always form a single run in the order of the
    /// space can answer this; the default of `None` means no hint.
    fn locate(&self, _position: &Position) -> Option<Comparison> {
        None
    }

    /// Whether [`Criterion::locate`] gives a usable answer.
    fn is_monotonic(&self) -> bool {
        false
    }
}

pub trait Searcher: fmt::Debug {
    /// The first matching position.
    fn find(&self) -> PositionExpression;

    /// The last matching position.
    fn find_last(&self) -> PositionExpression;

    /// Every matching position. Finding nothing gives an empty region.
    fn find_all(&self) -> RegionExpression;
}

/// Chooses the searcher for a region.
pub trait SearchStrategy: fmt::Debug + Send + Sync {
    fn searcher(&self, region: &Region, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher>;
}

/// Defers to [`Region::default_search_strategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultSearchStrategy;

impl SearchStrategy for DefaultSearchStrategy {
    fn searcher(&self, region: &Region, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher> {
        region.default_search_strategy(criteria)
    }
}

/// Always scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearSearchStrategy;

impl SearchStrategy for LinearSearchStrategy {
    fn searcher(&self, region: &Region, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher> {
        Box::new(LinearSearcher::new(region.clone(), criteria.to_vec()))
    }
}

/// Stands in for a searcher over a failed expression.
#[derive(Debug, Clone)]
pub struct FailedSearcher {
    violation: Violation,
}

impl FailedSearcher {
    pub fn new(violation: Violation) -> Self {
        Self { violation }
    }
}

impl Searcher for FailedSearcher {
    fn find(&self) -> PositionExpression {
        PositionExpression::Failed(self.violation.clone())
    }

    fn find_last(&self) -> PositionExpression {
        PositionExpression::Failed(self.violation.clone())
    }

    fn find_all(&self) -> RegionExpression {
        RegionExpression::Failed(self.violation.clone())
    }
}

#[inline]
pub(crate) fn not_found(region: &Region) -> Violation {
    Violation::new(Obligation::MustBeFound).with(region.clone())
}

/// The maximal runs of positions of `region` accepted by `keep`.
pub(crate) fn matching_runs<F>(region: &Region, mut keep: F) -> SpanSet
where
    F: FnMut(&Position) -> bool,
{
    let space = region.space();
    let mut runs: Vec<Span> = Vec::new();
    for span in region.spans() {
        let mut run_start: Option<i64> = None;
        for rank in span.start()..span.end() {
            let hit = keep(&Position::from_rank(space, rank));
            match (hit, run_start) {
                (true, None) => run_start = Some(rank),
                (false, Some(start)) => {
                    runs.push(Span::new(start, rank));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push(Span::new(start, span.end()));
        }
    }
    SpanSet::from_vec(runs)
}
