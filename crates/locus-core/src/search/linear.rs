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

use tracing::instrument;

use super::{Criterion, Searcher, matching_runs, not_found};
use crate::expr::{PositionExpression, RegionExpression};
use crate::position::Position;
use crate::region::Region;

/// Visits every position of the region in order.
#[derive(Debug, Clone)]
pub struct LinearSearcher {
    region: Region,
    criteria: Vec<Arc<dyn Criterion>>,
}

impl LinearSearcher {
    pub fn new(region: Region, criteria: Vec<Arc<dyn Criterion>>) -> Self {
        Self { region, criteria }
    }

    #[inline]
    fn accepts(&self, position: &Position) -> bool {
        self.criteria.iter().all(|c| c.matches(position))
    }

    fn found(&self, hit: Option<Position>) -> PositionExpression {
        match hit {
            Some(p) => PositionExpression::Successful(p),
            None => PositionExpression::Failed(not_found(&self.region)),
        }
    }
}

impl Searcher for LinearSearcher {
    #[instrument(level = "trace", skip_all)]
    fn find(&self) -> PositionExpression {
        self.found(self.region.iter().find(|p| self.accepts(p)))
    }

    #[instrument(level = "trace", skip_all)]
    fn find_last(&self) -> PositionExpression {
        self.found(self.region.iter().rev().find(|p| self.accepts(p)))
    }

    #[instrument(level = "trace", skip_all)]
    fn find_all(&self) -> RegionExpression {
        let runs = matching_runs(&self.region, |p| self.accepts(p));
        RegionExpression::Successful(Region::from_span_set(
            self.region.space().clone(),
            runs,
            || not_found(&self.region),
        ))
    }
}
