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

use super::Criterion;
use crate::order::Comparison;
use crate::position::Position;
use crate::region::Region;

/// Where `rank` lies relative to the closed run `first..=last`.
#[inline]
fn locate_in_run(rank: i64, first: i64, last: i64) -> Comparison {
    if rank < first {
        Comparison::LeftLessThanRight
    } else if rank > last {
        Comparison::LeftGreaterThanRight
    } else {
        Comparison::LeftEqualsRight
    }
}

/// Matches a single position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionEquals {
    target: Position,
}

impl PositionEquals {
    pub fn new(target: Position) -> Self {
        Self { target }
    }
}

impl Criterion for PositionEquals {
    fn matches(&self, position: &Position) -> bool {
        *position == self.target
    }

    fn locate(&self, position: &Position) -> Option<Comparison> {
        if position.space() != self.target.space() {
            return Some(Comparison::IncomparableLeft);
        }
        let rank = self.target.rank();
        Some(locate_in_run(position.rank(), rank, rank))
    }

    fn is_monotonic(&self) -> bool {
        true
    }
}

/// Matches the bound and every position after it in the order of its space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtOrAfter {
    bound: Position,
}

impl AtOrAfter {
    pub fn new(bound: Position) -> Self {
        Self { bound }
    }
}

impl Criterion for AtOrAfter {
    fn matches(&self, position: &Position) -> bool {
        position.space() == self.bound.space() && position.rank() >= self.bound.rank()
    }

    fn locate(&self, position: &Position) -> Option<Comparison> {
        if position.space() != self.bound.space() {
            return Some(Comparison::IncomparableLeft);
        }
        Some(locate_in_run(position.rank(), self.bound.rank(), i64::MAX))
    }

    fn is_monotonic(&self) -> bool {
        true
    }
}

/// Matches the bound and every position before it in the order of its space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtOrBefore {
    bound: Position,
}

impl AtOrBefore {
    pub fn new(bound: Position) -> Self {
        Self { bound }
    }
}

impl Criterion for AtOrBefore {
    fn matches(&self, position: &Position) -> bool {
        position.space() == self.bound.space() && position.rank() <= self.bound.rank()
    }

    fn locate(&self, position: &Position) -> Option<Comparison> {
        if position.space() != self.bound.space() {
            return Some(Comparison::IncomparableLeft);
        }
        Some(locate_in_run(position.rank(), i64::MIN, self.bound.rank()))
    }

    fn is_monotonic(&self) -> bool {
        true
    }
}

/// Matches the positions of a region.
///
/// Monotonic only when the region is a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Within {
    region: Region,
}

impl Within {
    pub fn new(region: Region) -> Self {
        Self { region }
    }
}

impl Criterion for Within {
    fn matches(&self, position: &Position) -> bool {
        self.region.contains(position)
    }

    fn locate(&self, position: &Position) -> Option<Comparison> {
        if position.space() != self.region.space() {
            return Some(Comparison::IncomparableLeft);
        }
        match self.region.spans() {
            [only] => Some(locate_in_run(position.rank(), only.start(), only.last())),
            _ => None,
        }
    }

    fn is_monotonic(&self) -> bool {
        self.region.num_regions() == 1
    }
}

/// Matches the positions a closure accepts.
pub struct Matching<F> {
    predicate: F,
}

impl<F> Matching<F>
where
    F: Fn(&Position) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> Criterion for Matching<F>
where
    F: Fn(&Position) -> bool + Send + Sync,
{
    fn matches(&self, position: &Position) -> bool {
        (self.predicate)(position)
    }
}

impl<F> fmt::Debug for Matching<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matching(<fn>)")
    }
}
