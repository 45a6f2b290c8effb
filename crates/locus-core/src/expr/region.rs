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

use num_traits::Signed;
use tracing::{instrument, trace};

use super::{Expression, Operand, RegionExpression, SparseRegionExpression};
use crate::region::{Region, SparseRegion};
use crate::scalar::{self, Scalar};
use crate::search::{Criterion, FailedSearcher, Searcher, matching_runs};
use crate::size::Size;
use crate::space::{PositionOrder, Space};
use crate::span::Span;
use crate::violation::{Evidence, Obligation, Violation};

fn same_space(
    space: &Space,
    a: &Region,
    b: impl Into<Evidence>,
    other: &Space,
) -> Result<(), Violation> {
    if space == other {
        Ok(())
    } else {
        Err(Violation::space_mismatch(space, other)
            .with(a.clone())
            .with(b))
    }
}

fn regions_must_differ(a: &Region, b: &Region) -> Violation {
    Violation::new(Obligation::RegionsMustDiffer)
        .with(a.clone())
        .with(b.clone())
}

fn out_of_bounds(a: &Region, target: &Size) -> RegionExpression {
    let v = Violation::new(Obligation::WithinBounds)
        .with(a.clone())
        .with(target.clone());
    trace!(violation = %v, "scaled region left its space");
    Expression::Failed(v)
}

/// Combines two regions of the same space through `f`.
fn combine<F>(
    this: &RegionExpression,
    that: &(impl Operand<Region> + ?Sized),
    f: F,
) -> RegionExpression
where
    F: FnOnce(&Region, &Region) -> RegionExpression,
{
    this.with_operand(that, |a, b: &Region| {
        if let Err(v) = same_space(a.space(), a, b.clone(), b.space()) {
            return Expression::Failed(v);
        }
        f(a, b)
    })
}

impl Expression<Region> {
    /// Appends the pieces of `that` after the pieces of this region.
    ///
    /// Pieces are kept as they are, touching pieces included. Fails unless
    /// `that` starts after this region ends.
    pub fn concatenate<R: Operand<Region> + ?Sized>(&self, that: &R) -> RegionExpression {
        self.with_operand(that, |a, b: &Region| {
            a.space()
                .sparse_region_builder()
                .concatenate(a)
                .concatenate(b)
                .build()
                .map(SparseRegion::into_region)
        })
    }

    /// Positions in either region.
    ///
    /// ```
    /// use locus_core::space::Space;
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// let p = |raw| space.position(raw).unwrap();
    /// let a = space.region(&p(0), &p(4)).unwrap();
    /// let b = space.region(&p(5), &p(9)).unwrap();
    ///
    /// let joined = a.expr().union(&b).unwrap();
    /// assert_eq!(joined, space.region(&p(0), &p(9)).unwrap());
    /// ```
    pub fn union<R: Operand<Region> + ?Sized>(&self, that: &R) -> RegionExpression {
        combine(self, that, |a, b| {
            if a == b {
                return Expression::Successful(a.clone());
            }
            let set = a.span_set().union(&b.span_set());
            Expression::Successful(Region::from_span_set(a.space().clone(), set, || {
                Violation::new(Obligation::NonEmpty).with(a.clone()).with(b.clone())
            }))
        })
    }

    /// Positions in both regions. No overlap gives an empty region.
    pub fn intersection<R: Operand<Region> + ?Sized>(&self, that: &R) -> RegionExpression {
        combine(self, that, |a, b| {
            if a == b {
                return Expression::Successful(a.clone());
            }
            let set = a.span_set().intersection(&b.span_set());
            Expression::Successful(Region::from_span_set(a.space().clone(), set, || {
                Violation::new(Obligation::NonEmpty).with(a.clone()).with(b.clone())
            }))
        })
    }

    /// Positions in exactly one of the regions.
    pub fn difference<R: Operand<Region> + ?Sized>(&self, that: &R) -> RegionExpression {
        combine(self, that, |a, b| {
            let space = a.space().clone();
            if a == b {
                return Expression::Successful(Region::empty(space, regions_must_differ(a, b)));
            }
            let set = a.span_set().symmetric_difference(&b.span_set());
            Expression::Successful(Region::from_span_set(space, set, || regions_must_differ(a, b)))
        })
    }

    /// Positions of this region that are not in `that`.
    pub fn exclude<R: Operand<Region> + ?Sized>(&self, that: &R) -> RegionExpression {
        combine(self, that, |a, b| {
            let rest = a.span_set().subtract(&b.span_set());
            if rest.total_len() == a.size().units() {
                return Expression::Successful(a.clone());
            }
            Expression::Successful(Region::from_span_set(a.space().clone(), rest, || {
                regions_must_differ(a, b)
            }))
        })
    }

    /// Every position of the space outside this region.
    pub fn invert(&self) -> RegionExpression {
        self.as_ref()
            .and_then(|a| a.space().all().expr().exclude(a))
    }

    /// Resizes the region to `target` units around its midpoint.
    ///
    /// The start moves by half the change, rounded half up; the end takes
    /// the rest. A sparse region is scaled as its hull.
    ///
    /// ```
    /// use locus_core::space::Space;
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// let p = |raw| space.position(raw).unwrap();
    /// let r = space.region(&p(3), &p(5)).unwrap();
    ///
    /// let grown = r.expr().scale(&space.size(9).unwrap()).unwrap();
    /// assert_eq!(grown, space.region(&p(0), &p(8)).unwrap());
    /// ```
    #[instrument(level = "trace", skip_all)]
    pub fn scale<S: Operand<Size> + ?Sized>(&self, target: &S) -> RegionExpression {
        self.with_operand(target, |a, t: &Size| {
            let space = a.space();
            if let Err(v) = same_space(space, a, t.clone(), t.space()) {
                return Expression::Failed(v);
            }
            let Some(hull) = a.hull() else {
                return Expression::Failed(Violation::new(Obligation::NonEmpty).with(a.clone()));
            };
            let wanted = t.units();
            if wanted == a.size().units() {
                return Expression::Successful(a.clone());
            }
            if wanted == 0 {
                let v = Violation::new(Obligation::NonEmpty)
                    .with(a.clone())
                    .with(t.clone());
                return Expression::Successful(Region::empty(space.clone(), v));
            }

            let current = hull.len();
            let ratio: Scalar = scalar::integer(wanted) / scalar::integer(current);
            let half = (ratio - scalar::integer(1)) * scalar::integer(current) / scalar::integer(2);
            let Some(lead) = scalar::round_half_up(&half.abs()) else {
                return out_of_bounds(a, t);
            };
            let delta = wanted - current;
            let (start, end) = if delta >= 0 {
                (hull.start() - lead, hull.end() + (delta - lead))
            } else {
                (hull.start() + lead, hull.end() - (-delta - lead))
            };
            if start < 0 || end > space.count() {
                return out_of_bounds(a, t);
            }
            Expression::Successful(Region::contiguous(space.clone(), Span::new(start, end)))
        })
    }

    /// The same positions read in `order`, as a region of
    /// `space.with_order(order)`. Only ascending and descending
    /// enumeration exist, so no other ordering can be applied here.
    pub fn sort(&self, order: PositionOrder) -> RegionExpression {
        self.as_ref()
            .and_then(|a| a.space().with_order(order).from_region(a))
    }

    /// Cuts every piece into consecutive pieces of `size` units; the last
    /// piece of each may be shorter.
    #[instrument(level = "trace", skip_all)]
    pub fn split_by<S: Operand<Size> + ?Sized>(&self, size: &S) -> SparseRegionExpression {
        self.with_operand(size, |a, s: &Size| {
            let space = a.space();
            if let Err(v) = same_space(space, a, s.clone(), s.space()) {
                return Expression::Failed(v);
            }
            if s.is_zero() {
                return Expression::Successful(SparseRegion::empty(space.clone()));
            }
            let mut pieces = Vec::new();
            for &span in a.spans() {
                let mut rest = span;
                while !rest.is_empty() {
                    let (head, tail) = rest.split_at_len(s.units());
                    pieces.push(head);
                    rest = tail;
                }
            }
            Expression::Successful(SparseRegion::from_spans(space.clone(), pieces))
        })
    }

    /// Cuts the region into `n` parts whose sizes differ by at most one.
    /// Earlier parts take the remainder. A part crossing a hole between
    /// pieces is cut there too, so on a sparse receiver one part may span
    /// several pieces and `num_regions()` of the result can exceed `n`.
    /// A single-unit region is returned as one piece whatever `n` is.
    ///
    /// ```
    /// use locus_core::space::Space;
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// let p = |raw| space.position(raw).unwrap();
    /// let r = space.region(&p(0), &p(9)).unwrap();
    ///
    /// let parts = r.expr().split_into(3).unwrap();
    /// assert_eq!(parts.to_string(), "{[0, 3], [4, 6], [7, 9]}");
    /// ```
    #[instrument(level = "trace", skip_all, fields(n = n))]
    pub fn split_into(&self, n: i64) -> SparseRegionExpression {
        self.as_ref().and_then(|a| {
            let space = a.space().clone();
            let total = a.size().units();
            if n <= 0 || total == 0 {
                return Expression::Successful(SparseRegion::empty(space));
            }
            if n == 1 || total == 1 {
                return Expression::Successful(a.to_sparse());
            }
            if n > total {
                let v = Violation::new(Obligation::SplitWithinSize)
                    .with(a.clone())
                    .with(Evidence::Count(n));
                trace!(violation = %v, "too many parts requested");
                return Expression::Failed(v);
            }
            let (base, extra) = (total / n, total % n);
            let mut pieces = Vec::new();
            let mut offset = 0;
            for part in 0..n {
                let len = base + i64::from(part < extra);
                pieces.extend(a.spans_between(offset, offset + len));
                offset += len;
            }
            Expression::Successful(SparseRegion::from_spans(space, pieces))
        })
    }

    /// The positions accepted by `criterion`, as runs.
    pub fn filter<C: Criterion + ?Sized>(&self, criterion: &C) -> RegionExpression {
        self.as_ref().map(|a| {
            let runs = matching_runs(a, |p| criterion.matches(p));
            Region::from_span_set(a.space().clone(), runs, || {
                Violation::new(Obligation::NonEmpty).with(a.clone())
            })
        })
    }

    /// A searcher over this region. A failed expression gives a searcher
    /// that reports the failure.
    pub fn search(&self, criteria: &[Arc<dyn Criterion>]) -> Box<dyn Searcher> {
        match self {
            Expression::Successful(region) => region.searcher(criteria),
            Expression::Failed(v) => Box::new(FailedSearcher::new(v.clone())),
        }
    }
}
