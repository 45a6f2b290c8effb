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

//! # Spaces
//!
//! A [`Space`] is an ordered, bounded coordinate system: integer indices or
//! byte offsets, instants on a tick grid, or cells of an N-dimensional grid.
//! It manufactures the positions, sizes and regions that live in it, and
//! values of different spaces never mix.
//!
//! Internally every position has a *rank*, its zero-based index in the order
//! of the space. All arithmetic is done on ranks, so a descending space is
//! handled by the same code as an ascending one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

use crate::config::{SpaceBuilder, SpaceConfigError};
use crate::expr::{Operand, PositionExpression, RegionExpression, SizeExpression};
use crate::order::{Comparison, Order};
use crate::position::Position;
use crate::region::{Region, SparseRegionBuilder};
use crate::search::SearchStrategy;
use crate::size::Size;
use crate::span::Span;
use crate::violation::{Evidence, Obligation, Violation};

static NEXT_SPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceId(u64);

impl SpaceId {
    fn next() -> Self {
        SpaceId(NEXT_SPACE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpaceId({})", self.0)
    }
}

/// Direction in which the positions of a space are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionOrder {
    #[default]
    Ascending,
    Descending,
}

impl PositionOrder {
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            PositionOrder::Ascending => PositionOrder::Descending,
            PositionOrder::Descending => PositionOrder::Ascending,
        }
    }
}

impl fmt::Display for PositionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionOrder::Ascending => write!(f, "ascending"),
            PositionOrder::Descending => write!(f, "descending"),
        }
    }
}

/// What the coordinates of a space denote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpaceKind {
    /// Integer indices, array slots or byte offsets.
    Index,
    /// Instants; the step is the tick length.
    Time,
    /// Cells of a grid with the given extents, linearised row-major.
    Grid(Vec<u64>),
}

pub(crate) struct SpaceInner {
    id: SpaceId,
    name: String,
    kind: SpaceKind,
    lower: i64,
    upper: i64,
    step: i64,
    origin: i64,
    count: i64,
    strategy: Option<Arc<dyn SearchStrategy>>,
}

/// A bounded, ordered coordinate system.
///
/// Cloning is cheap. Two spaces are equal when they share their identity and
/// their order; [`Space::with_order`] therefore yields a space that is
/// distinct from the one it was derived from.
#[derive(Clone)]
pub struct Space {
    inner: Arc<SpaceInner>,
    order: PositionOrder,
}

impl Space {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        kind: SpaceKind,
        lower: i64,
        upper: i64,
        step: i64,
        origin: i64,
        count: i64,
        order: PositionOrder,
        strategy: Option<Arc<dyn SearchStrategy>>,
    ) -> Self {
        Self {
            inner: Arc::new(SpaceInner {
                id: SpaceId::next(),
                name,
                kind,
                lower,
                upper,
                step,
                origin,
                count,
                strategy,
            }),
            order,
        }
    }

    /// Integer positions `min..=max`, ascending.
    ///
    /// ```
    /// use locus_core::space::Space;
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// assert_eq!(space.count(), 100);
    /// assert_eq!(space.min().raw(), 0);
    /// assert_eq!(space.max().raw(), 99);
    /// ```
    pub fn integers(min: i64, max: i64) -> Result<Space, SpaceConfigError> {
        SpaceBuilder::new()
            .name("integers")
            .bounds(min, max)
            .build()
    }

    /// Slots `0..len` of an array.
    pub fn array(len: u64) -> Result<Space, SpaceConfigError> {
        let max = i64::try_from(len).map_err(|_| SpaceConfigError::TooManyPositions)? - 1;
        if max < 0 {
            return Err(SpaceConfigError::EmptyBounds);
        }
        SpaceBuilder::new().name("array").bounds(0, max).build()
    }

    /// Instants `min..=max` on a grid of `tick` time units, starting at `min`.
    pub fn time(tick: i64, min: i64, max: i64) -> Result<Space, SpaceConfigError> {
        SpaceBuilder::new()
            .name("time")
            .kind(SpaceKind::Time)
            .bounds(min, max)
            .step(tick)
            .build()
    }

    /// Cells of a grid with the given extents.
    pub fn grid(extents: &[u64]) -> Result<Space, SpaceConfigError> {
        SpaceBuilder::new()
            .name("grid")
            .kind(SpaceKind::Grid(extents.to_vec()))
            .build()
    }

    #[inline]
    pub fn builder() -> SpaceBuilder {
        SpaceBuilder::new()
    }

    #[inline]
    pub fn id(&self) -> SpaceId {
        self.inner.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[inline]
    pub fn kind(&self) -> &SpaceKind {
        &self.inner.kind
    }

    /// Distance between neighbouring raw coordinates.
    #[inline]
    pub fn step(&self) -> i64 {
        self.inner.step
    }

    /// Number of positions.
    #[inline]
    pub fn count(&self) -> i64 {
        self.inner.count
    }

    /// Smallest and largest raw coordinate, independent of the order.
    #[inline]
    pub fn raw_bounds(&self) -> (i64, i64) {
        (self.inner.lower, self.inner.upper)
    }

    #[inline]
    pub fn order(&self) -> PositionOrder {
        self.order
    }

    /// This space enumerated in `order`.
    ///
    /// Only ascending and descending enumeration over the raw coordinates
    /// is supported; an arbitrary [`Order<Position>`](crate::order::Order)
    /// cannot reorder a space, since positions are addressed by rank. The
    /// result shares this space's identity but is not equal to it unless
    /// `order` is unchanged.
    #[must_use]
    pub fn with_order(&self, order: PositionOrder) -> Space {
        Space {
            inner: Arc::clone(&self.inner),
            order,
        }
    }

    /// `true` if both spaces share an identity, whatever their order.
    #[inline]
    pub fn same_identity(&self, other: &Space) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn search_strategy(&self) -> Option<&Arc<dyn SearchStrategy>> {
        self.inner.strategy.as_ref()
    }

    /// First position in the order of the space.
    #[inline]
    pub fn min(&self) -> Position {
        Position::from_rank(self, 0)
    }

    /// Last position in the order of the space.
    #[inline]
    pub fn max(&self) -> Position {
        Position::from_rank(self, self.count() - 1)
    }

    #[inline]
    pub fn origin(&self) -> Position {
        Position::new_unchecked(self.clone(), self.inner.origin)
    }

    /// The unit size.
    #[inline]
    pub fn one(&self) -> Size {
        Size::new_unchecked(self.clone(), 1)
    }

    /// The zero size.
    #[inline]
    pub fn none(&self) -> Size {
        Size::new_unchecked(self.clone(), 0)
    }

    /// The position at raw coordinate `raw`.
    pub fn position(&self, raw: i64) -> PositionExpression {
        match self.check_raw(raw) {
            Ok(()) => PositionExpression::Successful(Position::new_unchecked(self.clone(), raw)),
            Err(v) => PositionExpression::Failed(v),
        }
    }

    /// The position with the given rank.
    pub fn position_at(&self, rank: i64) -> PositionExpression {
        if (0..self.count()).contains(&rank) {
            PositionExpression::Successful(Position::from_rank(self, rank))
        } else {
            PositionExpression::Failed(
                Violation::new(Obligation::WithinBounds)
                    .with(Evidence::Count(rank))
                    .with(self.clone()),
            )
        }
    }

    /// A size of `units` steps.
    pub fn size(&self, units: i64) -> SizeExpression {
        if units < 0 {
            return SizeExpression::Failed(
                Violation::new(Obligation::NonNegative).with(Evidence::Count(units)),
            );
        }
        if units > self.count() {
            return SizeExpression::Failed(
                Violation::new(Obligation::WithinBounds)
                    .with(Evidence::Count(units))
                    .with(self.clone()),
            );
        }
        SizeExpression::Successful(Size::new_unchecked(self.clone(), units))
    }

    /// The position of a grid cell given its coordinates.
    pub fn grid_position(&self, coordinates: &[u64]) -> PositionExpression {
        let SpaceKind::Grid(extents) = &self.inner.kind else {
            return PositionExpression::Failed(
                Violation::new(Obligation::OnGrid).with(self.clone()),
            );
        };
        if coordinates.len() != extents.len()
            || coordinates.iter().zip(extents).any(|(c, e)| c >= e)
        {
            let mut v = Violation::new(Obligation::WithinBounds).with(self.clone());
            for &c in coordinates {
                v = v.with(Evidence::Count(i64::try_from(c).unwrap_or(i64::MAX)));
            }
            return PositionExpression::Failed(v);
        }
        let linear = coordinates
            .iter()
            .zip(extents)
            .fold(0u64, |acc, (&c, &e)| acc * e + c);
        // Bounded by the cell count, which the builder checked against i64.
        self.position(linear as i64)
    }

    /// The region `start..=end`.
    ///
    /// Fails when either position belongs to another space or `start` comes
    /// after `end` in the order of this space.
    pub fn region<S, E>(&self, start: &S, end: &E) -> RegionExpression
    where
        S: Operand<Position> + ?Sized,
        E: Operand<Position> + ?Sized,
    {
        let (start, end) = match (start.resolve(), end.resolve()) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(v), _) | (_, Err(v)) => return RegionExpression::Failed(v.clone()),
        };
        for p in [start, end] {
            if p.space() != self {
                return RegionExpression::Failed(
                    Violation::space_mismatch(self, p.space()).with(p.clone()),
                );
            }
        }
        let (first, last) = (start.rank(), end.rank());
        if first > last {
            return RegionExpression::Failed(
                Violation::new(Obligation::StartNotAfterEnd)
                    .with(start.clone())
                    .with(end.clone()),
            );
        }
        RegionExpression::Successful(Region::contiguous(self.clone(), Span::closed(first, last)))
    }

    /// The region covering the whole space.
    pub fn all(&self) -> Region {
        Region::contiguous(self.clone(), Span::new(0, self.count()))
    }

    /// The empty region of this space.
    pub fn empty(&self) -> Region {
        Region::empty(
            self.clone(),
            Violation::new(Obligation::NonEmpty).with(self.clone()),
        )
    }

    pub fn sparse_region_builder(&self) -> SparseRegionBuilder {
        SparseRegionBuilder::new(self.clone())
    }

    /// Translates a position of another space by its offset from the origin.
    ///
    /// Between two orders of the same space this is the identity on raw
    /// coordinates.
    pub fn from_position<P>(&self, position: &P) -> PositionExpression
    where
        P: Operand<Position> + ?Sized,
    {
        let position = match position.resolve() {
            Ok(p) => p,
            Err(v) => return PositionExpression::Failed(v.clone()),
        };
        if position.space() == self {
            return PositionExpression::Successful(position.clone());
        }
        match self.translate_raw(position.space(), position.raw()) {
            Some(raw) => self.position(raw),
            None => PositionExpression::Failed(
                Violation::new(Obligation::WithinBounds)
                    .with(position.clone())
                    .with(self.clone()),
            ),
        }
    }

    /// A size of another space re-expressed here; units are preserved.
    pub fn from_size<S>(&self, size: &S) -> SizeExpression
    where
        S: Operand<Size> + ?Sized,
    {
        match size.resolve() {
            Ok(s) if s.space() == self => SizeExpression::Successful(s.clone()),
            Ok(s) => self.size(s.units()),
            Err(v) => SizeExpression::Failed(v.clone()),
        }
    }

    /// A region of another space re-expressed here, piece by piece.
    pub fn from_region<R>(&self, region: &R) -> RegionExpression
    where
        R: Operand<Region> + ?Sized,
    {
        let region = match region.resolve() {
            Ok(r) => r,
            Err(v) => return RegionExpression::Failed(v.clone()),
        };
        if region.space() == self {
            return RegionExpression::Successful(region.clone());
        }
        if let Region::Empty(e) = region {
            return RegionExpression::Successful(Region::empty(
                self.clone(),
                e.violation().clone(),
            ));
        }
        let source = region.space();
        let mut spans = Vec::with_capacity(region.num_regions());
        for span in region.spans() {
            let first = self.translate_rank(source, span.start());
            let last = self.translate_rank(source, span.last());
            match (first, last) {
                (Some(a), Some(b)) => spans.push(Span::closed(a.min(b), a.max(b))),
                _ => {
                    return RegionExpression::Failed(
                        Violation::new(Obligation::WithinBounds)
                            .with(region.clone())
                            .with(self.clone()),
                    );
                }
            }
        }
        spans.sort_unstable_by_key(Span::start);
        RegionExpression::Successful(Region::from_spans_keeping_pieces(self.clone(), spans))
    }

    fn translate_raw(&self, source: &Space, raw: i64) -> Option<i64> {
        if self.same_identity(source) {
            return self.check_raw(raw).ok().map(|()| raw);
        }
        let offset = raw.checked_sub(source.inner.origin)? / source.step();
        let target = offset
            .checked_mul(self.step())
            .and_then(|d| self.inner.origin.checked_add(d))?;
        self.check_raw(target).ok().map(|()| target)
    }

    fn translate_rank(&self, source: &Space, rank: i64) -> Option<i64> {
        self.translate_raw(source, source.raw_at(rank))
            .map(|raw| self.rank_of(raw))
    }

    pub(crate) fn check_raw(&self, raw: i64) -> Result<(), Violation> {
        let inner = &*self.inner;
        if raw < inner.lower || raw > inner.upper {
            return Err(Violation::new(Obligation::WithinBounds)
                .with(Evidence::Raw(raw))
                .with(self.clone()));
        }
        if (raw - inner.lower) % inner.step != 0 {
            return Err(Violation::new(Obligation::OnGrid)
                .with(Evidence::Raw(raw))
                .with(self.clone()));
        }
        Ok(())
    }

    /// Rank of a raw coordinate already known to be valid.
    #[inline]
    pub(crate) fn rank_of(&self, raw: i64) -> i64 {
        let inner = &*self.inner;
        match self.order {
            PositionOrder::Ascending => (raw - inner.lower) / inner.step,
            PositionOrder::Descending => (inner.upper - raw) / inner.step,
        }
    }

    /// Raw coordinate of a rank in `0..count`.
    #[inline]
    pub(crate) fn raw_at(&self, rank: i64) -> i64 {
        let inner = &*self.inner;
        match self.order {
            PositionOrder::Ascending => inner.lower + rank * inner.step,
            PositionOrder::Descending => inner.upper - rank * inner.step,
        }
    }

    /// Moves `rank` by `delta` ranks, staying inside the space.
    #[inline]
    pub(crate) fn offset_rank(&self, rank: i64, delta: i64) -> Option<i64> {
        rank.checked_add(delta)
            .filter(|r| (0..self.count()).contains(r))
    }

    pub(crate) fn coordinates_of(&self, raw: i64) -> Option<Vec<u64>> {
        let SpaceKind::Grid(extents) = &self.inner.kind else {
            return None;
        };
        let mut rest = u64::try_from(raw).ok()?;
        let mut coordinates = vec![0u64; extents.len()];
        for (slot, &extent) in coordinates.iter_mut().zip(extents).rev() {
            *slot = rest % extent;
            rest /= extent;
        }
        Some(coordinates)
    }
}

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other) && self.order == other.order
    }
}

impl Eq for Space {}

impl Hash for Space {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
        self.order.hash(state);
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .field("lower", &self.inner.lower)
            .field("upper", &self.inner.upper)
            .field("step", &self.inner.step)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}..={}]",
            self.inner.name, self.inner.lower, self.inner.upper
        )?;
        if self.inner.step != 1 {
            write!(f, "/{}", self.inner.step)?;
        }
        if self.order == PositionOrder::Descending {
            write!(f, " desc")?;
        }
        Ok(())
    }
}

/// Positions are ordered by rank; a position of another space cannot be
/// placed.
impl Order<Position> for Space {
    fn compare_values(&self, left: &Position, right: &Position) -> Comparison {
        match (left.space() == self, right.space() == self) {
            (true, true) => left.rank().cmp(&right.rank()).into(),
            (false, _) => Comparison::IncomparableLeft,
            (true, false) => Comparison::IncomparableRight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integers(min: i64, max: i64) -> Space {
        Space::integers(min, max).unwrap()
    }

    #[test]
    fn test_identity_and_order_define_equality() {
        let a = integers(0, 9);
        let b = integers(0, 9);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        let d = a.with_order(PositionOrder::Descending);
        assert_ne!(a, d);
        assert!(a.same_identity(&d));
        assert_eq!(d.with_order(PositionOrder::Ascending), a);
    }

    #[test]
    fn test_min_max_follow_order() {
        let a = integers(10, 19);
        let d = a.with_order(PositionOrder::Descending);
        assert_eq!(a.min().raw(), 10);
        assert_eq!(a.max().raw(), 19);
        assert_eq!(d.min().raw(), 19);
        assert_eq!(d.max().raw(), 10);
        assert_eq!(d.position(12).unwrap().rank(), 7);
    }

    #[test]
    fn test_position_validation() {
        let s = Space::time(15, 0, 1440).unwrap();
        assert!(s.position(30).is_successful());
        assert_eq!(
            s.position(31).violation().map(|v| v.obligation()),
            Some(Obligation::OnGrid)
        );
        assert_eq!(
            s.position(1455).violation().map(|v| v.obligation()),
            Some(Obligation::WithinBounds)
        );
        assert_eq!(s.count(), 97);
    }

    #[test]
    fn test_size_validation() {
        let s = integers(0, 9);
        assert_eq!(s.size(10).unwrap().units(), 10);
        assert_eq!(
            s.size(-1).violation().map(|v| v.obligation()),
            Some(Obligation::NonNegative)
        );
        assert!(s.size(11).is_failed());
        assert!(s.none().is_zero());
        assert_eq!(s.one().units(), 1);
    }

    #[test]
    fn test_region_rejects_reversed_and_foreign() {
        let s = integers(0, 9);
        let other = integers(0, 9);
        let p2 = s.position(2).unwrap();
        let p5 = s.position(5).unwrap();
        assert!(s.region(&p2, &p5).is_successful());
        assert_eq!(
            s.region(&p5, &p2).violation().map(|v| v.obligation()),
            Some(Obligation::StartNotAfterEnd)
        );
        assert_eq!(
            other.region(&p2, &p5).violation().map(|v| v.obligation()),
            Some(Obligation::SameSpace)
        );
    }

    #[test]
    fn test_region_in_descending_space() {
        let d = integers(0, 9).with_order(PositionOrder::Descending);
        let p7 = d.position(7).unwrap();
        let p3 = d.position(3).unwrap();
        let r = d.region(&p7, &p3).unwrap();
        assert_eq!(r.size().units(), 5);
        assert!(d.region(&p3, &p7).is_failed());
    }

    #[test]
    fn test_grid_positions() {
        let g = Space::grid(&[3, 4]).unwrap();
        assert_eq!(g.count(), 12);
        let p = g.grid_position(&[2, 1]).unwrap();
        assert_eq!(p.raw(), 9);
        assert_eq!(p.coordinates(), Some(vec![2, 1]));
        assert!(g.grid_position(&[3, 0]).is_failed());
        assert!(g.grid_position(&[1]).is_failed());
        assert!(integers(0, 3).grid_position(&[0]).is_failed());
    }

    #[test]
    fn test_from_position_translates_by_origin_offset() {
        let a = integers(0, 9);
        let b = Space::builder()
            .name("shifted")
            .bounds(100, 200)
            .step(10)
            .build()
            .unwrap();
        let p = a.position(3).unwrap();
        assert_eq!(b.from_position(&p).unwrap().raw(), 130);
        let far = integers(0, 99).position(50).unwrap();
        assert!(b.from_position(&far).is_failed());
    }

    #[test]
    fn test_from_region_between_orders_keeps_coordinates() {
        let a = integers(0, 9);
        let d = a.with_order(PositionOrder::Descending);
        let r = a
            .region(&a.position(2).unwrap(), &a.position(5).unwrap())
            .unwrap();
        let flipped = d.from_region(&r).unwrap();
        assert_eq!(flipped.start().map(|p| p.raw()), Some(5));
        assert_eq!(flipped.end().map(|p| p.raw()), Some(2));
        assert_eq!(flipped.size().units(), 4);
    }

    #[test]
    fn test_space_orders_positions() {
        let a = integers(0, 9);
        let b = integers(0, 9);
        let p1 = a.position(1).unwrap();
        let p2 = a.position(2).unwrap();
        assert!(a.compare_values(&p1, &p2).is_less());
        let q = b.position(1).unwrap();
        assert_eq!(a.compare_values(&q, &p1), Comparison::IncomparableLeft);
        assert_eq!(a.compare_values(&p1, &q), Comparison::IncomparableRight);
    }

    #[test]
    fn test_display() {
        let s = Space::builder()
            .name("pages")
            .bounds(0, 4096)
            .step(512)
            .order(PositionOrder::Descending)
            .build()
            .unwrap();
        assert_eq!(s.to_string(), "pages[0..=4096]/512 desc");
    }
}
