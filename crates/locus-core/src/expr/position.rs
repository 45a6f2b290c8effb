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

use tracing::trace;

use super::{Expression, Operand, PositionExpression, RegionExpression, SizeExpression};
use crate::position::Position;
use crate::size::Size;
use crate::violation::{Obligation, Violation};

fn step_from(position: &Position, size: &Size, forward: bool) -> PositionExpression {
    if position.space() != size.space() {
        return Expression::Failed(
            Violation::space_mismatch(position.space(), size.space())
                .with(position.clone())
                .with(size.clone()),
        );
    }
    let delta = if forward { size.units() } else { -size.units() };
    match position.space().offset_rank(position.rank(), delta) {
        Some(rank) => Expression::Successful(Position::from_rank(position.space(), rank)),
        None => {
            let v = Violation::new(Obligation::WithinBounds)
                .with(position.clone())
                .with(size.clone());
            trace!(violation = %v, "position arithmetic left its space");
            Expression::Failed(v)
        }
    }
}

#[allow(clippy::should_implement_trait)]
impl Expression<Position> {
    /// Advances by `size` in the order of the space.
    pub fn add<S: Operand<Size> + ?Sized>(&self, size: &S) -> PositionExpression {
        self.with_operand(size, |p, s| step_from(p, s, true))
    }

    /// Moves back by `size` in the order of the space.
    pub fn subtract<S: Operand<Size> + ?Sized>(&self, size: &S) -> PositionExpression {
        self.with_operand(size, |p, s| step_from(p, s, false))
    }

    /// The size from `origin` up to this position.
    ///
    /// Fails if this position comes before `origin`.
    pub fn distance_from<P: Operand<Position> + ?Sized>(&self, origin: &P) -> SizeExpression {
        self.with_operand(origin, |this, that: &Position| {
            if this.space() != that.space() {
                return Expression::Failed(
                    Violation::space_mismatch(this.space(), that.space())
                        .with(this.clone())
                        .with(that.clone()),
                );
            }
            let units = this.rank() - that.rank();
            if units < 0 {
                return Expression::Failed(
                    Violation::new(Obligation::NonNegative)
                        .with(this.clone())
                        .with(that.clone()),
                );
            }
            this.space().size(units)
        })
    }

    /// The units left over when this position's offset from `min` is
    /// divided by `size`. Subtracting it backs up to the previous
    /// `size`-aligned position.
    ///
    /// ```
    /// use locus_core::space::Space;
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// let x = space.position(42).unwrap().expr();
    /// let eight = space.size(8).unwrap();
    /// assert_eq!(x.modulo(&eight).unwrap().units(), 2);
    /// assert_eq!(x.subtract(&x.modulo(&eight)).unwrap().raw(), 40);
    /// ```
    pub fn modulo<S: Operand<Size> + ?Sized>(&self, size: &S) -> SizeExpression {
        self.with_operand(size, |p, s: &Size| {
            if p.space() != s.space() {
                return Expression::Failed(
                    Violation::space_mismatch(p.space(), s.space())
                        .with(p.clone())
                        .with(s.clone()),
                );
            }
            if s.is_zero() {
                return Expression::Failed(
                    Violation::new(Obligation::NonZeroDivisor).with(p.clone()),
                );
            }
            p.space().size(p.rank() % s.units())
        })
    }

    /// The region from this position through `end`, both included.
    ///
    /// Fails if `end` comes before this position.
    pub fn to<P: Operand<Position> + ?Sized>(&self, end: &P) -> RegionExpression {
        self.with_operand(end, |first, last: &Position| first.space().region(first, last))
    }

    pub fn next(&self) -> PositionExpression {
        match self {
            Expression::Successful(p) => step_from(p, &p.space().one(), true),
            Expression::Failed(v) => Expression::Failed(v.clone()),
        }
    }

    pub fn previous(&self) -> PositionExpression {
        match self {
            Expression::Successful(p) => step_from(p, &p.space().one(), false),
            Expression::Failed(v) => Expression::Failed(v.clone()),
        }
    }
}
