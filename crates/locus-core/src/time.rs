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

//! # Time values
//!
//! [`TimePoint`] and [`TimeDelta`] carry instants and durations in the raw
//! units of a time space (nanoseconds, samples, frames). They are plain
//! integer newtypes, generic over the integer type the caller stores, and
//! convert to and from the positions and sizes of a [`Space`]:
//!
//! - `Space::at_time(point)` gives the position at that instant.
//! - `Space::duration(delta)` gives the size spanning that duration.
//! - `Position::time_point()` and `Size::time_delta()` go the other way.
//!
//! Arithmetic on the newtypes is checked; overflow yields `None`.

use std::fmt::{self, Display, Formatter};
use std::ops::Neg;

use num_traits::{NumCast, PrimInt, Signed};

use crate::expr::{PositionExpression, SizeExpression};
use crate::position::Position;
use crate::size::Size;
use crate::space::Space;
use crate::violation::{Evidence, Obligation, Violation};

/// An instant, in raw ticks of a time space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint<T: PrimInt> {
    ticks: T,
}

/// A signed span between two instants, in raw ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeDelta<T: PrimInt + Signed> {
    ticks: T,
}

impl<T: PrimInt> TimePoint<T> {
    #[inline]
    pub const fn new(ticks: T) -> Self {
        Self { ticks }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero())
    }

    #[inline]
    pub const fn ticks(self) -> T {
        self.ticks
    }
}

impl<T: PrimInt + Signed> TimePoint<T> {
    #[inline]
    pub fn checked_add(self, delta: TimeDelta<T>) -> Option<Self> {
        self.ticks.checked_add(&delta.ticks).map(Self::new)
    }

    #[inline]
    pub fn checked_sub(self, delta: TimeDelta<T>) -> Option<Self> {
        self.ticks.checked_sub(&delta.ticks).map(Self::new)
    }

    /// The signed duration from `earlier` to `self`.
    #[inline]
    pub fn checked_since(self, earlier: Self) -> Option<TimeDelta<T>> {
        self.ticks.checked_sub(&earlier.ticks).map(TimeDelta::new)
    }
}

impl<T: PrimInt + Signed> TimeDelta<T> {
    #[inline]
    pub const fn new(ticks: T) -> Self {
        Self { ticks }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero())
    }

    #[inline]
    pub const fn ticks(self) -> T {
        self.ticks
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.ticks < T::zero()
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.ticks.checked_add(&other.ticks).map(Self::new)
    }

    #[inline]
    pub fn checked_mul(self, factor: T) -> Option<Self> {
        self.ticks.checked_mul(&factor).map(Self::new)
    }

    /// The opposite duration; `None` for `T::min_value()`.
    #[inline]
    pub fn checked_neg(self) -> Option<Self> {
        T::zero().checked_sub(&self.ticks).map(Self::new)
    }
}

impl<T: PrimInt> From<T> for TimePoint<T> {
    #[inline]
    fn from(ticks: T) -> Self {
        Self::new(ticks)
    }
}

impl<T: PrimInt + Signed> From<T> for TimeDelta<T> {
    #[inline]
    fn from(ticks: T) -> Self {
        Self::new(ticks)
    }
}

/// # Panics
///
/// Overflows for `T::min_value()`, which panics in debug builds. Use
/// [`TimeDelta::checked_neg`] when the input is not known to be in range.
impl<T: PrimInt + Signed> Neg for TimeDelta<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(T::zero() - self.ticks)
    }
}

impl<T: PrimInt + Display> Display for TimePoint<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TimePoint({})", self.ticks)
    }
}

impl<T: PrimInt + Signed + Display> Display for TimeDelta<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TimeDelta({})", self.ticks)
    }
}

impl Space {
    /// The position at `point`, which must lie on the tick grid of this
    /// space.
    pub fn at_time<T: PrimInt>(&self, point: TimePoint<T>) -> PositionExpression {
        match point.ticks().to_i64() {
            Some(raw) => self.position(raw),
            None => PositionExpression::Failed(
                Violation::new(Obligation::WithinBounds).with(self.clone()),
            ),
        }
    }

    /// The size spanning `delta`, which must be a non-negative multiple of
    /// the tick.
    ///
    /// ```
    /// use locus_core::space::Space;
    /// use locus_core::time::TimeDelta;
    ///
    /// let frames = Space::time(40, 0, 4000).unwrap();
    /// assert_eq!(frames.duration(TimeDelta::new(200i32)).unwrap().units(), 5);
    /// assert!(frames.duration(TimeDelta::new(30i32)).is_failed());
    /// ```
    pub fn duration<T: PrimInt + Signed>(&self, delta: TimeDelta<T>) -> SizeExpression {
        let Some(raw) = delta.ticks().to_i64() else {
            return SizeExpression::Failed(
                Violation::new(Obligation::WithinBounds).with(self.clone()),
            );
        };
        if raw < 0 {
            return SizeExpression::Failed(
                Violation::new(Obligation::NonNegative).with(Evidence::Raw(raw)),
            );
        }
        if raw % self.step() != 0 {
            return SizeExpression::Failed(
                Violation::new(Obligation::OnGrid)
                    .with(Evidence::Raw(raw))
                    .with(self.clone()),
            );
        }
        self.size(raw / self.step())
    }
}

impl Position {
    /// The raw coordinate as a time point, if it fits in `T`.
    #[inline]
    pub fn time_point<T: PrimInt>(&self) -> Option<TimePoint<T>> {
        <T as NumCast>::from(self.raw()).map(TimePoint::new)
    }
}

impl Size {
    /// The magnitude as a duration, if it fits in `T`.
    #[inline]
    pub fn time_delta<T: PrimInt + Signed>(&self) -> Option<TimeDelta<T>> {
        <T as NumCast>::from(self.magnitude()).map(TimeDelta::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let t = TimePoint::new(i8::MAX - 1);
        assert_eq!(t.checked_add(TimeDelta::new(1)), Some(TimePoint::new(i8::MAX)));
        assert_eq!(t.checked_add(TimeDelta::new(2)), None);
        assert_eq!(
            TimePoint::new(10i64).checked_since(TimePoint::new(4)),
            Some(TimeDelta::new(6))
        );
        assert_eq!(TimeDelta::new(3i32).checked_mul(4), Some(TimeDelta::new(12)));
        assert_eq!(-TimeDelta::new(3i32), TimeDelta::new(-3));
        assert!(TimeDelta::new(-1i16).is_negative());
        assert_eq!(TimeDelta::new(7i8).checked_neg(), Some(TimeDelta::new(-7)));
        assert_eq!(TimeDelta::new(i8::MAX).checked_neg(), Some(TimeDelta::new(-i8::MAX)));
        assert_eq!(TimeDelta::new(i8::MIN).checked_neg(), None);
    }

    #[test]
    fn test_at_time() {
        let t = Space::time(15, 0, 120).unwrap();
        assert_eq!(t.at_time(TimePoint::new(45u32)).unwrap().raw(), 45);
        assert_eq!(
            t.at_time(TimePoint::new(40u32)).violation().map(|v| v.obligation()),
            Some(Obligation::OnGrid)
        );
        assert_eq!(
            t.at_time(TimePoint::new(u64::MAX)).violation().map(|v| v.obligation()),
            Some(Obligation::WithinBounds)
        );
    }

    #[test]
    fn test_duration() {
        let t = Space::time(15, 0, 120).unwrap();
        assert_eq!(t.duration(TimeDelta::new(60i64)).unwrap().units(), 4);
        assert_eq!(
            t.duration(TimeDelta::new(-15i64)).violation().map(|v| v.obligation()),
            Some(Obligation::NonNegative)
        );
        assert_eq!(
            t.duration(TimeDelta::new(20i64)).violation().map(|v| v.obligation()),
            Some(Obligation::OnGrid)
        );
    }

    #[test]
    fn test_round_trip_through_positions() {
        let t = Space::time(15, 0, 120).unwrap();
        let p = t.position(90).unwrap();
        assert_eq!(p.time_point::<i32>(), Some(TimePoint::new(90)));
        assert_eq!(p.time_point::<i8>(), Some(TimePoint::new(90)));
        let s = t.size(8).unwrap();
        assert_eq!(s.time_delta::<i64>(), Some(TimeDelta::new(120)));
        assert_eq!(s.time_delta::<i8>(), Some(TimeDelta::new(120)));
        let long = Space::time(15, 0, 300).unwrap().size(10).unwrap();
        assert_eq!(long.time_delta::<i8>(), None);
        assert_eq!(long.time_delta::<i16>().map(TimeDelta::ticks), Some(150));
    }

    #[test]
    fn test_display() {
        assert_eq!(TimePoint::new(5u8).to_string(), "TimePoint(5)");
        assert_eq!(TimeDelta::new(-2i32).to_string(), "TimeDelta(-2)");
    }
}
