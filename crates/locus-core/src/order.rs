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

//! # Comparison and Order
//!
//! A five-valued [`Comparison`] and the [`Order`] strategy trait. Besides the
//! usual less/equal/greater outcomes a comparison may report that one of its
//! operands cannot be placed relative to the other. Incomparable-left values
//! sort after everything and incomparable-right values before everything, so
//! every `Order` induces a total order usable with the standard sort routines.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Outcome of comparing a left value against a right value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    LeftLessThanRight,
    LeftEqualsRight,
    LeftGreaterThanRight,
    /// The left value cannot be placed; it sorts after every other value.
    IncomparableLeft,
    /// The right value cannot be placed; the left value sorts before it.
    IncomparableRight,
}

impl Comparison {
    /// Lifts a standard ordering into a comparison.
    ///
    /// ```
    /// use locus_core::order::Comparison;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(Comparison::from_ordering(Ordering::Less), Comparison::LeftLessThanRight);
    /// ```
    #[inline]
    pub const fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::LeftLessThanRight,
            Ordering::Equal => Comparison::LeftEqualsRight,
            Ordering::Greater => Comparison::LeftGreaterThanRight,
        }
    }

    /// Collapses the comparison into a total [`Ordering`].
    ///
    /// Incomparable-left maps to `Greater` and incomparable-right to `Less`.
    ///
    /// ```
    /// use locus_core::order::Comparison;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(Comparison::IncomparableLeft.to_ordering(), Ordering::Greater);
    /// assert_eq!(Comparison::IncomparableRight.to_ordering(), Ordering::Less);
    /// ```
    #[inline]
    pub const fn to_ordering(self) -> Ordering {
        match self {
            Comparison::LeftLessThanRight | Comparison::IncomparableRight => Ordering::Less,
            Comparison::LeftEqualsRight => Ordering::Equal,
            Comparison::LeftGreaterThanRight | Comparison::IncomparableLeft => Ordering::Greater,
        }
    }

    /// The comparison seen from the other side.
    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            Comparison::LeftLessThanRight => Comparison::LeftGreaterThanRight,
            Comparison::LeftEqualsRight => Comparison::LeftEqualsRight,
            Comparison::LeftGreaterThanRight => Comparison::LeftLessThanRight,
            Comparison::IncomparableLeft => Comparison::IncomparableRight,
            Comparison::IncomparableRight => Comparison::IncomparableLeft,
        }
    }

    #[inline]
    pub const fn is_less(self) -> bool {
        matches!(self, Comparison::LeftLessThanRight)
    }

    #[inline]
    pub const fn is_equal(self) -> bool {
        matches!(self, Comparison::LeftEqualsRight)
    }

    #[inline]
    pub const fn is_greater(self) -> bool {
        matches!(self, Comparison::LeftGreaterThanRight)
    }

    #[inline]
    pub const fn is_less_or_equal(self) -> bool {
        matches!(
            self,
            Comparison::LeftLessThanRight | Comparison::LeftEqualsRight
        )
    }

    #[inline]
    pub const fn is_greater_or_equal(self) -> bool {
        matches!(
            self,
            Comparison::LeftGreaterThanRight | Comparison::LeftEqualsRight
        )
    }

    /// Returns `true` if either operand could not be placed.
    #[inline]
    pub const fn is_incomparable(self) -> bool {
        matches!(
            self,
            Comparison::IncomparableLeft | Comparison::IncomparableRight
        )
    }

    #[inline]
    pub fn is_one_of(self, candidates: &[Comparison]) -> bool {
        candidates.contains(&self)
    }
}

impl From<Ordering> for Comparison {
    #[inline]
    fn from(ordering: Ordering) -> Self {
        Comparison::from_ordering(ordering)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Comparison::LeftLessThanRight => "<",
            Comparison::LeftEqualsRight => "==",
            Comparison::LeftGreaterThanRight => ">",
            Comparison::IncomparableLeft => "incomparable(left)",
            Comparison::IncomparableRight => "incomparable(right)",
        };
        f.write_str(text)
    }
}

/// A comparison strategy over values of type `T`.
///
/// Implementors provide [`Order::compare_values`]; every other method is
/// derived from it.
pub trait Order<T: ?Sized> {
    fn compare_values(&self, left: &T, right: &T) -> Comparison;

    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self.compare_values(left, right).to_ordering()
    }

    /// Sorts `values` in place. The sort is stable.
    fn sort(&self, values: &mut [T])
    where
        T: Sized,
    {
        values.sort_by(|a, b| self.compare(a, b));
    }

    fn sorted<I>(&self, values: I) -> Vec<T>
    where
        T: Sized,
        I: IntoIterator<Item = T>,
    {
        let mut collected: Vec<T> = values.into_iter().collect();
        self.sort(&mut collected);
        collected
    }

    fn is_sorted(&self, values: &[T]) -> bool
    where
        T: Sized,
    {
        values
            .windows(2)
            .all(|w| self.compare(&w[0], &w[1]) != Ordering::Greater)
    }

    /// The smaller of two values; `left` wins ties.
    #[inline]
    fn min<'a>(&self, left: &'a T, right: &'a T) -> &'a T {
        match self.compare(left, right) {
            Ordering::Greater => right,
            _ => left,
        }
    }

    /// The larger of two values; `right` wins ties.
    #[inline]
    fn max<'a>(&self, left: &'a T, right: &'a T) -> &'a T {
        match self.compare(left, right) {
            Ordering::Greater => left,
            _ => right,
        }
    }

    fn reversed(self) -> ReverseOrder<Self>
    where
        Self: Sized,
    {
        ReverseOrder(self)
    }
}

impl<T: ?Sized, O: Order<T> + ?Sized> Order<T> for &O {
    #[inline]
    fn compare_values(&self, left: &T, right: &T) -> Comparison {
        (**self).compare_values(left, right)
    }
}

/// The order given by `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Order<T> for NaturalOrder {
    #[inline]
    fn compare_values(&self, left: &T, right: &T) -> Comparison {
        left.cmp(right).into()
    }
}

/// The order given by `PartialOrd`, made total.
///
/// A value that is not comparable with itself (such as `NaN`) is reported as
/// incomparable and therefore sorts to the end when on the left and to the
/// front when on the right.
///
/// ```
/// use locus_core::order::{Order, PartialNaturalOrder};
///
/// let mut values = vec![3.0, f64::NAN, 1.0];
/// PartialNaturalOrder.sort(&mut values);
/// assert_eq!(values[0], 1.0);
/// assert_eq!(values[1], 3.0);
/// assert!(values[2].is_nan());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PartialNaturalOrder;

impl<T: PartialOrd + ?Sized> Order<T> for PartialNaturalOrder {
    fn compare_values(&self, left: &T, right: &T) -> Comparison {
        match left.partial_cmp(right) {
            Some(ordering) => ordering.into(),
            None => match (
                left.partial_cmp(left).is_some(),
                right.partial_cmp(right).is_some(),
            ) {
                (false, false) => Comparison::LeftEqualsRight,
                (false, true) => Comparison::IncomparableLeft,
                _ => Comparison::IncomparableRight,
            },
        }
    }
}

/// Inverts another order. Incomparable operands keep their side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder<O>(pub O);

impl<O> ReverseOrder<O> {
    #[inline]
    pub const fn new(inner: O) -> Self {
        ReverseOrder(inner)
    }
}

impl<T: ?Sized, O: Order<T>> Order<T> for ReverseOrder<O> {
    fn compare_values(&self, left: &T, right: &T) -> Comparison {
        match self.0.compare_values(left, right) {
            c @ (Comparison::IncomparableLeft | Comparison::IncomparableRight) => c,
            c => c.reverse(),
        }
    }
}

/// An order backed by a closure.
pub struct FnOrder<T: ?Sized, F> {
    compare: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F> FnOrder<T, F>
where
    F: Fn(&T, &T) -> Comparison,
{
    #[inline]
    pub fn new(compare: F) -> Self {
        Self {
            compare,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F> Order<T> for FnOrder<T, F>
where
    F: Fn(&T, &T) -> Comparison,
{
    #[inline]
    fn compare_values(&self, left: &T, right: &T) -> Comparison {
        (self.compare)(left, right)
    }
}

impl<T: ?Sized, F> fmt::Debug for FnOrder<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOrder").finish_non_exhaustive()
    }
}
