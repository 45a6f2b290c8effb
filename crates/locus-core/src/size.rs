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

use crate::expr::SizeExpression;
use crate::order::{Comparison, Order};
use crate::space::Space;

/// A non-negative magnitude of a [`Space`], counted in whole steps.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Size {
    space: Space,
    units: i64,
}

impl Size {
    #[inline]
    pub(crate) fn new_unchecked(space: Space, units: i64) -> Self {
        debug_assert!(units >= 0);
        Self { space, units }
    }

    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Number of positions covered.
    #[inline]
    pub fn units(&self) -> i64 {
        self.units
    }

    /// The size in raw coordinates, `units * step`, saturating.
    #[inline]
    pub fn magnitude(&self) -> i64 {
        self.units.saturating_mul(self.space.step())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    #[inline]
    pub fn expr(&self) -> SizeExpression {
        SizeExpression::Successful(self.clone())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units)?;
        if self.space.step() != 1 {
            write!(f, "x{}", self.space.step())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({}: {})", self.space.name(), self)
    }
}

/// Orders sizes of one space by magnitude; sizes of different spaces are
/// incomparable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SizeOrder;

impl Order<Size> for SizeOrder {
    fn compare_values(&self, left: &Size, right: &Size) -> Comparison {
        if left.space() != right.space() {
            return Comparison::IncomparableLeft;
        }
        left.units().cmp(&right.units()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_scales_by_step() {
        let t = Space::time(15, 0, 1440).unwrap();
        let s = t.size(4).unwrap();
        assert_eq!(s.magnitude(), 60);
        assert_eq!(s.to_string(), "4x15");
    }

    #[test]
    fn test_size_order() {
        let s = Space::integers(0, 9).unwrap();
        let other = Space::integers(0, 9).unwrap();
        let a = s.size(2).unwrap();
        let b = s.size(5).unwrap();
        assert!(SizeOrder.compare_values(&a, &b).is_less());
        assert_eq!(SizeOrder.max(&a, &b), &b);
        assert!(
            SizeOrder
                .compare_values(&a, &other.size(2).unwrap())
                .is_incomparable()
        );
    }
}
