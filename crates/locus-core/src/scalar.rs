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

//! Exact dimensionless scalars.
//!
//! Ratios of sizes and the factors sizes are multiplied or divided by are
//! exact rationals, so scaling never accumulates floating-point error.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub type Scalar = BigRational;

#[inline]
pub fn integer(n: i64) -> Scalar {
    BigRational::from_integer(BigInt::from(n))
}

/// `numer / denom`, or `None` when `denom` is zero.
///
/// ```
/// use locus_core::scalar;
///
/// let half = scalar::fraction(2, 4).unwrap();
/// assert_eq!(half, scalar::fraction(1, 2).unwrap());
/// assert!(scalar::fraction(1, 0).is_none());
/// ```
pub fn fraction(numer: i64, denom: i64) -> Option<Scalar> {
    if denom == 0 {
        return None;
    }
    Some(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
}

/// Largest integer not above `value`, if it fits in `i64`.
pub(crate) fn floor(value: &Scalar) -> Option<i64> {
    value.floor().to_integer().to_i64()
}

/// Nearest integer, halves rounded towards positive infinity.
pub(crate) fn round_half_up(value: &Scalar) -> Option<i64> {
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    floor(&(value + half))
}

#[inline]
pub(crate) fn is_negative(value: &Scalar) -> bool {
    value.is_negative()
}

#[inline]
pub(crate) fn is_zero(value: &Scalar) -> bool {
    value.is_zero()
}
