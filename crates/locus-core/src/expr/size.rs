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

use num_rational::BigRational;

use super::{Expression, Operand, ScalarExpression, SizeExpression};
use crate::scalar::{self, Scalar};
use crate::size::Size;
use crate::violation::{Evidence, Obligation, Violation};

fn same_space(a: &Size, b: &Size) -> Result<(), Violation> {
    if a.space() == b.space() {
        Ok(())
    } else {
        Err(Violation::space_mismatch(a.space(), b.space())
            .with(a.clone())
            .with(b.clone()))
    }
}

/// Rebuilds a size from a scalar, discarding any fraction.
fn from_scalar(template: &Size, value: &Scalar) -> SizeExpression {
    match scalar::floor(value) {
        Some(units) => template.space().size(units),
        None => Expression::Failed(
            Violation::new(Obligation::WithinBounds).with(Evidence::Scalar(value.clone())),
        ),
    }
}

#[allow(clippy::should_implement_trait)]
impl Expression<Size> {
    pub fn add<S: Operand<Size> + ?Sized>(&self, that: &S) -> SizeExpression {
        self.with_operand(that, |a, b: &Size| {
            if let Err(v) = same_space(a, b) {
                return Expression::Failed(v);
            }
            match a.units().checked_add(b.units()) {
                Some(units) => a.space().size(units),
                None => Expression::Failed(
                    Violation::new(Obligation::WithinBounds)
                        .with(a.clone())
                        .with(b.clone()),
                ),
            }
        })
    }

    /// Fails rather than produce a negative size.
    pub fn subtract<S: Operand<Size> + ?Sized>(&self, that: &S) -> SizeExpression {
        self.with_operand(that, |a, b: &Size| {
            if let Err(v) = same_space(a, b) {
                return Expression::Failed(v);
            }
            let units = a.units() - b.units();
            if units < 0 {
                return Expression::Failed(
                    Violation::new(Obligation::NonNegative)
                        .with(a.clone())
                        .with(b.clone()),
                );
            }
            a.space().size(units)
        })
    }

    /// Multiplies by an exact factor; the fractional remainder is dropped.
    pub fn multiply(&self, factor: &Scalar) -> SizeExpression {
        self.and_then_ref(|a| {
            if scalar::is_negative(factor) {
                return Expression::Failed(
                    Violation::new(Obligation::NonNegative).with(factor.clone()),
                );
            }
            from_scalar(a, &(scalar::integer(a.units()) * factor))
        })
    }

    /// Divides by an exact divisor; the fractional remainder is dropped.
    ///
    /// ```
    /// use locus_core::{scalar, space::Space};
    ///
    /// let space = Space::integers(0, 99).unwrap();
    /// let ten = space.size(10).unwrap();
    /// assert_eq!(ten.expr().divide(&scalar::integer(3)).unwrap().units(), 3);
    /// assert!(ten.expr().divide(&scalar::integer(0)).is_failed());
    /// ```
    pub fn divide(&self, divisor: &Scalar) -> SizeExpression {
        self.and_then_ref(|a| {
            if scalar::is_zero(divisor) {
                return Expression::Failed(
                    Violation::new(Obligation::NonZeroDivisor).with(a.clone()),
                );
            }
            if scalar::is_negative(divisor) {
                return Expression::Failed(
                    Violation::new(Obligation::NonNegative).with(divisor.clone()),
                );
            }
            from_scalar(a, &(scalar::integer(a.units()) / divisor))
        })
    }

    /// Remainder of dividing by `that`.
    pub fn modulo<S: Operand<Size> + ?Sized>(&self, that: &S) -> SizeExpression {
        self.with_operand(that, |a, b: &Size| {
            if let Err(v) = same_space(a, b) {
                return Expression::Failed(v);
            }
            if b.is_zero() {
                return Expression::Failed(
                    Violation::new(Obligation::NonZeroDivisor).with(a.clone()),
                );
            }
            a.space().size(a.units() % b.units())
        })
    }

    /// The dimensionless quotient `self / that`.
    pub fn ratio<S: Operand<Size> + ?Sized>(&self, that: &S) -> ScalarExpression {
        self.with_operand(that, |a, b: &Size| {
            if let Err(v) = same_space(a, b) {
                return Expression::Failed(v);
            }
            if b.is_zero() {
                return Expression::Failed(
                    Violation::new(Obligation::NonZeroDivisor).with(a.clone()),
                );
            }
            Expression::Successful(BigRational::new(a.units().into(), b.units().into()))
        })
    }

    fn and_then_ref<F: FnOnce(&Size) -> SizeExpression>(&self, f: F) -> SizeExpression {
        match self {
            Expression::Successful(size) => f(size),
            Expression::Failed(v) => Expression::Failed(v.clone()),
        }
    }
}
