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

//! # Expressions
//!
//! Every operation of the algebra returns an [`Expression`]: either the
//! computed value or the [`Violation`] that prevented it. Combinators on a
//! failed expression return that same failure, so a chain of operations
//! can be written without checking each step and still reports the first
//! thing that went wrong.
//!
//! ```
//! use locus_core::space::Space;
//!
//! let space = Space::integers(0, 9).unwrap();
//! let p = space.position(8).unwrap();
//! let one = space.one();
//!
//! // 8 + 1 + 1 leaves the space; the second step never runs.
//! let e = p.expr().add(&one).add(&one).add(&one);
//! assert!(e.is_failed());
//! ```

mod position;
mod region;
mod size;

use crate::position::Position;
use crate::region::{Region, SparseRegion};
use crate::scalar::Scalar;
use crate::size::Size;
use crate::violation::Violation;

/// A successful value or the violation that prevented it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<T> {
    Successful(T),
    Failed(Violation),
}

pub type PositionExpression = Expression<Position>;
pub type SizeExpression = Expression<Size>;
pub type RegionExpression = Expression<Region>;
pub type SparseRegionExpression = Expression<SparseRegion>;
pub type ScalarExpression = Expression<Scalar>;

impl<T> Expression<T> {
    #[inline]
    pub fn is_successful(&self) -> bool {
        matches!(self, Expression::Successful(_))
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Expression::Failed(_))
    }

    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            Expression::Successful(v) => Some(v),
            Expression::Failed(_) => None,
        }
    }

    #[inline]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Expression::Successful(_) => None,
            Expression::Failed(v) => Some(v),
        }
    }

    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Expression::Successful(v) => Some(v),
            Expression::Failed(_) => None,
        }
    }

    #[inline]
    pub fn into_result(self) -> Result<T, Violation> {
        match self {
            Expression::Successful(v) => Ok(v),
            Expression::Failed(v) => Err(v),
        }
    }

    #[inline]
    pub fn as_ref(&self) -> Expression<&T> {
        match self {
            Expression::Successful(v) => Expression::Successful(v),
            Expression::Failed(v) => Expression::Failed(v.clone()),
        }
    }

    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Expression<U> {
        match self {
            Expression::Successful(v) => Expression::Successful(f(v)),
            Expression::Failed(v) => Expression::Failed(v),
        }
    }

    #[inline]
    pub fn and_then<U, F: FnOnce(T) -> Expression<U>>(self, f: F) -> Expression<U> {
        match self {
            Expression::Successful(v) => f(v),
            Expression::Failed(v) => Expression::Failed(v),
        }
    }

    /// The value, or `default` if the expression failed.
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Expression::Successful(v) => v,
            Expression::Failed(_) => default,
        }
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics with the violation if the expression failed.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Expression::Successful(v) => v,
            Expression::Failed(v) => panic!("called `Expression::unwrap()` on a failure: {v}"),
        }
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics with `msg` and the violation if the expression failed.
    #[inline]
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self {
            Expression::Successful(v) => v,
            Expression::Failed(v) => panic!("{msg}: {v}"),
        }
    }

    /// Applies `f` to the value of `self` and the resolved operand, or
    /// forwards whichever failure comes first.
    #[inline]
    pub(crate) fn with_operand<'a, U, O, R, F>(&'a self, operand: &'a O, f: F) -> Expression<R>
    where
        O: Operand<U> + ?Sized,
        U: 'a,
        F: FnOnce(&'a T, &'a U) -> Expression<R>,
    {
        match (self, operand.resolve()) {
            (Expression::Failed(v), _) => Expression::Failed(v.clone()),
            (Expression::Successful(_), Err(v)) => Expression::Failed(v.clone()),
            (Expression::Successful(this), Ok(that)) => f(this, that),
        }
    }
}

impl<T> From<Result<T, Violation>> for Expression<T> {
    #[inline]
    fn from(result: Result<T, Violation>) -> Self {
        match result {
            Ok(v) => Expression::Successful(v),
            Err(v) => Expression::Failed(v),
        }
    }
}

impl<T> From<Expression<T>> for Result<T, Violation> {
    #[inline]
    fn from(expr: Expression<T>) -> Self {
        expr.into_result()
    }
}

/// Something that can stand in for a `T` operand: a plain value, or an
/// expression whose failure is propagated.
pub trait Operand<T> {
    fn resolve(&self) -> Result<&T, &Violation>;
}

impl<T> Operand<T> for Expression<T> {
    #[inline]
    fn resolve(&self) -> Result<&T, &Violation> {
        match self {
            Expression::Successful(v) => Ok(v),
            Expression::Failed(v) => Err(v),
        }
    }
}

macro_rules! plain_operand {
    ($($t:ty),*) => {
        $(
            impl Operand<$t> for $t {
                #[inline]
                fn resolve(&self) -> Result<&$t, &Violation> {
                    Ok(self)
                }
            }
        )*
    };
}

plain_operand!(Position, Size, Region);
