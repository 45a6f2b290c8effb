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

//! Typed failures of the algebra.
//!
//! A [`Violation`] names the [`Obligation`] an operation could not honour and
//! carries the values that broke it. Violations travel inside failed
//! expressions, so a chain of operations reports the first thing that went
//! wrong instead of panicking.

use std::fmt;

use num_rational::BigRational;

use crate::position::Position;
use crate::region::Region;
use crate::size::Size;
use crate::space::Space;

/// Broad classification of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    SpaceMismatch,
    OutOfBounds,
    ReversedRange,
    Emptiness,
    Structural,
    Arithmetic,
    NotFound,
}

/// The condition an operation requires of its inputs or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Obligation {
    /// All operands belong to the same space.
    SameSpace,
    /// A value lies between the minimum and maximum of its space.
    WithinBounds,
    /// A raw coordinate lies on the step grid of its space.
    OnGrid,
    /// A region's start does not come after its end.
    StartNotAfterEnd,
    /// A result contains at least one position.
    NonEmpty,
    /// The operands of a difference or exclusion leave something behind.
    RegionsMustDiffer,
    /// Sub-regions are appended in order and do not overlap.
    SubRegionsOrdered,
    /// A sub-region index addresses an existing sub-region.
    SubRegionIndexInBounds,
    /// A size or scalar factor is not negative.
    NonNegative,
    NonZeroDivisor,
    /// A region cannot be split into more non-empty pieces than it has positions.
    SplitWithinSize,
    /// A search yields a position.
    MustBeFound,
}

impl Obligation {
    pub const fn kind(self) -> ViolationKind {
        match self {
            Obligation::SameSpace => ViolationKind::SpaceMismatch,
            Obligation::WithinBounds
            | Obligation::OnGrid
            | Obligation::SubRegionIndexInBounds => ViolationKind::OutOfBounds,
            Obligation::StartNotAfterEnd => ViolationKind::ReversedRange,
            Obligation::NonEmpty | Obligation::RegionsMustDiffer => ViolationKind::Emptiness,
            Obligation::SubRegionsOrdered | Obligation::SplitWithinSize => {
                ViolationKind::Structural
            }
            Obligation::NonNegative | Obligation::NonZeroDivisor => ViolationKind::Arithmetic,
            Obligation::MustBeFound => ViolationKind::NotFound,
        }
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Obligation::*;
        match self {
            SameSpace => write!(f, "values must belong to the same space"),
            WithinBounds => write!(f, "value must lie within the bounds of its space"),
            OnGrid => write!(f, "coordinate must lie on the step grid of its space"),
            StartNotAfterEnd => write!(f, "region start must not come after its end"),
            NonEmpty => write!(f, "result must not be empty"),
            RegionsMustDiffer => write!(f, "regions must differ"),
            SubRegionsOrdered => write!(f, "sub-regions must be ordered and disjoint"),
            SubRegionIndexInBounds => write!(f, "sub-region index must be in bounds"),
            NonNegative => write!(f, "value must not be negative"),
            NonZeroDivisor => write!(f, "divisor must not be zero"),
            SplitWithinSize => write!(f, "cannot split into more pieces than positions"),
            MustBeFound => write!(f, "no position satisfies the search criteria"),
        }
    }
}

/// A value implicated in a violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Evidence {
    Position(Position),
    Size(Size),
    Region(Region),
    Space(Space),
    Count(i64),
    Scalar(BigRational),
    Raw(i64),
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Position(p) => write!(f, "position {p}"),
            Evidence::Size(s) => write!(f, "size {s}"),
            Evidence::Region(r) => write!(f, "region {r}"),
            Evidence::Space(s) => write!(f, "space {s}"),
            Evidence::Count(n) => write!(f, "count {n}"),
            Evidence::Scalar(r) => write!(f, "scalar {r}"),
            Evidence::Raw(v) => write!(f, "raw {v}"),
        }
    }
}

impl From<Position> for Evidence {
    fn from(v: Position) -> Self {
        Evidence::Position(v)
    }
}

impl From<Size> for Evidence {
    fn from(v: Size) -> Self {
        Evidence::Size(v)
    }
}

impl From<Region> for Evidence {
    fn from(v: Region) -> Self {
        Evidence::Region(v)
    }
}

impl From<Space> for Evidence {
    fn from(v: Space) -> Self {
        Evidence::Space(v)
    }
}

impl From<BigRational> for Evidence {
    fn from(v: BigRational) -> Self {
        Evidence::Scalar(v)
    }
}

fn describe(evidence: &[Evidence]) -> String {
    if evidence.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = evidence.iter().map(ToString::to_string).collect();
    format!(" ({})", parts.join(", "))
}

/// An obligation that was not met, with the offending values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{obligation}{}", describe(.evidence))]
pub struct Violation {
    obligation: Obligation,
    evidence: Vec<Evidence>,
    #[source]
    cause: Option<Box<Violation>>,
}

impl Violation {
    pub fn new(obligation: Obligation) -> Self {
        Self {
            obligation,
            evidence: Vec::new(),
            cause: None,
        }
    }

    /// Attaches one more offending value.
    #[must_use]
    pub fn with(mut self, evidence: impl Into<Evidence>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    #[must_use]
    pub fn caused_by(mut self, cause: Violation) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    #[inline]
    pub fn obligation(&self) -> Obligation {
        self.obligation
    }

    #[inline]
    pub fn kind(&self) -> ViolationKind {
        self.obligation.kind()
    }

    #[inline]
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    #[inline]
    pub fn cause(&self) -> Option<&Violation> {
        self.cause.as_deref()
    }

    pub(crate) fn space_mismatch(left: &Space, right: &Space) -> Self {
        Violation::new(Obligation::SameSpace)
            .with(left.clone())
            .with(right.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_lists_evidence() {
        let v = Violation::new(Obligation::SplitWithinSize)
            .with(Evidence::Count(12))
            .with(Evidence::Count(10));
        assert_eq!(
            v.to_string(),
            "cannot split into more pieces than positions (count 12, count 10)"
        );
        assert_eq!(v.kind(), ViolationKind::Structural);
        assert_eq!(v.evidence().len(), 2);
    }

    #[test]
    fn test_cause_is_error_source() {
        let inner = Violation::new(Obligation::NonZeroDivisor);
        let outer = Violation::new(Obligation::MustBeFound).caused_by(inner.clone());
        assert_eq!(outer.cause(), Some(&inner));
        let source = outer.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("divisor must not be zero"));
    }

    #[test]
    fn test_kinds_cover_taxonomy() {
        assert_eq!(Obligation::SameSpace.kind(), ViolationKind::SpaceMismatch);
        assert_eq!(Obligation::OnGrid.kind(), ViolationKind::OutOfBounds);
        assert_eq!(
            Obligation::StartNotAfterEnd.kind(),
            ViolationKind::ReversedRange
        );
        assert_eq!(Obligation::NonEmpty.kind(), ViolationKind::Emptiness);
        assert_eq!(
            Obligation::SubRegionsOrdered.kind(),
            ViolationKind::Structural
        );
    }
}
