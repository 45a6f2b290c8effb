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

use crate::expr::PositionExpression;
use crate::space::{Space, SpaceKind};

/// A point of a [`Space`].
///
/// Positions are only handed out by their space (or by arithmetic on other
/// positions), so a `Position` is always in bounds and on the step grid.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    space: Space,
    raw: i64,
}

impl Position {
    #[inline]
    pub(crate) fn new_unchecked(space: Space, raw: i64) -> Self {
        debug_assert!(space.check_raw(raw).is_ok());
        Self { space, raw }
    }

    #[inline]
    pub(crate) fn from_rank(space: &Space, rank: i64) -> Self {
        Self::new_unchecked(space.clone(), space.raw_at(rank))
    }

    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// The raw coordinate.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.raw
    }

    /// Zero-based index in the order of the space.
    #[inline]
    pub fn rank(&self) -> i64 {
        self.space.rank_of(self.raw)
    }

    /// Cell coordinates, for positions of a grid space.
    pub fn coordinates(&self) -> Option<Vec<u64>> {
        self.space.coordinates_of(self.raw)
    }

    #[inline]
    pub fn expr(&self) -> PositionExpression {
        PositionExpression::Successful(self.clone())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space.kind() {
            SpaceKind::Index => write!(f, "{}", self.raw),
            SpaceKind::Time => write!(f, "t{}", self.raw),
            SpaceKind::Grid(_) => {
                let coordinates = self.coordinates().unwrap_or_default();
                let parts: Vec<String> = coordinates.iter().map(u64::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({}: {})", self.space.name(), self)
    }
}
