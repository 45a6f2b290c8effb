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

//! # locus-core
//!
//! Typed, space-aware addressing. A [`space::Space`] is a bounded, ordered
//! coordinate system; it hands out positions, sizes and regions that can
//! only be combined with values of the same space. Every operation returns
//! an [`expr::Expression`], so failures are values that flow through a
//! chain of operations instead of panics.
//!
//! ```
//! use locus_core::prelude::*;
//!
//! let pages = Space::builder()
//!     .name("pages")
//!     .bounds(0, 4096 * 15)
//!     .step(4096)
//!     .build()
//!     .unwrap();
//!
//! let first = pages.min();
//! let used = pages.region(&first, &pages.position(4096 * 3).unwrap()).unwrap();
//! let free = used.expr().invert().unwrap();
//! assert_eq!(free.size().units(), 12);
//!
//! let halves = free.expr().split_into(2).unwrap();
//! assert_eq!(halves.num_regions(), 2);
//! ```

pub mod config;
pub mod expr;
pub mod order;
pub mod position;
pub mod region;
pub mod scalar;
pub mod search;
pub mod size;
pub mod space;
pub mod time;
pub mod violation;

mod span;
mod span_set;

pub mod prelude {
    pub use crate::config::{SpaceBuilder, SpaceConfig, SpaceConfigError, SpaceKindConfig};
    pub use crate::expr::{
        Expression, Operand, PositionExpression, RegionExpression, ScalarExpression,
        SizeExpression, SparseRegionExpression,
    };
    pub use crate::order::{Comparison, NaturalOrder, Order};
    pub use crate::position::Position;
    pub use crate::region::{Region, RegionOrder, SparseRegion, SparseRegionBuilder};
    pub use crate::scalar::Scalar;
    pub use crate::search::{Criterion, SearchStrategy, Searcher};
    pub use crate::size::Size;
    pub use crate::space::{PositionOrder, Space, SpaceKind};
    pub use crate::time::{TimeDelta, TimePoint};
    pub use crate::violation::{Obligation, Violation, ViolationKind};
}
