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

//! Construction and declarative description of spaces.
//!
//! [`SpaceBuilder`] validates the shape of a space before any value of it can
//! exist. [`SpaceConfig`] is the serialisable form that storage code keeps in
//! its configuration files; it builds through the same validation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::search::SearchStrategy;
use crate::space::{PositionOrder, Space, SpaceKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceConfigError {
    #[error("Missing bounds")]
    MissingBounds,
    #[error("Space has no positions")]
    EmptyBounds,
    #[error("Inverted bounds: min {min} is greater than max {max}")]
    InvertedBounds { min: i64, max: i64 },
    #[error("Step must be positive, got {0}")]
    NonPositiveStep(i64),
    #[error("Bounds {min}..={max} are not a whole number of steps of {step}")]
    MisalignedBounds { min: i64, max: i64, step: i64 },
    #[error("Origin {0} lies outside the bounds")]
    OriginOutOfBounds(i64),
    #[error("Origin {0} is not on the step grid")]
    MisalignedOrigin(i64),
    #[error("Too many positions for a single space")]
    TooManyPositions,
    #[error("Grid extents must be non-empty and positive")]
    EmptyGrid,
}

/// Builder for [`Space`].
#[derive(Clone)]
pub struct SpaceBuilder {
    // Required, except for grids
    bounds: Option<(i64, i64)>,

    // Optional with defaults
    name: String,
    kind: SpaceKind,
    step: i64,
    origin: Option<i64>,
    order: PositionOrder,
    strategy: Option<Arc<dyn SearchStrategy>>,
}

impl Default for SpaceBuilder {
    fn default() -> Self {
        Self {
            bounds: None,
            name: "space".to_owned(),
            kind: SpaceKind::Index,
            step: 1,
            origin: None,
            order: PositionOrder::Ascending,
            strategy: None,
        }
    }
}

impl std::fmt::Debug for SpaceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceBuilder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bounds", &self.bounds)
            .field("step", &self.step)
            .field("origin", &self.origin)
            .field("order", &self.order)
            .field("strategy", &self.strategy.is_some())
            .finish()
    }
}

impl SpaceBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.name = v.into();
        self
    }

    /// Grids derive their bounds and step from their extents.
    #[inline]
    pub fn kind(mut self, v: SpaceKind) -> Self {
        self.kind = v;
        self
    }

    /// Smallest and largest raw coordinate, both inclusive.
    #[inline]
    pub fn bounds(mut self, min: i64, max: i64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    #[inline]
    pub fn step(mut self, v: i64) -> Self {
        self.step = v;
        self
    }

    /// Defaults to the smallest coordinate.
    #[inline]
    pub fn origin(mut self, v: i64) -> Self {
        self.origin = Some(v);
        self
    }

    #[inline]
    pub fn order(mut self, v: PositionOrder) -> Self {
        self.order = v;
        self
    }

    /// Replaces the default searcher selection for regions of the space.
    #[inline]
    pub fn search_strategy(mut self, v: Arc<dyn SearchStrategy>) -> Self {
        self.strategy = Some(v);
        self
    }

    pub fn build(self) -> Result<Space, SpaceConfigError> {
        use SpaceConfigError::*;

        let (min, max, step) = match &self.kind {
            SpaceKind::Grid(extents) => {
                if extents.is_empty() || extents.contains(&0) {
                    return Err(EmptyGrid);
                }
                let cells = extents
                    .iter()
                    .try_fold(1u64, |acc, &e| acc.checked_mul(e))
                    .and_then(|c| i64::try_from(c).ok())
                    .ok_or(TooManyPositions)?;
                (0, cells - 1, 1)
            }
            SpaceKind::Index | SpaceKind::Time => {
                let (min, max) = self.bounds.ok_or(MissingBounds)?;
                (min, max, self.step)
            }
        };

        if min > max {
            return Err(InvertedBounds { min, max });
        }
        if step <= 0 {
            return Err(NonPositiveStep(step));
        }
        let extent = max.checked_sub(min).ok_or(TooManyPositions)?;
        if extent % step != 0 {
            return Err(MisalignedBounds { min, max, step });
        }
        let count = (extent / step).checked_add(1).ok_or(TooManyPositions)?;

        let origin = self.origin.unwrap_or(min);
        if origin < min || origin > max {
            return Err(OriginOutOfBounds(origin));
        }
        if (origin - min) % step != 0 {
            return Err(MisalignedOrigin(origin));
        }

        debug!(
            name = %self.name,
            kind = ?self.kind,
            min,
            max,
            step,
            count,
            order = %self.order,
            "Built space"
        );

        Ok(Space::from_parts(
            self.name,
            self.kind,
            min,
            max,
            step,
            origin,
            count,
            self.order,
            self.strategy,
        ))
    }
}

/// Serialisable kind of a space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SpaceKindConfig {
    #[default]
    Index,
    Time,
    Grid { extents: Vec<u64> },
}

impl From<&SpaceKind> for SpaceKindConfig {
    fn from(kind: &SpaceKind) -> Self {
        match kind {
            SpaceKind::Index => SpaceKindConfig::Index,
            SpaceKind::Time => SpaceKindConfig::Time,
            SpaceKind::Grid(extents) => SpaceKindConfig::Grid {
                extents: extents.clone(),
            },
        }
    }
}

impl From<SpaceKindConfig> for SpaceKind {
    fn from(kind: SpaceKindConfig) -> Self {
        match kind {
            SpaceKindConfig::Index => SpaceKind::Index,
            SpaceKindConfig::Time => SpaceKind::Time,
            SpaceKindConfig::Grid { extents } => SpaceKind::Grid(extents),
        }
    }
}

/// Declarative description of a space.
///
/// ```
/// use locus_core::config::SpaceConfig;
///
/// let config: SpaceConfig = serde_json::from_str(
///     r#"{ "name": "blocks", "min": 0, "max": 4095, "step": 1 }"#,
/// ).unwrap();
/// let space = config.build().unwrap();
/// assert_eq!(space.count(), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceConfig {
    pub name: String,
    #[serde(default)]
    pub kind: SpaceKindConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<i64>,
    #[serde(default)]
    pub order: PositionOrder,
}

impl SpaceConfig {
    /// Builds a new space; every call yields a distinct identity.
    pub fn build(&self) -> Result<Space, SpaceConfigError> {
        let mut builder = SpaceBuilder::new()
            .name(self.name.clone())
            .kind(self.kind.clone().into())
            .order(self.order);
        match (self.min, self.max) {
            (Some(min), Some(max)) => builder = builder.bounds(min, max),
            (None, None) => {}
            _ => return Err(SpaceConfigError::MissingBounds),
        }
        if let Some(step) = self.step {
            builder = builder.step(step);
        }
        if let Some(origin) = self.origin {
            builder = builder.origin(origin);
        }
        builder.build()
    }
}

impl From<&Space> for SpaceConfig {
    fn from(space: &Space) -> Self {
        let (min, max) = space.raw_bounds();
        SpaceConfig {
            name: space.name().to_owned(),
            kind: space.kind().into(),
            min: Some(min),
            max: Some(max),
            step: Some(space.step()),
            origin: Some(space.origin().raw()),
            order: space.order(),
        }
    }
}
