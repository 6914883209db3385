//! Table Geometry
//!
//! Screen coordinates for move animations. Layout is owned by the renderer
//! (seat positions depend on table size, window size, and theme), so the
//! translator asks an injected provider instead of computing pixels itself.
//! Coordinates are keyed by semantic state path, matching how the renderer
//! keys its layout map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::paths::StatePath;

/// A point in renderer screen space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl PixelPoint {
    /// Create a point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward another point
    ///
    /// `t` past 1.0 overshoots, which the chip-push choreography relies on.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Provider of pixel coordinates for animatable state paths
///
/// Implemented by the host renderer. Paths without a screen position (sounds,
/// action labels) return `None`; the translator falls back to non-positional
/// choreography for those.
pub trait TableGeometry: Send + Sync {
    /// Screen position of the element addressed by `path`
    fn point_for(&self, path: &StatePath) -> Option<PixelPoint>;

    /// Screen position of the muck pile, where discarded cards travel
    fn muck_point(&self) -> PixelPoint;
}

/// Fixed-layout geometry backed by a path → point map
///
/// Used in tests and headless hosts; real renderers implement
/// [`TableGeometry`] over their live layout.
#[derive(Clone, Debug, Default)]
pub struct StaticGeometry {
    points: HashMap<StatePath, PixelPoint>,
    muck: PixelPoint,
}

impl StaticGeometry {
    /// Create an empty layout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a point for a path
    #[must_use]
    pub fn with_point(mut self, path: StatePath, point: PixelPoint) -> Self {
        self.points.insert(path, point);
        self
    }

    /// Set the muck pile position
    #[must_use]
    pub fn with_muck(mut self, point: PixelPoint) -> Self {
        self.muck = point;
        self
    }
}

impl TableGeometry for StaticGeometry {
    fn point_for(&self, path: &StatePath) -> Option<PixelPoint> {
        self.points.get(path).copied()
    }

    fn muck_point(&self) -> PixelPoint {
        self.muck
    }
}
