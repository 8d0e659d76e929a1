//! Per-client pan/zoom state and the screen↔world affine mapping.
//!
//! Every participant shares one world coordinate space; each client keeps
//! its own [`Viewport`] onto it. `world = (screen - offset) / scale` and
//! `screen = world * scale + offset`.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned world-space rectangle covered by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Point,
    pub max: Point,
}

/// Pan/zoom state for one client.
///
/// `offset_x` / `offset_y` are in CSS pixels. `scale` stays within
/// [`MIN_SCALE`, `MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, scale: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset_x,
            y: world.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space length to world units at the current scale.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Set the offset to `start_offset` moved by the drag since `start_screen`.
    ///
    /// Always computed from the gesture's snapshot, never accumulated.
    pub fn pan_from(&mut self, start_offset: Point, start_screen: Point, current: Point) {
        self.offset_x = start_offset.x + (current.x - start_screen.x);
        self.offset_y = start_offset.y + (current.y - start_screen.y);
    }

    /// Zoom one step about `pointer`, keeping the world point under it fixed.
    ///
    /// Returns `false` when the clamp leaves the scale unchanged.
    pub fn zoom_at(&mut self, pointer: Point, zoom_in: bool) -> bool {
        let factor = if zoom_in { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR };
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }
        let anchor = self.screen_to_world(pointer);
        self.scale = new_scale;
        self.offset_x = pointer.x - anchor.x * new_scale;
        self.offset_y = pointer.y - anchor.y * new_scale;
        true
    }

    /// Place the world origin at the center of a `width` x `height` viewport.
    pub fn center_origin(&mut self, width: f64, height: f64) {
        self.offset_x = width / 2.0;
        self.offset_y = height / 2.0;
    }

    /// World-space rectangle visible in a `width` x `height` viewport.
    #[must_use]
    pub fn visible_world(&self, width: f64, height: f64) -> WorldRect {
        WorldRect {
            min: self.screen_to_world(Point::new(0.0, 0.0)),
            max: self.screen_to_world(Point::new(width, height)),
        }
    }
}
