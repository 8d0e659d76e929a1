//! Rendering: full redraws of the shared surface.
//!
//! Every mutation (append or clear) repaints the scene from scratch:
//! background, then the dot grid, then strokes in arrival order. Drawing goes
//! through the [`Surface`] trait so the scene logic runs without a browser;
//! [`CanvasRenderingContext2d`] is the production surface.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use frames::Stroke;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{BACKGROUND, GRID_DOT_COLOR, GRID_DOT_RADIUS_PX, GRID_MIN_SCREEN_SPACING_PX, GRID_SPACING};
use crate::viewport::Viewport;

/// The drawing primitives the scene needs.
pub trait Surface {
    type Error;

    /// Replace the current transform with uniform `scale` plus translation.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the transform.
    fn set_transform(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), Self::Error>;

    /// Fill an axis-aligned rectangle in current coordinates.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);

    /// Fill a circle in current coordinates.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails to build the arc.
    fn fill_dot(&mut self, x: f64, y: f64, radius: f64, color: &str) -> Result<(), Self::Error>;

    /// Stroke one round-capped segment in current coordinates.
    fn stroke_segment(&mut self, stroke: &Stroke);
}

/// What a redraw needs to know about the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub viewport: Viewport,
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    pub dpr: f64,
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_scene<S: Surface>(surface: &mut S, frame: &Frame, strokes: &[Stroke]) -> Result<(), S::Error> {
    let vp = frame.viewport;

    // Layer 1: background in screen space.
    surface.set_transform(frame.dpr, 0.0, 0.0)?;
    surface.fill_rect(0.0, 0.0, frame.width, frame.height, BACKGROUND);

    // Layer 2: world transform, grid then strokes.
    surface.set_transform(vp.scale * frame.dpr, vp.offset_x * frame.dpr, vp.offset_y * frame.dpr)?;
    draw_grid(surface, frame)?;
    for stroke in strokes {
        surface.stroke_segment(stroke);
    }
    Ok(())
}

/// Dot grid anchored at the world origin, covering only the visible rectangle.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_grid<S: Surface>(surface: &mut S, frame: &Frame) -> Result<(), S::Error> {
    let visible = frame.viewport.visible_world(frame.width, frame.height);
    let radius = frame.viewport.screen_dist_to_world(GRID_DOT_RADIUS_PX);
    let step = grid_step(frame.viewport.scale);

    let (first_col, last_col) = grid_range(visible.min.x, visible.max.x, step);
    let (first_row, last_row) = grid_range(visible.min.y, visible.max.y, step);
    for col in first_col..=last_col {
        let x = col as f64 * step;
        for row in first_row..=last_row {
            surface.fill_dot(x, row as f64 * step, radius, GRID_DOT_COLOR)?;
        }
    }
    Ok(())
}

/// World distance between drawn dots: [`GRID_SPACING`] doubled until dots
/// sit at least [`GRID_MIN_SCREEN_SPACING_PX`] apart on screen. Every drawn
/// dot stays on the base grid.
fn grid_step(scale: f64) -> f64 {
    let mut step = GRID_SPACING;
    if !(scale.is_finite() && scale > 0.0) {
        return step;
    }
    while step * scale < GRID_MIN_SCREEN_SPACING_PX {
        step *= 2.0;
    }
    step
}

/// Inclusive range of grid indices whose lines fall inside `[min, max]`.
#[allow(clippy::cast_possible_truncation)]
fn grid_range(min: f64, max: f64, step: f64) -> (i64, i64) {
    ((min / step).ceil() as i64, (max / step).floor() as i64)
}

// =============================================================
// Canvas2D surface
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn set_transform(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::set_transform(self, scale, 0.0, 0.0, scale, dx, dy)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn fill_dot(&mut self, x: f64, y: f64, radius: f64, color: &str) -> Result<(), JsValue> {
        self.begin_path();
        self.arc(x, y, radius, 0.0, TAU)?;
        self.set_fill_style_str(color);
        self.fill();
        Ok(())
    }

    fn stroke_segment(&mut self, stroke: &Stroke) {
        self.begin_path();
        self.move_to(stroke.x0, stroke.y0);
        self.line_to(stroke.x1, stroke.y1);
        self.set_stroke_style_str(&stroke.color);
        self.set_line_width(stroke.width);
        self.set_line_cap("round");
        self.stroke();
    }
}
