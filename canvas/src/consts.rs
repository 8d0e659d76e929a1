//! Shared numeric and color constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.05;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 20.0;

/// Scale multiplier for one zoom-in wheel step.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Scale multiplier for one zoom-out wheel step.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// ── Scene ───────────────────────────────────────────────────────

/// Surface fill color. The eraser paints with it too.
pub const BACKGROUND: &str = "#0a0a0f";

/// Distance between grid dots in world units.
pub const GRID_SPACING: f64 = 40.0;

/// Grid dot radius in screen pixels.
pub const GRID_DOT_RADIUS_PX: f64 = 1.5;

pub const GRID_DOT_COLOR: &str = "rgba(255,255,255,0.07)";

/// Closest on-screen dot spacing before the grid drops every other dot.
pub const GRID_MIN_SCREEN_SPACING_PX: f64 = 12.0;

// ── Brush ───────────────────────────────────────────────────────

pub const DEFAULT_BRUSH_COLOR: &str = "#ffffff";

/// Default brush width in screen pixels.
pub const DEFAULT_BRUSH_WIDTH_PX: f64 = 4.0;

/// Eraser width in screen pixels.
pub const ERASER_WIDTH_PX: f64 = 24.0;
