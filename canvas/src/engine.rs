use frames::{ServerEvent, Stroke};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{BACKGROUND, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_WIDTH_PX, ERASER_WIDTH_PX};
use crate::input::{Button, Gesture, Modifiers, Tool, WheelDelta, is_pan_gesture};
use crate::render::{self, Frame};
use crate::session::RoomSession;
use crate::strokes::StrokeCache;
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// CSS cursor while idle or drawing.
pub const CURSOR_DRAW: &str = "crosshair";

/// CSS cursor while a pan is in progress.
pub const CURSOR_PAN: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A local segment was appended; the host forwards it to the room.
    StrokeDrawn(Stroke),
    /// The pointer moved to this world position.
    CursorMoved(Point),
    SetCursor(&'static str),
    RenderNeeded,
}

/// Current brush settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub tool: Tool,
    pub color: String,
    /// Pen width in screen pixels.
    pub width_px: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self { tool: Tool::Pen, color: DEFAULT_BRUSH_COLOR.to_owned(), width_px: DEFAULT_BRUSH_WIDTH_PX }
    }
}

impl Brush {
    /// Paint color and screen width for the active tool.
    #[must_use]
    pub fn paint(&self) -> (&str, f64) {
        match self.tool {
            Tool::Pen => (&self.color, self.width_px),
            Tool::Eraser => (BACKGROUND, ERASER_WIDTH_PX),
        }
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub viewport: Viewport,
    pub strokes: StrokeCache,
    pub gesture: Gesture,
    pub brush: Brush,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    centered: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            strokes: StrokeCache::new(),
            gesture: Gesture::Idle,
            brush: Brush::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            centered: false,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Append a stroke received from another participant.
    pub fn apply_remote_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Replace the local cache with a room's history.
    pub fn load_history(&mut self, strokes: Vec<Stroke>) {
        self.strokes.replace(strokes);
    }

    /// Drop every cached stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    pub fn set_brush_color(&mut self, color: impl Into<String>) {
        self.brush.color = color.into();
    }

    pub fn set_brush_width(&mut self, width_px: f64) {
        if width_px.is_finite() && width_px > 0.0 {
            self.brush.width_px = width_px;
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    ///
    /// The first non-empty layout places the world origin at the center.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        if !self.centered && width_css > 0.0 && height_css > 0.0 {
            self.viewport.center_origin(width_css, height_css);
            self.centered = true;
        }
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        if is_pan_gesture(button, modifiers) {
            self.gesture = Gesture::Panning { start_screen: screen_pt, start_offset: self.viewport.offset() };
            return vec![Action::SetCursor(CURSOR_PAN)];
        }
        self.gesture = Gesture::Drawing { last_world: self.viewport.screen_to_world(screen_pt) };
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen_pt);
        let mut actions = Vec::new();

        match self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { start_screen, start_offset } => {
                self.viewport.pan_from(start_offset, start_screen, screen_pt);
                actions.push(Action::RenderNeeded);
            }
            Gesture::Drawing { last_world } => {
                let (color, width_px) = self.brush.paint();
                let stroke = Stroke {
                    x0: last_world.x,
                    y0: last_world.y,
                    x1: world.x,
                    y1: world.y,
                    color: color.to_owned(),
                    width: self.viewport.screen_dist_to_world(width_px),
                };
                self.strokes.push(stroke.clone());
                self.gesture = Gesture::Drawing { last_world: world };
                actions.push(Action::StrokeDrawn(stroke));
                actions.push(Action::RenderNeeded);
            }
        }

        // Cursor position reflects the viewport after any pan above.
        actions.push(Action::CursorMoved(self.viewport.screen_to_world(screen_pt)));
        actions
    }

    /// End the active gesture. Pointer-leave is handled the same way.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let was_panning = matches!(self.gesture, Gesture::Panning { .. });
        self.gesture = Gesture::Idle;
        if was_panning { vec![Action::SetCursor(CURSOR_DRAW)] } else { Vec::new() }
    }

    /// Zoom one step about the pointer. Scrolling up zooms in.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        #[allow(clippy::float_cmp)]
        let flat = delta.dy == 0.0;
        if flat || !delta.dy.is_finite() {
            return Vec::new();
        }
        if self.viewport.zoom_at(screen_pt, delta.dy < 0.0) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame { viewport: self.viewport, width: self.viewport_width, height: self.viewport_height, dpr: self.dpr }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    // --- Delegated data inputs (each redraws) ---

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn apply_remote_stroke(&mut self, stroke: Stroke) -> Result<(), JsValue> {
        self.core.apply_remote_stroke(stroke);
        self.render()
    }

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn load_history(&mut self, strokes: Vec<Stroke>) -> Result<(), JsValue> {
        self.core.load_history(strokes);
        self.render()
    }

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.core.clear();
        self.render()
    }

    /// Apply a server event through the room session, redrawing if the
    /// stroke cache changed.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn apply_server_event(&mut self, session: &mut RoomSession, event: ServerEvent) -> Result<(), JsValue> {
        if session.apply(event, &mut self.core) {
            self.render()?;
        }
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    // --- Viewport ---

    /// Resize the backing store to the device pixel grid and redraw.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Result<(), JsValue> {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * self.core.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * self.core.dpr).round().max(0.0) as u32);
        self.render()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("2d context unavailable"));
        };
        let mut ctx = ctx.dyn_into::<CanvasRenderingContext2d>()?;
        render::draw_scene(&mut ctx, &self.core.frame(), self.core.strokes.strokes())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.viewport()
    }
}
