//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! A gesture lives strictly between pointer-down and pointer-up. Pointer-down
//! classifies it as a pan or a draw; [`Gesture`] then carries whatever the
//! following move events need.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Which brush the local participant draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand pen in the selected color and width.
    #[default]
    Pen,
    /// Paints with the background color at a wide fixed width.
    Eraser,
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Alt / Option turns any button into a pan.
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, which zooms out).
    pub dy: f64,
}

/// Whether a pointer-down starts a pan rather than a stroke.
#[must_use]
pub fn is_pan_gesture(button: Button, modifiers: Modifiers) -> bool {
    modifiers.alt || matches!(button, Button::Middle | Button::Secondary)
}

/// The active gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Drawing a freehand line as a chain of segments.
    Drawing {
        /// World-space end of the previous segment.
        last_world: Point,
    },
    /// Dragging the viewport.
    Panning {
        /// Screen position at pointer-down.
        start_screen: Point,
        /// Viewport offset at pointer-down.
        start_offset: Point,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
