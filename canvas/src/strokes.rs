//! Ordered local stroke cache.
//!
//! Arrival order is z-order: later strokes paint over earlier ones. Local
//! and remote strokes go through the same `push`, with no origin tagging and
//! no deduplication.

#[cfg(test)]
#[path = "strokes_test.rs"]
mod strokes_test;

use frames::Stroke;

/// Append-only stroke list with an atomic full clear.
#[derive(Debug, Clone, Default)]
pub struct StrokeCache {
    strokes: Vec<Stroke>,
}

impl StrokeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stroke on top of everything drawn so far.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Replace the whole sequence, e.g. with a room's history on join.
    pub fn replace(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
    }

    /// Drop every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Strokes in draw order (bottom first).
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of strokes currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
