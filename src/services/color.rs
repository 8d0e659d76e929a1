//! Presence color assignment.
//!
//! Colors come from a fixed, ordered palette. A joiner gets the first palette
//! entry no current member of the room holds. Once every entry is taken the
//! allocator falls back to a random color, which may collide.

use std::collections::HashSet;

use frames::Presence;

/// Visually distinct presence colors, in assignment order.
pub const PALETTE: [&str; 20] = [
    "#f43f5e", "#3b82f6", "#22c55e", "#f59e0b", "#a855f7", //
    "#06b6d4", "#ec4899", "#14b8a6", "#ef4444", "#6366f1", //
    "#84cc16", "#f97316", "#8b5cf6", "#0ea5e9", "#e879f9", //
    "#facc15", "#2dd4bf", "#fb923c", "#818cf8", "#34d399",
];

/// Pick a color for a new member given the room's current presences.
pub fn assign<'a>(present: impl IntoIterator<Item = &'a Presence>) -> String {
    let taken: HashSet<&str> = present.into_iter().map(|p| p.color.as_str()).collect();
    PALETTE
        .iter()
        .find(|c| !taken.contains(*c))
        .map_or_else(random_color, |c| (*c).to_string())
}

fn random_color() -> String {
    format!("#{:06x}", rand::random::<u32>() & 0x00ff_ffff)
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
