//! Client drawing engine for shared sketch rooms.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! client side of a room: translating raw DOM input into strokes, keeping each
//! participant's private pan/zoom view onto the shared world, redrawing the
//! surface, and mirroring room state received from the server. The host layer
//! wires DOM events and the websocket to the engine and sends the
//! [`frames::ClientEvent`]s that [`session::RoomSession`] builds.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`viewport`] | Pan/zoom state and screen↔world conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`strokes`] | Ordered local stroke cache |
//! | [`render`] | Full-scene redraw through the [`render::Surface`] trait |
//! | [`session`] | Connection state, presence, and remote cursors for one room |
//! | [`identity`] | Saved display name and recent rooms |
//! | [`consts`] | Shared numeric and color constants |

pub mod consts;
pub mod engine;
pub mod identity;
pub mod input;
pub mod render;
pub mod session;
pub mod strokes;
pub mod viewport;
