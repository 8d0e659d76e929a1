//! Shared event model and JSON codec for the realtime websocket channel.
//!
//! This crate owns the wire representation used by both the server and the
//! `canvas` client engine. Every message is a JSON object of the form
//! `{"event": "<name>", "data": <payload>}`; events without a payload omit
//! `data`. Stroke coordinates are always shared world coordinates.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier the server assigns to each websocket connection.
pub type ConnectionId = Uuid;

/// Error returned by the encode/decode helpers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be parsed as a known event.
    #[error("failed to decode event: {0}")]
    Decode(#[source] serde_json::Error),
    /// The event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

// =============================================================================
// MODEL
// =============================================================================

/// One straight segment in world coordinates.
///
/// `width` is in world units: the client divides its on-screen brush width by
/// the current zoom, so a line keeps its apparent thickness relative to the
/// content it was drawn over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub width: f64,
}

impl Stroke {
    /// All coordinates are finite and the width is positive.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1].iter().all(|v| v.is_finite())
            && self.width.is_finite()
            && self.width > 0.0
    }
}

/// A world-space cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPos {
    pub x: f64,
    pub y: f64,
}

/// A member of a room as seen by every other member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub connection_id: ConnectionId,
    pub username: String,
    pub color: String,
    pub cursor: Option<CursorPos>,
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    pub room_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub room_id: String,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMove {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
}

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(JoinRoom),
    Draw(DrawRequest),
    CursorMove(CursorMove),
    /// Payload is the room id.
    Clear(String),
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join-room",
            Self::Draw(_) => "draw",
            Self::CursorMove(_) => "cursor-move",
            Self::Clear(_) => "clear",
        }
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorUpdate {
    pub connection_id: ConnectionId,
    pub x: f64,
    pub y: f64,
}

/// Events the server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Presence color assigned to the receiving connection.
    YourColor(String),
    /// Full stroke history of the room, sent once on join when non-empty.
    RoomHistory(Vec<Stroke>),
    /// A stroke drawn by another member.
    Draw(Stroke),
    CursorUpdate(CursorUpdate),
    /// Another member cleared the room.
    Clear,
    UsersUpdate(Vec<Presence>),
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::YourColor(_) => "your-color",
            Self::RoomHistory(_) => "room-history",
            Self::Draw(_) => "draw",
            Self::CursorUpdate(_) => "cursor-update",
            Self::Clear => "clear",
            Self::UsersUpdate(_) => "users-update",
        }
    }

    /// Cursor relays may be dropped under congestion without consequence.
    #[must_use]
    pub fn is_best_effort(&self) -> bool {
        matches!(self, Self::CursorUpdate(_))
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Encode any event as a JSON text message.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode<T: Serialize>(event: &T) -> Result<String, CodecError> {
    serde_json::to_string(event).map_err(CodecError::Encode)
}

/// Decode a JSON text message into an event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON or unknown events.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
