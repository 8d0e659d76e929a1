//! Client side of a room: connection state, presence, remote cursors.
//!
//! `RoomSession` turns engine [`Action`]s into outbound [`ClientEvent`]s and
//! applies inbound [`ServerEvent`]s to an [`EngineCore`]. It owns no socket;
//! the host calls [`RoomSession::on_connected`] / [`RoomSession::on_disconnected`]
//! as the transport changes state and sends whatever events come back.
//!
//! While disconnected every outbound builder returns `None`. Nothing is
//! queued or replayed.
//!
//! History handling: the server answers a join with `your-color`, then
//! `room-history` when the room has strokes, then `users-update`. Strokes drawn
//! locally after the join went out are already ordered after that history on
//! the server, so they are kept on top of it when the history lands. A local
//! clear in that window empties the room after the history snapshot, so the
//! history is then discarded and only strokes drawn after the clear remain.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;

use frames::{ClientEvent, ConnectionId, CursorMove, DrawRequest, JoinRoom, Presence, ServerEvent, Stroke};

use crate::engine::{Action, EngineCore};
use crate::viewport::{Point, Viewport};

/// A remote participant's cursor, positioned for an overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCursor {
    pub connection_id: ConnectionId,
    pub username: String,
    pub color: String,
    /// Position in CSS pixels under the local viewport.
    pub screen: Point,
}

#[derive(Debug, Clone)]
pub struct RoomSession {
    room_id: String,
    username: String,
    connected: bool,
    color: Option<String>,
    users: Vec<Presence>,
    /// Last known world position per remote connection.
    cursors: HashMap<ConnectionId, Point>,
    /// Strokes sent since the latest join, until its `users-update` arrives.
    since_join: Option<Vec<Stroke>>,
    /// A clear was sent after the latest join and before its `users-update`.
    cleared_since_join: bool,
}

impl RoomSession {
    #[must_use]
    pub fn new(room_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            username: username.into(),
            connected: false,
            color: None,
            users: Vec::new(),
            cursors: HashMap::new(),
            since_join: None,
            cleared_since_join: false,
        }
    }

    // --- Transport state ---

    /// The transport is up. Returns the join to send.
    pub fn on_connected(&mut self) -> ClientEvent {
        self.connected = true;
        self.since_join = Some(Vec::new());
        self.cleared_since_join = false;
        ClientEvent::JoinRoom(JoinRoom { room_id: self.room_id.clone(), username: self.username.clone() })
    }

    /// The transport dropped. Presence is stale until the next join.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.since_join = None;
        self.cleared_since_join = false;
        self.users.clear();
        self.cursors.clear();
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // --- Outbound ---

    /// Outbound event for an engine action, if any.
    pub fn outbound(&mut self, action: &Action) -> Option<ClientEvent> {
        match action {
            Action::StrokeDrawn(stroke) => self.draw(stroke),
            Action::CursorMoved(world) => self.cursor_move(*world),
            Action::SetCursor(_) | Action::RenderNeeded => None,
        }
    }

    pub fn draw(&mut self, stroke: &Stroke) -> Option<ClientEvent> {
        if !self.connected {
            return None;
        }
        if let Some(pending) = self.since_join.as_mut() {
            pending.push(stroke.clone());
        }
        Some(ClientEvent::Draw(DrawRequest { room_id: self.room_id.clone(), stroke: stroke.clone() }))
    }

    #[must_use]
    pub fn cursor_move(&self, world: Point) -> Option<ClientEvent> {
        self.connected.then(|| ClientEvent::CursorMove(CursorMove { room_id: self.room_id.clone(), x: world.x, y: world.y }))
    }

    /// Clear the room. The caller clears its own engine; the server does not
    /// echo the clear back to the sender.
    pub fn clear(&mut self) -> Option<ClientEvent> {
        if !self.connected {
            return None;
        }
        if let Some(pending) = self.since_join.as_mut() {
            pending.clear();
            self.cleared_since_join = true;
        }
        Some(ClientEvent::Clear(self.room_id.clone()))
    }

    // --- Inbound ---

    /// Apply one server event. Returns `true` when the stroke cache changed
    /// and the surface needs a redraw.
    pub fn apply(&mut self, event: ServerEvent, engine: &mut EngineCore) -> bool {
        match event {
            ServerEvent::YourColor(color) => {
                self.color = Some(color);
                // An empty room sends no history; start from what we drew since joining.
                let mine = self.since_join.clone().unwrap_or_default();
                engine.load_history(mine);
                true
            }
            ServerEvent::RoomHistory(mut history) => {
                if self.cleared_since_join {
                    history.clear();
                }
                if let Some(mine) = &self.since_join {
                    history.extend(mine.iter().cloned());
                }
                engine.load_history(history);
                true
            }
            ServerEvent::Draw(stroke) => {
                engine.apply_remote_stroke(stroke);
                true
            }
            ServerEvent::Clear => {
                engine.clear();
                true
            }
            ServerEvent::CursorUpdate(update) => {
                self.cursors.insert(update.connection_id, Point::new(update.x, update.y));
                false
            }
            ServerEvent::UsersUpdate(users) => {
                self.since_join = None;
                self.cleared_since_join = false;
                self.cursors.retain(|id, _| users.iter().any(|p| p.connection_id == *id));
                self.users = users;
                false
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Color the server assigned on the latest join.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Current room members, including this client.
    #[must_use]
    pub fn users(&self) -> &[Presence] {
        &self.users
    }

    /// Remote cursors of current members, mapped to screen space.
    #[must_use]
    pub fn remote_cursors(&self, viewport: &Viewport) -> Vec<RemoteCursor> {
        self.users
            .iter()
            .filter_map(|p| {
                let world = self.cursors.get(&p.connection_id)?;
                Some(RemoteCursor {
                    connection_id: p.connection_id,
                    username: p.username.clone(),
                    color: p.color.clone(),
                    screen: viewport.world_to_screen(*world),
                })
            })
            .collect()
    }
}
