//! Session coordinator: room membership, stroke log, presence and relay.
//!
//! DESIGN
//! ======
//! `Coordinator` owns the `RoomRegistry`, the outbound sender of every live
//! connection, and the `CleanupScheduler`. It is driven exclusively by the
//! dispatch task, one event at a time, so each operation runs to completion
//! before the next event for any room is looked at.
//!
//! Relay is best-effort: outbound queues are written with `try_send`. A full
//! queue drops the event for that one connection and never stalls the
//! dispatch loop or other members of the room.
//!
//! ROOM POLICY
//! ===========
//! - `join` creates the room and cancels its expiry.
//! - `draw` and `clear` create the room when the id is unknown.
//! - `cursor_move` on an unknown room is a silent no-op.
//! - A room whose last member leaves is armed for expiry.

use std::collections::{HashMap, HashSet};

use frames::{ClientEvent, ConnectionId, CursorPos, CursorUpdate, Presence, ServerEvent, Stroke};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::services::cleanup::{CleanupScheduler, Expiry};
use crate::services::color;
use crate::state::{RoomRegistry, RoomState};

/// Outbound sender for one websocket connection.
pub type ClientTx = mpsc::Sender<ServerEvent>;

/// Display name used when a joiner sends a blank username.
pub const ANONYMOUS: &str = "anonymous";

struct Connection {
    tx: ClientTx,
    /// Rooms this connection has joined.
    rooms: HashSet<String>,
}

pub struct Coordinator {
    registry: RoomRegistry,
    connections: HashMap<ConnectionId, Connection>,
    scheduler: CleanupScheduler,
}

impl Coordinator {
    #[must_use]
    pub fn new(scheduler: CleanupScheduler) -> Self {
        Self { registry: RoomRegistry::new(), connections: HashMap::new(), scheduler }
    }

    #[must_use]
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Number of registered websocket connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Register a connection's outbound sender.
    pub fn connect(&mut self, conn: ConnectionId, tx: ClientTx) {
        self.connections.insert(conn, Connection { tx, rooms: HashSet::new() });
    }

    /// Route one inbound client event.
    pub fn handle(&mut self, conn: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom(req) => self.join(&req.room_id, &req.username, conn),
            ClientEvent::Draw(req) => self.draw(&req.room_id, req.stroke, conn),
            ClientEvent::CursorMove(req) => self.cursor_move(&req.room_id, req.x, req.y, conn),
            ClientEvent::Clear(room_id) => self.clear(&room_id, conn),
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Add `conn` to a room, reply with its color and history, and announce
    /// the new member list to everyone in the room.
    pub fn join(&mut self, room_id: &str, username: &str, conn: ConnectionId) {
        let Some(connection) = self.connections.get_mut(&conn) else {
            warn!(%conn, room_id, "join from unregistered connection ignored");
            return;
        };
        connection.rooms.insert(room_id.to_owned());

        let username = match username.trim() {
            "" => ANONYMOUS,
            name => name,
        };

        let room = self.registry.get_or_create(room_id);
        CleanupScheduler::cancel(room);
        room.touch();

        // A repeated join replaces the earlier presence instead of competing
        // with it for a color.
        room.presences.remove(&conn);
        let assigned = color::assign(room.presences.values());
        room.presences.insert(
            conn,
            Presence { connection_id: conn, username: username.to_owned(), color: assigned.clone(), cursor: None },
        );
        info!(%conn, room_id, username, color = %assigned, members = room.live_connections(), "joined room");

        deliver(&self.connections, conn, ServerEvent::YourColor(assigned));
        if !room.strokes.is_empty() {
            deliver(&self.connections, conn, ServerEvent::RoomHistory(room.strokes.clone()));
        }
        broadcast(&self.connections, room, &ServerEvent::UsersUpdate(room.presence_list()), None);
    }

    /// Append a stroke and relay it to everyone in the room except `conn`.
    pub fn draw(&mut self, room_id: &str, stroke: Stroke, conn: ConnectionId) {
        if !stroke.is_well_formed() {
            warn!(%conn, room_id, "malformed stroke dropped");
            return;
        }

        let room = self.registry.get_or_create(room_id);
        room.strokes.push(stroke.clone());
        room.touch();
        debug!(%conn, room_id, total = room.strokes.len(), "stroke appended");

        broadcast(&self.connections, room, &ServerEvent::Draw(stroke), Some(conn));
        self.arm_if_unoccupied(room_id);
    }

    /// Record `conn`'s cursor and relay it to the rest of the room.
    pub fn cursor_move(&mut self, room_id: &str, x: f64, y: f64, conn: ConnectionId) {
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        if let Some(presence) = room.presences.get_mut(&conn) {
            presence.cursor = Some(CursorPos { x, y });
        }
        broadcast(
            &self.connections,
            room,
            &ServerEvent::CursorUpdate(CursorUpdate { connection_id: conn, x, y }),
            Some(conn),
        );
    }

    /// Empty the room's stroke log and tell the other members.
    pub fn clear(&mut self, room_id: &str, conn: ConnectionId) {
        let room = self.registry.get_or_create(room_id);
        let dropped = room.strokes.len();
        room.strokes.clear();
        room.touch();
        info!(%conn, room_id, dropped, "room cleared");

        broadcast(&self.connections, room, &ServerEvent::Clear, Some(conn));
        self.arm_if_unoccupied(room_id);
    }

    /// Remove a disconnected connection from every room it joined.
    pub fn leave(&mut self, conn: ConnectionId) {
        let Some(connection) = self.connections.remove(&conn) else {
            return;
        };

        for room_id in connection.rooms {
            let Some(room) = self.registry.get_mut(&room_id) else {
                continue;
            };
            if room.presences.remove(&conn).is_none() {
                continue;
            }
            info!(%conn, room_id, remaining = room.live_connections(), "left room");

            broadcast(&self.connections, room, &ServerEvent::UsersUpdate(room.presence_list()), None);
            if room.live_connections() == 0 {
                self.scheduler.arm(room);
            }
        }
    }

    /// Apply a cleanup timer firing.
    pub fn expire(&mut self, expiry: &Expiry) -> bool {
        let removed = CleanupScheduler::fire(&mut self.registry, expiry);
        if removed && self.registry.is_empty() {
            debug!("registry empty");
        }
        removed
    }

    /// A room touched by draw/clear with nobody in it would otherwise never
    /// be reclaimed.
    fn arm_if_unoccupied(&mut self, room_id: &str) {
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };
        if room.live_connections() == 0 && room.pending_expiry.is_none() {
            self.scheduler.arm(room);
        }
    }
}

// =============================================================================
// DELIVERY
// =============================================================================

/// Queue an event for one connection without waiting.
fn deliver(connections: &HashMap<ConnectionId, Connection>, to: ConnectionId, event: ServerEvent) {
    let Some(connection) = connections.get(&to) else {
        return;
    };
    match connection.tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            if event.is_best_effort() {
                debug!(%to, event = event.name(), "client queue full; dropped");
            } else {
                warn!(%to, event = event.name(), "client queue full; dropped");
            }
        }
        Err(TrySendError::Closed(event)) => {
            debug!(%to, event = event.name(), "client channel closed");
        }
    }
}

/// Queue an event for every member of `room`, optionally excluding one.
fn broadcast(
    connections: &HashMap<ConnectionId, Connection>,
    room: &RoomState,
    event: &ServerEvent,
    exclude: Option<ConnectionId>,
) {
    for conn in room.presences.keys() {
        if exclude == Some(*conn) {
            continue;
        }
        deliver(connections, *conn, event.clone());
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
