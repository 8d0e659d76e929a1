//! Shared application state and the in-memory room registry.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only a handle to the dispatch task; the `RoomRegistry` itself is
//! owned by that task and never shared, so rooms need no lock. Each room
//! keeps its append-only stroke log, the presences of joined connections,
//! an activity timestamp, and at most one pending expiry timer.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use frames::{ConnectionId, Presence, Stroke};
use tokio::time::Instant;
use tracing::info;

use crate::services::cleanup::PendingExpiry;
use crate::services::dispatch::DispatchHandle;

// =============================================================================
// ROOM STATE
// =============================================================================

/// Live state of one room.
pub struct RoomState {
    pub id: String,
    /// Every stroke since creation or the last clear, in receipt order.
    pub strokes: Vec<Stroke>,
    /// Joined connections keyed by connection id.
    pub presences: HashMap<ConnectionId, Presence>,
    pub last_activity: Instant,
    /// Armed while the room has no live connections.
    pub pending_expiry: Option<PendingExpiry>,
}

impl RoomState {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            strokes: Vec::new(),
            presences: HashMap::new(),
            last_activity: Instant::now(),
            pending_expiry: None,
        }
    }

    /// Number of connections currently joined.
    #[must_use]
    pub fn live_connections(&self) -> usize {
        self.presences.len()
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Presence list in a stable order for `users-update`.
    #[must_use]
    pub fn presence_list(&self) -> Vec<Presence> {
        let mut list: Vec<Presence> = self.presences.values().cloned().collect();
        list.sort_by(|a, b| a.username.cmp(&b.username).then(a.connection_id.cmp(&b.connection_id)));
        list
    }
}

// =============================================================================
// ROOM REGISTRY
// =============================================================================

/// Room id -> room state. Owned by the dispatch task for the process lifetime.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, RoomState>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, room_id: &str) -> Option<&RoomState> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut RoomState> {
        self.rooms.get_mut(room_id)
    }

    /// Look up a room, creating an empty one if the id is unknown.
    pub fn get_or_create(&mut self, room_id: &str) -> &mut RoomState {
        match self.rooms.entry(room_id.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(room_id, "room created");
                entry.insert(RoomState::new(room_id))
            }
        }
    }

    pub fn remove(&mut self, room_id: &str) -> Option<RoomState> {
        self.rooms.remove(room_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the dispatch handle is a cheap channel clone.
#[derive(Clone)]
pub struct AppState {
    pub dispatch: DispatchHandle,
    /// Outbound queue depth for each new connection.
    pub client_buffer: usize,
}

impl AppState {
    #[must_use]
    pub fn new(dispatch: DispatchHandle, client_buffer: usize) -> Self {
        Self { dispatch, client_buffer }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
