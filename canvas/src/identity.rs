//! Display name and recent-room persistence.
//!
//! The landing page reads the saved name and the recently visited rooms and
//! records each visit. [`IdentityStore`] is the seam: [`BrowserIdentity`]
//! keeps the data in `localStorage`, [`MemoryIdentity`] keeps it in process
//! for tests and non-browser hosts.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Most rooms remembered; older visits fall off.
pub const MAX_RECENT_ROOMS: usize = 5;

const USERNAME_KEY: &str = "sketchroom-username";
const ROOMS_KEY: &str = "sketchroom-rooms";

/// One remembered room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomVisit {
    pub id: String,
    /// ISO-8601 timestamp of the latest visit.
    pub last_visited: String,
}

pub trait IdentityStore {
    type Error;

    /// The saved display name, if one was stored.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backing store cannot be read.
    fn saved_username(&self) -> Result<Option<String>, Self::Error>;

    /// # Errors
    ///
    /// Returns `Err` if the backing store rejects the write.
    fn save_username(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Recently visited rooms, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backing store cannot be read.
    fn recent_rooms(&self) -> Result<Vec<RoomVisit>, Self::Error>;

    /// Move `room_id` to the front of the recent list.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backing store rejects the write.
    fn save_board_visit(&mut self, room_id: &str, visited_at: &str) -> Result<(), Self::Error>;
}

/// Put `room_id` first, drop its older entry, keep at most [`MAX_RECENT_ROOMS`].
#[must_use]
pub fn record_visit(mut rooms: Vec<RoomVisit>, room_id: &str, visited_at: &str) -> Vec<RoomVisit> {
    rooms.retain(|r| r.id != room_id);
    rooms.insert(0, RoomVisit { id: room_id.to_owned(), last_visited: visited_at.to_owned() });
    rooms.truncate(MAX_RECENT_ROOMS);
    rooms
}

// =============================================================
// In-memory store
// =============================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryIdentity {
    username: Option<String>,
    rooms: Vec<RoomVisit>,
}

impl MemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentity {
    type Error = Infallible;

    fn saved_username(&self) -> Result<Option<String>, Infallible> {
        Ok(self.username.clone())
    }

    fn save_username(&mut self, name: &str) -> Result<(), Infallible> {
        self.username = Some(name.to_owned());
        Ok(())
    }

    fn recent_rooms(&self) -> Result<Vec<RoomVisit>, Infallible> {
        Ok(self.rooms.clone())
    }

    fn save_board_visit(&mut self, room_id: &str, visited_at: &str) -> Result<(), Infallible> {
        self.rooms = record_visit(std::mem::take(&mut self.rooms), room_id, visited_at);
        Ok(())
    }
}

// =============================================================
// Browser store
// =============================================================

/// `localStorage`-backed store.
pub struct BrowserIdentity {
    storage: Storage,
}

impl BrowserIdentity {
    /// Open the window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns `Err` outside a browser window or when storage is disabled.
    pub fn open() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let storage = window.local_storage()?.ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
        Ok(Self { storage })
    }

    /// The current time as an ISO-8601 string, for [`IdentityStore::save_board_visit`].
    #[must_use]
    pub fn now() -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }
}

impl IdentityStore for BrowserIdentity {
    type Error = JsValue;

    fn saved_username(&self) -> Result<Option<String>, JsValue> {
        Ok(self.storage.get_item(USERNAME_KEY)?.filter(|name| !name.is_empty()))
    }

    fn save_username(&mut self, name: &str) -> Result<(), JsValue> {
        self.storage.set_item(USERNAME_KEY, name)
    }

    /// A corrupt entry reads as an empty list.
    fn recent_rooms(&self) -> Result<Vec<RoomVisit>, JsValue> {
        let Some(raw) = self.storage.get_item(ROOMS_KEY)? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    fn save_board_visit(&mut self, room_id: &str, visited_at: &str) -> Result<(), JsValue> {
        let rooms = record_visit(self.recent_rooms()?, room_id, visited_at);
        let raw = serde_json::to_string(&rooms).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.storage.set_item(ROOMS_KEY, &raw)
    }
}
