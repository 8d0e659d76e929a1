//! Idle-room expiry.
//!
//! DESIGN
//! ======
//! When the last connection leaves a room, the room is armed with a timer
//! task that sleeps for the TTL and then posts an `Expiry` back to the
//! dispatch task. Deletion itself always happens on the dispatch task, so it
//! is serialized with joins for the same room. A join cancels the timer.
//!
//! Each armed timer carries a token. A firing whose token no longer matches
//! the room's pending timer (cancelled, re-armed, or the room was recreated)
//! is ignored. On a matching firing the live connection count is re-read from
//! the room before deleting.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::state::{RoomRegistry, RoomState};

/// Timer firing delivered back to the dispatch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    pub room_id: String,
    pub token: u64,
}

/// Handle to the single outstanding timer of a room.
#[derive(Debug)]
pub struct PendingExpiry {
    token: u64,
    task: AbortHandle,
}

impl PendingExpiry {
    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }
}

pub struct CleanupScheduler {
    ttl: Duration,
    expired_tx: mpsc::UnboundedSender<Expiry>,
    next_token: u64,
}

impl CleanupScheduler {
    /// Create a scheduler and the receiver its timers report to.
    #[must_use]
    pub fn new(ttl: Duration) -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        (Self { ttl, expired_tx, next_token: 0 }, expired_rx)
    }

    /// Schedule deletion of `room` after the TTL, replacing any prior timer.
    pub fn arm(&mut self, room: &mut RoomState) {
        Self::cancel(room);

        self.next_token += 1;
        let token = self.next_token;
        let ttl = self.ttl;
        // Created here so the deadline counts from arming. `sleep` clamps a
        // TTL too large for `Instant` to the far future.
        let timer = tokio::time::sleep(ttl);
        let tx = self.expired_tx.clone();
        let room_id = room.id.clone();

        let task = tokio::spawn(async move {
            timer.await;
            if tx.send(Expiry { room_id, token }).is_err() {
                debug!(token, "expiry dropped: dispatch task gone");
            }
        });

        room.pending_expiry = Some(PendingExpiry { token, task: task.abort_handle() });
        info!(room_id = %room.id, token, ttl_secs = ttl.as_secs(), "room expiry armed");
    }

    /// Cancel the room's pending timer. Returns whether one was armed.
    pub fn cancel(room: &mut RoomState) -> bool {
        let Some(pending) = room.pending_expiry.take() else {
            return false;
        };
        pending.task.abort();
        debug!(room_id = %room.id, token = pending.token, "room expiry cancelled");
        true
    }

    /// Handle a timer firing. Returns whether the room was deleted.
    pub fn fire(registry: &mut RoomRegistry, expiry: &Expiry) -> bool {
        let Some(room) = registry.get_mut(&expiry.room_id) else {
            debug!(room_id = %expiry.room_id, "expiry for unknown room ignored");
            return false;
        };

        if room.pending_expiry.as_ref().map(PendingExpiry::token) != Some(expiry.token) {
            debug!(room_id = %expiry.room_id, token = expiry.token, "stale expiry ignored");
            return false;
        }
        room.pending_expiry = None;

        let live = room.live_connections();
        if live > 0 {
            warn!(room_id = %expiry.room_id, live, "expiry fired on occupied room; keeping it");
            return false;
        }

        let strokes = room.strokes.len();
        let idle_secs = room.last_activity.elapsed().as_secs();
        registry.remove(&expiry.room_id);
        info!(room_id = %expiry.room_id, strokes, idle_secs, "room expired and removed");
        true
    }
}

#[cfg(test)]
#[path = "cleanup_test.rs"]
mod tests;
