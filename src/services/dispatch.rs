//! Dispatch task: the single writer for all room state.
//!
//! DESIGN
//! ======
//! Websocket handlers never touch rooms. They send `Command`s over a bounded
//! channel to one spawned task that owns the `Coordinator`. Cleanup timer
//! firings arrive on a second channel and are handled by the same loop, so a
//! firing can never interleave with a join for the same room.
//!
//! Events from one connection are applied in the order the connection sent
//! them; events for one room are applied in the order the task receives them.

use std::time::Duration;

use frames::{ClientEvent, ConnectionId};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::services::cleanup::{CleanupScheduler, Expiry};
use crate::services::session::{ClientTx, Coordinator};

/// Work item for the dispatch task.
pub enum Command {
    /// Register a new connection's outbound queue.
    Connect { conn: ConnectionId, tx: ClientTx },
    /// An inbound event from a connection.
    Event { conn: ConnectionId, event: ClientEvent },
    /// The connection closed; leave every room it joined.
    Disconnect { conn: ConnectionId },
    /// Report registry counters.
    Stats { reply: oneshot::Sender<Stats> },
}

/// Registry counters reported by `/healthz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub rooms: usize,
    pub connections: usize,
}

/// Cloneable sender side of the dispatch task.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<Command>,
}

impl DispatchHandle {
    /// Returns `false` if the dispatch task has stopped.
    pub async fn connect(&self, conn: ConnectionId, tx: ClientTx) -> bool {
        self.tx.send(Command::Connect { conn, tx }).await.is_ok()
    }

    /// Returns `false` if the dispatch task has stopped.
    pub async fn event(&self, conn: ConnectionId, event: ClientEvent) -> bool {
        self.tx.send(Command::Event { conn, event }).await.is_ok()
    }

    pub async fn disconnect(&self, conn: ConnectionId) {
        if self.tx.send(Command::Disconnect { conn }).await.is_err() {
            debug!(%conn, "disconnect after dispatch task stopped");
        }
    }

    /// `None` if the dispatch task has stopped.
    pub async fn stats(&self) -> Option<Stats> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Stats { reply }).await.ok()?;
        rx.await.ok()
    }
}

/// Spawn the dispatch task with an empty registry.
#[must_use]
pub fn spawn_dispatch(room_ttl: Duration, buffer: usize) -> (DispatchHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(buffer);
    let (scheduler, expiries) = CleanupScheduler::new(room_ttl);
    let task = tokio::spawn(run(Coordinator::new(scheduler), rx, expiries));
    (DispatchHandle { tx }, task)
}

async fn run(
    mut coordinator: Coordinator,
    mut commands: mpsc::Receiver<Command>,
    mut expiries: mpsc::UnboundedReceiver<Expiry>,
) {
    info!("dispatch task started");
    loop {
        tokio::select! {
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                apply(&mut coordinator, cmd);
            }
            Some(expiry) = expiries.recv() => {
                coordinator.expire(&expiry);
            }
        }
    }
    info!("dispatch task stopped");
}

fn apply(coordinator: &mut Coordinator, cmd: Command) {
    match cmd {
        Command::Connect { conn, tx } => coordinator.connect(conn, tx),
        Command::Event { conn, event } => {
            debug!(%conn, event = event.name(), "dispatch event");
            coordinator.handle(conn, event);
        }
        Command::Disconnect { conn } => coordinator.leave(conn),
        Command::Stats { reply } => {
            let stats = Stats { rooms: coordinator.registry().len(), connections: coordinator.connection_count() };
            if reply.send(stats).is_err() {
                debug!("stats requester went away");
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
