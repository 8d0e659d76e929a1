//! WebSocket handler: bidirectional event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection ID, registers an outbound queue with
//! the dispatch task, and enters a `select!` loop:
//! - Incoming text messages → decode `ClientEvent` → dispatch task
//! - Events queued for this connection → encode → socket
//!
//! The handler holds no room state. Malformed messages are logged and
//! dropped; they never reach the registry.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → `Connect`
//! 2. Client messages → `Event` (join-room, draw, cursor-move, clear)
//! 3. Close or socket error → `Disconnect` → leave every joined room

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let conn = Uuid::new_v4();

    // Per-connection queue the dispatch task relays into.
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(state.client_buffer);
    if !state.dispatch.connect(conn, client_tx).await {
        warn!(%conn, "ws: dispatch unavailable; closing");
        return;
    }

    info!(%conn, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let Some(event) = parse_inbound(conn, text.as_str()) else { continue };
                        if !state.dispatch.event(conn, event).await {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, conn, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    state.dispatch.disconnect(conn).await;
    info!(%conn, "ws: client disconnected");
}

// =============================================================================
// HELPERS
// =============================================================================

/// Decode one inbound text message. Malformed input is logged and dropped.
fn parse_inbound(conn: ConnectionId, text: &str) -> Option<ClientEvent> {
    match frames::decode::<ClientEvent>(text) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(%conn, error = %e, "ws: invalid inbound message");
            None
        }
    }
}

async fn send_event(socket: &mut WebSocket, conn: ConnectionId, event: &ServerEvent) -> Result<(), ()> {
    let json = match frames::encode(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(%conn, error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
