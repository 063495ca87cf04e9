//! Real-time event stream
//!
//! `GET /api/v1/events/ws` upgrades to a WebSocket over which the server
//! pushes every committed [`ChangeEvent`] as a JSON frame tagged with
//! `type`. Delivery is at-most-once with no replay: a client that
//! connects late or falls behind misses events and catches up by
//! re-reading `GET /items`.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use domain_lifecycle::ChangeEvent;

use crate::AppState;

/// Upgrades the connection and attaches it to the event hub
pub async fn events_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let rx = state.hub.subscribe();
    ws.on_upgrade(move |socket| event_loop(socket, rx))
}

async fn event_loop(mut socket: WebSocket, mut rx: broadcast::Receiver<ChangeEvent>) {
    debug!("event stream subscriber connected");

    loop {
        tokio::select! {
            event = rx.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Closed) => break,
                    // Lagging subscribers skip the missed events
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event stream subscriber lagged");
                        continue;
                    }
                };
                let frame = match serde_json::to_string(&event) {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        warn!(error = %e, "failed to serialize change event");
                        continue;
                    }
                };
                if socket.send(frame).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Client frames carry no protocol meaning
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "event stream socket error");
                        break;
                    }
                }
            }
        }
    }

    debug!("event stream subscriber disconnected");
}
