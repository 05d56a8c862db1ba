//! WebSocket push stream for one location.
//!
//! Clients connect to `/ws/locations/{location_id}` and receive every
//! [`ServerMessage`] for that location. The stream is one-way; inbound text
//! is ignored.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use skirmish_domain::{DomainEvent, LocationId};
use skirmish_shared::ServerMessage;

use crate::app::App;

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app): State<Arc<App>>,
    Path(location_id): Path<Uuid>,
) -> Response {
    // Subscribe before the handshake completes so nothing published after the
    // client sees the upgrade is missed.
    let events = app.notifications.subscribe();
    let location_id = LocationId::from_uuid(location_id);
    ws.on_upgrade(move |socket| handle_socket(socket, location_id, events))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(
    socket: WebSocket,
    location_id: LocationId,
    mut events: broadcast::Receiver<DomainEvent>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection_id = Uuid::new_v4();

    tracing::info!(
        connection_id = %connection_id,
        location_id = %location_id,
        "WebSocket connection established"
    );

    // Forward this location's notifications to the client
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        skipped,
                        "WebSocket subscriber lagged; notifications dropped"
                    );
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if event.location_id() != location_id {
                continue;
            }

            let msg = ServerMessage::from(&event);
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize server message");
                }
            }
        }
    });

    // Drain inbound frames until the client goes away
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(connection_id = %connection_id, "WebSocket connection closed");
}
