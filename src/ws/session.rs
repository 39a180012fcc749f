use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::utils::scope_guard::ScopeGuard;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle one WebSocket connection from registration to cleanup
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    // Generate unique connection ID to identify this client
    let subscriber_id = Uuid::new_v4().to_string();
    info!("WebSocket connection established with subscriber_id: {}", subscriber_id);

    // Split the socket into sender and receiver
    let (mut sink, mut stream) = socket.split();

    // Outbound queue the registry fans into for this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    app_state.registry.register(&subscriber_id, tx);

    // Unregister on every exit path, exactly once. Dropping the subscriber
    // removes it from all joined channels.
    let cleanup_registry = app_state.registry.clone();
    let cleanup_id = subscriber_id.clone();
    let _cleanup = ScopeGuard::new(move || cleanup_registry.unregister(&cleanup_id));

    // Forward queued broadcasts to the client until it goes away
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Process incoming client messages. Non-text frames and unparseable
    // payloads are skipped; the stream ending terminates the session.
    let recv_state = app_state.clone();
    let recv_id = subscriber_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(Message::Text(msg))) = stream.next().await {
            let client_msg: ClientMessage = match serde_json::from_str(&msg) {
                Ok(client_msg) => client_msg,
                Err(e) => {
                    error!("Failed to parse message from {}: {}", recv_id, e);
                    continue;
                }
            };

            match client_msg {
                ClientMessage::JoinChannel(join) => {
                    recv_state.registry.join(&join.note_id, &recv_id);
                }
                ClientMessage::LeaveChannel(leave) => {
                    recv_state.registry.leave(&leave.note_id, &recv_id);
                }
                ClientMessage::ContentUpdated(update) => {
                    if let Err(e) = recv_state
                        .broadcaster
                        .update_note(&update.note_id, &update.content, Some(&recv_id))
                        .await
                    {
                        error!(
                            "Content update from {} for note {} failed: {}",
                            recv_id, update.note_id, e
                        );
                    }
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    info!("WebSocket connection {} terminated", subscriber_id);
}
