use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay::RelayService;
use crate::shared::{AppState, RelayError};
use crate::websockets::messages::{
    ChatMessagePayload, MessageType, PlaybackCommandPayload, PlaybackKind, UpdateUsernamePayload,
    WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
///
/// One dispatch table: each decoded frame maps to exactly one relay
/// operation, handled in transport arrival order.
pub struct WebsocketReceiveHandler {
    relay: Arc<RelayService>,
}

impl WebsocketReceiveHandler {
    pub fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }

    /// Decodes and routes one client frame
    pub async fn dispatch(&self, connection_id: Uuid, message: &str) -> Result<(), RelayError> {
        let ws_message: WebSocketMessage = serde_json::from_str(message)
            .map_err(|e| RelayError::MalformedFrame(e.to_string()))?;

        match ws_message.message_type {
            MessageType::JoinRoom => {
                let room_id = ws_message
                    .payload
                    .as_str()
                    .ok_or_else(|| {
                        RelayError::MalformedFrame("joinRoom payload must be a string".to_string())
                    })?
                    .to_string();
                self.relay.handle_join(connection_id, &room_id).await;
            }
            MessageType::UpdateUsername => {
                let payload: UpdateUsernamePayload = serde_json::from_value(ws_message.payload)
                    .map_err(|e| RelayError::MalformedFrame(e.to_string()))?;
                self.relay
                    .handle_update_username(connection_id, payload.username)
                    .await;
            }
            MessageType::ChatMessage => {
                let payload: ChatMessagePayload = serde_json::from_value(ws_message.payload)
                    .map_err(|e| RelayError::MalformedFrame(e.to_string()))?;
                self.relay
                    .handle_chat(connection_id, &payload.room_id, payload.message)
                    .await;
            }
            MessageType::VideoPlay | MessageType::VideoPause | MessageType::VideoSeek => {
                let kind = match ws_message.message_type {
                    MessageType::VideoPlay => PlaybackKind::Play,
                    MessageType::VideoPause => PlaybackKind::Pause,
                    _ => PlaybackKind::Seek,
                };
                let payload: PlaybackCommandPayload = serde_json::from_value(ws_message.payload)
                    .map_err(|e| RelayError::MalformedFrame(e.to_string()))?;
                self.relay
                    .handle_playback(connection_id, &payload.room_id, kind, payload.current_time)
                    .await;
            }
            MessageType::RoomMessage => {
                debug!(
                    connection_id = %connection_id,
                    "Ignoring server-to-client message type from client"
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: Uuid, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        // Malformed frames are dropped, never answered and never fatal
        if let Err(e) = self.dispatch(connection_id, &message).await {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to handle WebSocket message"
            );
        }
    }
}

/// Routes for the relay: a liveness probe and the WebSocket endpoint
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "watchparty relay" }))
        .route("/ws", get(websocket_handler))
        .with_state(app_state)
}

/// WebSocket endpoint
///
/// GET /ws - no authentication, no room in the path; the client joins a room
/// with a joinRoom frame after the upgrade.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    let connection_id = Uuid::new_v4();

    info!(
        connection_id = %connection_id,
        "WebSocket connection requested"
    );

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, connection_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    connection_id: Uuid,
    app_state: AppState,
) {
    info!(
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (relay -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connections
        .add_connection(connection_id, outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(app_state.relay.clone()));

    let connection = Connection::new(
        connection_id,
        Box::new(socket),
        outbound_receiver,
        message_handler,
        app_state.heartbeat.clone(),
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: purge membership and announce the departure. Every close
    // reason converges here.
    app_state.relay.handle_disconnect(connection_id).await;
}
