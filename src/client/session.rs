use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::websockets::messages::{PlaybackEvent, WebSocketMessage};

/// The transport side of the session went away
#[derive(Error, Debug, PartialEq, Eq)]
#[error("client session closed")]
pub struct SessionClosed;

/// One participant's handle on the relay
///
/// Explicitly owned and reference counted: UI components clone the `Arc`
/// they are handed instead of reaching for a shared global socket. The
/// receiving half of the channel belongs to the transport glue that writes
/// frames to the wire; when the last clone drops, the channel closes and the
/// transport shuts down.
pub struct ClientSession {
    outbound: mpsc::UnboundedSender<WebSocketMessage>,
    room_id: String,
}

impl ClientSession {
    /// Opens a session into `room_id`, immediately emitting the join frame
    pub fn connect(
        outbound: mpsc::UnboundedSender<WebSocketMessage>,
        room_id: String,
    ) -> Result<Arc<Self>, SessionClosed> {
        let session = Self {
            outbound,
            room_id,
        };
        session.emit(WebSocketMessage::join_room(session.room_id.clone()))?;
        Ok(Arc::new(session))
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Replaces the display name; may be called before or after any other
    /// traffic and takes effect immediately
    pub fn set_username(&self, username: String) -> Result<(), SessionClosed> {
        self.emit(WebSocketMessage::update_username(username))
    }

    /// Sends a chat line. Blank input never leaves the client.
    pub fn send_chat(&self, message: String) -> Result<(), SessionClosed> {
        if message.trim().is_empty() {
            debug!("Dropping blank chat message");
            return Ok(());
        }
        self.emit(WebSocketMessage::chat_message(self.room_id.clone(), message))
    }

    /// Sends a playback-control event produced by the reconciler
    pub fn emit_playback(&self, event: PlaybackEvent) -> Result<(), SessionClosed> {
        self.emit(WebSocketMessage::playback_command(
            self.room_id.clone(),
            event,
        ))
    }

    fn emit(&self, message: WebSocketMessage) -> Result<(), SessionClosed> {
        self.outbound.send(message).map_err(|_| SessionClosed)
    }
}
