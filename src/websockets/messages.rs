use serde::{Deserialize, Serialize};

/// Message types for WebSocket communication
///
/// The serde renames are the wire contract; `video:*` events flow in both
/// directions with different payloads (client frames carry `roomId`, relayed
/// frames do not).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    // Client -> Server
    #[serde(rename = "joinRoom")]
    JoinRoom,
    #[serde(rename = "updateUsername")]
    UpdateUsername,
    #[serde(rename = "chatMessage")]
    ChatMessage,

    // Server -> Client (chat echo and join/leave announcements)
    #[serde(rename = "roomMessage")]
    RoomMessage,

    // Both directions
    #[serde(rename = "video:play")]
    VideoPlay,
    #[serde(rename = "video:pause")]
    VideoPause,
    #[serde(rename = "video:seek")]
    VideoSeek,
}

/// The three playback-control actions a participant can take
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaybackKind {
    Play,
    Pause,
    Seek,
}

impl PlaybackKind {
    /// Wire message type this action travels as
    pub fn message_type(&self) -> MessageType {
        match self {
            PlaybackKind::Play => MessageType::VideoPlay,
            PlaybackKind::Pause => MessageType::VideoPause,
            PlaybackKind::Seek => MessageType::VideoSeek,
        }
    }
}

/// A playback-control event: the position the sender intended at emission time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackEvent {
    pub kind: PlaybackKind,
    pub current_time: f64,
}

impl PlaybackEvent {
    pub fn new(kind: PlaybackKind, current_time: f64) -> Self {
        Self { kind, current_time }
    }
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsernamePayload {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub message: String,
}

/// Playback frames as sent by a client; the relay strips `roomId` on rebroadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackCommandPayload {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "currentTime")]
    pub current_time: f64,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMessagePayload {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSyncPayload {
    #[serde(rename = "currentTime")]
    pub current_time: f64,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
        }
    }

    /// Create a joinRoom frame; the payload is the bare room id string
    pub fn join_room(room_id: String) -> Self {
        Self::new(MessageType::JoinRoom, serde_json::Value::String(room_id))
    }

    /// Create an updateUsername frame
    pub fn update_username(username: String) -> Self {
        let payload = UpdateUsernamePayload { username };
        Self::new(
            MessageType::UpdateUsername,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a chatMessage frame (client side)
    pub fn chat_message(room_id: String, message: String) -> Self {
        let payload = ChatMessagePayload { room_id, message };
        Self::new(
            MessageType::ChatMessage,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a roomMessage frame carrying chat text or an announcement
    pub fn room_message(username: String, message: String) -> Self {
        let payload = RoomMessagePayload { username, message };
        Self::new(
            MessageType::RoomMessage,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a client-side video:play / video:pause / video:seek frame
    pub fn playback_command(room_id: String, event: PlaybackEvent) -> Self {
        let payload = PlaybackCommandPayload {
            room_id,
            current_time: event.current_time,
        };
        Self::new(
            event.kind.message_type(),
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create the relayed form of a playback event, with `roomId` stripped
    pub fn playback_sync(kind: PlaybackKind, current_time: f64) -> Self {
        let payload = PlaybackSyncPayload { current_time };
        Self::new(kind.message_type(), serde_json::to_value(payload).unwrap())
    }
}
