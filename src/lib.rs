// Library crate for the watchparty relay
// This file exposes the public API for integration tests

pub mod client;
pub mod relay;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use client::{ClientSession, PlaybackSurface, Reconciler};
pub use relay::{RelayService, JOINED_ANNOUNCEMENT, LEFT_ANNOUNCEMENT};
pub use room::{registry::InMemoryRoomRegistry, registry::RoomRegistry};
pub use shared::{AppState, RelayError};
pub use websockets::{
    ConnectionRegistry, InMemoryConnectionRegistry, MessageHandler, MessageType, PlaybackEvent,
    PlaybackKind, WebSocketMessage, WebsocketReceiveHandler,
};
