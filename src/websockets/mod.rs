// Public API
pub use connection_registry::{
    default_display_name, ConnectionInfo, ConnectionRegistry, InMemoryConnectionRegistry,
};
pub use handler::{router, websocket_handler, WebsocketReceiveHandler};
pub use messages::{MessageType, PlaybackEvent, PlaybackKind, WebSocketMessage};
pub use socket::{HeartbeatConfig, MessageHandler, SocketWrapper};

// Internal modules
pub mod connection_registry;
mod handler;
pub mod messages;
mod socket;
