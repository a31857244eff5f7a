use std::sync::Arc;
use thiserror::Error;

use crate::relay::RelayService;
use crate::room::registry::RoomRegistry;
use crate::websockets::connection_registry::ConnectionRegistry;
use crate::websockets::HeartbeatConfig;

/// Shared application state containing all dependencies
///
/// Both registries are injected as trait objects so tests can run against
/// isolated instances instead of ambient process-wide tables.
#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<dyn ConnectionRegistry>,
    pub rooms: Arc<dyn RoomRegistry>,
    pub relay: Arc<RelayService>,
    pub heartbeat: HeartbeatConfig,
}

impl AppState {
    pub fn new(
        connections: Arc<dyn ConnectionRegistry>,
        rooms: Arc<dyn RoomRegistry>,
        heartbeat: HeartbeatConfig,
    ) -> Self {
        let relay = Arc::new(RelayService::new(
            Arc::clone(&rooms),
            Arc::clone(&connections),
        ));
        Self {
            connections,
            rooms,
            relay,
            heartbeat,
        }
    }
}

/// Errors raised while decoding client traffic
///
/// These never reach the client and never take the relay down; the dispatch
/// path logs them and drops the frame.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("malformed client frame: {0}")]
    MalformedFrame(String),
}

pub mod test_utils {
    use super::*;
    use crate::room::registry::InMemoryRoomRegistry;
    use crate::websockets::connection_registry::InMemoryConnectionRegistry;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        connections: Option<Arc<dyn ConnectionRegistry>>,
        rooms: Option<Arc<dyn RoomRegistry>>,
        heartbeat: Option<HeartbeatConfig>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                connections: None,
                rooms: None,
                heartbeat: None,
            }
        }

        pub fn with_connections(mut self, connections: Arc<dyn ConnectionRegistry>) -> Self {
            self.connections = Some(connections);
            self
        }

        pub fn with_rooms(mut self, rooms: Arc<dyn RoomRegistry>) -> Self {
            self.rooms = Some(rooms);
            self
        }

        pub fn with_heartbeat(mut self, heartbeat: HeartbeatConfig) -> Self {
            self.heartbeat = Some(heartbeat);
            self
        }

        pub fn build(self) -> AppState {
            AppState::new(
                self.connections
                    .unwrap_or_else(|| Arc::new(InMemoryConnectionRegistry::new())),
                self.rooms
                    .unwrap_or_else(|| Arc::new(InMemoryRoomRegistry::new())),
                self.heartbeat.unwrap_or_default(),
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
