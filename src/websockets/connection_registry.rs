use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Display name and room held by a connection at the moment it was removed
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub display_name: String,
    pub current_room: Option<String>,
}

/// Derives the default display name a connection carries until it is
/// explicitly renamed
pub fn default_display_name(connection_id: Uuid) -> String {
    let id = connection_id.simple().to_string();
    format!("user-{}", &id[..8])
}

/// Trait for the per-connection identity and delivery table
///
/// A connection's entry exists from transport accept to transport close.
/// Display names carry no uniqueness constraint; connections are identified
/// by id, the name is presentation-only.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    async fn add_connection(&self, connection_id: Uuid, sender: mpsc::UnboundedSender<String>);

    /// Removes the connection, returning the identity it held at departure
    async fn remove_connection(&self, connection_id: Uuid) -> Option<ConnectionInfo>;

    /// Replaces the display name unconditionally, any number of times
    async fn set_display_name(&self, connection_id: Uuid, name: String);

    async fn display_name(&self, connection_id: Uuid) -> Option<String>;

    /// Records which room the connection currently occupies
    async fn set_current_room(&self, connection_id: Uuid, room_id: Option<String>);

    async fn current_room(&self, connection_id: Uuid) -> Option<String>;

    /// Fire-and-forget delivery to one connection
    async fn send_to(&self, connection_id: Uuid, message: &str);

    /// Fire-and-forget delivery to several connections
    async fn send_to_many(&self, connection_ids: &[Uuid], message: &str);
}

struct ConnectionEntry {
    sender: mpsc::UnboundedSender<String>,
    display_name: String,
    current_room: Option<String>,
}

/// In-memory implementation of ConnectionRegistry
pub struct InMemoryConnectionRegistry {
    // connection id -> entry
    connections: Arc<RwLock<HashMap<Uuid, ConnectionEntry>>>,
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add_connection(&self, connection_id: Uuid, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(
            connection_id,
            ConnectionEntry {
                sender,
                display_name: default_display_name(connection_id),
                current_room: None,
            },
        );
    }

    async fn remove_connection(&self, connection_id: Uuid) -> Option<ConnectionInfo> {
        let mut connections = self.connections.write().await;
        connections.remove(&connection_id).map(|entry| ConnectionInfo {
            display_name: entry.display_name,
            current_room: entry.current_room,
        })
    }

    async fn set_display_name(&self, connection_id: Uuid, name: String) {
        let mut connections = self.connections.write().await;
        if let Some(entry) = connections.get_mut(&connection_id) {
            entry.display_name = name;
        }
    }

    async fn display_name(&self, connection_id: Uuid) -> Option<String> {
        let connections = self.connections.read().await;
        connections
            .get(&connection_id)
            .map(|entry| entry.display_name.clone())
    }

    async fn set_current_room(&self, connection_id: Uuid, room_id: Option<String>) {
        let mut connections = self.connections.write().await;
        if let Some(entry) = connections.get_mut(&connection_id) {
            entry.current_room = room_id;
        }
    }

    async fn current_room(&self, connection_id: Uuid) -> Option<String> {
        let connections = self.connections.read().await;
        connections
            .get(&connection_id)
            .and_then(|entry| entry.current_room.clone())
    }

    async fn send_to(&self, connection_id: Uuid, message: &str) {
        let connections = self.connections.read().await;
        if let Some(entry) = connections.get(&connection_id) {
            let _ = entry.sender.send(message.to_string());
        }
    }

    async fn send_to_many(&self, connection_ids: &[Uuid], message: &str) {
        let connections = self.connections.read().await;
        for connection_id in connection_ids {
            if let Some(entry) = connections.get(connection_id) {
                let _ = entry.sender.send(message.to_string());
            }
        }
    }
}
