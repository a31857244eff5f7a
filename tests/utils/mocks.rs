use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use watchparty::websockets::{default_display_name, ConnectionInfo, ConnectionRegistry};

// ============================================================================
// Mock Infrastructure
// ============================================================================

struct MockEntry {
    display_name: String,
    current_room: Option<String>,
}

/// Connection registry that records every delivered message instead of
/// writing to a socket
#[derive(Clone)]
pub struct MockConnectionRegistry {
    entries: Arc<RwLock<HashMap<Uuid, MockEntry>>>,
    sent_messages: Arc<RwLock<HashMap<Uuid, Vec<String>>>>,
}

impl MockConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_messages_for(&self, connection_id: Uuid) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(&connection_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }

    pub async fn is_connected(&self, connection_id: Uuid) -> bool {
        self.entries.read().await.contains_key(&connection_id)
    }
}

#[async_trait]
impl ConnectionRegistry for MockConnectionRegistry {
    async fn add_connection(&self, connection_id: Uuid, _sender: mpsc::UnboundedSender<String>) {
        self.entries.write().await.insert(
            connection_id,
            MockEntry {
                display_name: default_display_name(connection_id),
                current_room: None,
            },
        );
    }

    async fn remove_connection(&self, connection_id: Uuid) -> Option<ConnectionInfo> {
        self.entries
            .write()
            .await
            .remove(&connection_id)
            .map(|entry| ConnectionInfo {
                display_name: entry.display_name,
                current_room: entry.current_room,
            })
    }

    async fn set_display_name(&self, connection_id: Uuid, name: String) {
        if let Some(entry) = self.entries.write().await.get_mut(&connection_id) {
            entry.display_name = name;
        }
    }

    async fn display_name(&self, connection_id: Uuid) -> Option<String> {
        self.entries
            .read()
            .await
            .get(&connection_id)
            .map(|entry| entry.display_name.clone())
    }

    async fn set_current_room(&self, connection_id: Uuid, room_id: Option<String>) {
        if let Some(entry) = self.entries.write().await.get_mut(&connection_id) {
            entry.current_room = room_id;
        }
    }

    async fn current_room(&self, connection_id: Uuid) -> Option<String> {
        self.entries
            .read()
            .await
            .get(&connection_id)
            .and_then(|entry| entry.current_room.clone())
    }

    async fn send_to(&self, connection_id: Uuid, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id)
            .or_default()
            .push(message.to_string());
    }

    async fn send_to_many(&self, connection_ids: &[Uuid], message: &str) {
        for connection_id in connection_ids {
            self.send_to(*connection_id, message).await;
        }
    }
}
