use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use watchparty::shared::test_utils::AppStateBuilder;
use watchparty::shared::AppState;
use watchparty::websockets::{ConnectionRegistry, PlaybackEvent, PlaybackKind, WebSocketMessage};
use watchparty::MessageHandler;
use watchparty::WebsocketReceiveHandler;

use super::mocks::MockConnectionRegistry;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub connections: Arc<MockConnectionRegistry>,
    pub input_handler: WebsocketReceiveHandler,
    participants: HashMap<String, Uuid>,
}

pub struct TestSetupBuilder {
    participants: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            participants: vec![],
        }
    }

    pub fn with_participants(mut self, participants: Vec<&str>) -> Self {
        self.participants = participants.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_participants(self) -> Self {
        self.with_participants(vec!["alice", "bob"])
    }

    pub fn with_three_participants(self) -> Self {
        self.with_participants(vec!["alice", "bob", "charlie"])
    }

    pub async fn build(self) -> TestSetup {
        let connections = Arc::new(MockConnectionRegistry::new());
        let state = AppStateBuilder::new()
            .with_connections(connections.clone())
            .build();
        let input_handler = WebsocketReceiveHandler::new(state.relay.clone());

        let mut participants = HashMap::new();
        for name in &self.participants {
            let id = Uuid::new_v4();
            // The mock never writes to this channel, it only records
            let (sender, _receiver) = mpsc::unbounded_channel();
            state.connections.add_connection(id, sender).await;
            input_handler
                .handle_message(
                    id,
                    serde_json::to_string(&WebSocketMessage::update_username(name.clone()))
                        .unwrap(),
                )
                .await;
            participants.insert(name.clone(), id);
        }

        TestSetup {
            state,
            connections,
            input_handler,
            participants,
        }
    }
}

impl TestSetup {
    pub fn id_of(&self, name: &str) -> Uuid {
        *self
            .participants
            .get(name)
            .unwrap_or_else(|| panic!("unknown participant: {}", name))
    }

    /// Feeds a raw frame through the full decode-and-dispatch path
    pub async fn send_raw(&self, name: &str, raw: &str) {
        self.input_handler
            .handle_message(self.id_of(name), raw.to_string())
            .await;
    }

    pub async fn send_join(&self, name: &str, room_id: &str) {
        let frame = WebSocketMessage::join_room(room_id.to_string());
        self.send_raw(name, &serde_json::to_string(&frame).unwrap())
            .await;
    }

    pub async fn send_username(&self, name: &str, username: &str) {
        let frame = WebSocketMessage::update_username(username.to_string());
        self.send_raw(name, &serde_json::to_string(&frame).unwrap())
            .await;
    }

    pub async fn send_chat(&self, name: &str, room_id: &str, message: &str) {
        let frame = WebSocketMessage::chat_message(room_id.to_string(), message.to_string());
        self.send_raw(name, &serde_json::to_string(&frame).unwrap())
            .await;
    }

    pub async fn send_playback(&self, name: &str, room_id: &str, kind: PlaybackKind, time: f64) {
        let frame = WebSocketMessage::playback_command(
            room_id.to_string(),
            PlaybackEvent::new(kind, time),
        );
        self.send_raw(name, &serde_json::to_string(&frame).unwrap())
            .await;
    }

    /// Drives the same path the connection task takes on transport loss
    pub async fn disconnect(&self, name: &str) {
        self.state.relay.handle_disconnect(self.id_of(name)).await;
    }

    pub async fn clear_messages(&self) {
        self.connections.clear_messages().await;
    }
}
