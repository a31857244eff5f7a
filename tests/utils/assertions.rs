//! Test assertion helpers - fluent API for verifying fan-out expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use watchparty::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    participants: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for specific participants
    pub fn for_participants(setup: &'a TestSetup, participants: Vec<&'a str>) -> Self {
        Self {
            setup,
            participants,
        }
    }

    /// Assert that each participant received exactly one roomMessage with the
    /// given name and text
    pub async fn received_room_message(self, username: &str, message: &str) {
        for participant in &self.participants {
            let room_messages = self.room_messages_for(participant).await;
            assert_eq!(
                room_messages.len(),
                1,
                "{} should have received exactly one roomMessage, got {:?}",
                participant,
                room_messages
            );
            let payload = &room_messages[0];
            assert_eq!(
                payload.get("username").and_then(|v| v.as_str()),
                Some(username),
                "{} saw the wrong sender name",
                participant
            );
            assert_eq!(
                payload.get("message").and_then(|v| v.as_str()),
                Some(message),
                "{} saw the wrong message text",
                participant
            );
        }
    }

    /// Assert that each participant received exactly one playback event of
    /// the given type, carrying the given position and no roomId
    pub async fn received_playback(self, expected_type: MessageType, current_time: f64) {
        for participant in &self.participants {
            let messages = self.parsed_messages_for(participant).await;
            let playback: Vec<&WebSocketMessage> = messages
                .iter()
                .filter(|m| m.message_type == expected_type)
                .collect();
            assert_eq!(
                playback.len(),
                1,
                "{} should have received exactly one {:?}",
                participant,
                expected_type
            );
            let payload = &playback[0].payload;
            assert_eq!(
                payload.get("currentTime").and_then(|v| v.as_f64()),
                Some(current_time),
                "{} saw the wrong position",
                participant
            );
            assert!(
                payload.get("roomId").is_none(),
                "roomId must be stripped on rebroadcast"
            );
        }
    }

    /// Assert that the participants received nothing at all
    pub async fn received_no_messages(self) {
        for participant in &self.participants {
            let messages = self
                .setup
                .connections
                .get_messages_for(self.setup.id_of(participant))
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                participant,
                messages
            );
        }
    }

    /// Count how many messages of a specific type a participant received
    pub async fn count_message_type(&self, participant: &str, msg_type: MessageType) -> usize {
        self.parsed_messages_for(participant)
            .await
            .iter()
            .filter(|m| m.message_type == msg_type)
            .count()
    }

    async fn parsed_messages_for(&self, participant: &str) -> Vec<WebSocketMessage> {
        self.setup
            .connections
            .get_messages_for(self.setup.id_of(participant))
            .await
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect()
    }

    async fn room_messages_for(&self, participant: &str) -> Vec<serde_json::Value> {
        self.parsed_messages_for(participant)
            .await
            .into_iter()
            .filter(|m| m.message_type == MessageType::RoomMessage)
            .map(|m| m.payload)
            .collect()
    }
}
