use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::room::registry::{JoinRoomResult, LeaveRoomResult, RoomRegistry};
use crate::websockets::connection_registry::ConnectionRegistry;
use crate::websockets::messages::{PlaybackKind, WebSocketMessage};

/// Sentinel text carried in a roomMessage when a participant arrives
pub const JOINED_ANNOUNCEMENT: &str = "has joined the room";
/// Sentinel text carried in a roomMessage when a participant departs
pub const LEFT_ANNOUNCEMENT: &str = "has left the room";

/// Routes chat and playback events to the correct subset of a room's members
///
/// Fan-out rules:
/// - chat is echoed to every member of the room, sender included, so the
///   sender's UI renders the message identically to everyone else's
/// - playback control goes to every member except the sender, whose player
///   already reflects the change locally
///
/// Delivery is fire-and-forget, at most once, with no ordering guarantee
/// across recipients and no replay for late joiners.
pub struct RelayService {
    rooms: Arc<dyn RoomRegistry>,
    connections: Arc<dyn ConnectionRegistry>,
}

impl RelayService {
    pub fn new(rooms: Arc<dyn RoomRegistry>, connections: Arc<dyn ConnectionRegistry>) -> Self {
        Self { rooms, connections }
    }

    /// Moves the sender into `room_id` and announces the arrival to the
    /// members already present.
    ///
    /// Membership is exclusive: a connection that re-joins from another room
    /// is first removed there, and that room's remaining members receive a
    /// departure announcement.
    pub async fn handle_join(&self, sender: Uuid, room_id: &str) {
        if room_id.is_empty() {
            warn!(connection_id = %sender, "Ignoring join with empty room id");
            return;
        }

        let display_name = match self.connections.display_name(sender).await {
            Some(name) => name,
            None => {
                warn!(connection_id = %sender, "Join from unknown connection");
                return;
            }
        };

        if let Some(previous) = self.connections.current_room(sender).await {
            if previous != room_id {
                self.depart_room(sender, &previous, &display_name).await;
            }
        }

        match self.rooms.join(room_id, sender).await {
            JoinRoomResult::Joined { others } => {
                self.connections
                    .set_current_room(sender, Some(room_id.to_string()))
                    .await;

                info!(
                    room_id = %room_id,
                    connection_id = %sender,
                    display_name = %display_name,
                    "Connection joined room"
                );

                let announcement = WebSocketMessage::room_message(
                    display_name,
                    JOINED_ANNOUNCEMENT.to_string(),
                );
                self.broadcast(&others, &announcement).await;
            }
            JoinRoomResult::AlreadyMember => {
                debug!(
                    room_id = %room_id,
                    connection_id = %sender,
                    "Join ignored, connection already in room"
                );
            }
        }
    }

    /// Replaces the sender's display name. Takes effect immediately, emits
    /// nothing.
    pub async fn handle_update_username(&self, sender: Uuid, username: String) {
        debug!(
            connection_id = %sender,
            username = %username,
            "Updating display name"
        );
        self.connections.set_display_name(sender, username).await;
    }

    /// Broadcasts a chat message to every member of `room_id`, sender
    /// included, with the sender's current display name attached.
    pub async fn handle_chat(&self, sender: Uuid, room_id: &str, message: String) {
        if message.is_empty() {
            debug!(connection_id = %sender, "Ignoring empty chat message");
            return;
        }

        let display_name = match self.connections.display_name(sender).await {
            Some(name) => name,
            None => {
                warn!(connection_id = %sender, "Chat from unknown connection");
                return;
            }
        };

        info!(
            room_id = %room_id,
            connection_id = %sender,
            display_name = %display_name,
            "Relaying chat message"
        );

        let members = self.rooms.members_of(room_id).await;
        let chat = WebSocketMessage::room_message(display_name, message);
        self.broadcast(&members, &chat).await;
    }

    /// Rebroadcasts a playback-control event to every member of `room_id`
    /// except the sender, with `roomId` stripped from the payload.
    pub async fn handle_playback(
        &self,
        sender: Uuid,
        room_id: &str,
        kind: PlaybackKind,
        current_time: f64,
    ) {
        debug!(
            room_id = %room_id,
            connection_id = %sender,
            kind = ?kind,
            current_time = current_time,
            "Relaying playback event"
        );

        let recipients: Vec<Uuid> = self
            .rooms
            .members_of(room_id)
            .await
            .into_iter()
            .filter(|member| *member != sender)
            .collect();

        let sync = WebSocketMessage::playback_sync(kind, current_time);
        self.broadcast(&recipients, &sync).await;
    }

    /// Purges the sender's membership after transport loss and announces the
    /// departure to the remaining members, using the display name held at the
    /// moment of departure. The announcement is only emitted if the
    /// connection had joined a room.
    pub async fn handle_disconnect(&self, sender: Uuid) {
        let info = match self.connections.remove_connection(sender).await {
            Some(info) => info,
            None => {
                debug!(connection_id = %sender, "Disconnect for unregistered connection");
                return;
            }
        };

        info!(
            connection_id = %sender,
            display_name = %info.display_name,
            room_id = ?info.current_room,
            "Connection disconnected"
        );

        if let Some(room_id) = info.current_room {
            self.depart_room(sender, &room_id, &info.display_name).await;
        }
    }

    /// Removes the sender from one room and announces it there
    async fn depart_room(&self, sender: Uuid, room_id: &str, display_name: &str) {
        match self.rooms.leave(room_id, sender).await {
            LeaveRoomResult::Left { remaining } => {
                let announcement = WebSocketMessage::room_message(
                    display_name.to_string(),
                    LEFT_ANNOUNCEMENT.to_string(),
                );
                self.broadcast(&remaining, &announcement).await;
            }
            LeaveRoomResult::RoomDeleted => {
                debug!(room_id = %room_id, "Last member left, room deleted");
            }
            LeaveRoomResult::NotAMember => {
                debug!(
                    room_id = %room_id,
                    connection_id = %sender,
                    "Departure for connection that was not a member"
                );
            }
        }
    }

    /// Serializes once and delivers to each recipient, best effort
    async fn broadcast(&self, recipients: &[Uuid], message: &WebSocketMessage) {
        if recipients.is_empty() {
            return;
        }
        match serde_json::to_string(message) {
            Ok(message_json) => {
                self.connections
                    .send_to_many(recipients, &message_json)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize outbound message");
            }
        }
    }
}
