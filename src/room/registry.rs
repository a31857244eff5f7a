use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Result of attempting to join a room
#[derive(Debug, Clone, PartialEq)]
pub enum JoinRoomResult {
    /// Joined the room; lists the members that were present before the join
    Joined { others: Vec<Uuid> },
    /// Connection was already a member, nothing changed
    AlreadyMember,
}

/// Result of attempting to leave a room
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveRoomResult {
    /// Left the room; lists the members that remain
    Left { remaining: Vec<Uuid> },
    /// Left and the room was deleted because no members remain
    RoomDeleted,
    /// Connection was not a member of the room
    NotAMember,
}

/// Trait for room membership operations
///
/// Rooms are created lazily on first join and deleted when the last member
/// leaves. Membership is the only state; no history is retained.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Adds the connection to the room's member set, creating the room if absent
    async fn join(&self, room_id: &str, connection_id: Uuid) -> JoinRoomResult;

    /// Removes the connection from the room's member set
    async fn leave(&self, room_id: &str, connection_id: Uuid) -> LeaveRoomResult;

    /// Returns the current member set, in no particular order
    async fn members_of(&self, room_id: &str) -> Vec<Uuid>;

    /// Whether the room currently exists
    async fn contains_room(&self, room_id: &str) -> bool;

    /// Number of live rooms
    async fn room_count(&self) -> usize;
}

/// In-memory implementation of RoomRegistry
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<String, HashSet<Uuid>>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    /// Creates a new empty in-memory registry
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn join(&self, room_id: &str, connection_id: Uuid) -> JoinRoomResult {
        let mut rooms = self.rooms.lock().unwrap();

        let members = rooms.entry(room_id.to_string()).or_default();

        if members.contains(&connection_id) {
            debug!(room_id = %room_id, connection_id = %connection_id, "Connection already in room");
            return JoinRoomResult::AlreadyMember;
        }

        let others: Vec<Uuid> = members.iter().copied().collect();
        members.insert(connection_id);

        info!(
            room_id = %room_id,
            connection_id = %connection_id,
            member_count = members.len(),
            "Connection joined room"
        );

        JoinRoomResult::Joined { others }
    }

    #[instrument(skip(self))]
    async fn leave(&self, room_id: &str, connection_id: Uuid) -> LeaveRoomResult {
        let mut rooms = self.rooms.lock().unwrap();

        let members = match rooms.get_mut(room_id) {
            Some(members) => members,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return LeaveRoomResult::NotAMember;
            }
        };

        if !members.remove(&connection_id) {
            debug!(room_id = %room_id, connection_id = %connection_id, "Connection not in room");
            return LeaveRoomResult::NotAMember;
        }

        // Room teardown: empty rooms are not kept around
        if members.is_empty() {
            info!(room_id = %room_id, "Room is now empty, deleting");
            rooms.remove(room_id);
            return LeaveRoomResult::RoomDeleted;
        }

        let remaining: Vec<Uuid> = members.iter().copied().collect();

        info!(
            room_id = %room_id,
            connection_id = %connection_id,
            member_count = remaining.len(),
            "Connection left room"
        );

        LeaveRoomResult::Left { remaining }
    }

    async fn members_of(&self, room_id: &str) -> Vec<Uuid> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.lock().unwrap().contains_key(room_id)
    }

    async fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
