pub mod registry;

pub use registry::{InMemoryRoomRegistry, JoinRoomResult, LeaveRoomResult, RoomRegistry};
