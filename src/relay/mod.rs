pub mod service;

pub use service::{RelayService, JOINED_ANNOUNCEMENT, LEFT_ANNOUNCEMENT};
