//! Peer-side pieces: the reconciler that applies remote playback events to a
//! local player without feeding them back, and the session handle UI code
//! emits through.

pub mod reconciler;
pub mod session;

pub use reconciler::{
    PlaybackError, PlaybackSurface, PlayerState, Reconciler, SEEK_DAMPENING_SECS,
};
pub use session::{ClientSession, SessionClosed};
