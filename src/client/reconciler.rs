use thiserror::Error;
use tracing::{debug, error};

use crate::websockets::messages::{PlaybackEvent, PlaybackKind};

/// Minimum position difference before a local seek is re-broadcast
///
/// A remote seek lands on the local player and the player reports it back as
/// a seeked notification; without this bound the reconciler would re-emit the
/// very event it just applied and every participant would relay it forever.
pub const SEEK_DAMPENING_SECS: f64 = 0.2;

/// Raised when the playback surface refuses to start (the HTML5 `play()`
/// promise rejection analog)
#[derive(Error, Debug)]
#[error("playback start rejected: {0}")]
pub struct PlaybackError(pub String);

/// The playback primitives the reconciler drives
///
/// Seeked notifications flow the other way: the embedding feeds them into
/// [`Reconciler::on_seeking`] / [`Reconciler::on_seeked`].
pub trait PlaybackSurface {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn set_position(&mut self, seconds: f64);
    fn position(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
    Seeking,
}

/// Applies remote playback events to the local player and decides which
/// local actions are worth emitting upstream
///
/// Every method returning a [`PlaybackEvent`] expects the caller to send it
/// through the client session; the reconciler itself owns no transport.
pub struct Reconciler<S: PlaybackSurface> {
    surface: S,
    state: PlayerState,
    resume_after_seek: PlayerState,
    last_reconciled: f64,
}

impl<S: PlaybackSurface> Reconciler<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: PlayerState::Idle,
            resume_after_seek: PlayerState::Idle,
            last_reconciled: 0.0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Applies an event relayed from another participant. Never re-emits.
    pub fn apply_remote(&mut self, event: PlaybackEvent) {
        match event.kind {
            PlaybackKind::Play => {
                self.surface.set_position(event.current_time);
                if self.state != PlayerState::Playing {
                    if let Err(e) = self.surface.play() {
                        error!(error = %e, "Remote play rejected by surface");
                    }
                }
                self.state = PlayerState::Playing;
            }
            PlaybackKind::Pause => {
                self.surface.set_position(event.current_time);
                if self.state == PlayerState::Playing {
                    self.surface.pause();
                }
                self.state = PlayerState::Paused;
            }
            PlaybackKind::Seek => {
                // Position only; play/pause state stays as it is. Recording
                // the time arms the dampening check against the seeked
                // notification this set_position will trigger.
                self.surface.set_position(event.current_time);
                self.last_reconciled = event.current_time;
            }
        }
    }

    /// The user pressed play: apply locally, emit once
    pub fn local_play(&mut self) -> PlaybackEvent {
        let event = PlaybackEvent::new(PlaybackKind::Play, self.surface.position());
        if let Err(e) = self.surface.play() {
            error!(error = %e, "Local play rejected by surface");
        }
        self.state = PlayerState::Playing;
        event
    }

    /// The user pressed pause: apply locally, emit once
    pub fn local_pause(&mut self) -> PlaybackEvent {
        let event = PlaybackEvent::new(PlaybackKind::Pause, self.surface.position());
        self.surface.pause();
        self.state = PlayerState::Paused;
        event
    }

    /// The user skipped by a fixed amount: apply locally, emit exactly one
    /// seek for the whole discrete action
    pub fn local_skip(&mut self, delta_seconds: f64) -> PlaybackEvent {
        let target = self.surface.position() + delta_seconds;
        self.surface.set_position(target);
        self.last_reconciled = target;
        PlaybackEvent::new(PlaybackKind::Seek, target)
    }

    /// The surface reports a timeline drag has started
    pub fn on_seeking(&mut self) {
        if self.state != PlayerState::Seeking {
            self.resume_after_seek = self.state;
            self.state = PlayerState::Seeking;
        }
    }

    /// The surface reports the timeline has settled at `position`
    ///
    /// Emits a seek only when the position moved further than the dampening
    /// threshold from the last reconciled time; anything closer is the echo
    /// of a seek we just applied.
    pub fn on_seeked(&mut self, position: f64) -> Option<PlaybackEvent> {
        if self.state == PlayerState::Seeking {
            self.state = self.resume_after_seek;
        }

        let diff = (position - self.last_reconciled).abs();
        if diff > SEEK_DAMPENING_SECS {
            self.last_reconciled = position;
            Some(PlaybackEvent::new(PlaybackKind::Seek, position))
        } else {
            debug!(
                position = position,
                diff = diff,
                "Seeked within dampening threshold, not re-emitting"
            );
            None
        }
    }
}
