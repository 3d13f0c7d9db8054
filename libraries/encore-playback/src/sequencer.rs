//! Load sequencing
//!
//! Orchestrates swapping the transport's source. Every load, cancel, or
//! reset mints a new [`SessionId`]; a pending autoplay continuation only
//! fires when the ready signal carries the session that is still current.
//! Suppression of errors during a cancel is a state (`Cancelling`), not a
//! side flag.

use crate::types::SessionId;
use encore_core::TrackId;
use tracing::debug;

/// A load waiting for its ready signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    /// Session the load was issued under
    pub session: SessionId,

    /// Start playback once ready
    pub autoplay: bool,

    /// Track being loaded
    pub track: TrackId,

    /// Last committed selection, restored if the load is cancelled
    pub restore: Option<TrackId>,
}

/// Sequencer state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing pending
    #[default]
    Idle,

    /// Waiting for the ready signal of `PendingLoad::session`
    Loading(PendingLoad),

    /// Tearing down a source; errors are suppressed
    Cancelling,
}

/// What a ready signal means for the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// Current session with autoplay requested: start playback
    Autoplay(PendingLoad),

    /// Current session without autoplay: commit the selection only
    Settle(PendingLoad),

    /// Superseded or cancelled session: ignore
    Stale,
}

/// What to do with a media error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Report to the user and return to a safe paused state
    Surface,

    /// A cancellation or supersession is in flight; swallow it
    Suppress,
}

/// Load session state machine
#[derive(Debug, Default)]
pub struct LoadSequencer {
    state: LoadState,
    session: SessionId,
}

impl LoadSequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, invalidating any pending continuation
    ///
    /// `committed` is the selection in effect before this load. When a load
    /// supersedes another pending one, the older load's committed selection
    /// is carried forward instead.
    pub fn begin(&mut self, track: TrackId, autoplay: bool, committed: Option<TrackId>) -> SessionId {
        let restore = match std::mem::take(&mut self.state) {
            LoadState::Loading(previous) => {
                debug!(
                    superseded = %previous.session,
                    track = %previous.track,
                    "Superseding pending load"
                );
                previous.restore
            }
            LoadState::Idle | LoadState::Cancelling => committed,
        };

        self.session = self.session.next();
        debug!(session = %self.session, %track, autoplay, "Loading track");
        self.state = LoadState::Loading(PendingLoad {
            session: self.session,
            autoplay,
            track,
            restore,
        });
        self.session
    }

    /// React to a ready signal
    pub fn on_ready(&mut self, session: SessionId) -> ReadyOutcome {
        match &self.state {
            LoadState::Loading(pending) if pending.session == session => {}
            _ => {
                debug!(%session, current = %self.session, "Ignoring stale ready signal");
                return ReadyOutcome::Stale;
            }
        }

        let LoadState::Loading(pending) = std::mem::take(&mut self.state) else {
            return ReadyOutcome::Stale;
        };
        if pending.autoplay {
            ReadyOutcome::Autoplay(pending)
        } else {
            ReadyOutcome::Settle(pending)
        }
    }

    /// Cancel the pending load
    ///
    /// Moves to `Cancelling` and returns the cancelled load. Returns `None`
    /// (and changes nothing) when no load is pending. The caller tears down the
    /// source and then calls [`finish_cancel`](Self::finish_cancel).
    pub fn begin_cancel(&mut self) -> Option<PendingLoad> {
        if !matches!(self.state, LoadState::Loading(_)) {
            return None;
        }

        let LoadState::Loading(pending) =
            std::mem::replace(&mut self.state, LoadState::Cancelling)
        else {
            return None;
        };
        self.session = self.session.next();
        debug!(cancelled = %pending.session, session = %self.session, "Cancelling load");
        Some(pending)
    }

    /// Invalidate everything and enter `Cancelling` to tear down the source
    ///
    /// Used when the playlist empties. Returns the session to unload under.
    pub fn reset(&mut self) -> SessionId {
        self.state = LoadState::Cancelling;
        self.session = self.session.next();
        debug!(session = %self.session, "Resetting load sequencer");
        self.session
    }

    /// Leave `Cancelling` once teardown signals have been drained
    pub fn finish_cancel(&mut self) {
        if self.state == LoadState::Cancelling {
            self.state = LoadState::Idle;
        }
    }

    /// Decide whether a media error reaches the user
    pub fn on_error(&mut self, session: SessionId) -> ErrorDisposition {
        if self.state == LoadState::Cancelling || session != self.session {
            return ErrorDisposition::Suppress;
        }
        self.state = LoadState::Idle;
        ErrorDisposition::Surface
    }

    /// Current state
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current session
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Whether a load is pending
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    /// Pending load, if any
    pub fn pending(&self) -> Option<&PendingLoad> {
        match &self.state {
            LoadState::Loading(pending) => Some(pending),
            _ => None,
        }
    }
}
