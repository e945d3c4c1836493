//! Player state machine
//!
//! Tracks the last state pushed by the playback device and derives the
//! label and enablement of the pause/resume control from it.

use domain::{PlayerState, ReportedState};
use tracing::{debug, error};

use crate::error::ApplicationError;

/// Label shown while playing or stopped
pub const PAUSE_LABEL: &str = "Pause";
/// Label shown while paused
pub const RESUME_LABEL: &str = "Resume";

/// What the pause/resume control shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleView {
    /// Control label
    pub label: &'static str,
    /// Whether the control accepts input
    pub enabled: bool,
}

impl ToggleView {
    /// View for a player state
    #[must_use]
    pub const fn for_state(state: PlayerState) -> Self {
        match state {
            PlayerState::Playing => Self {
                label: PAUSE_LABEL,
                enabled: true,
            },
            PlayerState::Stopped => Self {
                label: PAUSE_LABEL,
                enabled: false,
            },
            PlayerState::Paused => Self {
                label: RESUME_LABEL,
                enabled: true,
            },
        }
    }
}

impl Default for ToggleView {
    fn default() -> Self {
        Self::for_state(PlayerState::Stopped)
    }
}

/// Mirror of the device state driven by push notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStateMachine {
    state: PlayerState,
}

impl PlayerStateMachine {
    /// Start in `Stopped`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known state
    #[must_use]
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// View derived from the last known state
    #[must_use]
    pub const fn view(&self) -> ToggleView {
        ToggleView::for_state(self.state)
    }

    /// Apply a device notification
    ///
    /// Unknown codes leave the machine unchanged.
    pub fn on_notification(
        &mut self,
        reported: ReportedState,
    ) -> Result<ToggleView, ApplicationError> {
        match reported.decode() {
            Ok(state) => Ok(self.sync(state)),
            Err(_) => {
                error!(code = reported.0, "Unrecognized player state");
                Err(ApplicationError::UnrecognizedPlayerState(reported.0))
            },
        }
    }

    /// Overwrite the state directly, e.g. after missed notifications
    pub fn sync(&mut self, state: PlayerState) -> ToggleView {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Player state changed");
            self.state = state;
        }
        self.view()
    }
}
