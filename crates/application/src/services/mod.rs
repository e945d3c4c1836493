//! Application services - Use case implementations

mod playback_coordinator;
mod player_state_machine;
mod reading_session;
#[cfg(test)]
mod test_support;

pub use playback_coordinator::{DEFAULT_SYNTHESIS_TIMEOUT, PlaybackCoordinator, ToggleOutcome};
pub use player_state_machine::{PAUSE_LABEL, PlayerStateMachine, RESUME_LABEL, ToggleView};
pub use reading_session::{ReadingSession, SessionHandle, SessionUpdate, UiEvent};
