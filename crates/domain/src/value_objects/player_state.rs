//! Playback device state value objects

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// State of the shared playback device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Nothing loaded or playback finished
    #[default]
    Stopped,
    /// Audio is being rendered
    Playing,
    /// Playback suspended, can be resumed
    Paused,
}

impl PlayerState {
    /// Numeric code used in device notifications
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Playing => 1,
            Self::Paused => 2,
        }
    }

    /// Decode a device state code
    pub const fn from_code(code: u8) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Playing),
            2 => Ok(Self::Paused),
            other => Err(DomainError::UnrecognizedPlayerState(other)),
        }
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw state notification pushed by a playback device
///
/// Devices report codes rather than [`PlayerState`] so that a consumer can
/// detect and ignore values it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportedState(pub u8);

impl ReportedState {
    /// Decode into a known player state
    pub const fn decode(self) -> Result<PlayerState, DomainError> {
        PlayerState::from_code(self.0)
    }
}

impl From<PlayerState> for ReportedState {
    fn from(state: PlayerState) -> Self {
        Self(state.code())
    }
}

impl TryFrom<ReportedState> for PlayerState {
    type Error = DomainError;

    fn try_from(reported: ReportedState) -> Result<Self, Self::Error> {
        reported.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_stopped() {
        assert_eq!(PlayerState::default(), PlayerState::Stopped);
    }

    #[test]
    fn codes_decode_to_states() {
        for state in [PlayerState::Stopped, PlayerState::Playing, PlayerState::Paused] {
            assert_eq!(ReportedState::from(state).decode(), Ok(state));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(
            ReportedState(7).decode(),
            Err(DomainError::UnrecognizedPlayerState(7))
        );
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(PlayerState::Paused.to_string(), "paused");
    }
}
