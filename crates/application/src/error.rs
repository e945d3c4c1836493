//! Application-level errors

use ai_speech::SpeechError;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No speaker is registered under this name
    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    /// The active speaker failed to produce or start audio
    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] SpeechError),

    /// The playback device reported a state code outside the known set
    #[error("Unrecognized player state: {0}")]
    UnrecognizedPlayerState(u8),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The playback device rejected a command
    #[error("Playback device error: {0}")]
    Device(String),

    /// Text cleaning rules could not be applied
    #[error("Text reduction failed: {0}")]
    TextReduction(String),
}

impl ApplicationError {
    /// Whether the error came from the speech backend rather than from
    /// user input or configuration
    pub const fn is_synthesis(&self) -> bool {
        matches!(self, Self::Synthesis(_))
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::UnknownSpeaker(name) => Self::UnknownSpeaker(name),
            SpeechError::Configuration(msg) => Self::Configuration(msg),
            SpeechError::Device(msg) => Self::Device(msg),
            other => Self::Synthesis(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_speaker_maps_to_its_own_variant() {
        let err = ApplicationError::from(SpeechError::UnknownSpeaker("Festival".to_string()));
        assert!(matches!(err, ApplicationError::UnknownSpeaker(name) if name == "Festival"));
    }

    #[test]
    fn backend_failures_map_to_synthesis() {
        let err = ApplicationError::from(SpeechError::ConnectionFailed("refused".to_string()));
        assert!(err.is_synthesis());
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err = ApplicationError::from(DomainError::InvalidRate(9));
        assert_eq!(err.to_string(), DomainError::InvalidRate(9).to_string());
    }

    #[test]
    fn unrecognized_state_display() {
        let err = ApplicationError::UnrecognizedPlayerState(7);
        assert_eq!(err.to_string(), "Unrecognized player state: 7");
    }
}
