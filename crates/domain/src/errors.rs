//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rate ordinal outside of 1..=5
    #[error("Invalid rate: {0} (expected 1-5)")]
    InvalidRate(u8),

    /// Volume percentage outside of 0..=100
    #[error("Invalid volume: {0} (expected 0-100)")]
    InvalidVolume(u8),

    /// Speaker name does not match any known backend
    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    /// Language has no configured voices
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Playback device reported a state code we cannot decode
    #[error("Unrecognized player state: {0}")]
    UnrecognizedPlayerState(u8),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
