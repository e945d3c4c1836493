//! Speech synthesis errors

use thiserror::Error;

/// Errors raised while resolving a speaker, synthesizing or handing audio
/// to the playback device
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The cloud endpoint refused or dropped the connection
    #[error("Cannot reach speech service: {0}")]
    ConnectionFailed(String),

    /// The HTTP exchange failed for another transport reason
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    /// The backend ran but produced no usable audio
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

        #[error("Unexpected response from speech service: {0}")]
    InvalidResponse(String),

    /// Synthesis exceeded its time limit (milliseconds)
    #[error("Synthesis timed out after {0}ms")]
    Timeout(u64),

        #[error("Speech service rate limit exceeded")]
    RateLimited,

    /// Missing credentials or an unusable setting
    #[error("Speaker configuration error: {0}")]
    Configuration(String),

        #[error("Voice not found: {0}")]
    VoiceNotFound(String),

        #[error("Speech model not available: {0}")]
    ModelNotAvailable(String),

    /// Executable missing, speaker disposed, or playback device released
    #[error("Speaker not available: {0}")]
    NotAvailable(String),

    /// No constructor registered for the requested speaker
    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    /// Playback device rejected an operation
    #[error("Playback device error: {0}")]
    Device(String),
}

impl SpeechError {
    /// Classify a transport error, reporting timeouts with the configured limit
    #[must_use]
    pub fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }

    /// Whether the backend failed while producing audio, as opposed to a
    /// lookup or configuration problem
    #[must_use]
    pub const fn is_synthesis_failure(&self) -> bool {
        !matches!(
            self,
            Self::UnknownSpeaker(_) | Self::Configuration(_)
        )
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_transport(&err, 30_000)
    }
}
