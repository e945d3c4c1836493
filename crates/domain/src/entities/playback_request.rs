//! Playback request entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::SpeakerId;

/// Unique identifier of an issued synthesis request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackRequestId(Uuid);

impl PlaybackRequestId {
    /// Create a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlaybackRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one issued speech synthesis
///
/// Records what was sent to the backend, in the backend's native units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    /// Request identifier
    pub id: PlaybackRequestId,
    /// Backend that produced the audio
    pub speaker: SpeakerId,
    /// Voice used
    pub voice: String,
    /// Rate in the backend's native unit
    pub native_rate: u32,
    /// Volume in the backend's native unit
    pub native_volume: u32,
    /// Number of characters synthesized
    pub chars: usize,
    /// When the request was issued
    pub issued_at: DateTime<Utc>,
}

impl PlaybackRequest {
    /// Create a request record stamped with the current time
    #[must_use]
    pub fn new(
        speaker: SpeakerId,
        voice: impl Into<String>,
        native_rate: u32,
        native_volume: u32,
        chars: usize,
    ) -> Self {
        Self {
            id: PlaybackRequestId::new(),
            speaker,
            voice: voice.into(),
            native_rate,
            native_volume,
            chars,
            issued_at: Utc::now(),
        }
    }
}
