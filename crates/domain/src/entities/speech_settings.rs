//! Speech settings entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{RateOrdinal, VolumePercent};

/// Snapshot of the user's speech controls
///
/// Read at the moment of each read request. Persisting it is left to the
/// configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Rate ordinal (1-5)
    pub rate: RateOrdinal,
    /// Volume percentage (0-100)
    pub volume: VolumePercent,
    /// Selected voice
    pub voice: String,
    /// Selected language
    pub language: String,
}

impl SpeechSettings {
    /// Create settings with the given voice and language and default rate and volume
    #[must_use]
    pub fn new(voice: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            rate: RateOrdinal::default(),
            volume: VolumePercent::default(),
            voice: voice.into(),
            language: language.into(),
        }
    }

    /// Set the rate
    #[must_use]
    pub const fn with_rate(mut self, rate: RateOrdinal) -> Self {
        self.rate = rate;
        self
    }

    /// Set the volume
    #[must_use]
    pub const fn with_volume(mut self, volume: VolumePercent) -> Self {
        self.volume = volume;
        self
    }
}
