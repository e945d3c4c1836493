//! Per-speaker defaults and voice lists.

use application::{ApplicationError, SpeakerDefaults};
use domain::{RateOrdinal, SpeakerId, VoiceCatalog, VolumePercent};
use serde::{Deserialize, Serialize};

/// Defaults for one speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerSettingsConfig {
    /// Rate ordinal (1-5)
    #[serde(default = "default_speed")]
    pub speed: u8,

    /// Volume percentage (0-100)
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// Language selected at startup
    #[serde(default = "default_language")]
    pub language: String,

    /// Voices per language; the first voice of a language is its default
    #[serde(default)]
    pub voices: VoiceCatalog,
}

const fn default_speed() -> u8 {
    3
}

const fn default_volume() -> u8 {
    50
}

fn default_language() -> String {
    "en".to_string()
}

impl SpeakerSettingsConfig {
    fn with_voices(voices: VoiceCatalog) -> Self {
        Self {
            speed: default_speed(),
            volume: default_volume(),
            language: default_language(),
            voices,
        }
    }

    /// Convert into validated defaults
    ///
    /// # Errors
    ///
    /// Returns a domain error if speed or volume are out of range.
    pub fn to_defaults(&self) -> Result<SpeakerDefaults, ApplicationError> {
        Ok(SpeakerDefaults {
            rate: RateOrdinal::new(self.speed)?,
            volume: VolumePercent::new(self.volume)?,
            language: self.language.clone(),
            voices: self.voices.clone(),
        })
    }

    /// Validate the section named `section`
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self, section: &str) -> Result<(), String> {
        if RateOrdinal::new(self.speed).is_err() {
            return Err(format!(
                "{section}.speed must be between {} and {}, got {}",
                RateOrdinal::MIN.value(),
                RateOrdinal::MAX.value(),
                self.speed
            ));
        }
        if VolumePercent::new(self.volume).is_err() {
            return Err(format!(
                "{section}.volume must be at most 100, got {}",
                self.volume
            ));
        }
        if !self.voices.is_empty() && self.voices.voices(&self.language).is_err() {
            return Err(format!(
                "{section}.language '{}' has no voices listed",
                self.language
            ));
        }
        Ok(())
    }
}

/// The `[speakers]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakersConfig {
    /// Cloud speaker defaults
    #[serde(default = "default_cloud")]
    pub cloud: SpeakerSettingsConfig,

    /// Local speaker defaults
    #[serde(default = "default_local")]
    pub local: SpeakerSettingsConfig,
}

fn default_cloud() -> SpeakerSettingsConfig {
    let voices = ["nova", "alloy", "echo", "fable", "onyx", "shimmer"];
    SpeakerSettingsConfig::with_voices(
        VoiceCatalog::new()
            .with_language("en", voices)
            .with_language("de", voices),
    )
}

fn default_local() -> SpeakerSettingsConfig {
    SpeakerSettingsConfig::with_voices(
        VoiceCatalog::new()
            .with_language("en", ["en-us", "en-gb"])
            .with_language("de", ["de"])
            .with_language("fr", ["fr-fr"])
            .with_language("es", ["es"]),
    )
}

impl Default for SpeakersConfig {
    fn default() -> Self {
        Self {
            cloud: default_cloud(),
            local: default_local(),
        }
    }
}

impl SpeakersConfig {
    /// Section for a speaker
    pub const fn get(&self, speaker: SpeakerId) -> &SpeakerSettingsConfig {
        match speaker {
            SpeakerId::Cloud => &self.cloud,
            SpeakerId::Local => &self.local,
        }
    }

    /// Validate both sections
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.cloud.validate("speakers.cloud")?;
        self.local.validate("speakers.local")
    }
}
