//! Speaker configuration port
//!
//! Supplies the per-speaker defaults and voice lists the coordinator needs
//! when it starts and whenever the active speaker changes.

use std::fmt;

use domain::{RateOrdinal, SpeakerId, SpeechSettings, VoiceCatalog, VolumePercent};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Configured defaults for one speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerDefaults {
    /// Default rate ordinal
    pub rate: RateOrdinal,
    /// Default volume percentage
    pub volume: VolumePercent,
    /// Default language
    pub language: String,
    /// Voices per language
    pub voices: VoiceCatalog,
}

impl SpeakerDefaults {
    /// Initial settings: default rate, volume and language with the first
    /// voice listed for that language
    ///
    /// Falls back to `fallback_voice` when the catalog lists nothing for
    /// the default language.
    #[must_use]
    pub fn initial_settings(&self, fallback_voice: &str) -> SpeechSettings {
        let voice = self
            .voices
            .first_voice(&self.language)
            .unwrap_or(fallback_voice);
        SpeechSettings::new(voice, self.language.clone())
            .with_rate(self.rate)
            .with_volume(self.volume)
    }
}

/// Port for per-speaker configuration
#[cfg_attr(test, automock)]
pub trait SpeakerConfigPort: Send + Sync + fmt::Debug {
    /// Load the defaults for `speaker`
    fn load_config(&self, speaker: SpeakerId) -> Result<SpeakerDefaults, ApplicationError>;

    /// Speaker to activate at startup
    fn default_speaker(&self) -> SpeakerId;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(language: &str) -> SpeakerDefaults {
        SpeakerDefaults {
            rate: RateOrdinal::new(2).unwrap(),
            volume: VolumePercent::new(80).unwrap(),
            language: language.to_string(),
            voices: VoiceCatalog::new()
                .with_language("en", ["en-us", "en-gb"])
                .with_language("de", ["de"]),
        }
    }

    #[test]
    fn initial_settings_pick_first_voice() {
        let settings = defaults("en").initial_settings("fallback");
        assert_eq!(settings.voice, "en-us");
        assert_eq!(settings.language, "en");
        assert_eq!(settings.rate.value(), 2);
        assert_eq!(settings.volume.value(), 80);
    }

    #[test]
    fn initial_settings_fall_back_without_voices() {
        let settings = defaults("fr").initial_settings("fallback");
        assert_eq!(settings.voice, "fallback");
        assert_eq!(settings.language, "fr");
    }

    #[test]
    fn mock_port_returns_configured_defaults() {
        let mut port = MockSpeakerConfigPort::new();
        port.expect_load_config()
            .withf(|id| *id == SpeakerId::Local)
            .returning(|_| Ok(defaults("de")));

        let loaded = port.load_config(SpeakerId::Local).unwrap();
        assert_eq!(loaded.voices.first_voice("de").unwrap(), "de");
    }
}
