//! Playback coordinator - Owns the active speaker and the shared device
//!
//! Every read goes through [`PlaybackCoordinator::read`], which stops the
//! current utterance before a new synthesis is issued. At most one utterance
//! is active at any time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ai_speech::{PlaybackDevice, Speaker, SpeakerOptions, SpeakerRegistry, SpeechError};
use domain::{
    DomainError, PlaybackRequest, PlayerState, RateOrdinal, ReportedState, SpeakerId,
    SpeechSettings, VoiceCatalog, VolumePercent,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{RuleSet, SpeakerConfigPort, TextReducer};

/// Default upper bound for one synthesis call
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a pause/resume request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Playback was paused
    Paused,
    /// Playback was resumed
    Resumed,
    /// Nothing was playing
    Ignored,
}

/// Mediates read, stop, toggle and speaker changes
pub struct PlaybackCoordinator {
    registry: SpeakerRegistry,
    device: Arc<dyn PlaybackDevice>,
    speaker: Option<Box<dyn Speaker>>,
    config: Arc<dyn SpeakerConfigPort>,
    reducer: Option<Arc<dyn TextReducer>>,
    options: SpeakerOptions,
    settings: SpeechSettings,
    catalog: VoiceCatalog,
    synthesis_timeout: Duration,
    last: Option<PlaybackRequest>,
}

impl fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("speaker", &self.active_speaker())
            .field("settings", &self.settings)
            .field("synthesis_timeout", &self.synthesis_timeout)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl PlaybackCoordinator {
    /// Create a coordinator with the configured default speaker active
    ///
    /// # Errors
    ///
    /// Returns an error if the default speaker cannot be built or its
    /// configuration cannot be loaded.
    pub fn new(
        registry: SpeakerRegistry,
        device: Arc<dyn PlaybackDevice>,
        config: Arc<dyn SpeakerConfigPort>,
        options: SpeakerOptions,
    ) -> Result<Self, ApplicationError> {
        let initial = config.default_speaker();
        let speaker = registry.resolve(initial, &device, &options)?;
        let defaults = config.load_config(initial)?;
        let settings = defaults.initial_settings(speaker.default_voice());

        info!(speaker = %initial, voice = %settings.voice, "Playback coordinator ready");

        Ok(Self {
            registry,
            device,
            speaker: Some(speaker),
            config,
            reducer: None,
            options,
            settings,
            catalog: defaults.voices,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
            last: None,
        })
    }

    /// Apply the `reduce` rule set to every text before it is read
    #[must_use]
    pub fn with_reducer(mut self, reducer: Arc<dyn TextReducer>) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Bound each synthesis call
    #[must_use]
    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Stop, reduce, then synthesize `text` with the current settings
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Synthesis` if the speaker fails or the
    /// synthesis timeout elapses. The device is left stopped and there is
    /// no "last" request afterwards.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn read(&mut self, text: &str) -> Result<PlaybackRequest, ApplicationError> {
        self.stop();

        let text = match &self.reducer {
            Some(reducer) => reducer.reduce(text, RuleSet::Reduce),
            None => text.to_string(),
        };

        let Some(speaker) = self.speaker.as_deref() else {
            return Err(ApplicationError::Device("no active speaker".to_string()));
        };
        let settings = &self.settings;

        let outcome = tokio::time::timeout(
            self.synthesis_timeout,
            speaker.synthesize(&text, settings.rate, settings.volume, &settings.voice),
        )
        .await;

        let error = match outcome {
            Ok(Ok(request)) => {
                info!(
                    request_id = %request.id,
                    speaker = %request.speaker,
                    native_rate = request.native_rate,
                    native_volume = request.native_volume,
                    "Read started"
                );
                self.last = Some(request.clone());
                return Ok(request);
            },
            Ok(Err(e)) => e,
            Err(_) => {
                let ms = u64::try_from(self.synthesis_timeout.as_millis()).unwrap_or(u64::MAX);
                SpeechError::Timeout(ms)
            },
        };

        warn!(error = %error, "Synthesis failed");
        speaker.stop();
        self.last = None;
        Err(ApplicationError::Synthesis(error))
    }

    /// Pause when playing, resume when paused
    ///
    /// Never starts playback from `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Device` if the device rejects the command.
    pub fn toggle(&self) -> Result<ToggleOutcome, ApplicationError> {
        let outcome = match self.device.state() {
            PlayerState::Paused => {
                self.device.play().map_err(device_error)?;
                ToggleOutcome::Resumed
            },
            PlayerState::Playing => {
                self.device.pause().map_err(device_error)?;
                ToggleOutcome::Paused
            },
            PlayerState::Stopped => ToggleOutcome::Ignored,
        };
        debug!(?outcome, "Toggle");
        Ok(outcome)
    }

    /// Stop the current utterance. Idempotent.
    pub fn stop(&self) {
        if let Some(speaker) = &self.speaker {
            speaker.stop();
        }
    }

    /// Replace the active speaker
    ///
    /// The new speaker is built first; on failure the old one stays active.
    /// Rate and volume carry over. The voice carries over when the new
    /// speaker lists it for the current language.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::UnknownSpeaker` if `id` is not registered,
    /// or a configuration error if the speaker or its defaults cannot be
    /// loaded.
    #[instrument(skip(self))]
    pub fn change_speaker(&mut self, id: SpeakerId) -> Result<(), ApplicationError> {
        let replacement = self.registry.resolve(id, &self.device, &self.options)?;
        let defaults = self.config.load_config(id)?;

        if let Some(old) = self.speaker.take() {
            old.stop();
            old.dispose();
            debug!(speaker = %old.id(), "Previous speaker disposed");
        }

        let fallback_voice = replacement.default_voice().to_string();
        self.speaker = Some(replacement);
        self.last = None;
        self.catalog = defaults.voices;

        if self.catalog.voices(&self.settings.language).is_err() {
            debug!(
                language = %self.settings.language,
                fallback = %defaults.language,
                "Language not offered by new speaker"
            );
            self.settings.language = defaults.language;
        }

        if !self
            .catalog
            .contains(&self.settings.language, &self.settings.voice)
        {
            self.settings.voice = self
                .catalog
                .first_voice(&self.settings.language)
                .map_or(fallback_voice, str::to_string);
        }

        info!(speaker = %id, voice = %self.settings.voice, "Speaker changed");
        Ok(())
    }

    /// Set the rate ordinal (1-5)
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the ordinal is out of range.
    pub fn set_rate(&mut self, rate: u8) -> Result<(), ApplicationError> {
        self.settings.rate = RateOrdinal::new(rate)?;
        Ok(())
    }

    /// Set the volume percentage (0-100)
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the value is above 100.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), ApplicationError> {
        self.settings.volume = VolumePercent::new(volume)?;
        Ok(())
    }

    /// Select a voice
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the voice is empty or the
    /// catalog lists voices for the current language and this is not one
    /// of them.
    pub fn set_voice(&mut self, voice: &str) -> Result<(), ApplicationError> {
        let voice = voice.trim();
        if voice.is_empty() {
            return Err(DomainError::ValidationError("voice must not be empty".to_string()).into());
        }
        let listed = self.catalog.voices(&self.settings.language).is_ok();
        if listed && !self.catalog.contains(&self.settings.language, voice) {
            return Err(DomainError::ValidationError(format!(
                "voice '{voice}' is not available for language '{}'",
                self.settings.language
            ))
            .into());
        }
        self.settings.voice = voice.to_string();
        Ok(())
    }

    /// Select a language and its first voice
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the catalog has no voices for
    /// the language.
    pub fn set_language(&mut self, language: &str) -> Result<(), ApplicationError> {
        let language = language.trim();
        let voice = self.catalog.first_voice(language)?.to_string();
        self.settings.language = language.to_string();
        self.settings.voice = voice;
        Ok(())
    }

    /// Current settings snapshot
    pub const fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    /// Voice catalog of the active speaker
    pub const fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Identity of the active speaker, `None` after shutdown
    pub fn active_speaker(&self) -> Option<SpeakerId> {
        self.speaker.as_ref().map(|s| s.id())
    }

    /// Whether the active speaker's backend is reachable
    pub async fn speaker_available(&self) -> bool {
        match &self.speaker {
            Some(speaker) => speaker.is_available().await,
            None => false,
        }
    }

    /// Last successfully issued request
    pub const fn last_request(&self) -> Option<&PlaybackRequest> {
        self.last.as_ref()
    }

    /// Current device state
    pub fn player_state(&self) -> PlayerState {
        self.device.state()
    }

    /// Subscribe to device notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ReportedState> {
        self.device.subscribe()
    }

    /// Speaker identities that can be activated
    pub fn available_speakers(&self) -> Vec<SpeakerId> {
        self.registry.identities()
    }

    /// Stop and dispose the active speaker. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(speaker) = self.speaker.take() {
            speaker.stop();
            speaker.dispose();
            self.last = None;
            info!(speaker = %speaker.id(), "Playback coordinator shut down");
        }
    }
}

impl Drop for PlaybackCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn device_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Device(err.to_string())
}
