//! Port definitions for speech output
//!
//! Defines the traits (ports) that speaker backends and playback devices
//! must implement.

use std::fmt;

use async_trait::async_trait;
use domain::{PlaybackRequest, PlayerState, RateOrdinal, ReportedState, SpeakerId, VolumePercent};
use tokio::sync::broadcast;

use crate::error::SpeechError;
use crate::quantize::QuantizationTables;
use crate::types::AudioData;

/// Port for the shared audio player
///
/// A single device is shared by every speaker. State changes are pushed to
/// subscribers as [`ReportedState`] codes, including natural completion of
/// playback.
pub trait PlaybackDevice: Send + Sync + fmt::Debug {
    /// Replace the loaded audio. Stops any current playback.
    fn load(&self, audio: AudioData) -> Result<(), SpeechError>;

    /// Start or resume playback of the loaded audio
    fn play(&self) -> Result<(), SpeechError>;

    /// Pause playback. Has no effect unless playing.
    fn pause(&self) -> Result<(), SpeechError>;

    /// Stop playback and rewind. Safe to call in any state.
    fn stop(&self);

    /// Set output gain as a percentage (0-100)
    fn set_volume(&self, gain_percent: u32);

    /// Current state
    fn state(&self) -> PlayerState;

    /// Subscribe to state-change notifications
    fn subscribe(&self) -> broadcast::Receiver<ReportedState>;
}

/// Port for text-to-speech backends
///
/// Implementations translate the coarse UI controls through their own
/// [`QuantizationTables`], produce audio and hand it to the shared
/// [`PlaybackDevice`].
///
/// # Example
///
/// ```ignore
/// use ai_speech::Speaker;
///
/// async fn say(speaker: &dyn Speaker, text: &str) -> Result<(), SpeechError> {
///     speaker.stop();
///     speaker
///         .synthesize(text, RateOrdinal::default(), VolumePercent::default(), "en")
///         .await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Speaker: Send + Sync + fmt::Debug {
    /// Identity of this backend
    fn id(&self) -> SpeakerId;

    /// Rate and volume steps in native units
    fn tables(&self) -> &'static QuantizationTables;

    /// Synthesize `text` and start playing it on the shared device
    ///
    /// # Arguments
    ///
    /// * `text` - Text to speak
    /// * `rate` - Rate ordinal, translated as `RATES[rate - 1]`
    /// * `volume` - Volume percentage, translated through the volume table
    /// * `voice` - Voice identifier; empty selects the backend default
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the backend fails to produce audio, the
    /// device has been released, or the speaker was disposed. The device is
    /// left stopped on failure.
    async fn synthesize(
        &self,
        text: &str,
        rate: RateOrdinal,
        volume: VolumePercent,
        voice: &str,
    ) -> Result<PlaybackRequest, SpeechError>;

    /// Stop playback. Idempotent.
    fn stop(&self);

    /// Release backend resources. Idempotent and infallible.
    fn dispose(&self);

    /// Whether the backend is reachable or installed
    async fn is_available(&self) -> bool;

    /// Voice used when none is given
    fn default_voice(&self) -> &str;
}
