//! Cloud Speaker
//!
//! Implements `Speaker` on top of an OpenAI-compatible `/audio/speech`
//! endpoint. The service returns encoded audio which is handed to the shared
//! playback device.
//!
//! # Native units
//!
//! - Rate: speed in percent, sent as `speed = pct / 100`
//! - Volume: device gain in percent (the API has no loudness control)

use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use domain::{PlaybackRequest, RateOrdinal, SpeakerId, VolumePercent};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::DeviceLink;
use crate::config::CloudSpeakerConfig;
use crate::error::SpeechError;
use crate::ports::{PlaybackDevice, Speaker};
use crate::quantize::QuantizationTables;
use crate::types::{AudioData, AudioFormat};

/// Maximum input length accepted by the speech endpoint
const MAX_INPUT_CHARS: usize = 4096;

static CLOUD_TABLES: QuantizationTables =
    QuantizationTables::new([50, 75, 100, 125, 150], &[0, 25, 50, 75, 100]);

/// Speaker backed by a remote speech synthesis API
#[derive(Debug)]
pub struct CloudSpeaker {
    client: Client,
    config: CloudSpeakerConfig,
    api_key: String,
    player: DeviceLink,
}

impl CloudSpeaker {
    /// Create a new cloud speaker
    ///
    /// # Arguments
    ///
    /// * `config` - Cloud speaker configuration
    /// * `player` - Weak handle to the shared playback device
    /// * `profile` - Optional credentials profile name
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or no API key is available for the profile.
    pub fn new(
        config: CloudSpeakerConfig,
        player: Weak<dyn PlaybackDevice>,
        profile: Option<&str>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let api_key = config
            .api_key_for(profile)
            .map_err(SpeechError::Configuration)?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        debug!(base_url = %config.base_url, profile = ?profile, "Cloud speaker created");

        Ok(Self {
            client,
            config,
            api_key,
            player: DeviceLink::new(player),
        })
    }

    /// Build the speech endpoint URL
    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert a native rate (percent) to the API speed factor
    ///
    /// Returns `None` at normal speed so the field is left out.
    fn speed_factor(native_rate: u32) -> Option<f32> {
        if native_rate == 100 {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            Some(native_rate as f32 / 100.0)
        }
    }

    /// Request audio for `text` from the service
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn request_speech(
        &self,
        text: &str,
        voice: &str,
        native_rate: u32,
    ) -> Result<AudioData, SpeechError> {
        let request = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice,
            response_format: self.config.output_format.response_format(),
            speed: Self::speed_factor(native_rate),
        };

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    Some("model_not_found") => {
                        Err(SpeechError::ModelNotAvailable(self.config.model.clone()))
                    },
                    Some("invalid_voice") => Err(SpeechError::VoiceNotFound(voice.to_string())),
                    _ => Err(SpeechError::SynthesisFailed(api_error.error.message)),
                };
            }

            return Err(SpeechError::SynthesisFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let format = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(AudioFormat::from_content_type)
            .unwrap_or(self.config.output_format);

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        if audio_bytes.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Service returned no audio".to_string(),
            ));
        }

        debug!(audio_size = audio_bytes.len(), ?format, "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), format))
    }
}

/// Speech request body
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

#[async_trait]
impl Speaker for CloudSpeaker {
    fn id(&self) -> SpeakerId {
        SpeakerId::Cloud
    }

    fn tables(&self) -> &'static QuantizationTables {
        &CLOUD_TABLES
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        rate: RateOrdinal,
        volume: VolumePercent,
        voice: &str,
    ) -> Result<PlaybackRequest, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {MAX_INPUT_CHARS} limit"
            )));
        }

        // Previous utterance must be silent before the new request goes out
        self.player.acquire()?.stop();

        let voice = if voice.trim().is_empty() {
            self.config.default_voice.as_str()
        } else {
            voice
        };
        let native = self.tables().translate(rate, volume);

        let audio = self.request_speech(text, voice, native.rate).await?;
        self.player.start(audio, native.volume)?;

        let request = PlaybackRequest::new(SpeakerId::Cloud, voice, native.rate, native.volume, chars);
        info!(request_id = %request.id, voice, "Cloud speech started");
        Ok(request)
    }

    fn stop(&self) {
        self.player.stop();
    }

    fn dispose(&self) {
        if self.player.dispose() {
            debug!("Cloud speaker disposed");
        }
    }

    async fn is_available(&self) -> bool {
        let models_url = format!("{}/models", self.config.base_url.trim_end_matches('/'));

        match self
            .client
            .get(&models_url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Cloud speaker availability check failed: {}", e);
                false
            },
        }
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }
}
