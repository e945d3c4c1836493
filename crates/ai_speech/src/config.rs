//! Configuration for the speaker backends

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::AudioFormat;

/// Configuration for the cloud speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSpeakerConfig {
    /// API key used when no profile is selected
    #[serde(default)]
    pub api_key: Option<String>,

    /// Named credential profiles
    #[serde(default)]
    pub profiles: HashMap<String, CloudProfile>,

    /// API base URL (for custom endpoints)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Text-to-speech model
    #[serde(default = "default_model")]
    pub model: String,

    /// Voice used when the caller passes an empty voice
    #[serde(default = "default_cloud_voice")]
    pub default_voice: String,

    /// Audio format requested from the service
    #[serde(default)]
    pub output_format: AudioFormat,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Credentials for one cloud profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProfile {
    /// API key for this profile
    pub api_key: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "tts-1".to_string()
}

fn default_cloud_voice() -> String {
    "nova".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for CloudSpeakerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            profiles: HashMap::new(),
            base_url: default_base_url(),
            model: default_model(),
            default_voice: default_cloud_voice(),
            output_format: AudioFormat::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CloudSpeakerConfig {
    /// Pick the API key for a profile
    ///
    /// With a profile name the key must come from that profile; without one
    /// the top-level key is used.
    pub fn api_key_for(&self, profile: Option<&str>) -> Result<&str, String> {
        match profile {
            Some(name) => self
                .profiles
                .get(name)
                .map(|p| p.api_key.as_str())
                .ok_or_else(|| format!("Unknown cloud profile '{name}'")),
            None => self
                .api_key
                .as_deref()
                .ok_or_else(|| "API key is required for the cloud speaker".to_string()),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Base URL must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some((name, _)) = self
            .profiles
            .iter()
            .find(|(_, profile)| profile.api_key.trim().is_empty())
        {
            return Err(format!("Cloud profile '{name}' has an empty API key"));
        }

        Ok(())
    }
}

/// Configuration for the local speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSpeakerConfig {
    /// Path or name of the espeak-ng executable
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Voice used when the caller passes an empty voice
    #[serde(default = "default_local_voice")]
    pub default_voice: String,
}

fn default_executable() -> PathBuf {
    PathBuf::from("espeak-ng")
}

fn default_local_voice() -> String {
    "en".to_string()
}

impl Default for LocalSpeakerConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            default_voice: default_local_voice(),
        }
    }
}

impl LocalSpeakerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable.as_os_str().is_empty() {
            return Err("Executable path must not be empty".to_string());
        }
        if self.default_voice.trim().is_empty() {
            return Err("Default voice must not be empty".to_string());
        }
        Ok(())
    }
}
