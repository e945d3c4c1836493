//! Application configuration
//!
//! Split into focused sub-modules:
//! - `speakers`: per-speaker defaults and voice lists
//! - `player`: external audio player command line
//!
//! Backend settings (`[cloud]`, `[local]`) reuse the speaker configuration
//! types from `ai_speech`.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `narrator.toml` in the working directory, or an explicit file
//! 3. `NARRATOR_*` environment variables, `__` separating nested keys
//!    (e.g. `NARRATOR_CLOUD__API_KEY`)

mod player;
mod speakers;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ai_speech::{CloudSpeakerConfig, LocalSpeakerConfig, SpeakerOptions, SpeakerRegistry};
use application::{ApplicationError, SpeakerConfigPort, SpeakerDefaults};
use domain::SpeakerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use player::{FILE_PLACEHOLDER, OFFSET_PLACEHOLDER, PlayerConfig, VOLUME_PLACEHOLDER};
pub use speakers::{SpeakerSettingsConfig, SpeakersConfig};

/// Default configuration file name (without extension)
pub const DEFAULT_CONFIG_NAME: &str = "narrator";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "NARRATOR";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Narrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speaker active at startup
    #[serde(default = "default_speaker")]
    pub speaker: SpeakerId,

    /// Cloud credentials profile
    #[serde(default)]
    pub profile: Option<String>,

    /// TOML file with text cleaning rules
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Upper bound for one synthesis call in milliseconds
    #[serde(default = "default_synthesis_timeout_ms")]
    pub synthesis_timeout_ms: u64,

    /// Cloud speaker backend
    #[serde(default)]
    pub cloud: CloudSpeakerConfig,

    /// Local speaker backend
    #[serde(default)]
    pub local: LocalSpeakerConfig,

    /// Audio player
    #[serde(default)]
    pub player: PlayerConfig,

    /// Per-speaker defaults
    #[serde(default)]
    pub speakers: SpeakersConfig,
}

const fn default_speaker() -> SpeakerId {
    SpeakerId::Local
}

const fn default_synthesis_timeout_ms() -> u64 {
    30_000 // 30 seconds
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            speaker: default_speaker(),
            profile: None,
            rules_path: None,
            synthesis_timeout_ms: default_synthesis_timeout_ms(),
            cloud: CloudSpeakerConfig::default(),
            local: LocalSpeakerConfig::default(),
            player: PlayerConfig::default(),
            speakers: SpeakersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, a file and the environment
    ///
    /// With `path`, that file must exist. Without it, `narrator.toml` is
    /// read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("speaker", default_speaker().name())?
            .set_default("synthesis_timeout_ms", default_synthesis_timeout_ms())?
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., NARRATOR_CLOUD__API_KEY)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate().map_err(ConfigLoadError::Invalid)?;

        info!(
            speaker = %config.speaker,
            file = ?path,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate().map_err(ConfigLoadError::Invalid)?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid key.
    pub fn validate(&self) -> Result<(), String> {
        if self.synthesis_timeout_ms == 0 {
            return Err("synthesis_timeout_ms must be greater than 0".to_string());
        }

        self.cloud.validate().map_err(|e| format!("cloud: {e}"))?;
        self.local.validate().map_err(|e| format!("local: {e}"))?;
        self.player.validate()?;
        self.speakers.validate()?;

        if let Some(profile) = &self.profile
            && !self.cloud.profiles.contains_key(profile)
        {
            return Err(format!("profile '{profile}' is not defined under cloud.profiles"));
        }

        debug!("Configuration valid");
        Ok(())
    }

    /// Synthesis timeout as a duration
    pub const fn synthesis_timeout(&self) -> Duration {
        Duration::from_millis(self.synthesis_timeout_ms)
    }

    /// Registry with both speakers built from this configuration
    pub fn speaker_registry(&self) -> SpeakerRegistry {
        SpeakerRegistry::with_defaults(self.cloud.clone(), self.local.clone())
    }

    /// Options passed when resolving speakers
    pub fn speaker_options(&self) -> SpeakerOptions {
        SpeakerOptions {
            profile: self.profile.clone(),
        }
    }
}

impl SpeakerConfigPort for AppConfig {
    fn load_config(&self, speaker: SpeakerId) -> Result<SpeakerDefaults, ApplicationError> {
        self.speakers.get(speaker).to_defaults()
    }

    fn default_speaker(&self) -> SpeakerId {
        self.speaker
    }
}
