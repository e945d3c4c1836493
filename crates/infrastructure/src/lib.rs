//! Infrastructure layer - Adapters for the local machine
//!
//! Implements ports defined in the application layer:
//! configuration loading, regex text cleaning, the external-player
//! playback device and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ConfigLoadError, PlayerConfig, SpeakerSettingsConfig, SpeakersConfig};
pub use telemetry::{
    LogFormat, TelemetryConfig, TelemetryError, init_tracing, log_filter_from_verbosity,
};
