//! AI Speech - Text-to-Speech speaker backends
//!
//! Provides the speaker abstraction and its two backends:
//! - `CloudSpeaker` - remote synthesis over an OpenAI-compatible HTTP API
//! - `LocalSpeaker` - local synthesis through an `espeak-ng` subprocess
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the `Speaker` and `PlaybackDevice` traits
//! - `providers` module contains the concrete speakers
//! - `registry` maps a `SpeakerId` to a speaker constructor
//!
//! Speakers never own the playback device. They hold a weak handle and
//! delegate load/play/stop to it.
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{SpeakerOptions, SpeakerRegistry};
//! use domain::{RateOrdinal, SpeakerId, VolumePercent};
//!
//! let registry = SpeakerRegistry::with_defaults(cloud_config, local_config);
//! let speaker = registry.resolve(SpeakerId::Local, &device, &SpeakerOptions::default())?;
//!
//! let request = speaker
//!     .synthesize("Hello world", RateOrdinal::default(), VolumePercent::default(), "en")
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod quantize;
pub mod registry;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use config::{CloudProfile, CloudSpeakerConfig, LocalSpeakerConfig};
pub use error::SpeechError;
pub use ports::{PlaybackDevice, Speaker};
pub use providers::{CloudSpeaker, LocalSpeaker};
pub use quantize::{NativeParams, QuantizationTables};
pub use registry::{SpeakerContext, SpeakerFactory, SpeakerOptions, SpeakerRegistry};
pub use types::{AudioData, AudioFormat};
