//! Speaker backend implementations
//!
//! Contains the concrete implementations of the `Speaker` trait and the
//! weak device handle they share.

pub mod cloud;
pub mod local;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::debug;

pub use cloud::CloudSpeaker;
pub use local::LocalSpeaker;

use crate::error::SpeechError;
use crate::ports::PlaybackDevice;
use crate::types::AudioData;

/// Non-owning link from a speaker to the shared playback device
#[derive(Debug)]
pub(crate) struct DeviceLink {
    device: Weak<dyn PlaybackDevice>,
    disposed: AtomicBool,
}

impl DeviceLink {
    pub(crate) fn new(device: Weak<dyn PlaybackDevice>) -> Self {
        Self {
            device,
            disposed: AtomicBool::new(false),
        }
    }

    /// Upgrade the handle for the duration of one operation
    pub(crate) fn acquire(&self) -> Result<Arc<dyn PlaybackDevice>, SpeechError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(SpeechError::NotAvailable("speaker has been disposed".to_string()));
        }
        self.device
            .upgrade()
            .ok_or_else(|| SpeechError::NotAvailable("playback device was released".to_string()))
    }

    /// Stop the device if it is still alive
    pub(crate) fn stop(&self) {
        if let Some(device) = self.device.upgrade() {
            device.stop();
        }
    }

    /// Mark disposed; returns `false` if it already was
    pub(crate) fn dispose(&self) -> bool {
        !self.disposed.swap(true, Ordering::SeqCst)
    }

    /// Load audio, apply gain and start playback, leaving the device
    /// stopped if any step fails
    pub(crate) fn start(&self, audio: AudioData, gain_percent: u32) -> Result<(), SpeechError> {
        let device = self.acquire()?;
        debug!(
            bytes = audio.size_bytes(),
            format = ?audio.format(),
            gain_percent,
            "Handing audio to playback device"
        );

        device.set_volume(gain_percent);
        let started = device.load(audio).and_then(|()| device.play());
        if started.is_err() {
            device.stop();
        }
        started
    }
}
