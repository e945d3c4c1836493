//! In-memory playback device for tests
//!
//! Records every call and pushes state notifications exactly like a real
//! device would, without producing sound.

use std::sync::Arc;

use domain::{PlayerState, ReportedState};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::SpeechError;
use crate::ports::PlaybackDevice;
use crate::types::{AudioData, AudioFormat};

/// A call made against [`MemoryDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCall {
    /// Audio of the given size and format was loaded
    Load(usize, AudioFormat),
    /// `play` was called
    Play,
    /// `pause` was called
    Pause,
    /// `stop` was called
    Stop,
    /// Gain was set
    SetVolume(u32),
}

#[derive(Debug)]
struct Inner {
    state: PlayerState,
    loaded: Option<AudioData>,
    volume: u32,
    calls: Vec<DeviceCall>,
    fail_next_play: bool,
}

/// Playback device that keeps everything in memory
#[derive(Debug)]
pub struct MemoryDevice {
    inner: Mutex<Inner>,
    events: broadcast::Sender<ReportedState>,
}

impl Default for MemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDevice {
    /// Create a stopped device with full gain
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(Inner {
                state: PlayerState::Stopped,
                loaded: None,
                volume: 100,
                calls: Vec::new(),
                fail_next_play: false,
            }),
            events,
        }
    }

    /// Create a device behind an `Arc`
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// All calls so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.inner.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Currently loaded audio
    #[must_use]
    pub fn loaded(&self) -> Option<AudioData> {
        self.inner.lock().loaded.clone()
    }

    /// Current gain
    #[must_use]
    pub fn volume(&self) -> u32 {
        self.inner.lock().volume
    }

    /// Make the next `play` fail
    pub fn fail_next_play(&self) {
        self.inner.lock().fail_next_play = true;
    }

    /// Simulate the audio running out
    pub fn finish(&self) {
        let mut inner = self.inner.lock();
        self.transition(&mut inner, PlayerState::Stopped);
    }

    /// Push an arbitrary state code to subscribers
    pub fn emit_raw(&self, code: u8) {
        let _ = self.events.send(ReportedState(code));
    }

    fn transition(&self, inner: &mut Inner, state: PlayerState) {
        if inner.state != state {
            inner.state = state;
            // No subscribers is fine
            let _ = self.events.send(state.into());
        }
    }
}

impl PlaybackDevice for MemoryDevice {
    fn load(&self, audio: AudioData) -> Result<(), SpeechError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(DeviceCall::Load(audio.size_bytes(), audio.format()));
        self.transition(&mut inner, PlayerState::Stopped);
        inner.loaded = Some(audio);
        Ok(())
    }

    fn play(&self) -> Result<(), SpeechError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DeviceCall::Play);
        if std::mem::take(&mut inner.fail_next_play) {
            return Err(SpeechError::Device("simulated play failure".to_string()));
        }
        if inner.loaded.is_none() {
            return Err(SpeechError::Device("no audio loaded".to_string()));
        }
        self.transition(&mut inner, PlayerState::Playing);
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DeviceCall::Pause);
        if inner.state == PlayerState::Playing {
            self.transition(&mut inner, PlayerState::Paused);
        }
        Ok(())
    }

    fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.calls.push(DeviceCall::Stop);
        self.transition(&mut inner, PlayerState::Stopped);
    }

    fn set_volume(&self, gain_percent: u32) {
        let mut inner = self.inner.lock();
        inner.calls.push(DeviceCall::SetVolume(gain_percent));
        inner.volume = gain_percent.min(100);
    }

    fn state(&self) -> PlayerState {
        self.inner.lock().state
    }

    fn subscribe(&self) -> broadcast::Receiver<ReportedState> {
        self.events.subscribe()
    }
}
