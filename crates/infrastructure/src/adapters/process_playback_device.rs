//! Playback device backed by an external audio player process
//!
//! Loaded audio is written to a temporary file. `play` launches the
//! configured player on it; `pause` remembers how far playback got and
//! terminates the player so that the next `play` resumes from there.
//! A watcher task per player process reports natural completion.

use std::io::Write;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use ai_speech::{AudioData, PlaybackDevice, SpeechError};
use domain::{PlayerState, ReportedState};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::config::PlayerConfig;

/// Capacity of the notification channel
const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Inner {
    state: PlayerState,
    audio: Option<NamedTempFile>,
    gain: u32,
    /// Position reached before the last pause
    offset: Duration,
    started_at: Option<Instant>,
    /// Bumped whenever the running player is abandoned
    generation: u64,
    kill: Option<oneshot::Sender<()>>,
}

impl Inner {
    /// Abandon the running player, if any
    fn halt(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        // Dropping the sender tells the watcher to kill the process
        self.kill.take();
    }

    fn rewind(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = None;
    }
}

/// Shared audio player driving an external program such as `ffplay`
#[derive(Debug)]
pub struct ProcessPlaybackDevice {
    config: PlayerConfig,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<ReportedState>,
    runtime: Handle,
}

impl ProcessPlaybackDevice {
    /// Create a stopped device
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the player configuration is
    /// invalid, or `SpeechError::Device` when called outside a Tokio
    /// runtime.
    pub fn new(config: PlayerConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let runtime = Handle::try_current()
            .map_err(|e| SpeechError::Device(format!("no async runtime available: {e}")))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        info!(program = %config.program, "Process playback device ready");

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                state: PlayerState::Stopped,
                audio: None,
                gain: 100,
                offset: Duration::ZERO,
                started_at: None,
                generation: 0,
                kill: None,
            })),
            events,
            runtime,
        })
    }

    /// Create a device behind an `Arc`
    ///
    /// # Errors
    ///
    /// See [`ProcessPlaybackDevice::new`].
    pub fn shared(config: PlayerConfig) -> Result<Arc<Self>, SpeechError> {
        Self::new(config).map(Arc::new)
    }

    /// Current output gain
    pub fn gain(&self) -> u32 {
        self.inner.lock().gain
    }

    fn transition(&self, inner: &mut Inner, state: PlayerState) {
        if inner.state != state {
            debug!(from = %inner.state, to = %state, "Player state changed");
            inner.state = state;
            // No subscribers is fine
            let _ = self.events.send(state.into());
        }
    }

    fn spawn_player(&self, inner: &mut Inner) -> Result<(), SpeechError> {
        let path = inner
            .audio
            .as_ref()
            .ok_or_else(|| SpeechError::Device("no audio loaded".to_string()))?
            .path()
            .to_string_lossy()
            .into_owned();
        let args = self
            .config
            .render_args(&path, inner.offset.as_secs_f64(), inner.gain);

        let child = {
            let _guard = self.runtime.enter();
            Command::new(&self.config.program)
                .args(&args)
                .stdin(std::process::Stdio::null())
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        SpeechError::Device(format!(
                            "audio player '{}' not found",
                            self.config.program
                        ))
                    } else {
                        SpeechError::Device(format!("failed to start audio player: {e}"))
                    }
                })?
        };

        inner.halt();
        let (kill_tx, kill_rx) = oneshot::channel();
        inner.kill = Some(kill_tx);
        inner.started_at = Some(Instant::now());

        self.runtime.spawn(watch_player(
            child,
            kill_rx,
            Arc::downgrade(&self.inner),
            self.events.clone(),
            inner.generation,
        ));
        Ok(())
    }
}

/// Wait for the player to exit or to be told to stop
async fn watch_player(
    mut child: Child,
    kill: oneshot::Receiver<()>,
    inner: Weak<Mutex<Inner>>,
    events: broadcast::Sender<ReportedState>,
    generation: u64,
) {
    tokio::select! {
        status = child.wait() => {
            match status {
                Ok(status) if !status.success() => {
                    warn!(%status, "Audio player exited with failure");
                },
                Ok(_) => debug!("Audio player finished"),
                Err(e) => warn!(error = %e, "Failed to wait for audio player"),
            }

            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut inner = inner.lock();
            if inner.generation == generation && inner.state == PlayerState::Playing {
                inner.kill = None;
                inner.rewind();
                inner.state = PlayerState::Stopped;
                let _ = events.send(PlayerState::Stopped.into());
            }
        },
        _ = kill => {
            if let Err(e) = child.kill().await {
                debug!(error = %e, "Audio player already gone");
            }
        },
    }
}

impl PlaybackDevice for ProcessPlaybackDevice {
    #[instrument(skip(self, audio), fields(bytes = audio.size_bytes(), format = ?audio.format()))]
    fn load(&self, audio: AudioData) -> Result<(), SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::Device("refusing to load empty audio".to_string()));
        }

        let mut file = tempfile::Builder::new()
            .prefix("narrator-")
            .suffix(&format!(".{}", audio.format().extension()))
            .tempfile()
            .map_err(|e| SpeechError::Device(format!("failed to create audio file: {e}")))?;
        file.write_all(audio.data())
            .and_then(|()| file.flush())
            .map_err(|e| SpeechError::Device(format!("failed to write audio file: {e}")))?;

        let mut inner = self.inner.lock();
        inner.halt();
        inner.rewind();
        inner.audio = Some(file);
        self.transition(&mut inner, PlayerState::Stopped);
        Ok(())
    }

    fn play(&self) -> Result<(), SpeechError> {
        let mut inner = self.inner.lock();
        if inner.state == PlayerState::Playing {
            return Ok(());
        }
        self.spawn_player(&mut inner)?;
        self.transition(&mut inner, PlayerState::Playing);
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        let mut inner = self.inner.lock();
        if inner.state != PlayerState::Playing {
            return Ok(());
        }
        if let Some(started) = inner.started_at.take() {
            inner.offset += started.elapsed();
        }
        inner.halt();
        self.transition(&mut inner, PlayerState::Paused);
        Ok(())
    }

    fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.halt();
        inner.rewind();
        self.transition(&mut inner, PlayerState::Stopped);
    }

    fn set_volume(&self, gain_percent: u32) {
        // Applied the next time the player is launched
        self.inner.lock().gain = gain_percent.min(100);
    }

    fn state(&self) -> PlayerState {
        self.inner.lock().state
    }

    fn subscribe(&self) -> broadcast::Receiver<ReportedState> {
        self.events.subscribe()
    }
}

impl Drop for ProcessPlaybackDevice {
    fn drop(&mut self) {
        self.inner.lock().halt();
    }
}
