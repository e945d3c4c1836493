//! Local Speaker
//!
//! Implements `Speaker` with the espeak-ng CLI. The text is written to the
//! synthesizer's stdin and a WAV stream is read back from stdout, so the
//! resulting audio goes through the same playback device as cloud speech.
//!
//! # Prerequisites
//!
//! ```bash
//! sudo apt install espeak-ng
//! espeak-ng --voices
//! ```
//!
//! # Native units
//!
//! - Rate: words per minute (`-s`)
//! - Volume: amplitude 0-200 (`-a`)

use std::path::Path;
use std::process::Stdio;
use std::sync::Weak;

use async_trait::async_trait;
use domain::{PlaybackRequest, RateOrdinal, SpeakerId, VolumePercent};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};

use super::DeviceLink;
use crate::config::LocalSpeakerConfig;
use crate::error::SpeechError;
use crate::ports::{PlaybackDevice, Speaker};
use crate::quantize::QuantizationTables;
use crate::types::{AudioData, AudioFormat};

static LOCAL_TABLES: QuantizationTables = QuantizationTables::new(
    [100, 140, 175, 220, 280],
    &[0, 20, 40, 60, 80, 100, 120, 140, 160, 180, 200],
);

/// Device gain used for local speech; loudness is baked into the WAV
const FULL_GAIN: u32 = 100;

/// Speaker backed by a local espeak-ng process
#[derive(Debug)]
pub struct LocalSpeaker {
    config: LocalSpeakerConfig,
    player: DeviceLink,
}

impl LocalSpeaker {
    /// Create a new local speaker
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(
        config: LocalSpeakerConfig,
        player: Weak<dyn PlaybackDevice>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self {
            config,
            player: DeviceLink::new(player),
        })
    }

    /// Get the synthesizer executable path
    fn executable(&self) -> &Path {
        &self.config.executable
    }

    /// Arguments for one synthesis run
    fn arguments(voice: &str, words_per_minute: u32, amplitude: u32) -> Vec<String> {
        vec![
            "--stdout".to_string(),
            "-s".to_string(),
            words_per_minute.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
            "-v".to_string(),
            voice.to_string(),
            "--stdin".to_string(),
        ]
    }

    /// Run the synthesizer and collect its WAV output
    ///
    /// The child is killed if this future is dropped before it finishes.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn run_synthesizer(
        &self,
        text: &str,
        voice: &str,
        words_per_minute: u32,
        amplitude: u32,
    ) -> Result<Vec<u8>, SpeechError> {
        let mut cmd = Command::new(self.executable());
        cmd.args(Self::arguments(voice, words_per_minute, amplitude))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running synthesizer: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Synthesizer not found at '{}'. Please install espeak-ng.",
                    self.executable().display()
                ))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run synthesizer: {e}"))
            }
        })?;

        let stdin = child.stdin.take();
        let input = text.to_owned();
        // Feed stdin while draining stdout so large texts cannot fill both pipes
        let writer = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (written, output) = tokio::join!(writer, child.wait_with_output());
        let output = output.map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to wait for synthesizer: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Synthesizer failed: {}", stderr);
            return Err(SpeechError::SynthesisFailed(format!(
                "Synthesizer exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if let Err(e) = written {
            return Err(SpeechError::SynthesisFailed(format!(
                "Failed to write to synthesizer stdin: {e}"
            )));
        }

        if output.stdout.is_empty() {
            warn!("Synthesizer produced empty output");
            return Err(SpeechError::SynthesisFailed(
                "Synthesizer produced empty output".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Speaker for LocalSpeaker {
    fn id(&self) -> SpeakerId {
        SpeakerId::Local
    }

    fn tables(&self) -> &'static QuantizationTables {
        &LOCAL_TABLES
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
                "Cannot synthesize empty text".to_string(),
            ));
        }

        self.player.acquire()?.stop();

        let voice = if voice.trim().is_empty() {
            self.config.default_voice.as_str()
        } else {
            voice
        };
        let native = self.tables().translate(rate, volume);

        let wav = self
            .run_synthesizer(text, voice, native.rate, native.volume)
            .await?;
        self.player
            .start(AudioData::new(wav, AudioFormat::Wav), FULL_GAIN)?;

        let request = PlaybackRequest::new(
            SpeakerId::Local,
            voice,
            native.rate,
            native.volume,
            text.chars().count(),
        );
        info!(request_id = %request.id, voice, "Local speech started");
        Ok(request)
    }

    fn stop(&self) {
        self.player.stop();
    }

    fn dispose(&self) {
        if self.player.dispose() {
            debug!("Local speaker disposed");
        }
    }

    async fn is_available(&self) -> bool {
        let available = Command::new(self.executable())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|s| s.success());

        debug!(available, "Local synthesizer availability");
        available
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use domain::PlayerState;

    use super::*;
    use crate::testing::MemoryDevice;

    fn speaker_with(executable: PathBuf, device: &Arc<MemoryDevice>) -> LocalSpeaker {
        let device: Arc<dyn PlaybackDevice> = device.clone();
        let config = LocalSpeakerConfig {
            executable,
            default_voice: "en".to_string(),
        };
        LocalSpeaker::new(config, Arc::downgrade(&device)).unwrap()
    }

    /// Write an executable shell script standing in for espeak-ng
    #[cfg(unix)]
    fn fake_synthesizer(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-espeak");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn rate(value: u8) -> RateOrdinal {
        RateOrdinal::new(value).unwrap()
    }

    fn volume(value: u8) -> VolumePercent {
        VolumePercent::new(value).unwrap()
    }

    #[test]
    fn arguments_carry_native_units() {
        let args = LocalSpeaker::arguments("de", 175, 100);
        assert_eq!(
            args,
            vec!["--stdout", "-s", "175", "-a", "100", "-v", "de", "--stdin"]
        );
    }

    #[test]
    fn tables_translate_middle_settings() {
        let params = LOCAL_TABLES.translate(rate(3), volume(50));
        assert_eq!(params.rate, 175);
        assert_eq!(params.volume, 100);
    }

    #[test]
    fn full_volume_uses_loudest_amplitude() {
        assert_eq!(LOCAL_TABLES.volume(VolumePercent::MAX), 200);
    }

    #[test]
    fn new_rejects_empty_executable() {
        let device: Arc<dyn PlaybackDevice> = MemoryDevice::shared();
        let config = LocalSpeakerConfig {
            executable: PathBuf::new(),
            default_voice: "en".to_string(),
        };
        assert!(LocalSpeaker::new(config, Arc::downgrade(&device)).is_err());
    }

    #[tokio::test]
    async fn missing_executable_is_not_available() {
        let device = MemoryDevice::shared();
        let speaker = speaker_with(PathBuf::from("/nonexistent/espeak-ng"), &device);

        assert!(!speaker.is_available().await);

        let result = speaker.synthesize("Hello", rate(3), volume(50), "").await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
        assert_eq!(device.state(), PlayerState::Stopped);
    }

    #[tokio::test]
    async fn empty_text_fails() {
        let device = MemoryDevice::shared();
        let speaker = speaker_with(PathBuf::from("espeak-ng"), &device);

        let result = speaker.synthesize("", rate(3), volume(50), "").await;
        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn synthesize_passes_translated_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args");
        let script = fake_synthesizer(
            &dir,
            &format!(
                "echo \"$@\" > {}\ncat > /dev/null\nprintf 'RIFFfakeWAVE'",
                args_file.display()
            ),
        );

        let device = MemoryDevice::shared();
        let speaker = speaker_with(script, &device);

        let request = speaker
            .synthesize("Hello world", rate(3), volume(50), "en-gb")
            .await
            .unwrap();

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.trim(), "--stdout -s 175 -a 100 -v en-gb --stdin");
        assert_eq!(request.native_rate, 175);
        assert_eq!(request.native_volume, 100);
        assert_eq!(request.chars, 11);
        assert_eq!(device.state(), PlayerState::Playing);
        assert_eq!(device.loaded().unwrap().data(), b"RIFFfakeWAVE");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_synthesizer_leaves_device_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_synthesizer(&dir, "cat > /dev/null\necho 'no voice' >&2\nexit 3");

        let device = MemoryDevice::shared();
        let speaker = speaker_with(script, &device);

        let result = speaker.synthesize("Hello", rate(3), volume(50), "xx").await;
        assert!(matches!(result, Err(SpeechError::SynthesisFailed(msg)) if msg.contains("no voice")));
        assert_eq!(device.state(), PlayerState::Stopped);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_synthesizer(&dir, "cat > /dev/null");

        let device = MemoryDevice::shared();
        let speaker = speaker_with(script, &device);

        let result = speaker.synthesize("Hello", rate(3), volume(50), "").await;
        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }
}
