//! End-to-end playback scenarios
//!
//! Drives the coordinator with the real speaker backends against an
//! in-memory playback device. The local speaker runs a shell script standing
//! in for espeak-ng; the cloud speaker points at a closed port.

use std::path::PathBuf;
use std::sync::Arc;

use ai_speech::testing::{DeviceCall, MemoryDevice};
use ai_speech::{
    AudioFormat, CloudSpeakerConfig, LocalSpeakerConfig, PlaybackDevice, SpeakerOptions,
    SpeakerRegistry,
};
use application::{
    ApplicationError, PlaybackCoordinator, SpeakerConfigPort, SpeakerDefaults, ToggleOutcome,
};
use domain::{PlayerState, RateOrdinal, SpeakerId, VoiceCatalog, VolumePercent};

#[derive(Debug)]
struct StaticConfig {
    initial: SpeakerId,
}

impl SpeakerConfigPort for StaticConfig {
    fn load_config(&self, speaker: SpeakerId) -> Result<SpeakerDefaults, ApplicationError> {
        let voices = match speaker {
            SpeakerId::Cloud => VoiceCatalog::new().with_language("en", ["nova", "alloy"]),
            SpeakerId::Local => VoiceCatalog::new().with_language("en", ["en-us", "en-gb"]),
        };
        Ok(SpeakerDefaults {
            rate: RateOrdinal::default(),
            volume: VolumePercent::default(),
            language: "en".to_string(),
            voices,
        })
    }

    fn default_speaker(&self) -> SpeakerId {
        self.initial
    }
}

#[cfg(unix)]
fn fake_espeak(dir: &tempfile::TempDir) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("espeak-ng");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> {}\ncat > /dev/null\nprintf 'RIFF0000WAVE'\n",
        dir.path().join("calls").display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn coordinator(
    initial: SpeakerId,
    executable: PathBuf,
    device: &Arc<MemoryDevice>,
) -> PlaybackCoordinator {
    let cloud = CloudSpeakerConfig {
        api_key: Some("sk-test".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_ms: 2000,
        ..Default::default()
    };
    let local = LocalSpeakerConfig {
        executable,
        default_voice: "en".to_string(),
    };
    let shared: Arc<dyn PlaybackDevice> = device.clone();
    PlaybackCoordinator::new(
        SpeakerRegistry::with_defaults(cloud, local),
        shared,
        Arc::new(StaticConfig { initial }),
        SpeakerOptions::default(),
    )
    .unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn local_read_at_middle_settings() {
    let dir = tempfile::tempdir().unwrap();
    let device = MemoryDevice::shared();
    let mut coordinator = coordinator(SpeakerId::Local, fake_espeak(&dir), &device);

    let request = coordinator.read("Hello there").await.unwrap();

    assert_eq!(request.native_rate, 175);
    assert_eq!(request.native_volume, 100);
    assert_eq!(request.voice, "en-us");

    let calls = std::fs::read_to_string(dir.path().join("calls")).unwrap();
    assert_eq!(calls.trim(), "--stdout -s 175 -a 100 -v en-us --stdin");

    assert_eq!(device.state(), PlayerState::Playing);
    assert_eq!(device.loaded().unwrap().format(), AudioFormat::Wav);
    assert!(device.calls().contains(&DeviceCall::SetVolume(100)));
}

#[cfg(unix)]
#[tokio::test]
async fn read_twice_leaves_one_active_utterance() {
    let dir = tempfile::tempdir().unwrap();
    let device = MemoryDevice::shared();
    let mut coordinator = coordinator(SpeakerId::Local, fake_espeak(&dir), &device);

    coordinator.read("First").await.unwrap();
    device.clear_calls();
    coordinator.read("Second").await.unwrap();

    let calls = device.calls();
    let stop = calls.iter().position(|c| *c == DeviceCall::Stop).unwrap();
    let play = calls.iter().position(|c| *c == DeviceCall::Play).unwrap();
    assert!(stop < play);
    assert_eq!(calls.iter().filter(|c| **c == DeviceCall::Play).count(), 1);
    assert_eq!(device.state(), PlayerState::Playing);
}

#[cfg(unix)]
#[tokio::test]
async fn change_speaker_mid_utterance() {
    let dir = tempfile::tempdir().unwrap();
    let device = MemoryDevice::shared();
    let mut coordinator = coordinator(SpeakerId::Local, fake_espeak(&dir), &device);
    coordinator.set_rate(4).unwrap();

    coordinator.read("Long local text").await.unwrap();
    assert_eq!(device.state(), PlayerState::Playing);

    coordinator.change_speaker(SpeakerId::Cloud).unwrap();

    assert_eq!(device.state(), PlayerState::Stopped);
    assert_eq!(coordinator.active_speaker(), Some(SpeakerId::Cloud));
    assert_eq!(coordinator.settings().rate.value(), 4);
    assert_eq!(coordinator.settings().voice, "nova");
}

#[tokio::test]
async fn cloud_network_failure_surfaces_as_synthesis_error() {
    let device = MemoryDevice::shared();
    let mut coordinator = coordinator(SpeakerId::Cloud, PathBuf::from("espeak-ng"), &device);

    let result = coordinator.read("Hello").await;

    assert!(matches!(result, Err(ApplicationError::Synthesis(_))));
    assert!(coordinator.last_request().is_none());
    assert_eq!(device.state(), PlayerState::Stopped);
    assert_eq!(coordinator.toggle().unwrap(), ToggleOutcome::Ignored);
}

#[tokio::test]
async fn missing_local_synthesizer_surfaces_as_synthesis_error() {
    let device = MemoryDevice::shared();
    let mut coordinator = coordinator(
        SpeakerId::Local,
        PathBuf::from("/nonexistent/espeak-ng"),
        &device,
    );

    let err = coordinator.read("Hello").await.unwrap_err();

    assert!(err.is_synthesis());
    assert_eq!(device.state(), PlayerState::Stopped);
}
