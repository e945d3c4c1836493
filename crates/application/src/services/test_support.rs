//! Scripted speakers for service tests
//!
//! Text containing `fail` makes synthesis fail; text containing `slow`
//! makes it hang until cancelled.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use ai_speech::{
    AudioData, AudioFormat, PlaybackDevice, QuantizationTables, Speaker, SpeakerRegistry,
    SpeechError,
};
use async_trait::async_trait;
use domain::{PlaybackRequest, RateOrdinal, SpeakerId, VolumePercent};

/// Rates and volumes equal to their inputs, so tests can read them back
static IDENTITY_TABLES: QuantizationTables = QuantizationTables::new(
    [1, 2, 3, 4, 5],
    &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
        24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45,
        46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67,
        68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89,
        90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100,
    ],
);

/// Shared, ordered record of speaker calls
#[derive(Debug, Clone, Default)]
pub struct SpeakerLog(Arc<Mutex<Vec<String>>>);

impl SpeakerLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

#[derive(Debug)]
pub struct ScriptedSpeaker {
    id: SpeakerId,
    device: Weak<dyn PlaybackDevice>,
    log: SpeakerLog,
}

#[async_trait]
impl Speaker for ScriptedSpeaker {
    fn id(&self) -> SpeakerId {
        self.id
    }

    fn tables(&self) -> &'static QuantizationTables {
        &IDENTITY_TABLES
    }

    async fn synthesize(
        &self,
        text: &str,
        rate: RateOrdinal,
        volume: VolumePercent,
        voice: &str,
    ) -> Result<PlaybackRequest, SpeechError> {
        let device = self
            .device
            .upgrade()
            .ok_or_else(|| SpeechError::NotAvailable("device released".to_string()))?;
        device.stop();

        if text.contains("slow") {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if text.contains("fail") {
            return Err(SpeechError::SynthesisFailed("scripted failure".to_string()));
        }

        self.log.push(format!("synthesize:{}:{text}", self.id));
        let native = IDENTITY_TABLES.translate(rate, volume);
        device.load(AudioData::new(text.as_bytes().to_vec(), AudioFormat::Wav))?;
        device.play()?;

        Ok(PlaybackRequest::new(
            self.id,
            voice,
            native.rate,
            native.volume,
            text.chars().count(),
        ))
    }

    fn stop(&self) {
        self.log.push(format!("stop:{}", self.id));
        if let Some(device) = self.device.upgrade() {
            device.stop();
        }
    }

    fn dispose(&self) {
        self.log.push(format!("dispose:{}", self.id));
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn default_voice(&self) -> &str {
        "default"
    }
}

/// Register a scripted speaker for `id`
pub fn register_scripted(registry: &mut SpeakerRegistry, id: SpeakerId, log: &SpeakerLog) {
    let log = log.clone();
    registry.register(
        id,
        Box::new(move |ctx| {
            log.push(format!("created:{id}"));
            Ok(Box::new(ScriptedSpeaker {
                id,
                device: ctx.player,
                log: log.clone(),
            }) as Box<dyn Speaker>)
        }),
    );
}

/// Registry with scripted speakers for both identities
pub fn scripted_registry(log: &SpeakerLog) -> SpeakerRegistry {
    let mut registry = SpeakerRegistry::new();
    for id in SpeakerId::all() {
        register_scripted(&mut registry, id, log);
    }
    registry
}
