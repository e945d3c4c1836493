//! Property-based tests for speaker quantization tables
//!
//! Every built-in speaker must translate every legal rate and volume to an
//! entry of its own tables.

use std::sync::Arc;

use ai_speech::{
    AudioData, CloudSpeakerConfig, LocalSpeakerConfig, PlaybackDevice, QuantizationTables,
    SpeakerOptions, SpeakerRegistry, SpeechError,
};
use domain::{PlayerState, RateOrdinal, ReportedState, SpeakerId, VolumePercent};
use proptest::prelude::*;
use tokio::sync::broadcast;

#[derive(Debug)]
struct SilentDevice(broadcast::Sender<ReportedState>);

impl PlaybackDevice for SilentDevice {
    fn load(&self, _audio: AudioData) -> Result<(), SpeechError> {
        Ok(())
    }

    fn play(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn stop(&self) {}

    fn set_volume(&self, _gain_percent: u32) {}

    fn state(&self) -> PlayerState {
        PlayerState::Stopped
    }

    fn subscribe(&self) -> broadcast::Receiver<ReportedState> {
        self.0.subscribe()
    }
}

fn tables_for(id: SpeakerId) -> &'static QuantizationTables {
    let cloud = CloudSpeakerConfig {
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    };
    let registry = SpeakerRegistry::with_defaults(cloud, LocalSpeakerConfig::default());
    let device: Arc<dyn PlaybackDevice> = Arc::new(SilentDevice(broadcast::channel(1).0));
    registry
        .resolve(id, &device, &SpeakerOptions::default())
        .unwrap()
        .tables()
}

fn speaker_id() -> impl Strategy<Value = SpeakerId> {
    prop_oneof![Just(SpeakerId::Cloud), Just(SpeakerId::Local)]
}

// ============================================================================
// Volume translation
// ============================================================================

mod volume_tests {
    use super::*;

    proptest! {
        #[test]
        fn translated_volume_is_a_table_entry(id in speaker_id(), v in 0u8..=100) {
            let tables = tables_for(id);
            let native = tables.volume(VolumePercent::new(v).unwrap());
            prop_assert!(tables.volumes().contains(&native));
        }

        #[test]
        fn louder_never_translates_quieter(id in speaker_id(), a in 0u8..=100, b in 0u8..=100) {
            let tables = tables_for(id);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = tables.volume(VolumePercent::new(lo).unwrap());
            let hi = tables.volume(VolumePercent::new(hi).unwrap());
            prop_assert!(lo <= hi);
        }
    }

    #[test]
    fn extremes_map_to_first_and_last_entry() {
        for id in SpeakerId::all() {
            let tables = tables_for(id);
            let volumes = tables.volumes();
            assert_eq!(tables.volume(VolumePercent::MIN), volumes[0]);
            assert_eq!(tables.volume(VolumePercent::MAX), volumes[volumes.len() - 1]);
        }
    }
}

// ============================================================================
// Rate translation
// ============================================================================

mod rate_tests {
    use super::*;

    proptest! {
        #[test]
        fn rate_uses_ordinal_minus_one(id in speaker_id(), r in 1u8..=5) {
            let tables = tables_for(id);
            let native = tables.rate(RateOrdinal::new(r).unwrap());
            prop_assert_eq!(native, tables.rates()[usize::from(r) - 1]);
        }
    }

    #[test]
    fn faster_ordinals_are_faster() {
        for id in SpeakerId::all() {
            let rates = tables_for(id).rates();
            assert!(rates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
