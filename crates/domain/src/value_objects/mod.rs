//! Value Objects - Immutable, identity-less domain primitives

mod player_state;
mod rate;
mod speaker_id;
mod voice_catalog;
mod volume;

pub use player_state::{PlayerState, ReportedState};
pub use rate::RateOrdinal;
pub use speaker_id::SpeakerId;
pub use voice_catalog::VoiceCatalog;
pub use volume::VolumePercent;
