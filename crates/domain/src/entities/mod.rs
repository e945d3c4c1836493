//! Domain entities - Objects with identity and lifecycle

mod playback_request;
mod speech_settings;

pub use playback_request::{PlaybackRequest, PlaybackRequestId};
pub use speech_settings::SpeechSettings;
