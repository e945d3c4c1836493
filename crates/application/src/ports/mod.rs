//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod speaker_config_port;
mod text_reducer;

#[cfg(test)]
pub use speaker_config_port::MockSpeakerConfigPort;
pub use speaker_config_port::{SpeakerConfigPort, SpeakerDefaults};
#[cfg(test)]
pub use text_reducer::MockTextReducer;
pub use text_reducer::{RuleSet, TextReducer};
