//! Adapters - Implementations of the ports for the local machine

mod process_playback_device;
mod regex_text_parser;

pub use process_playback_device::ProcessPlaybackDevice;
pub use regex_text_parser::RegexTextParser;
