//! Audio handed from a speaker to the playback device

use serde::{Deserialize, Serialize};

/// Container formats a speaker can hand to the device
///
/// The local speaker always produces WAV. The cloud speaker asks for its
/// configured `output_format` and trusts the response `Content-Type` when
/// it names a known format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    /// Opus in an Ogg container
    Opus,
    Flac,
    /// AAC in an MP4 container
    M4a,
}

impl AudioFormat {
    /// File extension used for the temporary file the player opens
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Opus => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
        }
    }

    /// Value of the speech API's `response_format` field
    #[must_use]
    pub const fn response_format(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::M4a => "aac",
        }
    }

    /// Format named by an HTTP `Content-Type`, ignoring parameters
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/opus" | "audio/ogg" => Some(Self::Opus),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/aac" | "audio/mp4" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }
}

/// Encoded audio bytes and their format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioData {
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opus_is_written_as_ogg_file() {
        assert_eq!(AudioFormat::Opus.extension(), "ogg");
        assert_eq!(AudioFormat::Opus.response_format(), "opus");
    }

    #[test]
    fn aac_uses_api_name() {
        assert_eq!(AudioFormat::M4a.response_format(), "aac");
    }

    #[test]
    fn content_type_parameters_and_case_are_ignored() {
        assert_eq!(
            AudioFormat::from_content_type("Audio/Ogg; codecs=opus"),
            Some(AudioFormat::Opus)
        );
        assert_eq!(AudioFormat::from_content_type("audio/mpeg"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_content_type("application/json"), None);
    }

    #[test]
    fn output_format_reads_lowercase_names() {
        let format: AudioFormat = serde_json::from_str("\"flac\"").unwrap();
        assert_eq!(format, AudioFormat::Flac);
    }

    #[test]
    fn empty_audio_is_reported() {
        let audio = AudioData::new(Vec::new(), AudioFormat::Wav);
        assert!(audio.is_empty());
        assert_eq!(audio.size_bytes(), 0);
    }
}
