//! Speaker identity value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Identity of a speech backend
///
/// The set is closed: one cloud synthesis service and one local
/// synthesizer. The canonical names are the ones shown in the speaker
/// selector and written to configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeakerId {
    /// Remote speech synthesis API
    #[serde(rename = "CloudSpeaker", alias = "cloud")]
    Cloud,
    /// Local speech synthesizer process
    #[serde(rename = "LocalSpeaker", alias = "local")]
    Local,
}

impl SpeakerId {
    /// Canonical name of the backend
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cloud => "CloudSpeaker",
            Self::Local => "LocalSpeaker",
        }
    }

    /// All identities in selector order
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Cloud, Self::Local]
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeakerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudspeaker" | "cloud" => Ok(Self::Cloud),
            "localspeaker" | "local" => Ok(Self::Local),
            _ => Err(DomainError::UnknownSpeaker(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!("CloudSpeaker".parse::<SpeakerId>(), Ok(SpeakerId::Cloud));
        assert_eq!("LocalSpeaker".parse::<SpeakerId>(), Ok(SpeakerId::Local));
    }

    #[test]
    fn parses_short_aliases_case_insensitively() {
        assert_eq!("cloud".parse::<SpeakerId>(), Ok(SpeakerId::Cloud));
        assert_eq!(" LOCAL ".parse::<SpeakerId>(), Ok(SpeakerId::Local));
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "Festival".parse::<SpeakerId>().unwrap_err();
        assert_eq!(err, DomainError::UnknownSpeaker("Festival".to_string()));
    }

    #[test]
    fn display_matches_name() {
        for id in SpeakerId::all() {
            assert_eq!(id.to_string(), id.name());
        }
    }

    #[test]
    fn serializes_canonical_name() {
        let json = serde_json::to_string(&SpeakerId::Local).unwrap();
        assert_eq!(json, "\"LocalSpeaker\"");

        let parsed: SpeakerId = serde_json::from_str("\"cloud\"").unwrap();
        assert_eq!(parsed, SpeakerId::Cloud);
    }
}
