//! Per-language voice lists

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Voices available for one speaker, grouped by language
///
/// The first voice listed for a language is the one selected when the user
/// switches to that language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceCatalog(BTreeMap<String, Vec<String>>);

impl VoiceCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add voices for a language
    #[must_use]
    pub fn with_language(
        mut self,
        language: impl Into<String>,
        voices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.0.insert(
            language.into(),
            voices.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Configured languages in sorted order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Voices for a language
    pub fn voices(&self, language: &str) -> Result<&[String], DomainError> {
        self.0
            .get(language)
            .filter(|voices| !voices.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| DomainError::UnknownLanguage(language.to_string()))
    }

    /// First voice for a language
    pub fn first_voice(&self, language: &str) -> Result<&str, DomainError> {
        self.voices(language).map(|voices| voices[0].as_str())
    }

    /// Whether `voice` is listed for `language`
    #[must_use]
    pub fn contains(&self, language: &str, voice: &str) -> bool {
        self.voices(language)
            .is_ok_and(|voices| voices.iter().any(|v| v == voice))
    }

    /// Whether the catalog has no languages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VoiceCatalog {
        VoiceCatalog::new()
            .with_language("en", ["en-us", "en-gb"])
            .with_language("de", ["de"])
    }

    #[test]
    fn first_voice_is_selected_for_language() {
        assert_eq!(catalog().first_voice("en").unwrap(), "en-us");
        assert_eq!(catalog().first_voice("de").unwrap(), "de");
    }

    #[test]
    fn unknown_language_is_an_error() {
        assert_eq!(
            catalog().first_voice("fr"),
            Err(DomainError::UnknownLanguage("fr".to_string()))
        );
    }

    #[test]
    fn language_without_voices_counts_as_unknown() {
        let catalog = VoiceCatalog::new().with_language("pl", Vec::<String>::new());
        assert!(catalog.voices("pl").is_err());
    }

    #[test]
    fn contains_checks_language_scope() {
        let catalog = catalog();
        assert!(catalog.contains("en", "en-gb"));
        assert!(!catalog.contains("de", "en-gb"));
    }

    #[test]
    fn languages_are_sorted() {
        let binding = catalog();
        let languages: Vec<_> = binding.languages().collect();
        assert_eq!(languages, vec!["de", "en"]);
    }

    #[test]
    fn deserializes_from_plain_map() {
        let catalog: VoiceCatalog =
            serde_json::from_str(r#"{"en": ["alloy", "nova"]}"#).unwrap();
        assert_eq!(catalog.first_voice("en").unwrap(), "alloy");
    }
}
