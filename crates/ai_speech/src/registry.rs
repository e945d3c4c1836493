//! Speaker registry
//!
//! Maps each [`SpeakerId`] to a constructor so speakers can be swapped at
//! runtime without the caller knowing the concrete backend types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use domain::SpeakerId;
use tracing::{debug, instrument};

use crate::config::{CloudSpeakerConfig, LocalSpeakerConfig};
use crate::error::SpeechError;
use crate::ports::{PlaybackDevice, Speaker};
use crate::providers::{CloudSpeaker, LocalSpeaker};

/// Everything a constructor receives when building a speaker
#[derive(Debug, Clone)]
pub struct SpeakerContext {
    /// Non-owning handle to the shared playback device
    pub player: Weak<dyn PlaybackDevice>,
    /// Optional credentials profile name
    pub profile: Option<String>,
}

/// Caller-supplied options for [`SpeakerRegistry::resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerOptions {
    /// Credentials profile for backends that need one
    pub profile: Option<String>,
}

impl SpeakerOptions {
    /// Options selecting a credentials profile
    #[must_use]
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
        }
    }
}

/// Constructor for one speaker identity
pub type SpeakerFactory =
    Box<dyn Fn(SpeakerContext) -> Result<Box<dyn Speaker>, SpeechError> + Send + Sync>;

/// Registry of speaker constructors keyed by identity
#[derive(Default)]
pub struct SpeakerRegistry {
    factories: BTreeMap<SpeakerId, SpeakerFactory>,
}

impl fmt::Debug for SpeakerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeakerRegistry")
            .field("identities", &self.identities())
            .finish()
    }
}

impl SpeakerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with both built-in speakers
    #[must_use]
    pub fn with_defaults(cloud: CloudSpeakerConfig, local: LocalSpeakerConfig) -> Self {
        let mut registry = Self::new();

        registry.register(
            SpeakerId::Cloud,
            Box::new(move |ctx: SpeakerContext| {
                let speaker = CloudSpeaker::new(cloud.clone(), ctx.player, ctx.profile.as_deref())?;
                Ok(Box::new(speaker) as Box<dyn Speaker>)
            }),
        );
        registry.register(
            SpeakerId::Local,
            Box::new(move |ctx: SpeakerContext| {
                let speaker = LocalSpeaker::new(local.clone(), ctx.player)?;
                Ok(Box::new(speaker) as Box<dyn Speaker>)
            }),
        );

        registry
    }

    /// Register a constructor, replacing any previous one for `id`
    pub fn register(&mut self, id: SpeakerId, factory: SpeakerFactory) {
        if self.factories.insert(id, factory).is_some() {
            debug!(speaker = %id, "Replaced speaker constructor");
        }
    }

    /// Build the speaker registered for `id`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::UnknownSpeaker` if `id` is not registered, or
    /// whatever the constructor returns.
    #[instrument(skip(self, player))]
    pub fn resolve(
        &self,
        id: SpeakerId,
        player: &Arc<dyn PlaybackDevice>,
        options: &SpeakerOptions,
    ) -> Result<Box<dyn Speaker>, SpeechError> {
        let factory = self
            .factories
            .get(&id)
            .ok_or_else(|| SpeechError::UnknownSpeaker(id.name().to_string()))?;

        let speaker = factory(SpeakerContext {
            player: Arc::downgrade(player),
            profile: options.profile.clone(),
        })?;
        debug!(speaker = %id, "Speaker resolved");
        Ok(speaker)
    }

    /// Build a speaker from its name (`CloudSpeaker`, `local`, ...)
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::UnknownSpeaker` if the name matches no
    /// registered identity.
    pub fn resolve_named(
        &self,
        name: &str,
        player: &Arc<dyn PlaybackDevice>,
        options: &SpeakerOptions,
    ) -> Result<Box<dyn Speaker>, SpeechError> {
        let id = name
            .parse::<SpeakerId>()
            .map_err(|_| SpeechError::UnknownSpeaker(name.to_string()))?;
        self.resolve(id, player, options)
    }

    /// Registered identities in order
    #[must_use]
    pub fn identities(&self) -> Vec<SpeakerId> {
        self.factories.keys().copied().collect()
    }

    /// Whether `id` has a constructor
    #[must_use]
    pub fn contains(&self, id: SpeakerId) -> bool {
        self.factories.contains_key(&id)
    }
}
