//! Quantization tables mapping UI controls onto backend-native units

use domain::{RateOrdinal, VolumePercent};

/// A speaker's discrete rate and volume steps, in its native units
///
/// There is exactly one rate per [`RateOrdinal`], so every ordinal has an
/// entry. The volume table may have any non-empty length; a percentage
/// selects `floor(v * N / 100)`, clamped to the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationTables {
    rates: [u32; RateOrdinal::LEVELS],
    volumes: &'static [u32],
}

/// Rate and volume translated for one backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeParams {
    /// Rate in the backend's native unit
    pub rate: u32,
    /// Volume in the backend's native unit
    pub volume: u32,
}

impl QuantizationTables {
    /// Build tables; panics at compile time when used in a const with an
    /// empty volume table
    #[must_use]
    pub const fn new(rates: [u32; RateOrdinal::LEVELS], volumes: &'static [u32]) -> Self {
        assert!(!volumes.is_empty(), "volume table must not be empty");
        Self { rates, volumes }
    }

    /// Native rate for an ordinal (`RATES[rate - 1]`)
    #[must_use]
    pub const fn rate(&self, rate: RateOrdinal) -> u32 {
        self.rates[rate.index()]
    }

    /// Native volume for a percentage
    #[must_use]
    pub const fn volume(&self, volume: VolumePercent) -> u32 {
        self.volumes[volume.level_index(self.volumes.len())]
    }

    /// Translate both controls at once
    #[must_use]
    pub const fn translate(&self, rate: RateOrdinal, volume: VolumePercent) -> NativeParams {
        NativeParams {
            rate: self.rate(rate),
            volume: self.volume(volume),
        }
    }

    /// The rate table
    #[must_use]
    pub const fn rates(&self) -> &[u32; RateOrdinal::LEVELS] {
        &self.rates
    }

    /// The volume table
    #[must_use]
    pub const fn volumes(&self) -> &'static [u32] {
        self.volumes
    }
}
