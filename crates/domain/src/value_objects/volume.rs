//! Volume percentage value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Volume chosen in the UI as a percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Silent
    pub const MIN: Self = Self(0);

    /// Full volume
    pub const MAX: Self = Self(100);

    /// Create a volume percentage, rejecting values above 100
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value <= 100 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidVolume(value))
        }
    }

    /// The raw percentage
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Index into a table of `levels` discrete volume steps
    ///
    /// Computes `floor(v * levels / 100)` and clamps to the last level, so
    /// 100% selects the loudest step instead of running past the table.
    /// Returns 0 when `levels` is 0.
    #[must_use]
    pub const fn level_index(self, levels: usize) -> usize {
        if levels == 0 {
            return 0;
        }
        let index = self.0 as usize * levels / 100;
        if index >= levels { levels - 1 } else { index }
    }
}

impl Default for VolumePercent {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u8> for VolumePercent {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VolumePercent> for u8 {
    fn from(volume: VolumePercent) -> Self {
        volume.0
    }
}

impl fmt::Display for VolumePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
