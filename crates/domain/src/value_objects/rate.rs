//! Speech rate ordinal value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Coarse speech rate chosen in the UI, from 1 (slowest) to 5 (fastest)
///
/// Each speaker maps the ordinal onto its own native unit through its
/// rate table, so the ordinal itself carries no unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RateOrdinal(u8);

impl RateOrdinal {
    /// Number of rate levels every speaker must provide
    pub const LEVELS: usize = 5;

    /// Slowest rate
    pub const MIN: Self = Self(1);

    /// Fastest rate
    pub const MAX: Self = Self(5);

    /// Create a rate ordinal, rejecting values outside 1..=5
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidRate(value))
        }
    }

    /// The raw ordinal
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Zero-based index into a rate table
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl Default for RateOrdinal {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for RateOrdinal {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RateOrdinal> for u8 {
    fn from(rate: RateOrdinal) -> Self {
        rate.0
    }
}

impl fmt::Display for RateOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(RateOrdinal::new(1).unwrap(), RateOrdinal::MIN);
        assert_eq!(RateOrdinal::new(5).unwrap(), RateOrdinal::MAX);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(RateOrdinal::new(0), Err(DomainError::InvalidRate(0)));
        assert_eq!(RateOrdinal::new(6), Err(DomainError::InvalidRate(6)));
    }

    #[test]
    fn index_is_zero_based() {
        assert_eq!(RateOrdinal::MIN.index(), 0);
        assert_eq!(RateOrdinal::MAX.index(), RateOrdinal::LEVELS - 1);
    }

    #[test]
    fn default_is_middle_rate() {
        assert_eq!(RateOrdinal::default().value(), 3);
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<RateOrdinal>("4").is_ok());
        assert!(serde_json::from_str::<RateOrdinal>("9").is_err());
    }
}
