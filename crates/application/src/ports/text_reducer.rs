//! Text reducer port
//!
//! Defines the interface for rule-based text cleaning applied before a
//! text is read aloud.

use std::fmt;
use std::str::FromStr;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Named group of cleaning rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// General reduction applied before every read
    Reduce,
    /// Strip encyclopedia markup such as footnote markers
    Wiki,
    /// Strip inline citations
    Cite,
}

impl RuleSet {
    /// Name used in rule files and on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Reduce => "reduce",
            Self::Wiki => "wiki",
            Self::Cite => "cite",
        }
    }

    /// All rule sets
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Reduce, Self::Wiki, Self::Cite]
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleSet {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reduce" => Ok(Self::Reduce),
            "wiki" => Ok(Self::Wiki),
            "cite" => Ok(Self::Cite),
            other => Err(ApplicationError::TextReduction(format!(
                "Unknown rule set '{other}'"
            ))),
        }
    }
}

/// Port for text cleaning
///
/// Implementations must be pure: the same text and rule set always yield
/// the same output.
#[cfg_attr(test, automock)]
pub trait TextReducer: Send + Sync + fmt::Debug {
    /// Apply every rule of `rules` to `text`, in order
    fn reduce(&self, text: &str, rules: RuleSet) -> String;
}
