//! Regex text cleaning - Implements TextReducer with rule sets from TOML
//!
//! A rules file holds up to three arrays of tables:
//!
//! ```toml
//! [[wiki]]
//! pattern = '\[\d+\]'
//! replacement = ""
//!
//! [[reduce]]
//! pattern = '\s+'
//! replacement = " "
//! ```
//!
//! A set present in the file replaces the built-in rules for that set.
//! Sets missing from the file keep their built-in rules.

use std::fmt;
use std::path::Path;

use application::{ApplicationError, RuleSet, TextReducer};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Built-in wiki rules: citation markers
const WIKI_DEFAULTS: &[(&str, &str)] = &[
    (r"(?i)\[citation needed\]", ""),
    (r"\[\d+\]", ""),
];

/// Built-in cite rules: `(Author, 2001)` parentheticals
const CITE_DEFAULTS: &[(&str, &str)] = &[(r"\s*\([A-Z][^()]*?,\s*\d{4}[a-z]?\)", "")];

/// Built-in reduce rules: whitespace runs
const REDUCE_DEFAULTS: &[(&str, &str)] = &[(r"\s+", " ")];

#[derive(Debug, Deserialize)]
struct RuleSpec {
    pattern: String,
    #[serde(default)]
    replacement: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    reduce: Option<Vec<RuleSpec>>,
    wiki: Option<Vec<RuleSpec>>,
    cite: Option<Vec<RuleSpec>>,
}

/// One compiled substitution
struct Rule {
    regex: Regex,
    replacement: String,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.regex.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}

impl Rule {
    fn compile(set: RuleSet, pattern: &str, replacement: &str) -> Result<Self, ApplicationError> {
        let regex = Regex::new(pattern).map_err(|e| {
            ApplicationError::Configuration(format!("invalid {set} rule '{pattern}': {e}"))
        })?;
        Ok(Self {
            regex,
            replacement: replacement.to_string(),
        })
    }
}

fn compile_all<'a>(
    set: RuleSet,
    rules: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<Rule>, ApplicationError> {
    rules
        .into_iter()
        .map(|(pattern, replacement)| Rule::compile(set, pattern, replacement))
        .collect()
}

/// Rules from the file when the set is present, built-in rules otherwise
fn build_set(
    set: RuleSet,
    specs: Option<Vec<RuleSpec>>,
    defaults: &[(&str, &str)],
) -> Result<Vec<Rule>, ApplicationError> {
    match specs {
        Some(specs) => compile_all(
            set,
            specs
                .iter()
                .map(|s| (s.pattern.as_str(), s.replacement.as_str())),
        ),
        None => compile_all(set, defaults.iter().copied()),
    }
}

/// Text reducer applying ordered regex substitutions per rule set
#[derive(Debug)]
pub struct RegexTextParser {
    reduce: Vec<Rule>,
    wiki: Vec<Rule>,
    cite: Vec<Rule>,
}

impl RegexTextParser {
    /// Parser with the built-in rules
    ///
    /// # Errors
    ///
    /// Never fails for the shipped patterns; the `Result` keeps one
    /// construction path for built-in and loaded rules.
    pub fn with_defaults() -> Result<Self, ApplicationError> {
        Self::from_rule_file(RuleFile::default())
    }

    /// Parse rules from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for malformed TOML or a
    /// pattern that does not compile.
    pub fn from_toml_str(content: &str) -> Result<Self, ApplicationError> {
        let file: RuleFile = toml::from_str(content)
            .map_err(|e| ApplicationError::Configuration(format!("invalid rules file: {e}")))?;
        Self::from_rule_file(file)
    }

    /// Load rules from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the file cannot be read
    /// or its rules are invalid.
    #[instrument]
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApplicationError::Configuration(format!(
                "failed to read rules file {}: {e}",
                path.display()
            ))
        })?;
        let parser = Self::from_toml_str(&content)?;
        info!(
            reduce = parser.reduce.len(),
            wiki = parser.wiki.len(),
            cite = parser.cite.len(),
            "Loaded text rules"
        );
        Ok(parser)
    }

    /// Load from `path` when given, otherwise use the built-in rules
    ///
    /// # Errors
    ///
    /// See [`RegexTextParser::from_file`].
    pub fn load(path: Option<&Path>) -> Result<Self, ApplicationError> {
        path.map_or_else(Self::with_defaults, Self::from_file)
    }

    /// Number of rules in a set
    pub fn rule_count(&self, set: RuleSet) -> usize {
        self.rules(set).len()
    }

    fn from_rule_file(file: RuleFile) -> Result<Self, ApplicationError> {
        Ok(Self {
            reduce: build_set(RuleSet::Reduce, file.reduce, REDUCE_DEFAULTS)?,
            wiki: build_set(RuleSet::Wiki, file.wiki, WIKI_DEFAULTS)?,
            cite: build_set(RuleSet::Cite, file.cite, CITE_DEFAULTS)?,
        })
    }

    fn rules(&self, set: RuleSet) -> &[Rule] {
        match set {
            RuleSet::Reduce => &self.reduce,
            RuleSet::Wiki => &self.wiki,
            RuleSet::Cite => &self.cite,
        }
    }
}

impl TextReducer for RegexTextParser {
    fn reduce(&self, text: &str, rules: RuleSet) -> String {
        let mut result = text.to_string();
        for rule in self.rules(rules) {
            result = rule
                .regex
                .replace_all(&result, rule.replacement.as_str())
                .into_owned();
        }
        let result = if rules == RuleSet::Reduce {
            result.trim().to_string()
        } else {
            result
        };
        debug!(set = %rules, before = text.len(), after = result.len(), "Text reduced");
        result
    }
}
