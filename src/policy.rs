//! Branch name gating.
//!
//! The configured pattern is compiled once per run and reused for every
//! decision. Matching is unanchored: a pattern only matches the whole branch
//! name when it carries `^` and `$` itself.

use regex::Regex;

use crate::protector::errors::ConfigError;

/// Compiled branch pattern together with the string it was built from.
#[derive(Debug, Clone)]
pub struct BranchPatternPolicy {
    pattern: String,
    regex: Regex,
}

impl BranchPatternPolicy {
    /// Compiles `pattern` into a policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` when the pattern is not a valid
    /// regular expression.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as it was configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, branch: &str) -> bool {
        self.regex.is_match(branch)
    }
}
