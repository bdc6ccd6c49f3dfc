use std::fmt;
use std::sync::OnceLock;

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// A case-insensitive wildcard pattern matched against resource identifiers.
///
/// `*` matches any sequence of characters, including none. Compilation is
/// deferred until the first match and cached. A pattern that cannot be
/// compiled (or that was flagged as malformed when the directive was parsed)
/// never matches anything; [`ResourcePattern::validate`] reports the
/// underlying problem so configuration can be rejected at save time.
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourcePattern {
    raw: String,
    invalid: Option<String>,
    matcher: OnceLock<Option<GlobMatcher>>,
}

impl ResourcePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            invalid: None,
            matcher: OnceLock::new(),
        }
    }

    /// The pattern that matches every resource.
    pub fn any() -> Self {
        Self::new("*")
    }

    /// A pattern known to be malformed at parse time. Never matches.
    pub(crate) fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            invalid: Some(reason.into()),
            matcher: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_any(&self) -> bool {
        self.invalid.is_none() && self.raw == "*"
    }

    fn compiled(&self) -> Option<&GlobMatcher> {
        if self.invalid.is_some() {
            return None;
        }
        self.matcher
            .get_or_init(|| {
                GlobBuilder::new(&self.raw)
                    .case_insensitive(true)
                    .build()
                    .map(|glob| glob.compile_matcher())
                    .map_err(|e| {
                        tracing::warn!("resource pattern '{}' does not compile: {}", self.raw, e);
                        e
                    })
                    .ok()
            })
            .as_ref()
    }

    /// Whether `value` matches this pattern. Total: malformed patterns
    /// simply never match.
    pub fn matches(&self, value: &str) -> bool {
        if self.is_any() {
            return true;
        }
        match self.compiled() {
            Some(matcher) => matcher.is_match(value),
            None => false,
        }
    }

    /// Surface compile/split problems for configuration validation.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if let Some(reason) = &self.invalid {
            return Err(PolicyError::InvalidPattern {
                pattern: self.raw.clone(),
                reason: reason.clone(),
            });
        }
        GlobBuilder::new(&self.raw)
            .case_insensitive(true)
            .build()
            .map(|_| ())
            .map_err(|e| PolicyError::InvalidPattern {
                pattern: self.raw.clone(),
                reason: e.to_string(),
            })
    }
}

impl Clone for ResourcePattern {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            invalid: self.invalid.clone(),
            // The compiled matcher is a cache; recompile on demand.
            matcher: OnceLock::new(),
        }
    }
}

impl PartialEq for ResourcePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.invalid == other.invalid
    }
}

impl Eq for ResourcePattern {}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Default for ResourcePattern {
    fn default() -> Self {
        Self::any()
    }
}

impl From<String> for ResourcePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for ResourcePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<ResourcePattern> for String {
    fn from(pattern: ResourcePattern) -> Self {
        pattern.raw
    }
}
