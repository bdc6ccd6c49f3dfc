use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A configuration name (pipeline, group, stage, role) compared without
/// regard to case.
///
/// The original spelling is preserved for display and serialization;
/// equality, ordering and hashing all operate on the lowercased form, so
/// `Production` and `production` are the same key in any map or set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseInsensitiveName(String);

impl CaseInsensitiveName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as originally written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lowercased form used for comparisons and lookups.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for CaseInsensitiveName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0) || self.folded() == other.folded()
    }
}

impl Eq for CaseInsensitiveName {}

impl Hash for CaseInsensitiveName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl PartialOrd for CaseInsensitiveName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CaseInsensitiveName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(&other.folded())
    }
}

impl fmt::Display for CaseInsensitiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseInsensitiveName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CaseInsensitiveName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
