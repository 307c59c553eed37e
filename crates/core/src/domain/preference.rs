use std::fmt;

use serde::{Deserialize, Serialize};

/// Preference keys the engine ships alias rows and default content for.
pub const KNOWN_PREFERENCE_KEYS: &[&str] = &[
    "hvac",
    "lighting",
    "insulation",
    "windows_doors",
    "appliances",
    "water_heating",
    "smart_home",
    "renewable",
];

/// Identifier for a user-selected interest category.
///
/// The raw text is kept as supplied so the exact-match tier can compare it
/// byte-for-byte; table lookups go through [`PreferenceKey::canonical`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceKey(String);

impl PreferenceKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Underscore-separated lower-case form used to address the static tables.
    pub fn canonical(&self) -> String {
        self.0
            .trim()
            .to_lowercase()
            .replace('-', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Parse a comma-separated list, skipping blank entries.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PreferenceKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PreferenceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
