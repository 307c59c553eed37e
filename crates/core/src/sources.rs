//! Collaborator seams that feed the engine.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::preference::PreferenceKey;
use crate::domain::recommendation::Recommendation;
use crate::errors::ApplicationError;

/// Supplies the candidate pool. Records may carry stale or missing financial
/// fields; the engine repairs them.
pub trait CandidateSource {
    fn fetch_candidates(&self) -> Result<Vec<Recommendation>, ApplicationError>;
}

/// Supplies a user's declared interests.
pub trait PreferenceSource {
    fn user_preferences(&self, user_id: &str) -> Result<Vec<PreferenceKey>, ApplicationError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidates {
    candidates: Vec<Recommendation>,
}

impl InMemoryCandidates {
    pub fn new(candidates: Vec<Recommendation>) -> Self {
        Self { candidates }
    }
}

impl CandidateSource for InMemoryCandidates {
    fn fetch_candidates(&self) -> Result<Vec<Recommendation>, ApplicationError> {
        Ok(self.candidates.clone())
    }
}

/// Reads a JSON array of recommendation records from disk.
#[derive(Debug, Clone)]
pub struct JsonFileCandidates {
    path: PathBuf,
}

impl JsonFileCandidates {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CandidateSource for JsonFileCandidates {
    fn fetch_candidates(&self) -> Result<Vec<Recommendation>, ApplicationError> {
        let raw = fs::read_to_string(&self.path).map_err(|error| {
            ApplicationError::Input(format!(
                "could not read candidates file `{}`: {error}",
                self.path.display()
            ))
        })?;

        let candidates: Vec<Recommendation> = serde_json::from_str(&raw).map_err(|error| {
            ApplicationError::Input(format!(
                "could not parse candidates file `{}`: {error}",
                self.path.display()
            ))
        })?;

        debug!(
            event_name = "sources.candidates.loaded",
            path = %self.path.display(),
            candidate_count = candidates.len(),
            "candidates loaded from file"
        );

        Ok(candidates)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPreferences {
    by_user: HashMap<String, Vec<PreferenceKey>>,
}

impl StaticPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>, preferences: Vec<PreferenceKey>) -> Self {
        self.by_user.insert(user_id.into(), preferences);
        self
    }
}

impl PreferenceSource for StaticPreferences {
    /// Unknown users have no declared interests.
    fn user_preferences(&self, user_id: &str) -> Result<Vec<PreferenceKey>, ApplicationError> {
        Ok(self.by_user.get(user_id).cloned().unwrap_or_default())
    }
}
