use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::preference::PreferenceKey;
use super::recommendation::Recommendation;
use crate::errors::Diagnostic;

/// Comparison tiers, declared in the order the evaluator tries them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    CaseInsensitive,
    Alias,
    NormalizedFormat,
    Substring,
    WordOverlap,
}

impl MatchStrategy {
    pub const CASCADE: [MatchStrategy; 6] = [
        MatchStrategy::Exact,
        MatchStrategy::CaseInsensitive,
        MatchStrategy::Alias,
        MatchStrategy::NormalizedFormat,
        MatchStrategy::Substring,
        MatchStrategy::WordOverlap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::CaseInsensitive => "case_insensitive",
            MatchStrategy::Alias => "alias",
            MatchStrategy::NormalizedFormat => "normalized_format",
            MatchStrategy::Substring => "substring",
            MatchStrategy::WordOverlap => "word_overlap",
        }
    }
}

/// Provenance of an emitted result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Matched,
    Default,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub recommendation: Recommendation,
    pub matched_preference: PreferenceKey,
    pub match_strategy: Option<MatchStrategy>,
    /// Label that satisfied the cascade; `None` for default content.
    pub matched_label: Option<String>,
    pub source: MatchSource,
}

impl MatchResult {
    pub fn matched(
        recommendation: Recommendation,
        preference: PreferenceKey,
        strategy: MatchStrategy,
        label: impl Into<String>,
    ) -> Self {
        Self {
            recommendation,
            matched_preference: preference,
            match_strategy: Some(strategy),
            matched_label: Some(label.into()),
            source: MatchSource::Matched,
        }
    }

    pub fn default_content(recommendation: Recommendation, preference: PreferenceKey) -> Self {
        Self {
            recommendation,
            matched_preference: preference,
            match_strategy: None,
            matched_label: None,
            source: MatchSource::Default,
        }
    }
}

/// Per-preference buckets in caller order.
pub type PreferenceBuckets = IndexMap<PreferenceKey, Vec<MatchResult>>;

/// Final output of the fallback composer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutcome {
    pub results: Vec<MatchResult>,
    pub total_estimated_savings: f64,
    pub savings_by_preference: IndexMap<PreferenceKey, f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl RecommendationOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|result| result.source == MatchSource::Matched).count()
    }

    pub fn default_count(&self) -> usize {
        self.results.iter().filter(|result| result.source == MatchSource::Default).count()
    }
}
