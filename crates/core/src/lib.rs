pub mod config;
pub mod domain;
pub mod errors;
pub mod relevance;
pub mod sources;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::matching::{
    MatchResult, MatchSource, MatchStrategy, PreferenceBuckets, RecommendationOutcome,
};
pub use domain::preference::{PreferenceKey, KNOWN_PREFERENCE_KEYS};
pub use domain::recommendation::{Priority, Recommendation, RecommendationId};
pub use errors::{ApplicationError, Diagnostic};
pub use relevance::{
    recommend, EngineSettings, MatchEvaluator, MatchThresholds, RelevanceEngine, RelevanceFilter,
};
pub use sources::{
    CandidateSource, InMemoryCandidates, JsonFileCandidates, PreferenceSource, StaticPreferences,
};
