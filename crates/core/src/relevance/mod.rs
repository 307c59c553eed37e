//! Recommendation Relevance Matching & Fallback Engine
//!
//! Matches declared category preferences against candidate recommendations
//! tagged with inconsistent category labels, and guarantees a non-empty,
//! relevance-ordered result by backfilling from a static default catalog.

pub mod aliases;
pub mod composer;
pub mod defaults;
pub mod evaluator;
pub mod filter;
pub mod financial;
pub mod normalizer;

pub use aliases::{aliases_for, PreferenceMap};
pub use composer::{recommend, EngineSettings, RelevanceEngine};
pub use defaults::{defaults_for, DefaultCatalog, CATALOG_VERSION};
pub use evaluator::{matches, MatchEvaluator, MatchExplanation, MatchThresholds};
pub use filter::{filter, FilterReport, RelevanceFilter};
pub use financial::{FinancialEstimate, FinancialNormalizer, FinancialRepair};
pub use normalizer::{normalize, NormalizedLabel};

/// Minimum length of the contained string for the substring tier.
pub const DEFAULT_MIN_SUBSTRING_LEN: usize = 4;

/// Minimum length of a shared token for the word-overlap tier.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 4;

/// Payback assigned when savings are zero.
pub const DEFAULT_PAYBACK_YEARS: f64 = 10.0;
