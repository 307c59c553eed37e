//! Top-level entry point: match, backfill from defaults, de-duplicate, total.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::aliases::PreferenceMap;
use super::defaults::DefaultCatalog;
use super::evaluator::{MatchEvaluator, MatchThresholds};
use super::filter::RelevanceFilter;
use super::financial::FinancialNormalizer;
use super::DEFAULT_PAYBACK_YEARS;
use crate::config::AppConfig;
use crate::domain::matching::{MatchResult, RecommendationOutcome};
use crate::domain::preference::PreferenceKey;
use crate::domain::recommendation::Recommendation;
use crate::errors::Diagnostic;

/// Tunables for a [`RelevanceEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub thresholds: MatchThresholds,
    pub default_payback_years: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { thresholds: MatchThresholds::default(), default_payback_years: DEFAULT_PAYBACK_YEARS }
    }
}

impl From<&AppConfig> for EngineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            thresholds: MatchThresholds {
                min_substring_len: config.matching.min_substring_len,
                min_token_len: config.matching.min_token_len,
            },
            default_payback_years: config.financial.default_payback_years,
        }
    }
}

/// Stateless composer over the process-wide alias table and default catalog.
/// Safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceEngine {
    filter: RelevanceFilter,
    catalog: &'static DefaultCatalog,
    preferences: &'static PreferenceMap,
}

impl RelevanceEngine {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        let evaluator = MatchEvaluator::with_thresholds(settings.thresholds);
        Self {
            filter: RelevanceFilter::new(
                evaluator,
                FinancialNormalizer::with_default_payback(settings.default_payback_years),
            ),
            catalog: DefaultCatalog::standard(),
            preferences: evaluator.preference_map(),
        }
    }

    pub fn evaluator(&self) -> &MatchEvaluator {
        self.filter.evaluator()
    }

    pub fn catalog(&self) -> &'static DefaultCatalog {
        self.catalog
    }

    /// Produce relevance-ordered results for `preferences`.
    ///
    /// Each preference with no matching candidate is backfilled from the
    /// default catalog before ids are de-duplicated across buckets, so a
    /// recommendation already emitted under an earlier preference is dropped
    /// from later ones without triggering a backfill. Unknown keys have no
    /// defaults and may legitimately contribute nothing.
    pub fn recommend(
        &self,
        preferences: &[PreferenceKey],
        candidates: &[Recommendation],
    ) -> RecommendationOutcome {
        let mut diagnostics = Vec::new();

        if preferences.is_empty() {
            debug!(event_name = "relevance.composer.empty_preferences", "no preferences supplied");
            diagnostics.push(Diagnostic::EmptyInput { input: "preferences".to_owned() });
            return RecommendationOutcome { diagnostics, ..RecommendationOutcome::default() };
        }
        if candidates.is_empty() {
            diagnostics.push(Diagnostic::EmptyInput { input: "candidates".to_owned() });
        }

        let mut reported = HashSet::new();
        for preference in preferences {
            if !self.preferences.is_known(preference) && reported.insert(preference) {
                warn!(
                    event_name = "relevance.preference.unknown",
                    preference = %preference,
                    "unknown preference key; only fuzzy tiers apply"
                );
                diagnostics.push(Diagnostic::InvalidPreferenceKey { key: preference.to_string() });
            }
        }

        let report = self.filter.filter_with_report(preferences, candidates);
        diagnostics.extend(report.diagnostics);

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let mut savings_by_preference = IndexMap::with_capacity(report.buckets.len());
        let mut total_estimated_savings = 0.0;

        for (preference, bucket) in report.buckets {
            let bucket = if bucket.is_empty() { self.backfill(&preference) } else { bucket };

            let mut preference_savings = 0.0;
            for result in bucket {
                if seen.insert(result.recommendation.id.clone()) {
                    preference_savings += result.recommendation.estimated_savings;
                    results.push(result);
                }
            }

            total_estimated_savings += preference_savings;
            savings_by_preference.insert(preference, preference_savings);
        }

        let outcome = RecommendationOutcome {
            results,
            total_estimated_savings,
            savings_by_preference,
            diagnostics,
        };

        info!(
            event_name = "relevance.composer.completed",
            preference_count = preferences.len(),
            candidate_count = candidates.len(),
            matched_count = outcome.matched_count(),
            default_count = outcome.default_count(),
            total_estimated_savings = outcome.total_estimated_savings,
            "recommendations composed"
        );

        outcome
    }

    fn backfill(&self, preference: &PreferenceKey) -> Vec<MatchResult> {
        let defaults = self.catalog.defaults_for(preference);
        debug!(
            event_name = "relevance.composer.backfilled",
            preference = %preference,
            default_count = defaults.len(),
            catalog_version = self.catalog.version(),
            "no candidates matched; using default recommendations"
        );

        defaults
            .into_iter()
            .map(|recommendation| MatchResult::default_content(recommendation, preference.clone()))
            .collect()
    }
}

impl Default for RelevanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose recommendations with default settings.
pub fn recommend(
    preferences: &[PreferenceKey],
    candidates: &[Recommendation],
) -> RecommendationOutcome {
    RelevanceEngine::new().recommend(preferences, candidates)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{recommend, EngineSettings, RelevanceEngine};
    use crate::config::AppConfig;
    use crate::domain::matching::{MatchSource, MatchStrategy};
    use crate::domain::preference::{PreferenceKey, KNOWN_PREFERENCE_KEYS};
    use crate::domain::recommendation::{Priority, Recommendation};
    use crate::errors::Diagnostic;
    use crate::relevance::defaults::defaults_for;

    fn keys(values: &[&str]) -> Vec<PreferenceKey> {
        values.iter().map(|value| PreferenceKey::new(*value)).collect()
    }

    fn product(id: &str, title: &str, labels: &[&str], savings: f64) -> Recommendation {
        Recommendation::new(id, title)
            .with_labels(labels.iter().copied())
            .with_financials(savings, savings * 4.0, 4.0)
            .with_priority(Priority::Medium)
    }

    fn sample_pool() -> Vec<Recommendation> {
        vec![
            product("p-1", "Variable speed heat pump", &["HVAC", "Heat Pump"], 520.0),
            product("p-2", "Tankless heater", &["water-heating"], 210.0),
            product("p-3", "Rooftop array", &["Electronics > Renewable Energy"], 1_100.0),
            product("p-4", "Dimmable LED pack", &["Lighting"], 60.0),
            product("p-5", "Garden hose", &["Outdoor"], 0.0),
        ]
    }

    #[test]
    fn water_heating_matches_hyphenated_label_by_normalized_format() {
        let outcome = recommend(&keys(&["water_heating"]), &sample_pool());

        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.recommendation.id.as_str(), "p-2");
        assert_eq!(result.match_strategy, Some(MatchStrategy::NormalizedFormat));
        assert_eq!(result.source, MatchSource::Matched);
    }

    #[test]
    fn renewable_matches_hierarchical_label_by_alias() {
        let outcome = recommend(&keys(&["renewable"]), &sample_pool());

        assert_eq!(outcome.results[0].recommendation.id.as_str(), "p-3");
        assert_eq!(outcome.results[0].match_strategy, Some(MatchStrategy::Alias));
    }

    #[test]
    fn empty_candidates_return_catalog_defaults() {
        let outcome = recommend(&keys(&["smart_home"]), &[]);
        let expected: Vec<String> =
            defaults_for(&PreferenceKey::new("smart_home")).into_iter().map(|entry| entry.id.0).collect();
        let actual: Vec<String> =
            outcome.results.iter().map(|result| result.recommendation.id.0.clone()).collect();

        assert_eq!(actual, expected);
        assert!(outcome.results.iter().all(|result| result.source == MatchSource::Default));
        assert!(outcome.results.iter().all(|result| result.match_strategy.is_none()));
        assert!(outcome
            .diagnostics
            .contains(&Diagnostic::EmptyInput { input: "candidates".to_owned() }));
    }

    #[test]
    fn shared_candidate_is_kept_in_first_bucket_only() {
        let pool = vec![product("both", "Smart LED climate kit", &["HVAC", "Lighting"], 300.0)];
        let outcome = recommend(&keys(&["hvac", "lighting"]), &pool);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].matched_preference.as_str(), "hvac");
        assert_eq!(outcome.total_estimated_savings, 300.0);
        assert_eq!(outcome.savings_by_preference[&PreferenceKey::new("hvac")], 300.0);
        assert_eq!(outcome.savings_by_preference[&PreferenceKey::new("lighting")], 0.0);
    }

    #[test]
    fn nan_savings_are_filled_before_bucketing() {
        let pool = vec![Recommendation::new("nan-1", "HVAC System Upgrade")
            .with_labels(["hvac"])
            .with_financials(f64::NAN, 3_000.0, f64::NAN)];
        let outcome = recommend(&keys(&["hvac"]), &pool);
        let recommendation = &outcome.results[0].recommendation;

        assert_eq!(recommendation.estimated_savings, 450.0);
        assert_eq!(recommendation.estimated_cost, 3_000.0);
        assert!(recommendation.has_valid_financials());
        assert!(outcome
            .diagnostics
            .iter()
            .any(|diagnostic| matches!(diagnostic, Diagnostic::MalformedCandidate { .. })));
    }

    #[test]
    fn exact_label_wins_over_fuzzy_tiers() {
        let pool = vec![product("x", "Insulation roll", &["insulation"], 10.0)];
        let outcome = recommend(&keys(&["insulation"]), &pool);
        assert_eq!(outcome.results[0].match_strategy, Some(MatchStrategy::Exact));
    }

    #[test]
    fn non_empty_for_every_known_preference() {
        for key in KNOWN_PREFERENCE_KEYS {
            let with_pool = recommend(&keys(&[*key]), &sample_pool());
            let without_pool = recommend(&keys(&[*key]), &[]);
            assert!(!with_pool.is_empty(), "{key} returned nothing with a pool");
            assert!(!without_pool.is_empty(), "{key} returned nothing without a pool");
        }
    }

    #[test]
    fn flattened_results_never_repeat_an_id() {
        let mut pool = sample_pool();
        pool.push(product("p-1", "Duplicate heat pump", &["HVAC"], 999.0));
        let outcome = recommend(&keys(KNOWN_PREFERENCE_KEYS), &pool);

        let mut seen = HashSet::new();
        for result in &outcome.results {
            assert!(seen.insert(result.recommendation.id.clone()), "duplicate {}", result.recommendation.id);
        }
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let preferences = keys(&["lighting", "renewable", "hvac", "appliances"]);
        let first = recommend(&preferences, &sample_pool());
        let second = recommend(&preferences, &sample_pool());
        assert_eq!(first, second);
    }

    #[test]
    fn every_emitted_record_has_valid_financials() {
        let mut pool = sample_pool();
        pool.push(
            Recommendation::new("broken", "Window replacement")
                .with_labels(["windows_doors"])
                .with_financials(f64::NAN, -1.0, f64::INFINITY),
        );
        let outcome = recommend(&keys(KNOWN_PREFERENCE_KEYS), &pool);

        for result in &outcome.results {
            let recommendation = &result.recommendation;
            assert!(recommendation.estimated_savings >= 0.0);
            assert!(recommendation.estimated_cost >= 0.0);
            assert!(recommendation.payback_period.is_finite());
        }
    }

    #[test]
    fn savings_totals_sum_the_final_list() {
        let outcome = recommend(&keys(&["hvac", "renewable", "insulation"]), &sample_pool());
        let summed: f64 =
            outcome.results.iter().map(|result| result.recommendation.estimated_savings).sum();
        let by_preference: f64 = outcome.savings_by_preference.values().sum();

        assert!((outcome.total_estimated_savings - summed).abs() < 1e-9);
        assert!((outcome.total_estimated_savings - by_preference).abs() < 1e-9);
        assert_eq!(outcome.savings_by_preference.len(), 3);
    }

    #[test]
    fn results_follow_caller_preference_order() {
        let outcome = recommend(&keys(&["lighting", "hvac"]), &sample_pool());
        let order: Vec<&str> =
            outcome.results.iter().map(|result| result.matched_preference.as_str()).collect();

        assert_eq!(order, vec!["lighting", "hvac"]);
    }

    #[test]
    fn empty_preferences_give_empty_outcome() {
        let outcome = recommend(&[], &sample_pool());

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.total_estimated_savings, 0.0);
        assert!(outcome.savings_by_preference.is_empty());
    }

    #[test]
    fn unknown_preference_is_reported_and_not_backfilled() {
        let outcome = recommend(&keys(&["pool_heating", "hvac"]), &[]);

        assert!(outcome
            .diagnostics
            .contains(&Diagnostic::InvalidPreferenceKey { key: "pool_heating".to_owned() }));
        assert!(outcome
            .results
            .iter()
            .all(|result| result.matched_preference.as_str() == "hvac"));
        assert_eq!(outcome.savings_by_preference[&PreferenceKey::new("pool_heating")], 0.0);
    }

    #[test]
    fn unknown_preference_can_still_match_fuzzily() {
        let pool = vec![product("pool", "Solar pool cover", &["Pool Heating Covers"], 80.0)];
        let outcome = recommend(&keys(&["pool_heating"]), &pool);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].match_strategy, Some(MatchStrategy::Substring));
    }

    #[test]
    fn settings_from_config_reach_the_evaluator() {
        let mut config = AppConfig::default();
        config.matching.min_substring_len = 30;
        config.matching.min_token_len = 30;
        let engine = RelevanceEngine::with_settings(EngineSettings::from(&config));

        let pool = vec![product("pool", "Solar pool cover", &["Pool Heating Covers"], 80.0)];
        let outcome = engine.recommend(&keys(&["pool_heating"]), &pool);

        assert!(outcome.results.is_empty());
        assert_eq!(engine.evaluator().thresholds().min_token_len, 30);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RelevanceEngine>();
    }

    #[test]
    fn outcome_serializes_with_camel_case_contract() {
        let outcome = recommend(&keys(&["hvac"]), &[]);
        let value = serde_json::to_value(&outcome).expect("outcome should serialize");

        assert!(value["totalEstimatedSavings"].is_number());
        assert!(value["savingsByPreference"]["hvac"].is_number());
        assert_eq!(value["results"][0]["source"], "default");
        assert!(value["results"][0]["matchStrategy"].is_null());
        assert_eq!(value["results"][0]["recommendation"]["id"], "default-rec-hvac");
    }
}
