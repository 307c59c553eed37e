//! Ordered match cascade between a preference key and a category label.
//!
//! Each tier is a standalone pure function so it can be exercised on its own;
//! [`MatchEvaluator`] runs them in [`MatchStrategy::CASCADE`] order and reports
//! the first one that succeeds.

use std::collections::BTreeSet;

use serde::Serialize;

use super::aliases::PreferenceMap;
use super::normalizer::{normalize, NormalizedLabel};
use super::{DEFAULT_MIN_SUBSTRING_LEN, DEFAULT_MIN_TOKEN_LEN};
use crate::domain::matching::MatchStrategy;
use crate::domain::preference::PreferenceKey;

/// Length guards for the two fuzzy tiers, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchThresholds {
    pub min_substring_len: usize,
    pub min_token_len: usize,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self { min_substring_len: DEFAULT_MIN_SUBSTRING_LEN, min_token_len: DEFAULT_MIN_TOKEN_LEN }
    }
}

/// Raw byte-for-byte equality.
pub fn exact(preference: &str, label: &str) -> bool {
    preference == label
}

pub fn case_insensitive(preference: &str, label: &str) -> bool {
    preference.to_lowercase() == label.to_lowercase()
}

/// The label, in raw, leaf, underscore or hyphen form, is a listed alias.
///
/// Separator variants of the key itself are left to [`normalized_format`].
pub fn alias(
    aliases: &BTreeSet<String>,
    preference: &NormalizedLabel,
    label: &str,
    normalized: &NormalizedLabel,
) -> bool {
    if aliases.is_empty() || normalized_format(preference, normalized) {
        return false;
    }

    let raw = label.trim().to_lowercase();
    let found = [
        raw.as_str(),
        normalized.leaf.as_str(),
        normalized.underscored.as_str(),
        normalized.hyphenated.as_str(),
    ]
    .into_iter()
    .any(|form| !form.is_empty() && aliases.contains(form));
    found
}

pub fn normalized_format(preference: &NormalizedLabel, label: &NormalizedLabel) -> bool {
    if preference.is_empty() || label.is_empty() {
        return false;
    }

    preference.underscored == label.underscored || preference.hyphenated == label.hyphenated
}

/// Either underscore form contains the other; the contained side must meet `min_len`.
pub fn substring(preference: &NormalizedLabel, label: &NormalizedLabel, min_len: usize) -> bool {
    let (pref_form, label_form) = (&preference.underscored, &label.underscored);
    if pref_form.is_empty() || label_form.is_empty() {
        return false;
    }

    let (shorter, longer) = if pref_form.chars().count() <= label_form.chars().count() {
        (pref_form, label_form)
    } else {
        (label_form, pref_form)
    };

    shorter.chars().count() >= min_len && longer.contains(shorter.as_str())
}

/// The token sets share at least one token of `min_len` characters or more.
pub fn word_overlap(preference: &NormalizedLabel, label: &NormalizedLabel, min_len: usize) -> bool {
    preference
        .tokens
        .intersection(&label.tokens)
        .any(|token| token.chars().count() >= min_len)
}

/// A preference with its comparison forms computed once, reused across labels.
#[derive(Debug, Clone)]
pub struct PreparedPreference<'a> {
    pub key: &'a PreferenceKey,
    pub normalized: NormalizedLabel,
    pub aliases: &'a BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelForms {
    pub leaf: String,
    pub underscored: String,
    pub hyphenated: String,
    pub tokens: Vec<String>,
}

impl From<&NormalizedLabel> for LabelForms {
    fn from(value: &NormalizedLabel) -> Self {
        Self {
            leaf: value.leaf.clone(),
            underscored: value.underscored.clone(),
            hyphenated: value.hyphenated.clone(),
            tokens: value.tokens.iter().cloned().collect(),
        }
    }
}

/// Diagnostic view of a single evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchExplanation {
    pub preference: PreferenceKey,
    pub label: String,
    pub known_preference: bool,
    pub preference_forms: LabelForms,
    pub label_forms: LabelForms,
    pub strategy: Option<MatchStrategy>,
    pub thresholds: MatchThresholds,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchEvaluator {
    thresholds: MatchThresholds,
    map: &'static PreferenceMap,
}

impl MatchEvaluator {
    /// Evaluator over the standard alias table with default guards.
    pub fn new() -> Self {
        Self::with_thresholds(MatchThresholds::default())
    }

    pub fn with_thresholds(thresholds: MatchThresholds) -> Self {
        Self { thresholds, map: PreferenceMap::standard() }
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    pub fn preference_map(&self) -> &'static PreferenceMap {
        self.map
    }

    pub fn prepare<'a>(&self, preference: &'a PreferenceKey) -> PreparedPreference<'a> {
        PreparedPreference {
            key: preference,
            normalized: normalize(preference.as_str()),
            aliases: self.map.aliases_for(preference),
        }
    }

    /// First tier in the cascade that matches, or `None`.
    pub fn matches(&self, preference: &PreferenceKey, label: &str) -> Option<MatchStrategy> {
        self.matches_prepared(&self.prepare(preference), label)
    }

    pub fn matches_prepared(
        &self,
        preference: &PreparedPreference<'_>,
        label: &str,
    ) -> Option<MatchStrategy> {
        self.evaluate(preference, label, &normalize(label))
    }

    fn evaluate(
        &self,
        preference: &PreparedPreference<'_>,
        label: &str,
        normalized: &NormalizedLabel,
    ) -> Option<MatchStrategy> {
        let raw_pref = preference.key.as_str();
        // Blank text on either side carries no category signal.
        if raw_pref.trim().is_empty() || label.trim().is_empty() {
            return None;
        }

        MatchStrategy::CASCADE.into_iter().find(|strategy| match strategy {
            MatchStrategy::Exact => exact(raw_pref, label),
            MatchStrategy::CaseInsensitive => case_insensitive(raw_pref, label),
            MatchStrategy::Alias => {
                alias(preference.aliases, &preference.normalized, label, normalized)
            }
            MatchStrategy::NormalizedFormat => {
                normalized_format(&preference.normalized, normalized)
            }
            MatchStrategy::Substring => {
                substring(&preference.normalized, normalized, self.thresholds.min_substring_len)
            }
            MatchStrategy::WordOverlap => {
                word_overlap(&preference.normalized, normalized, self.thresholds.min_token_len)
            }
        })
    }

    pub fn explain(&self, preference: &PreferenceKey, label: &str) -> MatchExplanation {
        let prepared = self.prepare(preference);
        let normalized = normalize(label);
        let strategy = self.evaluate(&prepared, label, &normalized);

        MatchExplanation {
            preference: preference.clone(),
            label: label.to_owned(),
            known_preference: self.map.is_known(preference),
            preference_forms: LabelForms::from(&prepared.normalized),
            label_forms: LabelForms::from(&normalized),
            strategy,
            thresholds: self.thresholds,
        }
    }
}

impl Default for MatchEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate one pair with the default evaluator.
pub fn matches(preference: &PreferenceKey, label: &str) -> Option<MatchStrategy> {
    MatchEvaluator::new().matches(preference, label)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn key(value: &str) -> PreferenceKey {
        PreferenceKey::new(value)
    }

    #[test]
    fn exact_tier_is_byte_for_byte() {
        assert!(exact("hvac", "hvac"));
        assert!(!exact("hvac", "HVAC"));
        assert!(!exact("hvac", " hvac"));
    }

    #[test]
    fn case_insensitive_tier_ignores_case_only() {
        assert!(case_insensitive("lighting", "Lighting"));
        assert!(!case_insensitive("lighting", "lighting "));
    }

    #[test]
    fn alias_tier_checks_every_label_form() {
        let aliases: BTreeSet<String> =
            ["renewable", "renewable energy", "solar"].into_iter().map(str::to_owned).collect();
        let own = normalize("renewable");

        assert!(alias(&aliases, &own, "Solar", &normalize("Solar")));
        assert!(alias(
            &aliases,
            &own,
            "Electronics > Renewable Energy",
            &normalize("Electronics > Renewable Energy")
        ));
        assert!(!alias(&aliases, &own, "Wind", &normalize("Wind")));
        assert!(!alias(&BTreeSet::new(), &own, "Solar", &normalize("Solar")));
    }

    #[test]
    fn alias_tier_skips_separator_variants_of_the_key() {
        let aliases: BTreeSet<String> =
            ["water_heating", "water-heating"].into_iter().map(str::to_owned).collect();
        let own = normalize("water_heating");

        assert!(!alias(&aliases, &own, "water-heating", &normalize("water-heating")));
    }

    #[test]
    fn normalized_format_tier_bridges_separators() {
        assert!(normalized_format(&normalize("water_heating"), &normalize("water-heating")));
        assert!(normalized_format(&normalize("smart_home"), &normalize("Smart Home")));
        assert!(!normalized_format(&normalize(""), &normalize("")));
    }

    #[test]
    fn substring_tier_applies_length_guard() {
        assert!(substring(&normalize("insulation"), &normalize("attic insulation kits"), 4));
        assert!(substring(&normalize("smart_home_hub"), &normalize("home"), 4));
        assert!(!substring(&normalize("led"), &normalize("led bulbs"), 4));
        assert!(substring(&normalize("led"), &normalize("led bulbs"), 3));
    }

    #[test]
    fn word_overlap_tier_requires_long_shared_token() {
        assert!(word_overlap(&normalize("windows_doors"), &normalize("Patio Doors"), 4));
        assert!(!word_overlap(&normalize("air_sealing"), &normalize("Air Filters"), 4));
    }

    #[test]
    fn cascade_prefers_exact_over_fuzzy_tiers() {
        assert_eq!(matches(&key("hvac"), "hvac"), Some(MatchStrategy::Exact));
        assert_eq!(matches(&key("renewable"), "renewable"), Some(MatchStrategy::Exact));
    }

    #[test]
    fn cascade_reports_each_tier() {
        assert_eq!(matches(&key("hvac"), "HVAC"), Some(MatchStrategy::CaseInsensitive));
        assert_eq!(matches(&key("hvac"), "Heat Pump"), Some(MatchStrategy::Alias));
        assert_eq!(
            matches(&key("water_heating"), "water-heating"),
            Some(MatchStrategy::NormalizedFormat)
        );
        assert_eq!(
            matches(&key("water_heating"), "Water Heating"),
            Some(MatchStrategy::NormalizedFormat)
        );
        assert_eq!(
            matches(&key("water_heating"), "tankless_water_heating"),
            Some(MatchStrategy::Substring)
        );
        assert_eq!(matches(&key("windows_doors"), "Patio Doors"), Some(MatchStrategy::WordOverlap));
        assert_eq!(matches(&key("lighting"), "Plumbing"), None);
    }

    #[test]
    fn default_guards_accept_four_characters() {
        assert_eq!(matches(&key("smart_home"), "Home Office"), Some(MatchStrategy::WordOverlap));
        assert_eq!(matches(&key("hvac"), "hvac units"), Some(MatchStrategy::Substring));
    }

    #[test]
    fn default_guards_reject_three_characters() {
        assert_eq!(matches(&key("led_strip"), "LED Panel"), None);
        assert_eq!(matches(&key("spa"), "spa covers"), None);
    }

    #[test]
    fn normalized_format_reached_for_unknown_keys() {
        assert_eq!(
            matches(&key("pool_heating"), "Pool-Heating"),
            Some(MatchStrategy::NormalizedFormat)
        );
    }

    #[test]
    fn unknown_key_still_reaches_fuzzy_tiers() {
        assert_eq!(matches(&key("pool_heating"), "Pool Heating Covers"), Some(MatchStrategy::Substring));
        assert_eq!(matches(&key("pool_heating"), "Heating Covers"), Some(MatchStrategy::WordOverlap));
    }

    #[test]
    fn hierarchical_label_matches_renewable_by_alias() {
        assert_eq!(
            matches(&key("renewable"), "Electronics > Renewable Energy"),
            Some(MatchStrategy::Alias)
        );
    }

    #[test]
    fn blank_inputs_never_match() {
        assert_eq!(matches(&key("hvac"), ""), None);
        assert_eq!(matches(&key("hvac"), "   "), None);
        assert_eq!(matches(&key(""), ""), None);
    }

    #[test]
    fn thresholds_change_fuzzy_guards() {
        let strict = MatchEvaluator::with_thresholds(MatchThresholds {
            min_substring_len: 20,
            min_token_len: 20,
        });
        assert_eq!(strict.matches(&key("water_heating"), "tankless_water_heating"), None);
        assert_eq!(strict.matches(&key("hvac"), "HVAC"), Some(MatchStrategy::CaseInsensitive));
    }

    #[test]
    fn explain_reports_forms_and_strategy() {
        let explanation = MatchEvaluator::new().explain(&key("renewable"), "Electronics > Solar");
        assert!(explanation.known_preference);
        assert_eq!(explanation.label_forms.leaf, "solar");
        assert_eq!(explanation.strategy, Some(MatchStrategy::Alias));
    }
}
