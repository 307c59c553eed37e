//! Buckets candidates under each requested preference.

use std::collections::HashSet;

use tracing::debug;

use super::evaluator::MatchEvaluator;
use super::financial::FinancialNormalizer;
use crate::domain::matching::{MatchResult, PreferenceBuckets};
use crate::domain::preference::PreferenceKey;
use crate::domain::recommendation::Recommendation;
use crate::errors::Diagnostic;

/// Buckets plus the repairs made to candidates that entered them.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub buckets: PreferenceBuckets,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceFilter {
    evaluator: MatchEvaluator,
    financials: FinancialNormalizer,
}

impl RelevanceFilter {
    pub fn new(evaluator: MatchEvaluator, financials: FinancialNormalizer) -> Self {
        Self { evaluator, financials }
    }

    pub fn evaluator(&self) -> &MatchEvaluator {
        &self.evaluator
    }

    pub fn filter(
        &self,
        preferences: &[PreferenceKey],
        candidates: &[Recommendation],
    ) -> PreferenceBuckets {
        self.filter_with_report(preferences, candidates).buckets
    }

    /// Every distinct preference gets an entry, in caller order, even when its
    /// bucket is empty. Candidates are never modified; records with invalid
    /// financial fields are repaired on a copy before they are bucketed.
    pub fn filter_with_report(
        &self,
        preferences: &[PreferenceKey],
        candidates: &[Recommendation],
    ) -> FilterReport {
        let mut report = FilterReport::default();
        let mut repaired: Vec<Option<Recommendation>> = vec![None; candidates.len()];

        for preference in preferences {
            if report.buckets.contains_key(preference) {
                continue;
            }

            let prepared = self.evaluator.prepare(preference);
            let mut bucket = Vec::new();
            let mut seen = HashSet::new();

            for (index, candidate) in candidates.iter().enumerate() {
                let first_match = candidate.category_labels.iter().find_map(|label| {
                    self.evaluator.matches_prepared(&prepared, label).map(|strategy| (label, strategy))
                });
                let Some((label, strategy)) = first_match else {
                    continue;
                };
                if !seen.insert(&candidate.id) {
                    continue;
                }

                let recommendation = self.valid_copy(
                    candidate,
                    &mut repaired[index],
                    &mut report.diagnostics,
                );
                bucket.push(MatchResult::matched(
                    recommendation,
                    preference.clone(),
                    strategy,
                    label.clone(),
                ));
            }

            sort_bucket(&mut bucket);
            report.buckets.insert(preference.clone(), bucket);
        }

        debug!(
            event_name = "relevance.filter.completed",
            preference_count = report.buckets.len(),
            candidate_count = candidates.len(),
            matched_count = report.buckets.values().map(Vec::len).sum::<usize>(),
            "relevance filter completed"
        );

        report
    }

    fn valid_copy(
        &self,
        candidate: &Recommendation,
        cached: &mut Option<Recommendation>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Recommendation {
        if let Some(existing) = cached {
            return existing.clone();
        }

        let repair = self.financials.normalize(candidate);
        if repair.is_repaired() {
            diagnostics.push(Diagnostic::MalformedCandidate {
                id: candidate.id.to_string(),
                repaired_fields: repair.repaired_fields.iter().map(|field| (*field).to_owned()).collect(),
            });
        }
        *cached = Some(repair.recommendation.clone());
        repair.recommendation
    }
}

/// Priority descending, then savings descending; the sort is stable so
/// remaining ties keep candidate order.
pub fn sort_bucket(bucket: &mut [MatchResult]) {
    bucket.sort_by(|a, b| {
        b.recommendation
            .priority
            .cmp(&a.recommendation.priority)
            .then_with(|| b.recommendation.estimated_savings.total_cmp(&a.recommendation.estimated_savings))
    });
}

/// Bucket `candidates` with the default evaluator and financial normalizer.
pub fn filter(preferences: &[PreferenceKey], candidates: &[Recommendation]) -> PreferenceBuckets {
    RelevanceFilter::default().filter(preferences, candidates)
}
