//! Deterministic estimates for records arriving without usable financial data.

use tracing::debug;

use super::DEFAULT_PAYBACK_YEARS;
use crate::domain::recommendation::{is_valid_amount, Recommendation};

#[derive(Debug, Clone, Copy)]
struct FinancialSeed {
    category: &'static str,
    keywords: &'static [&'static str],
    annual_savings: f64,
    upfront_cost: f64,
}

/// Keyword rows, checked top to bottom against whole words of the title and
/// then the category labels. A keyword word matches any word it prefixes.
const FINANCIAL_SEEDS: &[FinancialSeed] = &[
    FinancialSeed {
        category: "water_heating",
        keywords: &["water heater", "water heating", "tankless", "hot water"],
        annual_savings: 220.0,
        upfront_cost: 1_400.0,
    },
    FinancialSeed {
        category: "hvac",
        keywords: &["hvac", "heat pump", "furnace", "air condition", "ductwork"],
        annual_savings: 450.0,
        upfront_cost: 3_500.0,
    },
    FinancialSeed {
        category: "renewable",
        keywords: &["solar", "renewable", "wind turbine", "battery storage"],
        annual_savings: 900.0,
        upfront_cost: 12_000.0,
    },
    FinancialSeed {
        category: "smart_home",
        keywords: &["smart", "thermostat", "automation"],
        annual_savings: 180.0,
        upfront_cost: 250.0,
    },
    FinancialSeed {
        category: "insulation",
        keywords: &["insulation", "insulate", "weatheriz", "air seal", "draft"],
        annual_savings: 300.0,
        upfront_cost: 1_500.0,
    },
    FinancialSeed {
        category: "windows_doors",
        keywords: &["window", "door", "glazing"],
        annual_savings: 250.0,
        upfront_cost: 4_000.0,
    },
    FinancialSeed {
        category: "lighting",
        keywords: &["lighting", "light", "led", "bulb"],
        annual_savings: 120.0,
        upfront_cost: 300.0,
    },
    FinancialSeed {
        category: "appliances",
        keywords: &["appliance", "refrigerator", "dishwasher", "washer", "dryer"],
        annual_savings: 150.0,
        upfront_cost: 900.0,
    },
];

const GENERIC_SEED: FinancialSeed = FinancialSeed {
    category: "general",
    keywords: &[],
    annual_savings: 100.0,
    upfront_cost: 500.0,
};

pub const FIELD_SAVINGS: &str = "estimatedSavings";
pub const FIELD_COST: &str = "estimatedCost";
pub const FIELD_PAYBACK: &str = "paybackPeriod";

/// Relative slack when comparing a supplied payback to `cost / savings`.
const PAYBACK_TOLERANCE: f64 = 1e-9;

/// Estimated savings and cost for a keyword row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialEstimate {
    pub category: &'static str,
    pub annual_savings: f64,
    pub upfront_cost: f64,
}

/// A record with every financial field valid, plus the fields that were filled.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRepair {
    pub recommendation: Recommendation,
    pub repaired_fields: Vec<&'static str>,
}

impl FinancialRepair {
    pub fn is_repaired(&self) -> bool {
        !self.repaired_fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialNormalizer {
    default_payback_years: f64,
}

impl FinancialNormalizer {
    pub fn new() -> Self {
        Self { default_payback_years: DEFAULT_PAYBACK_YEARS }
    }

    pub fn with_default_payback(default_payback_years: f64) -> Self {
        Self { default_payback_years }
    }

    pub fn default_payback_years(&self) -> f64 {
        self.default_payback_years
    }

    /// Keyword-table estimate for a title and its labels.
    pub fn estimate<'a, I>(&self, title: &str, labels: I) -> FinancialEstimate
    where
        I: IntoIterator<Item = &'a String>,
    {
        let title_words = words(title);
        let seed = find_seed(&title_words)
            .or_else(|| labels.into_iter().find_map(|label| find_seed(&words(label))))
            .unwrap_or(&GENERIC_SEED);

        FinancialEstimate {
            category: seed.category,
            annual_savings: seed.annual_savings,
            upfront_cost: seed.upfront_cost,
        }
    }

    pub fn payback(&self, savings: f64, cost: f64) -> f64 {
        if savings > 0.0 {
            let years = cost / savings;
            if years.is_finite() {
                return years;
            }
        }
        self.default_payback_years
    }

    /// Copy of `recommendation` with invalid fields filled and payback made consistent.
    pub fn normalize(&self, recommendation: &Recommendation) -> FinancialRepair {
        let mut repaired = recommendation.clone();
        let mut repaired_fields = Vec::new();

        let savings_valid = is_valid_amount(repaired.estimated_savings);
        let cost_valid = is_valid_amount(repaired.estimated_cost);

        if !savings_valid || !cost_valid {
            let estimate = self.estimate(&repaired.title, &repaired.category_labels);
            if !savings_valid {
                repaired.estimated_savings = estimate.annual_savings;
                repaired_fields.push(FIELD_SAVINGS);
            }
            if !cost_valid {
                repaired.estimated_cost = estimate.upfront_cost;
                repaired_fields.push(FIELD_COST);
            }
        }

        // Payback always follows the (possibly filled) savings and cost.
        let expected = self.payback(repaired.estimated_savings, repaired.estimated_cost);
        if !is_valid_amount(repaired.payback_period)
            || !same_payback(repaired.payback_period, expected)
        {
            repaired.payback_period = expected;
            repaired_fields.push(FIELD_PAYBACK);
        }

        if !repaired_fields.is_empty() {
            debug!(
                event_name = "relevance.financial.repaired",
                recommendation_id = %repaired.id,
                fields = ?repaired_fields,
                "filled invalid financial fields from keyword estimate"
            );
        }

        FinancialRepair { recommendation: repaired, repaired_fields }
    }
}

impl Default for FinancialNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn same_payback(supplied: f64, expected: f64) -> bool {
    (supplied - expected).abs() <= PAYBACK_TOLERANCE * expected.abs().max(1.0)
}

fn words(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn find_seed(words: &[String]) -> Option<&'static FinancialSeed> {
    FINANCIAL_SEEDS
        .iter()
        .find(|seed| seed.keywords.iter().any(|keyword| contains_phrase(words, keyword)))
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split_whitespace().collect();
    if parts.is_empty() || parts.len() > words.len() {
        return false;
    }

    words.windows(parts.len()).any(|window| {
        window.iter().zip(&parts).all(|(word, part)| word.starts_with(*part))
    })
}

#[cfg(test)]
mod tests {
    use super::{FinancialNormalizer, FIELD_COST, FIELD_PAYBACK, FIELD_SAVINGS};
    use crate::domain::recommendation::Recommendation;

    #[test]
    fn hvac_title_gets_hvac_estimate() {
        let normalizer = FinancialNormalizer::new();
        let record = Recommendation::new("rec-1", "HVAC System Upgrade")
            .with_financials(f64::NAN, f64::NAN, f64::NAN);

        let repair = normalizer.normalize(&record);

        assert_eq!(repair.recommendation.estimated_savings, 450.0);
        assert_eq!(repair.recommendation.estimated_cost, 3_500.0);
        assert!((repair.recommendation.payback_period - 3_500.0 / 450.0).abs() < 1e-9);
        assert_eq!(repair.repaired_fields, vec![FIELD_SAVINGS, FIELD_COST, FIELD_PAYBACK]);
        assert!(repair.recommendation.has_valid_financials());
    }

    #[test]
    fn only_invalid_fields_are_replaced() {
        let normalizer = FinancialNormalizer::new();
        let record = Recommendation::new("rec-2", "Attic insulation")
            .with_financials(-5.0, 800.0, 4.0);

        let repair = normalizer.normalize(&record);

        assert_eq!(repair.recommendation.estimated_savings, 300.0);
        assert_eq!(repair.recommendation.estimated_cost, 800.0);
        assert!((repair.recommendation.payback_period - 800.0 / 300.0).abs() < 1e-9);
        assert_eq!(repair.repaired_fields, vec![FIELD_SAVINGS, FIELD_PAYBACK]);
    }

    #[test]
    fn inconsistent_supplied_payback_is_recomputed() {
        let normalizer = FinancialNormalizer::new();
        let record =
            Recommendation::new("rec-5", "Attic insulation").with_financials(100.0, 500.0, 0.25);

        let repair = normalizer.normalize(&record);

        assert_eq!(repair.recommendation.payback_period, 5.0);
        assert_eq!(repair.recommendation.estimated_savings, 100.0);
        assert_eq!(repair.recommendation.estimated_cost, 500.0);
        assert_eq!(repair.repaired_fields, vec![FIELD_PAYBACK]);
    }

    #[test]
    fn zero_savings_overrides_supplied_payback_with_default() {
        let normalizer = FinancialNormalizer::new();
        let record =
            Recommendation::new("rec-6", "Window film").with_financials(0.0, 500.0, 3.0);

        let repair = normalizer.normalize(&record);

        assert_eq!(repair.recommendation.payback_period, 10.0);
        assert_eq!(repair.repaired_fields, vec![FIELD_PAYBACK]);
    }

    #[test]
    fn matching_supplied_payback_is_kept() {
        let normalizer = FinancialNormalizer::new();
        let record =
            Recommendation::new("rec-7", "Attic insulation").with_financials(300.0, 1_500.0, 5.0);

        assert!(!normalizer.normalize(&record).is_repaired());
    }

    #[test]
    fn valid_records_pass_through_unchanged() {
        let normalizer = FinancialNormalizer::new();
        let record =
            Recommendation::new("rec-3", "LED retrofit").with_financials(120.0, 300.0, 2.5);

        let repair = normalizer.normalize(&record);

        assert!(!repair.is_repaired());
        assert_eq!(repair.recommendation, record);
    }

    #[test]
    fn zero_savings_uses_fixed_payback() {
        let normalizer = FinancialNormalizer::with_default_payback(15.0);
        let record =
            Recommendation::new("rec-4", "Window film").with_financials(0.0, 200.0, f64::INFINITY);

        let repair = normalizer.normalize(&record);

        assert_eq!(repair.recommendation.payback_period, 15.0);
        assert_eq!(repair.repaired_fields, vec![FIELD_PAYBACK]);
    }

    #[test]
    fn keywords_match_whole_word_prefixes() {
        let normalizer = FinancialNormalizer::new();
        let no_labels: Vec<String> = Vec::new();

        assert_eq!(normalizer.estimate("Sealed crawlspace", &no_labels).category, "general");
        assert_eq!(normalizer.estimate("Replace old windows", &no_labels).category, "windows_doors");
        assert_eq!(
            normalizer.estimate("Heat pump water heater", &no_labels).category,
            "water_heating"
        );
    }

    #[test]
    fn labels_are_consulted_when_title_is_generic() {
        let normalizer = FinancialNormalizer::new();
        let labels = vec!["Renewable Energy".to_owned()];

        assert_eq!(normalizer.estimate("Premium upgrade", &labels).category, "renewable");
        assert_eq!(normalizer.estimate("Premium upgrade", &Vec::new()).category, "general");
    }
}
