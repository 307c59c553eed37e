use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(pub String);

impl RecommendationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display priority of a recommendation. Variant order is ascending so `High`
/// compares greatest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A recommendation or product record as supplied by the candidate source.
///
/// Financial fields that are absent or `null` on the wire deserialize as `NaN`
/// so the financial normalizer can tell them apart from a genuine zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: RecommendationId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category_labels: IndexSet<String>,
    #[serde(default = "missing_amount", deserialize_with = "nullable_amount")]
    pub estimated_savings: f64,
    #[serde(default = "missing_amount", deserialize_with = "nullable_amount")]
    pub estimated_cost: f64,
    #[serde(default = "missing_amount", deserialize_with = "nullable_amount")]
    pub payback_period: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

fn missing_amount() -> f64 {
    f64::NAN
}

fn nullable_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(|value| value.unwrap_or(f64::NAN))
}

/// Finite and non-negative.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl Recommendation {
    /// Create a record with no labels and unset financial fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: RecommendationId(id.into()),
            title: title.into(),
            description: None,
            category_labels: IndexSet::new(),
            estimated_savings: f64::NAN,
            estimated_cost: f64::NAN,
            payback_period: f64::NAN,
            priority: Priority::default(),
            difficulty: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_financials(mut self, savings: f64, cost: f64, payback: f64) -> Self {
        self.estimated_savings = savings;
        self.estimated_cost = cost;
        self.payback_period = payback;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_valid_financials(&self) -> bool {
        is_valid_amount(self.estimated_savings)
            && is_valid_amount(self.estimated_cost)
            && self.payback_period.is_finite()
            && self.payback_period >= 0.0
    }
}
