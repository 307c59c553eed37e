//! Category label canonicalization.

use std::collections::BTreeSet;

/// Comparable forms of a raw category label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedLabel {
    /// Lower-cased leaf segment with whitespace runs collapsed.
    pub leaf: String,
    /// Spaces and hyphens replaced by `_`.
    pub underscored: String,
    /// Spaces and underscores replaced by `-`.
    pub hyphenated: String,
    pub tokens: BTreeSet<String>,
}

impl NormalizedLabel {
    pub fn is_empty(&self) -> bool {
        self.leaf.is_empty()
    }
}

/// Reduce a label such as `"Electronics > Renewable Energy"` to its leaf and
/// derive the separator variants used by the match cascade.
pub fn normalize(label: &str) -> NormalizedLabel {
    let lowered = label.to_lowercase();
    let leaf_segment = match lowered.rfind('>') {
        Some(index) => &lowered[index + 1..],
        None => lowered.as_str(),
    };
    let leaf = leaf_segment.split_whitespace().collect::<Vec<_>>().join(" ");

    let underscored = leaf.replace([' ', '-'], "_");
    let hyphenated = leaf.replace([' ', '_'], "-");
    let tokens = leaf
        .split(|ch: char| ch == '_' || ch == '-' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect();

    NormalizedLabel { leaf, underscored, hyphenated, tokens }
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn keeps_leaf_of_hierarchical_label() {
        let normalized = normalize("Electronics > Renewable Energy");
        assert_eq!(normalized.leaf, "renewable energy");
        assert_eq!(normalized.underscored, "renewable_energy");
        assert_eq!(normalized.hyphenated, "renewable-energy");
    }

    #[test]
    fn uses_last_separator_only() {
        let normalized = normalize("Home > Climate >  Water-Heating ");
        assert_eq!(normalized.leaf, "water-heating");
        assert_eq!(normalized.underscored, "water_heating");
        assert_eq!(normalized.hyphenated, "water-heating");
    }

    #[test]
    fn tokenizes_on_all_separators() {
        let normalized = normalize("smart_home-hub  Devices");
        let tokens: Vec<&str> = normalized.tokens.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["devices", "home", "hub", "smart"]);
    }

    #[test]
    fn empty_input_yields_empty_label() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("Electronics >").is_empty());
        assert!(normalize("").tokens.is_empty());
    }
}
