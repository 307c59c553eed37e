//! Preference-to-category alias table.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use super::normalizer::normalize;
use crate::domain::preference::{PreferenceKey, KNOWN_PREFERENCE_KEYS};

#[derive(Debug, Clone, Copy)]
struct AliasSeed {
    key: &'static str,
    aliases: &'static [&'static str],
}

/// Spellings observed on candidate records for each preference. Rows must stay
/// lower-case; the key's own separator variants are added when the map is built.
const ALIAS_SEEDS: &[AliasSeed] = &[
    AliasSeed {
        key: "hvac",
        aliases: &[
            "heating",
            "cooling",
            "heating & cooling",
            "heating and cooling",
            "heating_cooling",
            "heating-cooling",
            "air conditioning",
            "heat pump",
            "heat_pump",
            "furnace",
            "climate control",
        ],
    },
    AliasSeed {
        key: "lighting",
        aliases: &["light", "lights", "led", "led lighting", "led_lighting", "bulbs", "light bulbs"],
    },
    AliasSeed {
        key: "insulation",
        aliases: &[
            "weatherization",
            "weatherproofing",
            "air sealing",
            "air_sealing",
            "building envelope",
            "attic insulation",
        ],
    },
    AliasSeed {
        key: "windows_doors",
        aliases: &[
            "windows",
            "doors",
            "windows & doors",
            "windows and doors",
            "windows/doors",
            "window",
            "door",
            "glazing",
        ],
    },
    AliasSeed {
        key: "appliances",
        aliases: &[
            "appliance",
            "home appliances",
            "kitchen appliances",
            "energy star appliances",
            "major appliances",
        ],
    },
    AliasSeed {
        key: "water_heating",
        aliases: &[
            "water heater",
            "water heaters",
            "water_heater",
            "water-heater",
            "hot water",
            "tankless water heater",
        ],
    },
    AliasSeed {
        key: "smart_home",
        aliases: &[
            "smart home devices",
            "smart devices",
            "home automation",
            "smart thermostat",
            "smart thermostats",
            "home_automation",
        ],
    },
    AliasSeed {
        key: "renewable",
        aliases: &[
            "renewable energy",
            "renewable_energy",
            "renewable-energy",
            "renewables",
            "solar",
            "solar panels",
            "solar energy",
            "electronics",
        ],
    },
];

/// Immutable lookup from canonical preference key to accepted spellings.
#[derive(Debug)]
pub struct PreferenceMap {
    rows: HashMap<&'static str, BTreeSet<String>>,
}

static EMPTY_ALIASES: BTreeSet<String> = BTreeSet::new();
static STANDARD_MAP: OnceLock<PreferenceMap> = OnceLock::new();

impl PreferenceMap {
    /// Process-wide map built from the compiled-in alias rows.
    pub fn standard() -> &'static PreferenceMap {
        STANDARD_MAP.get_or_init(|| Self::from_seeds(ALIAS_SEEDS))
    }

    fn from_seeds(seeds: &[AliasSeed]) -> Self {
        let mut rows = HashMap::with_capacity(seeds.len());

        for seed in seeds {
            let own = normalize(seed.key);
            let mut aliases: BTreeSet<String> =
                seed.aliases.iter().map(|alias| alias.to_lowercase()).collect();
            aliases.insert(seed.key.to_lowercase());
            aliases.insert(own.underscored);
            aliases.insert(own.hyphenated);
            rows.insert(seed.key, aliases);
        }

        Self { rows }
    }

    /// Accepted spellings for `preference`; empty for an unknown key.
    pub fn aliases_for(&self, preference: &PreferenceKey) -> &BTreeSet<String> {
        self.rows.get(preference.canonical().as_str()).unwrap_or(&EMPTY_ALIASES)
    }

    pub fn is_known(&self, preference: &PreferenceKey) -> bool {
        self.rows.contains_key(preference.canonical().as_str())
    }

    /// Known keys in declaration order.
    pub fn known_keys(&self) -> Vec<PreferenceKey> {
        KNOWN_PREFERENCE_KEYS
            .iter()
            .filter(|key| self.rows.contains_key(**key))
            .map(|key| PreferenceKey::new(*key))
            .collect()
    }
}

/// Shorthand for [`PreferenceMap::aliases_for`] on the standard map.
pub fn aliases_for(preference: &PreferenceKey) -> &'static BTreeSet<String> {
    PreferenceMap::standard().aliases_for(preference)
}
