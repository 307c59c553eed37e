//! Versioned default recommendations used to backfill empty preference buckets.

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::domain::preference::PreferenceKey;
use crate::domain::recommendation::{Priority, Recommendation};

/// Bumped whenever catalog content changes.
pub const CATALOG_VERSION: &str = "2024.06.1";

pub const DEFAULT_ID_PREFIX: &str = "default-rec-";

#[derive(Debug, Clone, Copy)]
struct DefaultSeed {
    key: &'static str,
    title: &'static str,
    description: &'static str,
    label: &'static str,
    annual_savings: f64,
    upfront_cost: f64,
    priority: Priority,
    difficulty: &'static str,
}

const DEFAULT_SEEDS: &[DefaultSeed] = &[
    DefaultSeed {
        key: "hvac",
        title: "Schedule an HVAC tune-up",
        description: "Annual maintenance keeps heating and cooling equipment close to its rated efficiency.",
        label: "HVAC",
        annual_savings: 180.0,
        upfront_cost: 150.0,
        priority: Priority::High,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "hvac",
        title: "Upgrade to a high-efficiency heat pump",
        description: "A cold-climate heat pump replaces resistance or fossil heating and adds efficient cooling.",
        label: "HVAC",
        annual_savings: 600.0,
        upfront_cost: 6_500.0,
        priority: Priority::Medium,
        difficulty: "advanced",
    },
    DefaultSeed {
        key: "lighting",
        title: "Switch to LED bulbs",
        description: "LED bulbs use roughly 75% less energy than incandescent lamps and last far longer.",
        label: "Lighting",
        annual_savings: 120.0,
        upfront_cost: 80.0,
        priority: Priority::High,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "lighting",
        title: "Install occupancy sensors",
        description: "Sensors switch lights off in rooms that are left empty.",
        label: "Lighting",
        annual_savings: 45.0,
        upfront_cost: 120.0,
        priority: Priority::Low,
        difficulty: "moderate",
    },
    DefaultSeed {
        key: "insulation",
        title: "Seal attic air leaks",
        description: "Sealing gaps around top plates, chases and penetrations stops warm air escaping.",
        label: "Insulation",
        annual_savings: 200.0,
        upfront_cost: 350.0,
        priority: Priority::High,
        difficulty: "moderate",
    },
    DefaultSeed {
        key: "insulation",
        title: "Add attic insulation to R-49",
        description: "Topping up attic insulation reduces heat loss through the ceiling.",
        label: "Insulation",
        annual_savings: 350.0,
        upfront_cost: 1_800.0,
        priority: Priority::Medium,
        difficulty: "moderate",
    },
    DefaultSeed {
        key: "windows_doors",
        title: "Weatherstrip doors and windows",
        description: "New weatherstripping closes drafts around operable sashes and door frames.",
        label: "Windows & Doors",
        annual_savings: 90.0,
        upfront_cost: 100.0,
        priority: Priority::High,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "windows_doors",
        title: "Install low-e storm windows",
        description: "Low-emissivity storm panels cut heat transfer without replacing existing windows.",
        label: "Windows & Doors",
        annual_savings: 160.0,
        upfront_cost: 1_200.0,
        priority: Priority::Medium,
        difficulty: "moderate",
    },
    DefaultSeed {
        key: "appliances",
        title: "Replace an old refrigerator with an ENERGY STAR model",
        description: "Refrigerators older than fifteen years often use twice the energy of current models.",
        label: "Appliances",
        annual_savings: 110.0,
        upfront_cost: 1_100.0,
        priority: Priority::Medium,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "appliances",
        title: "Wash laundry on cold cycles",
        description: "Most washer energy goes to heating water; cold cycles avoid it.",
        label: "Appliances",
        annual_savings: 60.0,
        upfront_cost: 0.0,
        priority: Priority::Low,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "water_heating",
        title: "Lower the water heater setpoint to 120°F",
        description: "Each 10°F reduction trims standby and distribution losses.",
        label: "Water Heating",
        annual_savings: 60.0,
        upfront_cost: 0.0,
        priority: Priority::High,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "water_heating",
        title: "Insulate hot water pipes",
        description: "Pipe insulation keeps delivered water hotter so the setpoint can stay low.",
        label: "Water Heating",
        annual_savings: 40.0,
        upfront_cost: 60.0,
        priority: Priority::Medium,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "water_heating",
        title: "Install a heat pump water heater",
        description: "Heat pump water heaters use two to three times less electricity than resistance tanks.",
        label: "Water Heating",
        annual_savings: 350.0,
        upfront_cost: 2_800.0,
        priority: Priority::Medium,
        difficulty: "advanced",
    },
    DefaultSeed {
        key: "smart_home",
        title: "Install a smart thermostat",
        description: "Learning schedules and remote setbacks reduce heating and cooling runtime.",
        label: "Smart Home",
        annual_savings: 150.0,
        upfront_cost: 200.0,
        priority: Priority::High,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "smart_home",
        title: "Add smart power strips",
        description: "Advanced power strips cut standby draw from entertainment and office equipment.",
        label: "Smart Home",
        annual_savings: 50.0,
        upfront_cost: 60.0,
        priority: Priority::Low,
        difficulty: "easy",
    },
    DefaultSeed {
        key: "renewable",
        title: "Evaluate rooftop solar",
        description: "A site assessment estimates array size, production and incentives for your roof.",
        label: "Renewable Energy",
        annual_savings: 1_200.0,
        upfront_cost: 16_000.0,
        priority: Priority::High,
        difficulty: "advanced",
    },
    DefaultSeed {
        key: "renewable",
        title: "Enroll in a community solar program",
        description: "Subscribing to a shared array earns bill credits without installing panels.",
        label: "Renewable Energy",
        annual_savings: 300.0,
        upfront_cost: 0.0,
        priority: Priority::Medium,
        difficulty: "easy",
    },
];

/// Immutable catalog addressed by canonical preference key.
#[derive(Debug)]
pub struct DefaultCatalog {
    rows: IndexMap<&'static str, Vec<Recommendation>>,
}

static STANDARD_CATALOG: OnceLock<DefaultCatalog> = OnceLock::new();

impl DefaultCatalog {
    pub fn standard() -> &'static DefaultCatalog {
        STANDARD_CATALOG.get_or_init(|| Self::from_seeds(DEFAULT_SEEDS))
    }

    fn from_seeds(seeds: &[DefaultSeed]) -> Self {
        let mut rows: IndexMap<&'static str, Vec<Recommendation>> = IndexMap::new();

        for seed in seeds {
            let bucket = rows.entry(seed.key).or_default();
            let id = if bucket.is_empty() {
                format!("{DEFAULT_ID_PREFIX}{}", seed.key)
            } else {
                format!("{DEFAULT_ID_PREFIX}{}-{}", seed.key, bucket.len() + 1)
            };

            let mut recommendation = Recommendation::new(id, seed.title)
                .with_description(seed.description)
                .with_labels([seed.label])
                .with_financials(
                    seed.annual_savings,
                    seed.upfront_cost,
                    seed.upfront_cost / seed.annual_savings,
                )
                .with_priority(seed.priority);
            recommendation.difficulty = Some(seed.difficulty.to_owned());
            bucket.push(recommendation);
        }

        for bucket in rows.values_mut() {
            // Stable: equal priorities keep declaration order.
            bucket.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        Self { rows }
    }

    pub fn version(&self) -> &'static str {
        CATALOG_VERSION
    }

    /// Defaults for `preference` ordered by priority; empty for an unknown key.
    pub fn defaults_for(&self, preference: &PreferenceKey) -> Vec<Recommendation> {
        self.rows.get(preference.canonical().as_str()).cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (PreferenceKey, &[Recommendation])> + '_ {
        self.rows.iter().map(|(key, defaults)| (PreferenceKey::new(*key), defaults.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shorthand for [`DefaultCatalog::defaults_for`] on the standard catalog.
pub fn defaults_for(preference: &PreferenceKey) -> Vec<Recommendation> {
    DefaultCatalog::standard().defaults_for(preference)
}
