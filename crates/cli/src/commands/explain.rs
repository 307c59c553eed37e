use recmatch_core::config::LoadOptions;
use recmatch_core::domain::preference::PreferenceKey;
use recmatch_core::relevance::{EngineSettings, MatchEvaluator};

use crate::commands::{load_config, CommandResult};

pub fn run(options: LoadOptions, preference: &str, label: &str) -> CommandResult {
    let config = match load_config("explain", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let evaluator = MatchEvaluator::with_thresholds(EngineSettings::from(&config).thresholds);
    let explanation = evaluator.explain(&PreferenceKey::new(preference), label);

    CommandResult::document("explain", &explanation, true)
}
