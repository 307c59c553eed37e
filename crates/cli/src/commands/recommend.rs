use std::path::PathBuf;

use recmatch_core::config::LoadOptions;
use recmatch_core::domain::preference::PreferenceKey;
use recmatch_core::relevance::{EngineSettings, RelevanceEngine};
use recmatch_core::sources::{CandidateSource, InMemoryCandidates, JsonFileCandidates};
use tracing::info;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub preferences: String,
    pub candidates: Option<PathBuf>,
    pub pretty: bool,
}

pub fn run(options: LoadOptions, args: &RecommendArgs) -> CommandResult {
    let config = match load_config("recommend", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let preferences = PreferenceKey::parse_list(&args.preferences);
    let fetched = match &args.candidates {
        Some(path) => JsonFileCandidates::new(path).fetch_candidates(),
        None => InMemoryCandidates::default().fetch_candidates(),
    };
    let candidates = match fetched {
        Ok(candidates) => candidates,
        Err(error) => return CommandResult::from_error("recommend", &error),
    };

    let engine = RelevanceEngine::with_settings(EngineSettings::from(&config));
    let outcome = engine.recommend(&preferences, &candidates);

    info!(
        event_name = "cli.recommend.completed",
        preference_count = preferences.len(),
        candidate_count = candidates.len(),
        result_count = outcome.results.len(),
        "recommend command completed"
    );

    CommandResult::document("recommend", &outcome, args.pretty)
}
