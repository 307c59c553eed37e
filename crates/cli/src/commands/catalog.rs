use recmatch_core::domain::preference::PreferenceKey;
use recmatch_core::domain::recommendation::Recommendation;
use recmatch_core::errors::ApplicationError;
use recmatch_core::relevance::DefaultCatalog;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogView<'a> {
    version: &'static str,
    entries: Vec<CatalogEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry<'a> {
    preference: PreferenceKey,
    recommendations: &'a [Recommendation],
}

pub fn run(preference: Option<&str>) -> CommandResult {
    let catalog = DefaultCatalog::standard();

    let entries: Vec<CatalogEntry<'_>> = match preference {
        None => catalog
            .entries()
            .map(|(preference, recommendations)| CatalogEntry { preference, recommendations })
            .collect(),
        Some(raw) => {
            let requested = PreferenceKey::new(raw).canonical();
            let Some((preference, recommendations)) =
                catalog.entries().find(|(preference, _)| preference.as_str() == requested)
            else {
                let error = ApplicationError::Input(format!(
                    "no default catalog entries for preference `{raw}`"
                ));
                return CommandResult::from_error("catalog", &error);
            };
            vec![CatalogEntry { preference, recommendations }]
        }
    };

    CommandResult::document("catalog", &CatalogView { version: catalog.version(), entries }, true)
}
