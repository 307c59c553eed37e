use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Non-fatal conditions observed while composing recommendations. The engine
/// recovers from all of them locally and reports them alongside the result.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("preference key `{key}` is not recognized; only fuzzy tiers can match it")]
    InvalidPreferenceKey { key: String },
    #[error("candidate `{id}` had invalid financial fields ({})", .repaired_fields.join(", "))]
    MalformedCandidate { id: String, repaired_fields: Vec<String> },
    #[error("{input} input was empty")]
    EmptyInput { input: String },
}

/// Failures at the edges of the engine: configuration and candidate sources.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("input failure: {0}")]
    Input(String),
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl ApplicationError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Input(_) => "input",
            Self::Serialization(_) => "serialization",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Input(_) => 3,
            Self::Serialization(_) => 4,
        }
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}
