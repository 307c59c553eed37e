pub mod catalog;
pub mod config;
pub mod explain;
pub mod recommend;

use recmatch_core::config::{AppConfig, LoadOptions};
use recmatch_core::errors::ApplicationError;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.class(), error.to_string(), error.exit_code())
    }

    /// Prints `value` itself on stdout; commands whose output is a document
    /// rather than a status line use this.
    pub fn document<T: Serialize>(command: &str, value: &T, pretty: bool) -> Self {
        let rendered =
            if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
        match rendered {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::from_error(command, &ApplicationError::from(error)),
        }
    }
}

pub(crate) fn load_config(command: &str, options: LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options).map_err(|error| {
        CommandResult::failure(command, "config_validation", format!("configuration issue: {error}"), 2)
    })
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
