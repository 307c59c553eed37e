use std::env;
use std::fs;
use std::path::Path;

use recmatch_core::config::{resolve_config_path, LoadOptions};
use toml::Value;

use crate::commands::{load_config, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match load_config("config", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "matching.min_substring_len",
        &config.matching.min_substring_len.to_string(),
        source("matching.min_substring_len", &["RECMATCH_MATCHING_MIN_SUBSTRING_LEN"]),
    ));
    lines.push(render_line(
        "matching.min_token_len",
        &config.matching.min_token_len.to_string(),
        source("matching.min_token_len", &["RECMATCH_MATCHING_MIN_TOKEN_LEN"]),
    ));
    lines.push(render_line(
        "financial.default_payback_years",
        &config.financial.default_payback_years.to_string(),
        source("financial.default_payback_years", &["RECMATCH_FINANCIAL_DEFAULT_PAYBACK_YEARS"]),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["RECMATCH_LOGGING_LEVEL", "RECMATCH_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["RECMATCH_LOGGING_FORMAT", "RECMATCH_LOG_FORMAT"]),
    ));

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
