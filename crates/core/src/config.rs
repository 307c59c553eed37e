use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::relevance::{DEFAULT_MIN_SUBSTRING_LEN, DEFAULT_MIN_TOKEN_LEN, DEFAULT_PAYBACK_YEARS};

pub const DEFAULT_CONFIG_FILE: &str = "recmatch.toml";
pub const NESTED_CONFIG_FILE: &str = "config/recmatch.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub financial: FinancialConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchingConfig {
    pub min_substring_len: usize,
    pub min_token_len: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinancialConfig {
    pub default_payback_years: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub min_substring_len: Option<usize>,
    pub min_token_len: Option<usize>,
    pub default_payback_years: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                min_substring_len: DEFAULT_MIN_SUBSTRING_LEN,
                min_token_len: DEFAULT_MIN_TOKEN_LEN,
            },
            financial: FinancialConfig { default_payback_years: DEFAULT_PAYBACK_YEARS },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(matching) = patch.matching {
            if let Some(min_substring_len) = matching.min_substring_len {
                self.matching.min_substring_len = min_substring_len;
            }
            if let Some(min_token_len) = matching.min_token_len {
                self.matching.min_token_len = min_token_len;
            }
        }

        if let Some(financial) = patch.financial {
            if let Some(default_payback_years) = financial.default_payback_years {
                self.financial.default_payback_years = default_payback_years;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RECMATCH_MATCHING_MIN_SUBSTRING_LEN") {
            self.matching.min_substring_len =
                parse_usize("RECMATCH_MATCHING_MIN_SUBSTRING_LEN", &value)?;
        }
        if let Some(value) = read_env("RECMATCH_MATCHING_MIN_TOKEN_LEN") {
            self.matching.min_token_len = parse_usize("RECMATCH_MATCHING_MIN_TOKEN_LEN", &value)?;
        }
        if let Some(value) = read_env("RECMATCH_FINANCIAL_DEFAULT_PAYBACK_YEARS") {
            self.financial.default_payback_years =
                parse_f64("RECMATCH_FINANCIAL_DEFAULT_PAYBACK_YEARS", &value)?;
        }

        let log_level =
            read_env("RECMATCH_LOGGING_LEVEL").or_else(|| read_env("RECMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RECMATCH_LOGGING_FORMAT").or_else(|| read_env("RECMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(min_substring_len) = overrides.min_substring_len {
            self.matching.min_substring_len = min_substring_len;
        }
        if let Some(min_token_len) = overrides.min_token_len {
            self.matching.min_token_len = min_token_len;
        }
        if let Some(default_payback_years) = overrides.default_payback_years {
            self.financial.default_payback_years = default_payback_years;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_matching(&self.matching)?;
        validate_financial(&self.financial)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// First config file that exists, honoring an explicit path when given.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if !(1..=32).contains(&matching.min_substring_len) {
        return Err(ConfigError::Validation(
            "matching.min_substring_len must be in range 1..=32".to_string(),
        ));
    }

    if !(1..=32).contains(&matching.min_token_len) {
        return Err(ConfigError::Validation(
            "matching.min_token_len must be in range 1..=32".to_string(),
        ));
    }

    Ok(())
}

fn validate_financial(financial: &FinancialConfig) -> Result<(), ConfigError> {
    let years = financial.default_payback_years;
    if !years.is_finite() || years <= 0.0 {
        return Err(ConfigError::Validation(
            "financial.default_payback_years must be a finite number greater than zero"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    matching: Option<MatchingPatch>,
    financial: Option<FinancialPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    min_substring_len: Option<usize>,
    min_token_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialPatch {
    default_payback_years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
