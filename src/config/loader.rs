//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `authentication.token`.
pub const TOKEN_ENV: &str = "USERS_API_TOKEN";

/// Environment variable overriding `listener.bind_address`.
pub const BIND_ENV: &str = "USERS_API_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides from a variable lookup (the process environment in
/// production).
pub fn apply_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
        config.authentication.token = token;
    }
    if let Some(bind) = lookup(BIND_ENV).filter(|b| !b.is_empty()) {
        config.listener.bind_address = bind;
    }
}
