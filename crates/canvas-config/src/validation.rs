// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: URL shape, sampling
//! ranges, non-zero ceilings and a sane retry budget.

use crate::diagnostic::ConfigError;
use crate::model::CanvasConfig;

/// Providers accept temperatures in this range.
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Upper bound on `retry.max_retries`.
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing fast.
pub fn validate_config(config: &CanvasConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_endpoint(config, &mut errors);

    if config.gateway.model.trim().is_empty() {
        errors.push(ConfigError::invalid("gateway.model", "must not be empty"));
    }

    if let Some(key) = &config.gateway.api_key {
        if key.chars().any(char::is_whitespace) {
            errors.push(ConfigError::invalid(
                "gateway.api_key",
                "must not contain whitespace",
            ));
        }
    }

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ConfigError::invalid(
            "gateway.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.retry.base_delay_ms == 0 {
        errors.push(ConfigError::invalid("retry.base_delay_ms", "must be at least 1"));
    }

    if config.retry.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ConfigError::invalid(
            "retry.max_retries",
            format!(
                "must be at most {MAX_RETRIES_LIMIT}, got {}",
                config.retry.max_retries
            ),
        ));
    }

    let sampling = [
        ("assignment", config.assignment.temperature, config.assignment.max_tokens),
        ("doubt", config.doubt.temperature, config.doubt.max_tokens),
        ("probe", config.probe.temperature, config.probe.max_tokens),
    ];
    for (section, temperature, max_tokens) in sampling {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            errors.push(ConfigError::invalid(
                &format!("{section}.temperature"),
                format!("must be between 0.0 and 2.0, got {temperature}"),
            ));
        }
        if max_tokens == 0 {
            errors.push(ConfigError::invalid(
                &format!("{section}.max_tokens"),
                "must be at least 1",
            ));
        }
    }

    for (i, pattern) in config.validation.extra_refusal_patterns.iter().enumerate() {
        if pattern.trim().is_empty() {
            errors.push(ConfigError::invalid(
                &format!("validation.extra_refusal_patterns[{i}]"),
                "must not be empty",
            ));
        }
    }

    if !matches!(
        config.logging.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::invalid(
            "logging.log_level",
            format!(
                "must be one of trace, debug, info, warn, error; got `{}`",
                config.logging.log_level
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_endpoint(config: &CanvasConfig, errors: &mut Vec<ConfigError>) {
    match url::Url::parse(&config.gateway.api_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ConfigError::invalid(
            "gateway.api_url",
            format!("unsupported scheme `{}`", parsed.scheme()),
        )),
        Err(e) => errors.push(ConfigError::invalid(
            "gateway.api_url",
            format!("`{}` is not a valid URL: {e}", config.gateway.api_url),
        )),
    }
}
