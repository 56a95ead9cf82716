// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use canvas_config::diagnostic::ConfigError;
use canvas_config::model::CanvasConfig;
use canvas_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with every known section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_canvas_config() {
    let toml = r#"
[gateway]
api_url = "https://openrouter.ai/api/v1/chat/completions"
api_key = "sk-or-v1-test"
model = "meta-llama/llama-3.3-70b-instruct:free"
site_url = "https://canvas.example.edu"
site_title = "Canvas Test"
request_timeout_secs = 10

[retry]
max_retries = 2
base_delay_ms = 250
jitter_ms = 50

[assignment]
temperature = 0.3
max_tokens = 2000

[doubt]
temperature = 0.7
max_tokens = 120

[probe]
temperature = 0.0
max_tokens = 20

[validation]
extra_refusal_patterns = ["i will not help"]

[logging]
log_level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.gateway.api_key.as_deref(), Some("sk-or-v1-test"));
    assert_eq!(config.gateway.site_url, "https://canvas.example.edu");
    assert_eq!(config.gateway.site_title, "Canvas Test");
    assert_eq!(config.gateway.request_timeout_secs, 10);
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.retry.base_delay_ms, 250);
    assert_eq!(config.retry.jitter_ms, 50);
    assert_eq!(config.assignment.max_tokens, 2000);
    assert_eq!(config.doubt.max_tokens, 120);
    assert_eq!(config.probe.max_tokens, 20);
    assert_eq!(config.validation.extra_refusal_patterns, vec!["i will not help"]);
    assert_eq!(config.logging.log_level, "debug");
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults should be valid");
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.retry.jitter_ms, 0);
    assert_eq!(config.gateway.request_timeout_secs, 30);
    assert!(config.assignment.temperature < config.doubt.temperature);
    assert!(config.assignment.max_tokens >= 1000);
    assert!(config.doubt.max_tokens < config.assignment.max_tokens);
    assert!(config.gateway.api_key.is_none());
}

/// A partial section only overrides the keys it names.
#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_and_validate_str("[doubt]\nmax_tokens = 80\n").unwrap();
    assert_eq!(config.doubt.max_tokens, 80);
    assert_eq!(config.doubt.temperature, CanvasConfig::default().doubt.temperature);
}

/// A typo in a key yields an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let errors = load_and_validate_str("[gateway]\nmodle = \"x\"\n").unwrap_err();
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "modle" && s == "model"
        )
    });
    assert!(found, "expected unknown key suggestion, got: {errors:?}");
}

/// An unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telemetry")));
}

/// A wrong value type yields an InvalidType diagnostic.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[retry]\nmax_retries = \"three\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_retries"))));
}

/// Semantic validation runs after successful deserialization.
#[test]
fn semantic_validation_errors_surface() {
    let errors = load_and_validate_str("[assignment]\ntemperature = 3.5\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { key, .. } if key == "assignment.temperature")));
}

/// Loading from an explicit path picks up the file's values.
#[test]
fn load_from_explicit_path() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[gateway]\nmodel = \"custom-model\"\n")?;
        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.gateway.model, "custom-model");
        Ok(())
    });
}

/// `CANVAS_*` variables override file values and still pass validation.
#[test]
fn env_vars_override_explicit_path() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[gateway]\nmodel = \"custom-model\"\n")?;
        jail.set_env("CANVAS_GATEWAY_MODEL", "env-model");
        jail.set_env("CANVAS_RETRY_BASE_DELAY_MS", "250");
        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.gateway.model, "env-model");
        assert_eq!(config.retry.base_delay_ms, 250);
        Ok(())
    });
}
