// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Learning Canvas gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    /// Provider endpoint, credential and attribution settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Backoff policy for retryable failures.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Sampling parameters for assignment drafting.
    #[serde(default)]
    pub assignment: AssignmentConfig,

    /// Sampling parameters for doubt-resolution hints.
    #[serde(default)]
    pub doubt: DoubtConfig,

    /// Sampling parameters for the connectivity probe.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Response validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key. `None` falls back to the `OPENROUTER_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Site URL sent as the `HTTP-Referer` attribution header.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Site title sent as the `X-Title` attribution header.
    #[serde(default = "default_site_title")]
    pub site_title: String,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            site_url: default_site_url(),
            site_title: default_site_title(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-3.3-70b-instruct:free".to_string()
}

fn default_site_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_site_title() -> String {
    "The Learning Canvas".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Retry/backoff configuration.
///
/// Delay before retry `n` (0-based) is `base_delay_ms * 2^n`, plus up to
/// `jitter_ms` of uniform random jitter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound of random jitter added to each delay, in milliseconds.
    #[serde(default)]
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            jitter_ms: 0,
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

/// Sampling for assignment drafts and free-form content: low temperature,
/// room for a multi-question draft.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentConfig {
    #[serde(default = "default_assignment_temperature")]
    pub temperature: f64,

    #[serde(default = "default_assignment_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            temperature: default_assignment_temperature(),
            max_tokens: default_assignment_max_tokens(),
        }
    }
}

fn default_assignment_temperature() -> f64 {
    0.2
}

fn default_assignment_max_tokens() -> u32 {
    1500
}

/// Sampling for doubt-resolution hints: moderate temperature, short output.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DoubtConfig {
    #[serde(default = "default_doubt_temperature")]
    pub temperature: f64,

    #[serde(default = "default_doubt_max_tokens")]
    pub max_tokens: u32,
}

impl Default for DoubtConfig {
    fn default() -> Self {
        Self {
            temperature: default_doubt_temperature(),
            max_tokens: default_doubt_max_tokens(),
        }
    }
}

fn default_doubt_temperature() -> f64 {
    0.6
}

fn default_doubt_max_tokens() -> u32 {
    150
}

/// Sampling for the connectivity probe.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_temperature")]
    pub temperature: f64,

    #[serde(default = "default_probe_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            temperature: default_probe_temperature(),
            max_tokens: default_probe_max_tokens(),
        }
    }
}

fn default_probe_temperature() -> f64 {
    0.1
}

fn default_probe_max_tokens() -> u32 {
    50
}

/// Response validation configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Refusal phrases checked in addition to the built-in list.
    /// Matched case-insensitively as substrings.
    #[serde(default)]
    pub extra_refusal_patterns: Vec<String>,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
