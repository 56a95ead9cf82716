// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./canvas.toml` > `~/.config/canvas/canvas.toml` > `/etc/canvas/canvas.toml`
//! with environment variable overrides via `CANVAS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CanvasConfig;

/// Top-level sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &[
    "gateway",
    "retry",
    "assignment",
    "doubt",
    "probe",
    "validation",
    "logging",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/canvas/canvas.toml` (system-wide)
/// 3. `~/.config/canvas/canvas.toml` (user XDG config)
/// 4. `./canvas.toml` (local directory)
/// 5. `CANVAS_*` environment variables
pub fn load_config() -> Result<CanvasConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CanvasConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CanvasConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CanvasConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CanvasConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CanvasConfig::default()))
        .merge(Toml::file("/etc/canvas/canvas.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("canvas/canvas.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("canvas.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CANVAS_GATEWAY_API_KEY` maps to `gateway.api_key`, not `gateway.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CANVAS_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
///
/// Figment hands the key over with the case it had in the environment.
fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
