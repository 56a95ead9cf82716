// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter transport for the Learning Canvas completion gateway.
//!
//! This crate implements [`CompletionTransport`] for OpenRouter-compatible
//! chat-completions endpoints. Each call is a single attempt; the gateway owns
//! retry and response validation.

pub mod client;
pub mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use canvas_config::CanvasConfig;
use canvas_core::{
    CanvasError, CompletionReply, CompletionRequest, CompletionTransport, GatewayFailure,
    HealthStatus, PluginAdapter,
};
use tracing::{debug, info, warn};

use crate::client::{ClientSettings, OpenRouterClient};

/// Environment variable consulted when `gateway.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// OpenRouter provider implementing [`CompletionTransport`].
///
/// API key resolution order: config -> `OPENROUTER_API_KEY` env var -> error.
pub struct OpenRouterTransport {
    client: OpenRouterClient,
    model: String,
    /// Outcome of the most recent attempt; `None` after a success.
    last_failure: Mutex<Option<GatewayFailure>>,
    shut_down: AtomicBool,
}

impl OpenRouterTransport {
    /// Creates a transport from the gateway section of `config`.
    pub fn new(config: &CanvasConfig) -> Result<Self, CanvasError> {
        let gateway = &config.gateway;
        let api_key = resolve_api_key(&gateway.api_key)?;

        let client = OpenRouterClient::new(ClientSettings {
            api_url: gateway.api_url.clone(),
            api_key,
            site_url: gateway.site_url.clone(),
            site_title: gateway.site_title.clone(),
            timeout: Duration::from_secs(gateway.request_timeout_secs),
        })?;

        info!(
            model = %gateway.model,
            endpoint = %gateway.api_url,
            "OpenRouter transport initialized"
        );

        Ok(Self {
            client,
            model: gateway.model.clone(),
            last_failure: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        })
    }

    fn record(&self, outcome: Option<GatewayFailure>) {
        let mut last = self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
        *last = outcome;
    }
}

#[async_trait]
impl PluginAdapter for OpenRouterTransport {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// Reports on the last attempt without sending anything.
    ///
    /// Probing costs tokens; the gateway's connectivity probe does the real check.
    async fn health_check(&self) -> Result<HealthStatus, CanvasError> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("transport shut down".into()));
        }
        let last = self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
        Ok(match last.as_ref() {
            None => HealthStatus::Healthy,
            Some(failure) if failure.is_retryable() => {
                HealthStatus::Degraded(format!("last attempt failed: {}", failure.reason))
            }
            Some(failure) => {
                HealthStatus::Unhealthy(format!("last attempt failed: {}", failure.reason))
            }
        })
    }

    async fn shutdown(&self) -> Result<(), CanvasError> {
        debug!("OpenRouter transport shutting down");
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl CompletionTransport for OpenRouterTransport {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayFailure> {
        let response = match self.client.send_once(request).await {
            Ok(response) => response,
            Err(failure) => {
                self.record(Some(failure.clone()));
                return Err(failure);
            }
        };
        self.record(None);

        let truncated = response.truncated_choices();
        if truncated > 0 {
            warn!(
                truncated,
                max_tokens = request.max_tokens,
                "completion stopped at the token ceiling"
            );
        }
        if let Some(served) = response.model.as_deref().filter(|m| *m != self.model) {
            debug!(requested = %self.model, served = %served, "provider routed to a different model");
        }
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "token usage"
            );
        }

        Ok(CompletionReply::from(response))
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, CanvasError> {
    if let Some(key) = config_key.as_deref().filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            CanvasError::Config(format!(
                "API key not found. Set gateway.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}
