// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions API.
//!
//! [`OpenRouterClient`] builds authenticated requests and performs exactly one
//! attempt per call, classifying the outcome into a [`FailureReason`]. Backoff
//! and retry live in the gateway.

use std::time::Duration;

use canvas_core::{CanvasError, CompletionRequest, FailureReason, GatewayFailure};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionResponse};

/// Connection settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: String,
    pub api_key: String,
    pub site_url: String,
    pub site_title: String,
    pub timeout: Duration,
}

/// HTTP client for OpenRouter-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_url: String,
    /// Exact-match values scrubbed from logged error bodies.
    secrets: Vec<String>,
}

impl OpenRouterClient {
    /// Creates a client with authentication and attribution headers preset.
    pub fn new(settings: ClientSettings) -> Result<Self, CanvasError> {
        canvas_security::validate_url(&settings.api_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", settings.api_key), "API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("http-referer", header_value(&settings.site_url, "site URL")?);
        headers.insert("x-title", header_value(&settings.site_title, "site title")?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CanvasError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: settings.api_url,
            secrets: vec![settings.api_key],
        })
    }

    /// Sends one attempt of `request`.
    ///
    /// Status mapping: 401 auth, 402 quota, 429 rate limited, 5xx server
    /// unavailable, other non-2xx unknown. Timeouts count as server
    /// unavailable and connection failures as network errors. A 2xx body that
    /// is not JSON fails as an invalid response.
    pub async fn send_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChatCompletionResponse, GatewayFailure> {
        let response = self
            .client
            .post(&self.api_url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| classify_transport_error(&e))?;
            return serde_json::from_str::<ChatCompletionResponse>(&body).map_err(|e| {
                warn!(error = %e, "provider returned a malformed body");
                GatewayFailure::invalid_response()
            });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|api_err| api_err.error.message)
            .unwrap_or(body);
        warn!(
            status = %status,
            detail = %canvas_security::redact(&detail, &self.secrets),
            "provider returned an error status"
        );

        Err(failure_for_status(status))
    }
}

/// Maps a non-2xx status onto a display-safe failure.
pub fn failure_for_status(status: StatusCode) -> GatewayFailure {
    match classify_status(status) {
        FailureReason::Unknown => GatewayFailure::new(
            FailureReason::Unknown,
            format!("AI request failed (HTTP {}). Please try again.", status.as_u16()),
        ),
        reason => GatewayFailure::from_reason(reason),
    }
}

/// Classifies a non-2xx HTTP status.
pub fn classify_status(status: StatusCode) -> FailureReason {
    match status.as_u16() {
        401 => FailureReason::AuthError,
        402 => FailureReason::QuotaExceeded,
        429 => FailureReason::RateLimited,
        500..=599 => FailureReason::ServerUnavailable,
        _ => FailureReason::Unknown,
    }
}

fn classify_transport_error(error: &reqwest::Error) -> GatewayFailure {
    if error.is_timeout() {
        warn!(error = %error, "provider request timed out");
        GatewayFailure::from_reason(FailureReason::ServerUnavailable)
    } else {
        warn!(error = %error, "provider request failed");
        GatewayFailure::from_reason(FailureReason::NetworkError)
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, CanvasError> {
    HeaderValue::from_str(value)
        .map_err(|e| CanvasError::Config(format!("invalid {what} header value: {e}")))
}
