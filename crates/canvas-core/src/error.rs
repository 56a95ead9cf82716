// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Learning Canvas gateway.
//!
//! [`CanvasError`] covers failures while *building* things (clients, requests,
//! configuration). Failures of an individual completion call are values of
//! [`GatewayFailure`] and never escape as a panic or an unhandled error.

use thiserror::Error;

use crate::types::FailureReason;

/// The primary error type for construction-time failures.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Configuration errors (missing credential, invalid header value, bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// A request object was rejected at construction time.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider client errors (HTTP client could not be built).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound security policy violations.
    #[error("security error: {0}")]
    Security(String),
}

/// A failed completion call.
///
/// `message` is always safe to show to an end user as-is; `reason` is the
/// machine-readable classification assigned once at the transport boundary
/// or by response validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl GatewayFailure {
    /// Creates a failure with an explicit display message.
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    /// Creates a failure carrying the default display message for `reason`.
    pub fn from_reason(reason: FailureReason) -> Self {
        Self::new(reason, reason.default_message())
    }

    /// Failure returned when the provider replied with an unexpected shape.
    pub fn invalid_response() -> Self {
        Self::new(FailureReason::Unknown, "Invalid response from AI service")
    }

    /// Failure returned when a call is cancelled before it completes.
    pub fn cancelled() -> Self {
        Self::new(FailureReason::Unknown, "The request was cancelled.")
    }

    /// Whether the retry controller may re-send the request.
    pub fn is_retryable(&self) -> bool {
        self.reason.is_retryable()
    }

    /// Replaces the display message, keeping the reason.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
