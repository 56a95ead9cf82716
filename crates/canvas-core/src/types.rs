// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the transport and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in an outbound chat sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Provider-agnostic completion request, sent unchanged on every attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Target model identifier.
    pub model: String,
    /// Ordered message sequence; the first entry is the system instruction.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Output token ceiling.
    pub max_tokens: u32,
}

/// Raw provider reply after a successful HTTP exchange, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReply {
    pub choices: Vec<ReplyChoice>,
}

/// One completion choice. `content` is `None` when the provider omitted the
/// message or sent a null content field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyChoice {
    pub content: Option<String>,
}

impl CompletionReply {
    /// Convenience constructor for a single-choice reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ReplyChoice {
                content: Some(content.into()),
            }],
        }
    }

    /// Content of the first choice, if the provider sent any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.content.as_deref())
    }
}

/// Classification of a failed completion call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum FailureReason {
    AuthError,
    QuotaExceeded,
    RateLimited,
    ServerUnavailable,
    EmptyContent,
    RefusalDetected,
    NetworkError,
    Unknown,
}

impl FailureReason {
    /// Retryable reasons are re-sent with backoff; all others are terminal.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerUnavailable | Self::NetworkError
        )
    }

    /// Display-safe message used when no more specific text is available.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::AuthError => {
                "AI service authentication failed. Please check the service configuration."
            }
            Self::QuotaExceeded => "AI service quota exceeded. Please try again later.",
            Self::RateLimited => {
                "Rate limit exceeded. Please wait a few minutes before trying again."
            }
            Self::ServerUnavailable => {
                "The AI service is temporarily unavailable. Please try again later."
            }
            Self::EmptyContent => {
                "AI generated empty content. Please try rephrasing your request."
            }
            Self::RefusalDetected => {
                "AI could not process this request. Please try rephrasing or ask for human assistance."
            }
            Self::NetworkError => {
                "Could not reach the AI service. Please check your connection and try again."
            }
            Self::Unknown => "The AI request failed. Please try again.",
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
