// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter chat-completions response and error types.
//!
//! The request body is [`canvas_core::CompletionRequest`] serialized as-is;
//! its shape already matches the chat-completions API.

use canvas_core::{CompletionReply, ReplyChoice};
use serde::Deserialize;

/// A chat-completions response body.
///
/// Every field is lenient: a missing `choices` array deserializes as empty and
/// is rejected later by response validation rather than here.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model that actually served the request, which may differ from the one asked for.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice. `content` may be JSON `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

impl ChatCompletionResponse {
    /// Number of choices the provider cut off at the token ceiling.
    pub fn truncated_choices(&self) -> usize {
        self.choices
            .iter()
            .filter(|choice| choice.finish_reason.as_deref() == Some("length"))
            .count()
    }
}

impl From<ChatCompletionResponse> for CompletionReply {
    fn from(response: ChatCompletionResponse) -> Self {
        Self {
            choices: response
                .choices
                .into_iter()
                .map(|choice| ReplyChoice {
                    content: choice.message.and_then(|m| m.content),
                })
                .collect(),
        }
    }
}
