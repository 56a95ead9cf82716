// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response validation: structure, emptiness, then refusal phrases.

use std::fmt;

use canvas_core::{CompletionReply, FailureReason, GatewayFailure};

/// Refusal phrases matched against lower-cased completion text.
pub const BUILTIN_REFUSAL_PATTERNS: &[&str] = &[
    "i cannot fulfill this request",
    "as an ai model",
    "as an ai language model",
    "i cannot provide a direct answer",
    "i'm unable to assist",
];

/// Validated completion text: trimmed and never empty.
///
/// Only [`ResponseValidator::validate`] can construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    text: String,
}

impl Completion {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Checks a successful transport reply before it is handed to the caller.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    patterns: Vec<String>,
}

impl ResponseValidator {
    /// Built-in refusal phrases plus `extra` (compared case-insensitively).
    pub fn new(extra: &[String]) -> Self {
        let patterns = BUILTIN_REFUSAL_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .chain(extra.iter().map(|p| p.trim().to_lowercase()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// The first choice carrying content is used; choices with `null`
    /// content are skipped.
    pub fn validate(&self, reply: &CompletionReply) -> Result<Completion, GatewayFailure> {
        let Some(content) = reply.choices.iter().find_map(|c| c.content.as_deref()) else {
            return Err(GatewayFailure::invalid_response());
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(GatewayFailure::from_reason(FailureReason::EmptyContent));
        }

        if let Some(pattern) = self.refusal_in(trimmed) {
            tracing::warn!(pattern, "completion matched a refusal phrase");
            return Err(GatewayFailure::from_reason(FailureReason::RefusalDetected));
        }

        Ok(Completion {
            text: trimmed.to_string(),
        })
    }

    fn refusal_in(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .find(|p| lowered.contains(p.as_str()))
            .map(String::as_str)
    }
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new(&[])
    }
}
