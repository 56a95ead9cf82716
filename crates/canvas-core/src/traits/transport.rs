// SPDX-FileCopyrightText: 2026 Learning Canvas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for chat-completion providers.

use async_trait::async_trait;

use crate::error::GatewayFailure;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionReply, CompletionRequest};

/// A single-attempt chat-completion transport.
///
/// Implementations perform exactly one exchange with the provider and
/// classify its outcome; retrying is the caller's job. An `Ok` reply means the
/// provider answered with a 2xx status and a parseable body, and has not been
/// validated yet.
#[async_trait]
pub trait CompletionTransport: PluginAdapter {
    /// Model identifier requests should target.
    fn model(&self) -> &str;

    /// Sends one attempt of `request`.
    async fn send(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayFailure>;
}
